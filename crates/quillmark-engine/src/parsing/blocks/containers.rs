use crate::parsing::rope::span::Span;
use crate::refs::{FootnoteDef, References};
use crate::token::{Token, TokenKind};

use super::kinds::BlockQuote;
use super::types::{ContainerKind, leading_spaces};

/// One open container on the block builder's stack.
#[derive(Debug)]
pub struct Frame {
    pub kind: ContainerKind,
    pub children: Vec<Token>,
    pub start: usize,
    pub end: usize,
    /// A blank line was seen since the last child was added.
    pub pending_blank: bool,
}

impl Frame {
    pub fn new(kind: ContainerKind, start: usize) -> Self {
        Self {
            kind,
            children: Vec::new(),
            start,
            end: start,
            pending_blank: false,
        }
    }

    /// Converts a closed frame into its token. Footnote definitions are moved
    /// into `refs` instead and produce nothing.
    pub fn into_token(self, refs: &mut References) -> Option<Token> {
        let span = Span::new(self.start, self.end);
        match self.kind {
            ContainerKind::Document => Some(Token::container(
                TokenKind::Document,
                span,
                self.children,
            )),
            ContainerKind::BlockQuote => Some(Token::container(
                TokenKind::BlockQuote,
                span,
                self.children,
            )),
            ContainerKind::ListItem { .. } => Some(Token::container(
                TokenKind::ListItem,
                span,
                self.children,
            )),
            ContainerKind::List { marker, loose } => {
                let mut items = self.children;
                if !loose {
                    tighten(&mut items);
                }
                let mut token = Token::container(TokenKind::List, span, items)
                    .with_attr("ordered", marker.ordered)
                    .with_attr("loose", loose);
                if marker.ordered {
                    token.set_attr("start", i64::try_from(marker.start).unwrap_or(i64::MAX));
                }
                Some(token)
            }
            ContainerKind::FootnoteDef { label } => {
                let def = FootnoteDef {
                    label,
                    children: self.children,
                };
                if !refs.define_footnote(def) {
                    log::trace!("duplicate footnote definition ignored");
                }
                None
            }
        }
    }
}

/// Paragraphs directly inside the items of a tight list are rendered
/// without paragraph wrapping.
fn tighten(items: &mut [Token]) {
    for item in items {
        if let Some(children) = item.children_mut() {
            for child in children.iter_mut() {
                if child.kind == TokenKind::Paragraph {
                    child.kind = TokenKind::BlockText;
                }
            }
        }
    }
}

/// Bytes of `rest` consumed by the continuation prefix of an open container,
/// or `None` if the line does not continue it.
pub fn continues(kind: &ContainerKind, rest: &str) -> Option<usize> {
    match kind {
        ContainerKind::Document | ContainerKind::List { .. } => Some(0),
        ContainerKind::BlockQuote => BlockQuote::marker_len(rest),
        ContainerKind::ListItem { .. } | ContainerKind::FootnoteDef { .. } => {
            if rest.trim().is_empty() {
                return Some(0);
            }
            let need = kind.content_indent()?;
            (leading_spaces(rest) >= need).then_some(need)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::types::ListMarker;
    use pretty_assertions::assert_eq;

    fn item(content_indent: usize) -> ContainerKind {
        ContainerKind::ListItem {
            marker: ListMarker {
                ordered: false,
                delimiter: b'-',
                start: 1,
            },
            content_indent,
        }
    }

    #[test]
    fn quote_needs_its_marker() {
        assert_eq!(continues(&ContainerKind::BlockQuote, "> x"), Some(2));
        assert_eq!(continues(&ContainerKind::BlockQuote, "x"), None);
    }

    #[test]
    fn item_needs_indentation_or_blank() {
        assert_eq!(continues(&item(2), "  x"), Some(2));
        assert_eq!(continues(&item(2), "     x"), Some(2));
        assert_eq!(continues(&item(2), " x"), None);
        assert_eq!(continues(&item(2), ""), Some(0));
    }

    #[test]
    fn footnote_continuation_is_four_columns() {
        let kind = ContainerKind::FootnoteDef { label: "1".into() };
        assert_eq!(continues(&kind, "    more"), Some(4));
        assert_eq!(continues(&kind, "  more"), None);
    }

    #[test]
    fn tight_list_drops_paragraph_wrapping() {
        let marker = ListMarker {
            ordered: true,
            delimiter: b'.',
            start: 3,
        };
        let mut frame = Frame::new(
            ContainerKind::List {
                marker,
                loose: false,
            },
            0,
        );
        frame.children.push(Token::container(
            TokenKind::ListItem,
            Span::new(0, 4),
            vec![Token::pending_inline(TokenKind::Paragraph, Span::new(3, 4), "a")],
        ));
        let token = frame.into_token(&mut References::new()).unwrap();
        assert_eq!(token.attr_int("start"), Some(3));
        assert!(!token.attr_bool("loose"));
        assert_eq!(token.children()[0].children()[0].kind, TokenKind::BlockText);
    }

    #[test]
    fn footnote_frame_moves_into_references() {
        let mut refs = References::new();
        let frame = Frame::new(ContainerKind::FootnoteDef { label: "Note".into() }, 0);
        assert!(frame.into_token(&mut refs).is_none());
        assert!(refs.footnote("note").is_some());
    }
}
