use crate::parsing::blocks::types::{BlockStart, ContainerKind, LineCx, ListMarker, leading_spaces};

pub struct ListItem;

impl ListItem {
    pub const BULLETS: &'static [u8] = b"-+*";
    pub const MAX_DIGITS: usize = 9;
    /// Content further right than this after the marker is indented code.
    const MAX_GAP: usize = 4;

    /// Parses a list marker at the start of `s`, returning it with its width.
    pub fn marker(s: &str) -> Option<(ListMarker, usize)> {
        let first = *s.as_bytes().first()?;
        if Self::BULLETS.contains(&first) {
            let marker = ListMarker {
                ordered: false,
                delimiter: first,
                start: 1,
            };
            return Some((marker, 1));
        }
        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits > Self::MAX_DIGITS {
            return None;
        }
        let delimiter = *s.as_bytes().get(digits)?;
        if delimiter != b'.' && delimiter != b')' {
            return None;
        }
        let start = s[..digits].parse().ok()?;
        let marker = ListMarker {
            ordered: true,
            delimiter,
            start,
        };
        Some((marker, digits + 1))
    }

    /// Opens a list item container.
    ///
    /// Interrupting a paragraph needs a non-empty item, and for ordered lists
    /// a start of 1.
    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        let rest = cx.marker_text()?;
        let (marker, width) = Self::marker(rest)?;
        let after = &rest[width..];
        let empty = after.trim().is_empty();
        if !empty && !after.starts_with(' ') {
            return None;
        }
        if cx.in_paragraph() && !cx.lazy && (empty || (marker.ordered && marker.start != 1)) {
            return None;
        }
        let gap = leading_spaces(after);
        let gap = if empty || gap > Self::MAX_GAP { 1 } else { gap };
        let content_indent = cx.indent + width + gap;
        Some(BlockStart::Container {
            kind: ContainerKind::ListItem {
                marker,
                content_indent,
            },
            consumed: content_indent.min(cx.text.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(line: &str) -> Option<(ListMarker, usize, usize)> {
        match ListItem::start(&LineCx::new(line))? {
            BlockStart::Container {
                kind: ContainerKind::ListItem {
                    marker,
                    content_indent,
                },
                consumed,
            } => Some((marker, content_indent, consumed)),
            _ => None,
        }
    }

    #[test]
    fn bullet_item() {
        let (marker, indent, consumed) = item("- foo").unwrap();
        assert!(!marker.ordered);
        assert_eq!(marker.delimiter, b'-');
        assert_eq!((indent, consumed), (2, 2));
    }

    #[test]
    fn ordered_item_keeps_start() {
        let (marker, indent, _) = item(" 12)  foo").unwrap();
        assert!(marker.ordered);
        assert_eq!(marker.start, 12);
        assert_eq!(marker.delimiter, b')');
        assert_eq!(indent, 6);
    }

    #[test]
    fn wide_gap_means_code_content() {
        let (_, indent, consumed) = item("-      code").unwrap();
        assert_eq!((indent, consumed), (2, 2));
    }

    #[test]
    fn empty_item() {
        let (_, indent, consumed) = item("-").unwrap();
        assert_eq!((indent, consumed), (2, 1));
    }

    #[test]
    fn marker_needs_a_space() {
        assert!(item("-foo").is_none());
        assert!(item("1.foo").is_none());
        assert!(item("1234567890. foo").is_none());
    }

    #[test]
    fn interrupting_a_paragraph() {
        let lines = vec!["text".to_string()];
        let under = |line: &'static str| LineCx {
            paragraph: Some(lines.as_slice()),
            ..LineCx::new(line)
        };
        assert!(ListItem::start(&under("- x")).is_some());
        assert!(ListItem::start(&under("1. x")).is_some());
        assert!(ListItem::start(&under("2. x")).is_none());
        assert!(ListItem::start(&under("-")).is_none());
    }

    #[test]
    fn marker_kinds_continue() {
        let (a, _) = ListItem::marker("- x").unwrap();
        let (b, _) = ListItem::marker("* x").unwrap();
        let (c, _) = ListItem::marker("- y").unwrap();
        assert!(!a.continues(b));
        assert!(a.continues(c));
    }
}
