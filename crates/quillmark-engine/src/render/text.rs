//! Line-oriented text layout shared by the plain text and terminal
//! renderers.
//!
//! Blocks are separated by a blank line; items of a tight list by a single
//! newline. List markers are kept and continuation lines hang under the item
//! text; quoted lines get a gutter prefix. How headings, emphasis, code and
//! links look is left to a [`Style`].
//!
//! Plugin tags without a hook render their content: as blocks when any child
//! is a built-in block, as inline text when any child is built-in inline,
//! and in the surrounding mode otherwise.

use crate::document::Document;
use crate::token::{Body, Token, TokenKind};

use super::{Hooks, Render};

/// The look of the styled parts of a text layout.
pub trait Style {
    fn heading(&self, level: i64, text: &str) -> String;
    fn emphasis(&self, text: &str) -> String;
    fn strong(&self, text: &str) -> String;
    fn code(&self, text: &str) -> String;
    /// Code block content without its trailing newline.
    fn code_block(&self, code: &str) -> String;
    fn rule(&self) -> String;
    fn link(&self, text: &str, url: &str) -> String;
    fn quote_gutter(&self) -> &'static str;
    fn bullet(&self) -> &'static str;
}

/// Unstyled text: markup reduced to its content.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Style for Plain {
    fn heading(&self, _: i64, text: &str) -> String {
        text.to_string()
    }

    fn emphasis(&self, text: &str) -> String {
        text.to_string()
    }

    fn strong(&self, text: &str) -> String {
        text.to_string()
    }

    fn code(&self, text: &str) -> String {
        text.to_string()
    }

    fn code_block(&self, code: &str) -> String {
        code.to_string()
    }

    fn rule(&self) -> String {
        "---".to_string()
    }

    fn link(&self, text: &str, _: &str) -> String {
        text.to_string()
    }

    fn quote_gutter(&self) -> &'static str {
        "> "
    }

    fn bullet(&self) -> &'static str {
        "-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Block,
    Inline,
}

/// The mode children render in.
fn child_mode(children: &[Token], inherited: Mode) -> Mode {
    let mut mode = inherited;
    for child in children {
        match child.kind.is_inline() {
            Some(false) => return Mode::Block,
            Some(true) => mode = Mode::Inline,
            None => {}
        }
    }
    mode
}

/// Prefixes every line with `prefix`; empty lines get it without trailing
/// spaces.
fn prefix_lines(body: &str, prefix: &str) -> String {
    body.lines()
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Puts `marker` before the first line and indents the rest to match.
fn hang(marker: &str, body: &str) -> String {
    let indent = " ".repeat(marker.chars().count());
    let mut out = String::from(marker);
    for (i, line) in body.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
            }
        }
        out.push_str(line);
    }
    out
}

pub struct Layout<'r, S> {
    hooks: Hooks<'r>,
    style: S,
}

/// Plain text output.
pub type TextRenderer<'r> = Layout<'r, Plain>;

impl<'r, S: Style> Layout<'r, S> {
    pub fn new(hooks: Hooks<'r>, style: S) -> Self {
        Self { hooks, style }
    }

    fn blocks(&self, tokens: &[Token], sep: &str) -> String {
        tokens
            .iter()
            .map(|t| self.block(t))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn inlines(&self, tokens: &[Token]) -> String {
        tokens.iter().map(|t| self.inline(t)).collect()
    }

    fn inner(&self, token: &Token, inherited: Mode) -> String {
        match &token.body {
            Body::Text(text) | Body::Inline(text) => text.clone(),
            Body::Children(children) => match child_mode(children, inherited) {
                Mode::Block => self.blocks(children, "\n\n"),
                Mode::Inline => self.inlines(children),
            },
        }
    }

    fn block(&self, token: &Token) -> String {
        if let Some(hook) = self.hooks.get(token) {
            return hook(token, &self.inner(token, Mode::Block));
        }
        let payload = token.text_payload().unwrap_or_default();
        match token.kind {
            TokenKind::Document | TokenKind::ListItem => self.blocks(token.children(), "\n\n"),
            TokenKind::Paragraph | TokenKind::BlockText => self.inlines(token.children()),
            TokenKind::Heading => self.style.heading(
                token.attr_int("level").unwrap_or(1),
                &self.inlines(token.children()),
            ),
            TokenKind::ThematicBreak => self.style.rule(),
            TokenKind::BlockCode => self.style.code_block(payload.trim_end_matches('\n')),
            TokenKind::BlockHtml => payload.trim_end().to_string(),
            TokenKind::BlockQuote => prefix_lines(
                &self.blocks(token.children(), "\n\n"),
                self.style.quote_gutter(),
            ),
            TokenKind::List => self.list(token),
            TokenKind::Plugin(_) => self.inner(token, Mode::Block),
            _ => self.inline(token),
        }
    }

    fn list(&self, list: &Token) -> String {
        let ordered = list.attr_bool("ordered");
        let start = list.attr_int("start").unwrap_or(1);
        let sep = if list.attr_bool("loose") { "\n\n" } else { "\n" };
        let items: Vec<String> = list
            .children()
            .iter()
            .zip(0..)
            .map(|(item, i)| {
                let marker = if ordered {
                    format!("{}. ", start + i)
                } else {
                    format!("{} ", self.style.bullet())
                };
                let body = match self.hooks.get(item) {
                    Some(hook) => hook(item, &self.inner(item, Mode::Block)),
                    None => self.blocks(item.children(), sep),
                };
                hang(&marker, &body)
            })
            .collect();
        items.join(sep)
    }

    fn inline(&self, token: &Token) -> String {
        if let Some(hook) = self.hooks.get(token) {
            return hook(token, &self.inner(token, Mode::Inline));
        }
        let payload = token.text_payload().unwrap_or_default();
        match token.kind {
            TokenKind::Text | TokenKind::InlineHtml => payload.to_string(),
            TokenKind::Emphasis => self.style.emphasis(&self.inlines(token.children())),
            TokenKind::Strong => self.style.strong(&self.inlines(token.children())),
            TokenKind::Codespan => self.style.code(payload),
            TokenKind::Linebreak | TokenKind::Softbreak => "\n".to_string(),
            TokenKind::Link => self.style.link(
                &self.inlines(token.children()),
                token.attr_str("url").unwrap_or_default(),
            ),
            TokenKind::Image => token.plain_text(),
            TokenKind::Plugin(_) => self.inner(token, Mode::Inline),
            _ => self.block(token),
        }
    }
}

impl<S: Style> Render for Layout<'_, S> {
    fn render(&self, doc: &Document) -> String {
        let mut out = self.blocks(doc.blocks(), "\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
