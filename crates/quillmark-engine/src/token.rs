//! # Tokens
//!
//! The interchange tree handed from the scanners to renderers.
//!
//! Every [`Token`] carries a type tag ([`TokenKind`]), a small attribute map,
//! and a [`Body`]: either ordered child tokens (containers) or a literal text
//! payload (leaves). Renderers are written against this contract only.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::parsing::rope::span::Span;

/// The type tag of a token.
///
/// Built-in tags are enum variants; tags introduced by plugins are carried as
/// [`TokenKind::Plugin`] and must be declared by the plugin so the rule
/// registry knows the complete tag set before any parse runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Document,
    Paragraph,
    Heading,
    ThematicBreak,
    BlockCode,
    BlockHtml,
    BlockQuote,
    List,
    ListItem,
    /// Paragraph content of a tight list item, rendered without wrapping.
    BlockText,
    Text,
    Emphasis,
    Strong,
    Codespan,
    Linebreak,
    Softbreak,
    InlineHtml,
    Link,
    Image,
    Plugin(&'static str),
}

impl TokenKind {
    /// Every built-in kind, used to seed the registry's tag set.
    pub const BUILTIN: [TokenKind; 19] = [
        TokenKind::Document,
        TokenKind::Paragraph,
        TokenKind::Heading,
        TokenKind::ThematicBreak,
        TokenKind::BlockCode,
        TokenKind::BlockHtml,
        TokenKind::BlockQuote,
        TokenKind::List,
        TokenKind::ListItem,
        TokenKind::BlockText,
        TokenKind::Text,
        TokenKind::Emphasis,
        TokenKind::Strong,
        TokenKind::Codespan,
        TokenKind::Linebreak,
        TokenKind::Softbreak,
        TokenKind::InlineHtml,
        TokenKind::Link,
        TokenKind::Image,
    ];

    /// The string tag used in serialized output and renderer hook lookup.
    pub fn tag(self) -> &'static str {
        match self {
            TokenKind::Document => "document",
            TokenKind::Paragraph => "paragraph",
            TokenKind::Heading => "heading",
            TokenKind::ThematicBreak => "thematic_break",
            TokenKind::BlockCode => "block_code",
            TokenKind::BlockHtml => "block_html",
            TokenKind::BlockQuote => "block_quote",
            TokenKind::List => "list",
            TokenKind::ListItem => "list_item",
            TokenKind::BlockText => "block_text",
            TokenKind::Text => "text",
            TokenKind::Emphasis => "emphasis",
            TokenKind::Strong => "strong",
            TokenKind::Codespan => "codespan",
            TokenKind::Linebreak => "linebreak",
            TokenKind::Softbreak => "softbreak",
            TokenKind::InlineHtml => "inline_html",
            TokenKind::Link => "link",
            TokenKind::Image => "image",
            TokenKind::Plugin(tag) => tag,
        }
    }

    /// Whether a built-in kind is inline-level. Plugin kinds are unknown.
    pub fn is_inline(self) -> Option<bool> {
        match self {
            TokenKind::Plugin(_) => None,
            TokenKind::Text
            | TokenKind::Emphasis
            | TokenKind::Strong
            | TokenKind::Codespan
            | TokenKind::Linebreak
            | TokenKind::Softbreak
            | TokenKind::InlineHtml
            | TokenKind::Link
            | TokenKind::Image => Some(true),
            _ => Some(false),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Attr {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for Attr {
    fn from(v: bool) -> Self {
        Attr::Bool(v)
    }
}

impl From<i64> for Attr {
    fn from(v: i64) -> Self {
        Attr::Int(v)
    }
}

impl From<usize> for Attr {
    fn from(v: usize) -> Self {
        Attr::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<String> for Attr {
    fn from(v: String) -> Self {
        Attr::Str(v)
    }
}

impl From<&str> for Attr {
    fn from(v: &str) -> Self {
        Attr::Str(v.to_string())
    }
}

pub type Attrs = BTreeMap<&'static str, Attr>;

/// What a token holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    /// Ordered child tokens of a container.
    Children(Vec<Token>),
    /// Literal text payload of a leaf.
    Text(String),
    /// Raw inline source awaiting the inline scanner.
    ///
    /// Only exists between the two scanning phases; a finished
    /// [`Document`](crate::Document) never contains it.
    Inline(String),
}

/// A node of the token tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(flatten)]
    pub attrs: Attrs,
    #[serde(flatten)]
    pub body: Body,
    /// Source bytes this token consumed (see [`Span`]).
    #[serde(skip)]
    pub span: Span,
    /// Byte length of the inline source an inline-scanned leaf was built
    /// from; its children tile exactly `0..inline_len`.
    #[serde(skip)]
    pub inline_len: Option<usize>,
}

impl Token {
    pub fn container(kind: TokenKind, span: Span, children: Vec<Token>) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
            body: Body::Children(children),
            span,
            inline_len: None,
        }
    }

    pub fn leaf(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
            body: Body::Text(text.into()),
            span,
            inline_len: None,
        }
    }

    pub fn text(span: Span, text: impl Into<String>) -> Self {
        Self::leaf(TokenKind::Text, span, text)
    }

    /// A block whose content still has to go through the inline scanner.
    pub fn pending_inline(kind: TokenKind, span: Span, source: impl Into<String>) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
            body: Body::Inline(source.into()),
            span,
            inline_len: None,
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: &'static str, value: impl Into<Attr>) -> Self {
        self.attrs.insert(key, value.into());
        self
    }

    pub fn set_attr(&mut self, key: &'static str, value: impl Into<Attr>) {
        self.attrs.insert(key, value.into());
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        match self.attrs.get(key) {
            Some(Attr::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn attr_int(&self, key: &str) -> Option<i64> {
        match self.attrs.get(key) {
            Some(Attr::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn attr_bool(&self, key: &str) -> bool {
        matches!(self.attrs.get(key), Some(Attr::Bool(true)))
    }

    /// Child tokens, empty for leaves.
    pub fn children(&self) -> &[Token] {
        match &self.body {
            Body::Children(c) => c,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Token>> {
        match &mut self.body {
            Body::Children(c) => Some(c),
            _ => None,
        }
    }

    /// Literal payload for leaves.
    pub fn text_payload(&self) -> Option<&str> {
        match &self.body {
            Body::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Concatenated literal text of this token and its descendants.
    ///
    /// Used for image alt text and plain-text projections.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.body {
            Body::Text(t) | Body::Inline(t) => match self.kind {
                TokenKind::Softbreak | TokenKind::Linebreak => out.push('\n'),
                _ => out.push_str(t),
            },
            Body::Children(children) => {
                for c in children {
                    c.collect_text(out);
                }
            }
        }
    }

    /// Depth-first walk over this token and all descendants.
    pub fn walk(&self, f: &mut impl FnMut(&Token)) {
        f(self);
        for c in self.children() {
            c.walk(f);
        }
    }

    /// Mutable depth-first walk (pre-order).
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Token)) {
        f(self);
        if let Some(children) = self.children_mut() {
            for c in children {
                c.walk_mut(f);
            }
        }
    }
}
