use crate::parsing::rope::span::Span;
use crate::refs::LinkDef;
use crate::token::Token;

/// Containers nested deeper than this are not opened; their markers are
/// scanned as paragraph text instead.
pub const MAX_NESTING_DEPTH: usize = 32;

/// What a block rule sees for one line.
#[derive(Debug, Clone, Copy)]
pub struct LineCx<'a> {
    /// Remainder of the line after the container prefixes consumed so far.
    pub text: &'a str,
    /// Leading spaces of `text`. Tabs are already expanded, so columns are bytes.
    pub indent: usize,
    /// Lines of the paragraph this line would continue, if one is open.
    pub paragraph: Option<&'a [String]>,
    /// The open paragraph could only be continued lazily (some enclosing
    /// container did not match this line).
    pub lazy: bool,
    /// Number of open containers, including the document.
    pub depth: usize,
}

impl<'a> LineCx<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            indent: leading_spaces(text),
            paragraph: None,
            lazy: false,
            depth: 1,
        }
    }

    /// Text after the leading indentation.
    pub fn rest(&self) -> &'a str {
        &self.text[self.indent..]
    }

    /// Text after the indentation if the indentation still allows a block
    /// marker (at most three spaces).
    pub fn marker_text(&self) -> Option<&'a str> {
        (self.indent < 4).then(|| self.rest())
    }

    pub fn first_byte(&self) -> Option<u8> {
        self.rest().bytes().next()
    }

    pub fn is_blank(&self) -> bool {
        self.rest().trim().is_empty()
    }

    pub fn in_paragraph(&self) -> bool {
        self.paragraph.is_some()
    }
}

pub fn leading_spaces(s: &str) -> usize {
    s.bytes().take_while(|b| *b == b' ').count()
}

/// A list item marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub ordered: bool,
    /// Bullet char (`-`, `+`, `*`) or ordered delimiter (`.`, `)`).
    pub delimiter: u8,
    /// Start number for ordered lists.
    pub start: u64,
}

impl ListMarker {
    /// Whether an item with `other` continues a list started by `self`.
    pub fn continues(self, other: ListMarker) -> bool {
        self.ordered == other.ordered && self.delimiter == other.delimiter
    }
}

/// A frame in the container stack representing a nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerKind {
    Document,
    /// A `>` quote.
    BlockQuote,
    /// A list; opened implicitly around its first item.
    List { marker: ListMarker, loose: bool },
    /// A list item whose continuation lines need `content_indent` columns.
    ListItem {
        marker: ListMarker,
        content_indent: usize,
    },
    /// A `[^label]:` definition; absorbed into the reference table on close.
    FootnoteDef { label: String },
}

impl ContainerKind {
    /// Columns a continuation line must be indented by to stay inside the
    /// container, for indentation-based containers.
    pub fn content_indent(&self) -> Option<usize> {
        match self {
            ContainerKind::ListItem { content_indent, .. } => Some(*content_indent),
            ContainerKind::FootnoteDef { .. } => Some(FOOTNOTE_INDENT),
            _ => None,
        }
    }
}

/// Indentation of footnote continuation lines.
pub const FOOTNOTE_INDENT: usize = 4;

/// A multi-line leaf block contributed by a plugin.
pub trait LeafBlock: Send {
    /// Offers the next line (container prefixes already stripped). Returning
    /// `false` closes the leaf; the line is then scanned as usual.
    fn push_line(&mut self, line: &str) -> bool;

    /// Produces the token; `span` covers every line the leaf took.
    fn finish(self: Box<Self>, span: Span) -> Token;
}

/// How a raw HTML block ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlEnd {
    BlankLine,
    /// The first line containing this text (case-insensitive) closes it.
    Contains(&'static str),
}

/// A multi-line leaf opened by a block rule.
pub enum LeafStart {
    FencedCode {
        fence: u8,
        len: usize,
        indent: usize,
        info: Option<String>,
    },
    IndentedCode {
        first: String,
    },
    Html {
        first: String,
        end: HtmlEnd,
    },
    Custom(Box<dyn LeafBlock>),
}

/// The outcome of a block rule that matched a line.
pub enum BlockStart {
    /// A complete single-line block. The builder assigns the span.
    Token(Token),
    /// Turn the open paragraph into a heading of `level`.
    SetextHeading { level: u8 },
    /// Open a container whose marker used `consumed` bytes of the line.
    Container { kind: ContainerKind, consumed: usize },
    /// Open a multi-line leaf starting with this line.
    Leaf(LeafStart),
    /// A link reference definition, absorbed into the reference table.
    LinkDefinition { label: String, def: LinkDef },
    /// Replace the open paragraph with a plugin leaf built from it.
    TakeParagraph(Box<dyn LeafBlock>),
}

impl std::fmt::Debug for BlockStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockStart::Token(t) => write!(f, "Token({})", t.kind),
            BlockStart::SetextHeading { level } => write!(f, "SetextHeading({level})"),
            BlockStart::Container { kind, consumed } => {
                write!(f, "Container({kind:?}, {consumed})")
            }
            BlockStart::Leaf(_) => f.write_str("Leaf"),
            BlockStart::LinkDefinition { label, .. } => write!(f, "LinkDefinition({label})"),
            BlockStart::TakeParagraph(_) => f.write_str("TakeParagraph"),
        }
    }
}
