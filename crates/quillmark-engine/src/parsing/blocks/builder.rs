use crate::parsing::rope::span::Span;
use crate::refs::References;
use crate::rules::RuleRegistry;
use crate::token::{Token, TokenKind};

use super::{
    containers::{Frame, continues},
    kinds::{CodeFence, HtmlBlock, IndentedCode, Paragraph},
    types::{
        BlockStart, ContainerKind, HtmlEnd, LeafBlock, LeafStart, LineCx, MAX_NESTING_DEPTH,
        leading_spaces,
    },
};

/// The multi-line leaf block currently open in the innermost container.
enum LeafState {
    None,
    Paragraph {
        lines: Vec<String>,
        span: Span,
    },
    Fence {
        fence: u8,
        len: usize,
        indent: usize,
        info: Option<String>,
        lines: Vec<String>,
        span: Span,
    },
    Indented {
        lines: Vec<String>,
        span: Span,
    },
    Html {
        lines: Vec<String>,
        end: HtmlEnd,
        span: Span,
    },
    Custom {
        block: Box<dyn LeafBlock>,
        span: Span,
    },
}

/// What happened to a line offered to the open leaf.
enum LeafFlow {
    /// The leaf took the line.
    Consumed,
    /// The line goes through the block rules.
    Pass,
}

/// Builds the block tree line by line from an explicit container stack.
///
/// `stack[0]` is always the document frame; the open leaf belongs to the
/// innermost frame.
pub struct BlockBuilder<'r> {
    rules: &'r RuleRegistry,
    refs: References,
    stack: Vec<Frame>,
    leaf: LeafState,
}

impl<'r> BlockBuilder<'r> {
    pub fn new(rules: &'r RuleRegistry) -> Self {
        Self {
            rules,
            refs: References::new(),
            stack: vec![Frame::new(ContainerKind::Document, 0)],
            leaf: LeafState::None,
        }
    }

    /// Feeds one line (without its newline) located at `line` in the document.
    pub fn push(&mut self, line: Span, text: &str) {
        if self.push_line(line, text) {
            for frame in &mut self.stack {
                frame.end = line.end;
            }
        }
    }

    /// Closes everything still open and returns the document token and the
    /// reference table.
    pub fn finish(mut self, len: usize) -> (Token, References) {
        self.close_frames(1);
        let doc = self.stack.pop().map(|f| f.children).unwrap_or_default();
        (
            Token::container(TokenKind::Document, Span::new(0, len), doc),
            self.refs,
        )
    }

    /// Returns whether the line became content of the open containers (blank
    /// lines do not extend container spans).
    fn push_line(&mut self, line: Span, text: &str) -> bool {
        // Continue the open containers, outermost first.
        let mut pos = 0;
        let mut matched = 1;
        while matched < self.stack.len() {
            match continues(&self.stack[matched].kind, &text[pos..]) {
                Some(n) => {
                    pos += n;
                    matched += 1;
                }
                None => break,
            }
        }
        let mut all_matched = matched == self.stack.len();

        if all_matched {
            if matches!(self.continue_leaf(line, &text[pos..]), LeafFlow::Consumed) {
                return true;
            }
        }

        if text[pos..].trim().is_empty() {
            if all_matched {
                self.close_leaf();
            } else {
                self.close_frames(matched);
            }
            if let Some(top) = self.stack.last_mut() {
                top.pending_blank = true;
            }
            return false;
        }

        let mut container_opened = false;
        loop {
            let rest = &text[pos..];
            if container_opened && rest.trim().is_empty() {
                return true;
            }
            let paragraph = match &self.leaf {
                LeafState::Paragraph { lines, .. } => Some(lines.as_slice()),
                _ => None,
            };
            let cx = LineCx {
                paragraph,
                lazy: !all_matched,
                depth: self.stack.len(),
                ..LineCx::new(rest)
            };
            let Some((name, start)) = self.rules.match_block(&cx) else {
                break;
            };
            log::trace!("block rule {name} matched at byte {}", line.start + pos);
            let at = line.start + pos;

            match start {
                BlockStart::Container { kind, consumed } => {
                    if matched >= MAX_NESTING_DEPTH {
                        log::trace!("nesting limit reached at byte {at}; keeping marker as text");
                        break;
                    }
                    self.close_frames(matched);
                    self.open_container(kind, at);
                    matched = self.stack.len();
                    all_matched = true;
                    container_opened = true;
                    pos += consumed;
                }
                BlockStart::Token(mut token) => {
                    self.close_frames(matched);
                    token.span = Span::new(at, line.end);
                    self.add_child(token);
                    return true;
                }
                BlockStart::SetextHeading { level } => {
                    if let LeafState::Paragraph { lines, span } =
                        std::mem::replace(&mut self.leaf, LeafState::None)
                    {
                        let heading = Token::pending_inline(
                            TokenKind::Heading,
                            Span::new(span.start, line.end),
                            Paragraph::finish(&lines),
                        )
                        .with_attr("level", i64::from(level));
                        self.add_child(heading);
                    }
                    return true;
                }
                BlockStart::Leaf(start) => {
                    self.close_frames(matched);
                    self.open_leaf(start, Span::new(at, line.end));
                    return true;
                }
                BlockStart::LinkDefinition { label, def } => {
                    self.close_frames(matched);
                    self.close_lists_on_top();
                    if !self.refs.define_link(&label, def) {
                        log::trace!("duplicate link definition '{label}' ignored");
                    }
                    return true;
                }
                BlockStart::TakeParagraph(block) => {
                    if let LeafState::Paragraph { span, .. } = self.leaf {
                        self.leaf = LeafState::Custom {
                            block,
                            span: Span::new(span.start, line.end),
                        };
                    }
                    return true;
                }
            }
        }

        // Paragraph of last resort: lazy continuation or a new paragraph.
        let content = text[pos..].trim_start();
        if !container_opened {
            if let LeafState::Paragraph { lines, span } = &mut self.leaf {
                lines.push(content.to_string());
                span.end = line.end;
                return true;
            }
        }
        self.close_frames(matched);
        self.close_lists_on_top();
        let start = line.start + pos + leading_spaces(&text[pos..]);
        self.leaf = LeafState::Paragraph {
            lines: vec![content.to_string()],
            span: Span::new(start, line.end),
        };
        true
    }

    fn continue_leaf(&mut self, line: Span, rest: &str) -> LeafFlow {
        match &mut self.leaf {
            LeafState::Fence {
                fence,
                len,
                indent,
                lines,
                span,
                ..
            } => {
                span.end = line.end;
                if CodeFence::closes(*fence, *len, rest) {
                    self.close_leaf();
                } else {
                    lines.push(CodeFence::strip_indent(rest, *indent).to_string());
                }
                LeafFlow::Consumed
            }
            LeafState::Html { lines, end, span } => {
                if *end == HtmlEnd::BlankLine && rest.trim().is_empty() {
                    self.close_leaf();
                    return LeafFlow::Pass;
                }
                lines.push(rest.to_string());
                span.end = line.end;
                if HtmlBlock::ends_at(*end, rest) {
                    self.close_leaf();
                }
                LeafFlow::Consumed
            }
            LeafState::Indented { lines, span } => {
                let indent = leading_spaces(rest);
                if indent >= IndentedCode::INDENT {
                    lines.push(rest[IndentedCode::INDENT..].to_string());
                    span.end = line.end;
                    LeafFlow::Consumed
                } else if rest.trim().is_empty() {
                    lines.push(String::new());
                    LeafFlow::Consumed
                } else {
                    self.close_leaf();
                    LeafFlow::Pass
                }
            }
            LeafState::Custom { block, span } => {
                if block.push_line(rest) {
                    span.end = line.end;
                    LeafFlow::Consumed
                } else {
                    self.close_leaf();
                    LeafFlow::Pass
                }
            }
            LeafState::Paragraph { .. } | LeafState::None => LeafFlow::Pass,
        }
    }

    fn open_leaf(&mut self, start: LeafStart, span: Span) {
        self.close_lists_on_top();
        let mut done = false;
        self.leaf = match start {
            LeafStart::FencedCode {
                fence,
                len,
                indent,
                info,
            } => LeafState::Fence {
                fence,
                len,
                indent,
                info,
                lines: Vec::new(),
                span,
            },
            LeafStart::IndentedCode { first } => LeafState::Indented {
                lines: vec![first],
                span,
            },
            LeafStart::Html { first, end } => {
                // A comment or raw block may end on its first line.
                done = matches!(end, HtmlEnd::Contains(_)) && HtmlBlock::ends_at(end, &first);
                LeafState::Html {
                    lines: vec![first],
                    end,
                    span,
                }
            }
            LeafStart::Custom(block) => LeafState::Custom { block, span },
        };
        if done {
            self.close_leaf();
        }
    }

    /// Emits the open leaf into the innermost container.
    fn close_leaf(&mut self) {
        let token = match std::mem::replace(&mut self.leaf, LeafState::None) {
            LeafState::None => return,
            LeafState::Paragraph { lines, span } => {
                Token::pending_inline(TokenKind::Paragraph, span, Paragraph::finish(&lines))
            }
            LeafState::Fence {
                info, lines, span, ..
            } => {
                let mut code = lines.join("\n");
                if !lines.is_empty() {
                    code.push('\n');
                }
                let token = Token::leaf(TokenKind::BlockCode, span, code);
                match info {
                    Some(info) => token.with_attr("info", info),
                    None => token,
                }
            }
            LeafState::Indented { lines, span } => {
                Token::leaf(TokenKind::BlockCode, span, IndentedCode::finish(&lines))
            }
            LeafState::Html { lines, span, .. } => {
                let mut html = lines.join("\n");
                html.push('\n');
                Token::leaf(TokenKind::BlockHtml, span, html)
            }
            LeafState::Custom { block, span } => block.finish(span),
        };
        self.add_child(token);
    }

    /// Closes the leaf and every frame above `keep`, innermost first.
    fn close_frames(&mut self, keep: usize) {
        self.close_leaf();
        while self.stack.len() > keep.max(1) {
            self.close_top();
        }
    }

    /// A list frame only holds items; anything else closes it first.
    fn close_lists_on_top(&mut self) {
        while self.stack.len() > 1
            && matches!(
                self.stack.last().map(|f| &f.kind),
                Some(ContainerKind::List { .. })
            )
        {
            self.close_top();
        }
    }

    fn open_container(&mut self, kind: ContainerKind, at: usize) {
        if let ContainerKind::ListItem { marker, .. } = &kind {
            let joins = matches!(
                self.stack.last().map(|f| &f.kind),
                Some(ContainerKind::List { marker: open, .. }) if open.continues(*marker)
            );
            if !joins {
                self.close_lists_on_top();
                log::trace!("open list at byte {at}");
                self.stack.push(Frame::new(
                    ContainerKind::List {
                        marker: *marker,
                        loose: false,
                    },
                    at,
                ));
            }
        } else {
            self.close_lists_on_top();
        }
        log::trace!("open {kind:?} at byte {at}");
        self.stack.push(Frame::new(kind, at));
    }

    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        log::trace!("close {:?}", frame.kind);
        let pending_blank = frame.pending_blank;
        if let Some(token) = frame.into_token(&mut self.refs) {
            self.add_child(token);
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.pending_blank |= pending_blank;
        }
    }

    /// Appends a finished block to the innermost container, tracking list
    /// looseness: content after a blank line inside a list makes it loose.
    fn add_child(&mut self, token: Token) {
        if token.kind != TokenKind::ListItem {
            self.close_lists_on_top();
        }
        let depth = self.stack.len();
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        let separated = frame.pending_blank && !frame.children.is_empty();
        frame.pending_blank = false;
        frame.children.push(token);
        if !separated {
            return;
        }
        let list_index = match frame.kind {
            ContainerKind::List { .. } => Some(depth - 1),
            ContainerKind::ListItem { .. } => depth.checked_sub(2),
            _ => None,
        };
        if let Some(ContainerKind::List { loose, .. }) =
            list_index.and_then(|i| self.stack.get_mut(i)).map(|f| &mut f.kind)
        {
            *loose = true;
        }
    }
}
