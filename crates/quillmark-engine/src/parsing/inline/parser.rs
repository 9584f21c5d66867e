use std::collections::HashMap;
use std::ops::Range;

use crate::parsing::rope::span::Span;
use crate::refs::{FootnoteOrder, LinkDef, References};
use crate::rules::{InlineAction, RuleRegistry};
use crate::token::{Token, TokenKind};

use super::cursor::Cursor;
use super::delims::{self, Delim, Item};
use super::kinds::link;

/// Nested inline scans (strikethrough content and the like) stop here and
/// keep the remaining text literal.
pub const MAX_INLINE_DEPTH: usize = 16;

/// Per-document state shared by every inline scan of one parse call.
pub struct InlineEnv<'d> {
    pub rules: &'d RuleRegistry,
    pub refs: &'d References,
    pub footnotes: FootnoteOrder,
}

impl<'d> InlineEnv<'d> {
    pub fn new(rules: &'d RuleRegistry, refs: &'d References) -> Self {
        Self {
            rules,
            refs,
            footnotes: FootnoteOrder::default(),
        }
    }
}

/// A token produced by an inline rule and the bytes it consumed.
///
/// The scanner assigns the outer token's span; spans of any children are set
/// by the rule, relative to the same source.
#[derive(Debug)]
pub struct InlineMatch {
    pub token: Token,
    pub len: usize,
}

impl InlineMatch {
    pub fn new(token: Token, len: usize) -> Self {
        Self { token, len }
    }
}

/// What an inline rule sees at the current position.
pub struct InlineCx<'a, 'd> {
    src: &'a str,
    pos: usize,
    depth: usize,
    env: &'a mut InlineEnv<'d>,
    misses: &'a mut CloserMisses,
}

/// Per marker, the earliest offset of this scan from which a closer search
/// came up empty.
type CloserMisses = HashMap<&'static str, usize>;

impl<'a, 'd> InlineCx<'a, 'd> {
    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Source from the current position on.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn prev_char(&self) -> Option<char> {
        self.src[..self.pos].chars().next_back()
    }

    pub fn refs(&self) -> &'d References {
        self.env.refs
    }

    /// Records a footnote reference, returning its 1-based number.
    pub fn note_footnote(&mut self, label: &str) -> usize {
        self.env.footnotes.note_use(label)
    }

    /// Offset of the first `marker` at or after `from` that `accept` takes.
    ///
    /// `accept` sees the source and a candidate offset and must depend on
    /// nothing else: a failed search is remembered for the rest of the scan
    /// and later searches from further right fail without rescanning.
    pub fn find_closer(
        &mut self,
        marker: &'static str,
        from: usize,
        accept: impl Fn(&str, usize) -> bool,
    ) -> Option<usize> {
        if self.misses.get(marker).is_some_and(|&miss| miss <= from) {
            return None;
        }
        let src = self.src;
        let found = src[from..]
            .match_indices(marker)
            .map(|(i, _)| from + i)
            .find(|&at| accept(src, at));
        if found.is_none() {
            self.misses.insert(marker, from);
        }
        found
    }

    /// Inline-scans `range` of the source. Spans in the result are relative to
    /// the whole source, like every other span in this scan.
    pub fn parse_nested(&mut self, range: Range<usize>) -> Vec<Token> {
        let src = self.src;
        let span = Span::new(range.start, range.end);
        if self.depth >= MAX_INLINE_DEPTH {
            log::trace!("inline nesting limit reached at byte {}", range.start);
            return vec![Token::text(span, &src[range])];
        }
        let mut tokens = scan(&src[range], self.env, self.depth + 1);
        for t in &mut tokens {
            t.walk_mut(&mut |t| t.span = t.span.shift(span.start));
        }
        tokens
    }
}

/// An open `[` or `![` waiting for its `]`.
struct Bracket {
    /// Index of the bracket's literal text in the item list.
    item: usize,
    start: usize,
    image: bool,
    /// Links closed in this scan before the bracket opened. A `[` is dead
    /// once any link closes while it is still open.
    links_before: usize,
}

/// Scans one inline source into a token list whose top-level spans tile it.
pub fn parse_inline(src: &str, env: &mut InlineEnv<'_>) -> Vec<Token> {
    scan(src, env, 0)
}

fn flush_text(items: &mut Vec<Item>, src: &str, start: usize, end: usize) {
    if end > start {
        items.push(Item::Token(Token::text(
            Span::new(start, end),
            &src[start..end],
        )));
    }
}

fn scan(src: &str, env: &mut InlineEnv<'_>, depth: usize) -> Vec<Token> {
    let rules = env.rules;
    let refs = env.refs;
    let mut cur = Cursor::new(src);
    let mut items: Vec<Item> = Vec::new();
    let mut brackets: Vec<Bracket> = Vec::new();
    let mut misses = CloserMisses::new();
    let mut links = 0;
    let mut seq = 0;
    let mut text_start = 0;

    while let Some(b) = cur.peek() {
        let pos = cur.pos();
        if !cur.at_char_boundary() || !rules.is_inline_trigger(b) {
            cur.bump_char();
            continue;
        }

        let mut advanced = false;
        for rule in rules.inline_candidates(b) {
            match rule.action {
                InlineAction::Match(apply) => {
                    let mut cx = InlineCx {
                        src,
                        pos,
                        depth,
                        env: &mut *env,
                        misses: &mut misses,
                    };
                    if let Some(m) = apply(&mut cx).filter(|m| m.len > 0) {
                        log::trace!("inline rule {} matched {} bytes at {pos}", rule.name, m.len);
                        flush_text(&mut items, src, text_start, pos);
                        let mut token = m.token;
                        token.span = Span::new(pos, pos + m.len);
                        items.push(Item::Token(token));
                        cur.bump_n(m.len);
                        advanced = true;
                    }
                }
                InlineAction::OpenBracket => {
                    let image = b == b'!';
                    if image && !cur.starts_with(b"![") {
                        continue;
                    }
                    let len = if image { 2 } else { 1 };
                    flush_text(&mut items, src, text_start, pos);
                    brackets.push(Bracket {
                        item: items.len(),
                        start: pos,
                        image,
                        links_before: links,
                    });
                    items.push(Item::Token(Token::text(
                        Span::new(pos, pos + len),
                        &src[pos..pos + len],
                    )));
                    cur.bump_n(len);
                    advanced = true;
                }
                InlineAction::CloseBracket => {
                    flush_text(&mut items, src, text_start, pos);
                    text_start = pos;
                    if let Some(end) = close_bracket(src, pos, &mut items, &mut brackets, &mut links, refs) {
                        log::trace!("link closed at {pos}");
                        cur.bump_n(end - pos);
                        advanced = true;
                    }
                }
                InlineAction::Delimiter => {
                    let run = cur.run_len(b);
                    let after = src[pos + run..].chars().next();
                    let (can_open, can_close) = delims::flanking(b, cur.prev_char(), after);
                    flush_text(&mut items, src, text_start, pos);
                    seq += 1;
                    items.push(Item::Delim(Delim {
                        ch: b,
                        count: run,
                        orig: run,
                        start: pos,
                        can_open,
                        can_close,
                        seq,
                    }));
                    cur.bump_n(run);
                    advanced = true;
                }
            }
            if advanced {
                text_start = cur.pos();
                break;
            }
        }
        if !advanced {
            cur.bump_char();
        }
    }

    flush_text(&mut items, src, text_start, src.len());
    delims::resolve(items)
}

/// Tries to turn the innermost open bracket into a link or image ending at
/// the `]` at `pos`. Returns the end of the construct on success.
fn close_bracket(
    src: &str,
    pos: usize,
    items: &mut Vec<Item>,
    brackets: &mut Vec<Bracket>,
    links: &mut usize,
    refs: &References,
) -> Option<usize> {
    let opener = brackets.pop()?;
    if !opener.image && opener.links_before < *links {
        return None;
    }
    let text_start = opener.start + if opener.image { 2 } else { 1 };
    let text = &src[text_start..pos];
    let after = &src[pos + 1..];

    let (url, title, end) = match link::parse_inline_target(after) {
        Some((url, title, used)) => (url, title, pos + 1 + used),
        None => {
            let (def, used) = lookup_reference(text, after, refs)?;
            (def.url.clone(), def.title.clone(), pos + 1 + used)
        }
    };

    let inner: Vec<Item> = items.drain(opener.item + 1..).collect();
    items.truncate(opener.item);
    let span = Span::new(opener.start, end);
    let children = delims::resolve(inner);
    let mut token = if opener.image {
        Token::container(TokenKind::Image, span, children).with_attr("src", url)
    } else {
        Token::container(TokenKind::Link, span, children).with_attr("url", url)
    };
    if let Some(title) = title {
        token.set_attr("title", title);
    }
    items.push(Item::Token(token));

    if !opener.image {
        *links += 1;
    }
    Some(end)
}

/// Full (`[text][label]`), collapsed (`[text][]`) and shortcut (`[text]`)
/// reference forms. Returns the definition and the bytes used after `]`.
fn lookup_reference<'r>(
    text: &str,
    after: &str,
    refs: &'r References,
) -> Option<(&'r LinkDef, usize)> {
    if let Some(rest) = after.strip_prefix('[') {
        if let Some(close) = link::label_end(rest) {
            let label = &rest[..close];
            let key = if label.trim().is_empty() { text } else { label };
            return refs.link(key).map(|def| (def, close + 2));
        }
    }
    if text.len() > link::MAX_LABEL_LEN {
        return None;
    }
    refs.link(text).map(|def| (def, 0))
}
