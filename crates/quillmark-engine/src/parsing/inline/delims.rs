//! Emphasis resolution over a flat list of scanned inline items.
//!
//! `*` and `_` runs are pushed as [`Delim`]s while scanning; once a span (or a
//! link's text) is complete, [`resolve`] pairs closers with the nearest
//! compatible opener, innermost first, and folds everything left over into
//! literal text.
//!
//! Ambiguous runs follow the multiple-of-3 rule: when either side of a pair
//! can both open and close, the pair is rejected if the sum of the original
//! run lengths is a multiple of 3, unless both lengths are. Pairs use two
//! markers (strong) when both runs still have two, so `***foo***` resolves to
//! `emphasis(strong(foo))`.

use crate::parsing::rope::span::Span;
use crate::token::{Body, Token, TokenKind};

/// A delimiter run still waiting to be matched.
#[derive(Debug, Clone)]
pub struct Delim {
    pub ch: u8,
    /// Markers not yet used by a pair.
    pub count: usize,
    /// Length of the run as scanned.
    pub orig: usize,
    /// Byte offset of the first unused marker.
    pub start: usize,
    pub can_open: bool,
    pub can_close: bool,
    /// Scan order; increases left to right.
    pub seq: usize,
}

#[derive(Debug, Clone)]
pub enum Item {
    Token(Token),
    Delim(Delim),
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}

/// Left/right flanking classification of a run of `ch`, returning
/// `(can_open, can_close)`.
pub fn flanking(ch: u8, before: Option<char>, after: Option<char>) -> (bool, bool) {
    let before_ws = before.is_none_or(char::is_whitespace);
    let after_ws = after.is_none_or(char::is_whitespace);
    let before_punct = before.is_some_and(is_punctuation);
    let after_punct = after.is_some_and(is_punctuation);

    let left = !after_ws && (!after_punct || before_ws || before_punct);
    let right = !before_ws && (!before_punct || after_ws || after_punct);

    if ch == b'_' {
        (left && (!right || before_punct), right && (!left || after_punct))
    } else {
        (left, right)
    }
}

/// Index into the openers-bottom table: marker char, whether the closer can
/// also open, and the closer's run length mod 3.
fn bottom_slot(d: &Delim) -> usize {
    let ch = usize::from(d.ch == b'_');
    ch * 6 + usize::from(d.can_open) * 3 + d.orig % 3
}

fn rejects_pair(opener: &Delim, closer: &Delim) -> bool {
    (opener.can_close || closer.can_open)
        && (opener.orig + closer.orig) % 3 == 0
        && !(opener.orig % 3 == 0 && closer.orig % 3 == 0)
}

/// Resolves emphasis among `items` and returns the final token list.
///
/// Items are moved onto an output stack one at a time; a closer folds the
/// stack above its opener into a new container, so each item is moved into
/// a container at most once.
pub fn resolve(items: Vec<Item>) -> Vec<Token> {
    // Openers at or below this seq are known not to match, per slot.
    let mut bottom = [0usize; 12];
    let mut stack: Vec<Item> = Vec::with_capacity(items.len());
    // Stack positions of delimiters that can still open, bottom to top.
    let mut openers: Vec<usize> = Vec::new();

    for item in items {
        let mut closer = match item {
            Item::Delim(d) if d.can_close && d.count > 0 => d,
            other => {
                push(&mut stack, &mut openers, other);
                continue;
            }
        };

        while closer.count > 0 {
            let slot = bottom_slot(&closer);
            let Some((k, opener_count, opener_start)) =
                find_opener(&stack, &openers, &closer, bottom[slot])
            else {
                bottom[slot] = closer.seq.saturating_sub(1);
                break;
            };

            let used = if opener_count >= 2 && closer.count >= 2 { 2 } else { 1 };
            let remaining = opener_count - used;
            let at = openers[k];
            let inner = stack.split_off(at + 1);
            openers.truncate(k + 1);

            let kind = if used == 2 {
                TokenKind::Strong
            } else {
                TokenKind::Emphasis
            };
            let token = Token::container(
                kind,
                Span::new(opener_start + remaining, closer.start + used),
                finish(inner),
            );
            closer.count -= used;
            closer.start += used;

            if remaining == 0 {
                stack.pop();
                openers.pop();
            } else if let Some(Item::Delim(op)) = stack.last_mut() {
                op.count = remaining;
            }
            stack.push(Item::Token(token));
        }

        if closer.count > 0 {
            push(&mut stack, &mut openers, Item::Delim(closer));
        }
    }

    finish(stack)
}

fn push(stack: &mut Vec<Item>, openers: &mut Vec<usize>, item: Item) {
    if matches!(&item, Item::Delim(d) if d.can_open && d.count > 0) {
        openers.push(stack.len());
    }
    stack.push(item);
}

/// Nearest opener pairing with `closer` above the `floor` seq, as its index
/// in `openers`, its unused marker count and its start.
fn find_opener(
    stack: &[Item],
    openers: &[usize],
    closer: &Delim,
    floor: usize,
) -> Option<(usize, usize, usize)> {
    for (k, &at) in openers.iter().enumerate().rev() {
        let Item::Delim(op) = &stack[at] else {
            continue;
        };
        if op.seq <= floor {
            return None;
        }
        if op.ch == closer.ch && !rejects_pair(op, closer) {
            return Some((k, op.count, op.start));
        }
    }
    None
}

/// Turns leftover delimiters into literal text and merges adjacent text.
fn finish(items: Vec<Item>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(items.len());
    for item in items {
        let token = match item {
            Item::Token(t) => t,
            Item::Delim(d) if d.count == 0 => continue,
            Item::Delim(d) => Token::text(
                Span::new(d.start, d.start + d.count),
                char::from(d.ch).to_string().repeat(d.count),
            ),
        };
        push_merged(&mut out, token);
    }
    out
}

/// Appends `token`, folding it into a preceding text token when both are text.
pub fn push_merged(out: &mut Vec<Token>, token: Token) {
    if token.kind == TokenKind::Text {
        if let Some(last) = out.last_mut() {
            if last.kind == TokenKind::Text && last.span.end == token.span.start {
                if let (Body::Text(acc), Body::Text(more)) = (&mut last.body, &token.body) {
                    acc.push_str(more);
                    last.span.end = token.span.end;
                    return;
                }
            }
        }
    }
    out.push(token);
}
