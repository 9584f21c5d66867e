use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::parsing::rope::span::Span;
use crate::token::{Token, TokenKind};

/// Code span inline type with owned delimiter constant.
///
/// Code spans are raw zones: nothing else is scanned inside them.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Finds the closing run of exactly `open` backticks in `body`, returning
    /// the content length.
    pub fn find_close(body: &str, open: usize) -> Option<usize> {
        let b = body.as_bytes();
        let mut i = 0;
        while i < b.len() {
            if b[i] == Self::TICK {
                let run = b[i..].iter().take_while(|c| **c == Self::TICK).count();
                if run == open {
                    return Some(i);
                }
                i += run;
            } else {
                i += 1;
            }
        }
        None
    }

    /// Newlines become spaces; one leading and trailing space is stripped when
    /// both are present and the content is not all spaces.
    pub fn normalize(content: &str) -> String {
        let c = content.replace('\n', " ");
        if c.len() >= 2 && c.starts_with(' ') && c.ends_with(' ') && c.bytes().any(|b| b != b' ')
        {
            c[1..c.len() - 1].to_string()
        } else {
            c
        }
    }
}

/// A backtick run without a matching closer is literal text as a whole, so
/// the scanner never retries on a shorter part of it.
pub fn parse(cx: &mut InlineCx<'_, '_>) -> Option<InlineMatch> {
    let rest = cx.rest();
    let open = rest.bytes().take_while(|b| *b == CodeSpan::TICK).count();
    if open == 0 {
        return None;
    }
    let Some(len) = CodeSpan::find_close(&rest[open..], open) else {
        let literal = Token::text(Span::default(), &rest[..open]);
        return Some(InlineMatch::new(literal, open));
    };
    let content = CodeSpan::normalize(&rest[open..open + len]);
    let token = Token::leaf(TokenKind::Codespan, Span::default(), content);
    Some(InlineMatch::new(token, open + len + open))
}
