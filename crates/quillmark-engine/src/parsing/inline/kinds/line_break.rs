use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::parsing::rope::span::Span;
use crate::token::{Token, TokenKind};

/// Two or more spaces (or a backslash) before a newline make a hard break;
/// any other newline is a soft break. Spaces before the newline belong to
/// the break.
pub fn parse(cx: &mut InlineCx<'_, '_>) -> Option<InlineMatch> {
    let rest = cx.rest();
    let b = rest.as_bytes();
    let (kind, len) = match b.first()? {
        b'\n' => (TokenKind::Softbreak, 1),
        b'\\' if b.get(1) == Some(&b'\n') => (TokenKind::Linebreak, 2),
        b' ' => {
            let spaces = b.iter().take_while(|c| **c == b' ').count();
            if b.get(spaces) != Some(&b'\n') {
                return None;
            }
            let kind = if spaces >= 2 {
                TokenKind::Linebreak
            } else {
                TokenKind::Softbreak
            };
            (kind, spaces + 1)
        }
        _ => return None,
    };
    Some(InlineMatch::new(Token::leaf(kind, Span::default(), "\n"), len))
}
