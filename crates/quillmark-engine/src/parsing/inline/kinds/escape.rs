use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::parsing::rope::span::Span;
use crate::token::Token;

pub const BACKSLASH: u8 = b'\\';

/// `\` before ASCII punctuation yields the punctuation as literal text.
///
/// A backslash before a newline is left to the line break rule.
pub fn parse(cx: &mut InlineCx<'_, '_>) -> Option<InlineMatch> {
    let rest = cx.rest();
    let escaped = *rest.as_bytes().get(1)?;
    if rest.as_bytes()[0] != BACKSLASH || !escaped.is_ascii_punctuation() {
        return None;
    }
    let text = char::from(escaped).to_string();
    Some(InlineMatch::new(Token::text(Span::default(), text), 2))
}
