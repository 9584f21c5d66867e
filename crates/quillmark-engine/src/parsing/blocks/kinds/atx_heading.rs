use crate::parsing::blocks::types::{BlockStart, LineCx};
use crate::parsing::rope::span::Span;
use crate::token::{Token, TokenKind};

pub struct AtxHeading;

impl AtxHeading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns the level and the heading content, with any closing `#` run
    /// removed.
    pub fn parse(s: &str) -> Option<(u8, &str)> {
        let level = s.bytes().take_while(|b| *b == Self::MARKER).count();
        if !(1..=Self::MAX_LEVEL).contains(&level) {
            return None;
        }
        let after = &s[level..];
        if !(after.is_empty() || after.starts_with(' ')) {
            return None;
        }
        let content = after.trim();
        let stripped = content.trim_end_matches('#');
        let content = if stripped.is_empty() {
            ""
        } else if stripped.ends_with(' ') {
            stripped.trim_end()
        } else {
            content
        };
        Some((level as u8, content))
    }

    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        let (level, content) = Self::parse(cx.marker_text()?)?;
        Some(BlockStart::Token(
            Token::pending_inline(TokenKind::Heading, Span::default(), content)
                .with_attr("level", i64::from(level)),
        ))
    }
}
