use crate::parsing::blocks::types::{BlockStart, LineCx};
use crate::parsing::rope::span::Span;
use crate::token::{Token, TokenKind};

pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: &'static [u8] = b"*-_";

    /// Three or more of the same marker, optionally separated by spaces.
    pub fn matches(s: &str) -> bool {
        let mut marker = None;
        let mut count = 0;
        for b in s.trim_end().bytes() {
            match b {
                b' ' => {}
                b if Self::MARKERS.contains(&b) && marker.is_none_or(|m| m == b) => {
                    marker = Some(b);
                    count += 1;
                }
                _ => return false,
            }
        }
        count >= 3
    }

    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        Self::matches(cx.marker_text()?).then(|| {
            BlockStart::Token(Token::container(
                TokenKind::ThematicBreak,
                Span::default(),
                Vec::new(),
            ))
        })
    }
}
