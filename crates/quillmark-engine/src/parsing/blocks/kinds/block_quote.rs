use crate::parsing::blocks::types::{BlockStart, ContainerKind, LineCx, leading_spaces};

/// Block quote container with owned marker constant.
pub struct BlockQuote;

impl BlockQuote {
    /// The block quote prefix character.
    pub const PREFIX: u8 = b'>';

    /// Bytes taken by one `>` marker at the start of `s`: up to three spaces
    /// of indentation, the `>`, and one optional following space.
    pub fn marker_len(s: &str) -> Option<usize> {
        let indent = leading_spaces(s);
        if indent > 3 || s.as_bytes().get(indent) != Some(&Self::PREFIX) {
            return None;
        }
        let mut i = indent + 1;
        if s.as_bytes().get(i) == Some(&b' ') {
            i += 1;
        }
        Some(i)
    }

    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        let consumed = Self::marker_len(cx.text)?;
        Some(BlockStart::Container {
            kind: ContainerKind::BlockQuote,
            consumed,
        })
    }
}
