use crate::parsing::blocks::types::{BlockStart, LineCx};

/// `===` / `---` underline turning the open paragraph into a heading.
pub struct SetextHeading;

impl SetextHeading {
    pub fn level(s: &str) -> Option<u8> {
        let t = s.trim_end();
        let level = match t.bytes().next()? {
            b'=' => 1,
            b'-' => 2,
            _ => return None,
        };
        let marker = t.as_bytes()[0];
        t.bytes().all(|b| b == marker).then_some(level)
    }

    /// Only fires directly under a paragraph; a lazy line cannot underline.
    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        if !cx.in_paragraph() || cx.lazy {
            return None;
        }
        Self::level(cx.marker_text()?).map(|level| BlockStart::SetextHeading { level })
    }
}
