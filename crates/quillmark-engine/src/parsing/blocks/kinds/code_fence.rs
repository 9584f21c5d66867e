use crate::parsing::blocks::types::{BlockStart, LeafStart, LineCx, leading_spaces};

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: u8 = b'`';
    pub const TILDE: u8 = b'~';
    pub const MIN_LEN: usize = 3;

    /// Parses an opening fence: fence char, run length, and the first word of
    /// the info string.
    pub fn open(s: &str) -> Option<(u8, usize, Option<String>)> {
        let fence = *s.as_bytes().first()?;
        if fence != Self::BACKTICK && fence != Self::TILDE {
            return None;
        }
        let len = s.bytes().take_while(|b| *b == fence).count();
        if len < Self::MIN_LEN {
            return None;
        }
        let info = s[len..].trim();
        if fence == Self::BACKTICK && info.contains('`') {
            return None;
        }
        let info = info.split_whitespace().next().map(str::to_string);
        Some((fence, len, info))
    }

    /// Whether `line` closes a fence opened with `len` copies of `fence`.
    pub fn closes(fence: u8, len: usize, line: &str) -> bool {
        let indent = leading_spaces(line);
        if indent > 3 {
            return false;
        }
        let s = &line[indent..];
        let run = s.bytes().take_while(|b| *b == fence).count();
        run >= len && s[run..].trim().is_empty()
    }

    /// Removes up to `indent` leading spaces (the opener's indentation).
    pub fn strip_indent(line: &str, indent: usize) -> &str {
        let n = leading_spaces(line).min(indent);
        &line[n..]
    }

    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        let (fence, len, info) = Self::open(cx.marker_text()?)?;
        Some(BlockStart::Leaf(LeafStart::FencedCode {
            fence,
            len,
            indent: cx.indent,
            info,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detect_backtick_fence() {
        assert_eq!(CodeFence::open("```rust"), Some((b'`', 3, Some("rust".into()))));
    }

    #[test]
    fn detect_tilde_fence() {
        assert_eq!(CodeFence::open("~~~~"), Some((b'~', 4, None)));
    }

    #[test]
    fn no_fence() {
        assert_eq!(CodeFence::open("hello"), None);
        assert_eq!(CodeFence::open("``"), None);
    }

    #[test]
    fn info_keeps_first_word_only() {
        assert_eq!(
            CodeFence::open("``` python  startline=3"),
            Some((b'`', 3, Some("python".into())))
        );
    }

    #[test]
    fn backtick_info_cannot_contain_backticks() {
        assert_eq!(CodeFence::open("``` a`b"), None);
        assert!(CodeFence::open("~~~ a`b").is_some());
    }

    #[test]
    fn closes_matching_fence() {
        assert!(CodeFence::closes(b'`', 3, "```"));
        assert!(CodeFence::closes(b'`', 3, "  `````  "));
        assert!(CodeFence::closes(b'~', 3, "~~~"));
    }

    #[test]
    fn does_not_close_mismatched_fence() {
        assert!(!CodeFence::closes(b'`', 3, "~~~"));
        assert!(!CodeFence::closes(b'`', 4, "```"));
        assert!(!CodeFence::closes(b'`', 3, "``` x"));
        assert!(!CodeFence::closes(b'`', 3, "    ```"));
    }

    #[test]
    fn strip_indent_is_bounded() {
        assert_eq!(CodeFence::strip_indent("    x", 2), "  x");
        assert_eq!(CodeFence::strip_indent(" x", 2), "x");
    }
}
