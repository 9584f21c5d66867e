use crate::parsing::blocks::types::{BlockStart, LeafStart, LineCx};

pub struct IndentedCode;

impl IndentedCode {
    pub const INDENT: usize = 4;

    /// Never interrupts a paragraph; an indented line there is a continuation.
    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        if cx.indent < Self::INDENT || cx.is_blank() || cx.in_paragraph() {
            return None;
        }
        Some(BlockStart::Leaf(LeafStart::IndentedCode {
            first: cx.text[Self::INDENT..].to_string(),
        }))
    }

    /// Code content with trailing blank lines dropped.
    pub fn finish(lines: &[String]) -> String {
        let keep = lines
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .map_or(0, |i| i + 1);
        let mut out = String::new();
        for line in &lines[..keep] {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
