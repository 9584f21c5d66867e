use crate::parsing::blocks::types::{BlockStart, LineCx};
use crate::parsing::inline::kinds::link;
use crate::refs::LinkDef;

/// `[label]: destination "title"` on a single line.
pub struct LinkDefinition;

impl LinkDefinition {
    pub fn parse(s: &str) -> Option<(String, LinkDef)> {
        let inner = s.strip_prefix('[')?;
        let close = link::label_end(inner)?;
        let label = &inner[..close];
        if label.trim().is_empty() || label.starts_with('^') {
            return None;
        }
        let after = inner[close + 1..].strip_prefix(':')?.trim_start();
        let (url, used) = link::parse_destination(after)?;
        let tail = &after[used..];
        let title = if tail.trim().is_empty() {
            None
        } else {
            if !tail.starts_with(char::is_whitespace) {
                return None;
            }
            let tail = tail.trim_start();
            let (title, used) = link::parse_title(tail)?;
            if !tail[used..].trim().is_empty() {
                return None;
            }
            Some(title)
        };
        Some((label.to_string(), LinkDef { url, title }))
    }

    /// Definitions cannot interrupt a paragraph.
    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        if cx.in_paragraph() {
            return None;
        }
        let (label, def) = Self::parse(cx.marker_text()?)?;
        Some(BlockStart::LinkDefinition { label, def })
    }
}
