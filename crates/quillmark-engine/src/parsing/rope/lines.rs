use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line of the document with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of the line content, excluding the trailing newline.
    pub span: Span,
    /// The line text without its newline.
    pub text: String,
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` so span offsets account for the newline bytes, then
/// strips the newline from the exposed text and span.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        let raw: &str = &line;
        let text = raw.strip_suffix('\n').unwrap_or(raw).to_string();
        LineRef {
            span: Span {
                start,
                end: start + text.len(),
            },
            text,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_skip_newlines() {
        let rope = Rope::from("ab\n\ncd");
        let lines: Vec<_> = lines_with_spans(&rope).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].span, Span::new(0, 2));
        assert_eq!(lines[1].span, Span::new(3, 3));
        assert_eq!(lines[2].span, Span::new(4, 6));
        assert_eq!(lines[2].text, "cd");
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        let rope = Rope::from("x\n");
        assert_eq!(lines_with_spans(&rope).count(), 1);
    }

    #[test]
    fn empty_rope_has_no_lines() {
        let rope = Rope::from("");
        assert_eq!(lines_with_spans(&rope).count(), 0);
    }
}
