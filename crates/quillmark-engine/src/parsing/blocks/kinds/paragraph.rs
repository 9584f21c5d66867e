/// Paragraph block type (marker struct).
///
/// Paragraphs have no delimiters: they are the default leaf block when no
/// other block opener matches, and absorb lazy continuation lines.
pub struct Paragraph;

impl Paragraph {
    /// Joins the collected lines into the paragraph's inline source.
    ///
    /// Lines are stored with their indentation already stripped; trailing
    /// whitespace of the last line is dropped so it cannot form a hard break.
    pub fn finish(lines: &[String]) -> String {
        lines.join("\n").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_lines_and_trims_the_end() {
        let lines = vec!["one  ".to_string(), "two  ".to_string()];
        assert_eq!(Paragraph::finish(&lines), "one  \ntwo");
    }
}
