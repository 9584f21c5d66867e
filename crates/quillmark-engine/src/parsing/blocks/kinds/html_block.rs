use crate::parsing::blocks::types::{BlockStart, HtmlEnd, LeafStart, LineCx};

pub struct HtmlBlock;

impl HtmlBlock {
    /// Tags whose content runs until the matching close tag, blank lines included.
    const RAW_TAGS: [(&'static str, &'static str); 4] = [
        ("script", "</script>"),
        ("pre", "</pre>"),
        ("style", "</style>"),
        ("textarea", "</textarea>"),
    ];

    const BLOCK_TAGS: &'static [&'static str] = &[
        "address", "article", "aside", "base", "blockquote", "body", "caption", "center",
        "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
        "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4",
        "h5", "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main",
        "menu", "nav", "ol", "optgroup", "option", "p", "param", "section", "summary",
        "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
    ];

    /// How an HTML block starting with `s` ends, if `s` starts one.
    pub fn open(s: &str) -> Option<HtmlEnd> {
        if s.starts_with("<!--") {
            return Some(HtmlEnd::Contains("-->"));
        }
        let (closing, rest) = match s.strip_prefix("</") {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('<')?),
        };
        let name_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        if name_len == 0 {
            return None;
        }
        let name = rest[..name_len].to_ascii_lowercase();
        let boundary = matches!(
            rest.as_bytes().get(name_len),
            None | Some(b' ') | Some(b'>') | Some(b'/')
        );
        if !boundary {
            return None;
        }
        if !closing {
            if let Some((_, end)) = Self::RAW_TAGS.iter().find(|(tag, _)| *tag == name) {
                return Some(HtmlEnd::Contains(end));
            }
        }
        Self::BLOCK_TAGS
            .contains(&name.as_str())
            .then_some(HtmlEnd::BlankLine)
    }

    /// Whether `line` ends a block that closes on `end`.
    pub fn ends_at(end: HtmlEnd, line: &str) -> bool {
        match end {
            HtmlEnd::BlankLine => line.trim().is_empty(),
            HtmlEnd::Contains(marker) => line.to_ascii_lowercase().contains(marker),
        }
    }

    pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
        let end = Self::open(cx.marker_text()?)?;
        Some(BlockStart::Leaf(LeafStart::Html {
            first: cx.text.to_string(),
            end,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<div>", Some(HtmlEnd::BlankLine))]
    #[case("<DIV class=\"x\">", Some(HtmlEnd::BlankLine))]
    #[case("</table>", Some(HtmlEnd::BlankLine))]
    #[case("<hr/>", Some(HtmlEnd::BlankLine))]
    #[case("<!-- note", Some(HtmlEnd::Contains("-->")))]
    #[case("<pre>", Some(HtmlEnd::Contains("</pre>")))]
    #[case("<span>", None)]
    #[case("<divx>", None)]
    #[case("< div>", None)]
    #[case("plain", None)]
    fn detects_block_openers(#[case] line: &str, #[case] expected: Option<HtmlEnd>) {
        assert_eq!(HtmlBlock::open(line), expected);
    }

    #[test]
    fn end_conditions() {
        assert!(HtmlBlock::ends_at(HtmlEnd::BlankLine, "   "));
        assert!(HtmlBlock::ends_at(HtmlEnd::Contains("</pre>"), "x </PRE>"));
        assert!(!HtmlBlock::ends_at(HtmlEnd::Contains("-->"), "--"));
    }
}
