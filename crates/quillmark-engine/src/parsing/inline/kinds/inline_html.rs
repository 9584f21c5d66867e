use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::parsing::rope::span::Span;
use crate::token::{Token, TokenKind};

/// Open and closing tags, comments, processing instructions, declarations
/// and CDATA sections, passed through verbatim.
fn html_regex() -> &'static Regex {
    static HTML_REGEX: OnceLock<Regex> = OnceLock::new();
    HTML_REGEX.get_or_init(|| {
        let attr = r#"(?:\s+[A-Za-z_:][A-Za-z0-9_.:-]*(?:\s*=\s*(?:[^\s"'=<>`]+|'[^']*'|"[^"]*"))?)"#;
        let pattern = format!(
            r"^(?:<[A-Za-z][A-Za-z0-9-]*{attr}*\s*/?>|</[A-Za-z][A-Za-z0-9-]*\s*>|<!--(?s:.*?)-->|<\?(?s:.*?)\?>|<![A-Za-z]+[^>]*>|<!\[CDATA\[(?s:.*?)\]\]>)"
        );
        Regex::new(&pattern).expect("Invalid inline HTML regex")
    })
}

pub fn parse(cx: &mut InlineCx<'_, '_>) -> Option<InlineMatch> {
    let m = html_regex().find(cx.rest())?;
    let token = Token::leaf(TokenKind::InlineHtml, Span::default(), m.as_str());
    Some(InlineMatch::new(token, m.end()))
}
