//! Bare `http://` and `https://` URLs become links.

use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::parsing::rope::span::Span;
use crate::rules::{DEFAULT_PLUGIN_PRECEDENCE, InlineAction, InlineRule};
use crate::token::{Token, TokenKind};

use super::Plugin;

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s<>\[\]]+").expect("Invalid URL regex"))
}

/// Length of `url` without trailing punctuation that usually ends the
/// surrounding sentence rather than the URL.
fn trimmed_len(url: &str) -> usize {
    url.trim_end_matches(['.', ',', ':', ';', '!', '?', '"', '\'', ')'])
        .len()
}

pub fn parse(cx: &mut InlineCx<'_, '_>) -> Option<InlineMatch> {
    if cx.prev_char().is_some_and(char::is_alphanumeric) {
        return None;
    }
    let found = url_regex().find(cx.rest())?;
    let len = trimmed_len(found.as_str());
    let url = &found.as_str()[..len];
    if url.ends_with("://") {
        return None;
    }
    let start = cx.pos();
    let text = Token::text(Span::new(start, start + len), url);
    let token = Token::container(TokenKind::Link, Span::default(), vec![text]).with_attr("url", url);
    Some(InlineMatch::new(token, len))
}

pub fn plugin() -> Plugin {
    Plugin::new("url").inline_rule(InlineRule {
        name: "url",
        precedence: DEFAULT_PLUGIN_PRECEDENCE,
        triggers: b"h",
        action: InlineAction::Match(parse),
    })
}
