use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::parsing::rope::span::Span;
use crate::token::{Token, TokenKind};

fn uri_regex() -> &'static Regex {
    static URI_REGEX: OnceLock<Regex> = OnceLock::new();
    URI_REGEX.get_or_init(|| {
        Regex::new(r"^<([A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\x00-\x20]*)>")
            .expect("Invalid autolink regex")
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^<([A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*)>",
        )
        .expect("Invalid email autolink regex")
    })
}

/// `<scheme:...>` and `<user@host>` links. The link text is the address as
/// written; email links get a `mailto:` URL.
pub fn parse(cx: &mut InlineCx<'_, '_>) -> Option<InlineMatch> {
    let rest = cx.rest();
    let (caps, url) = if let Some(caps) = uri_regex().captures(rest) {
        let url = caps[1].to_string();
        (caps, url)
    } else {
        let caps = email_regex().captures(rest)?;
        let url = format!("mailto:{}", &caps[1]);
        (caps, url)
    };
    let len = caps.get(0)?.end();
    let inner = caps.get(1)?;
    let start = cx.pos() + inner.start();
    let text = Token::text(Span::new(start, start + inner.len()), inner.as_str());
    let token = Token::container(TokenKind::Link, Span::default(), vec![text]).with_attr("url", url);
    Some(InlineMatch::new(token, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_autolinks() {
        assert!(uri_regex().is_match("<https://example.com/a?b=c>"));
        assert!(uri_regex().is_match("<irc://foo.bar:2233/baz>"));
        assert!(!uri_regex().is_match("<https://a b>"));
        assert!(!uri_regex().is_match("<m:x>"));
    }

    #[test]
    fn email_autolinks() {
        assert!(email_regex().is_match("<foo@bar.example.com>"));
        assert!(!email_regex().is_match("<foo@>"));
    }
}
