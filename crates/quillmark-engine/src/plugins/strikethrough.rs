//! `~~deleted~~` text.

use crossterm::style::Stylize;

use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::parsing::rope::span::Span;
use crate::render::RendererKind;
use crate::rules::{DEFAULT_PLUGIN_PRECEDENCE, InlineAction, InlineRule};
use crate::token::{Token, TokenKind};

use super::Plugin;

pub const TAG: &str = "strikethrough";
const MARKER: &str = "~~";

/// Content must not start or end with whitespace; it is inline-scanned in
/// turn.
pub fn parse(cx: &mut InlineCx<'_, '_>) -> Option<InlineMatch> {
    let body = cx.rest().strip_prefix(MARKER)?;
    if body.starts_with('~') || body.starts_with(char::is_whitespace) {
        return None;
    }
    let start = cx.pos() + MARKER.len();
    let close = cx.find_closer(MARKER, start, |src, at| {
        src[..at]
            .chars()
            .next_back()
            .is_some_and(|c| !c.is_whitespace())
    })?;
    let children = cx.parse_nested(start..close);
    let token = Token::container(TokenKind::Plugin(TAG), Span::default(), children);
    Some(InlineMatch::new(token, close + MARKER.len() - cx.pos()))
}

fn html(_: &Token, inner: &str) -> String {
    format!("<del>{inner}</del>")
}

fn terminal(_: &Token, inner: &str) -> String {
    inner.crossed_out().to_string()
}

pub fn plugin() -> Plugin {
    Plugin::new("strikethrough")
        .tag(TAG)
        .inline_rule(InlineRule {
            name: "strikethrough",
            precedence: DEFAULT_PLUGIN_PRECEDENCE,
            triggers: b"~",
            action: InlineAction::Match(parse),
        })
        .render(RendererKind::Html, TAG, html)
        .render(RendererKind::Terminal, TAG, terminal)
}
