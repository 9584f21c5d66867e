//! Footnotes: `[^label]` references, `[^label]:` definitions and a
//! `footnotes` section appended to the document.
//!
//! A definition is a container whose continuation lines are indented four
//! columns; its content is parsed like any other block content and moved
//! into the reference table when it closes. A reference only resolves when
//! its label is defined somewhere in the document. Items in the appended
//! section follow the order of first reference, not of definition.

use crate::document::Document;
use crate::parsing::blocks::{BlockStart, ContainerKind, LineCx};
use crate::parsing::blocks::types::leading_spaces;
use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::parsing::rope::span::Span;
use crate::render::RendererKind;
use crate::rules::{BlockRule, InlineAction, InlineRule};
use crate::token::{Token, TokenKind};

use super::Plugin;

pub const REF: &str = "footnote_ref";
pub const SECTION: &str = "footnotes";
pub const ITEM: &str = "footnote_item";

/// Parses `[^label]` at the start of `s`, returning the label and the bytes
/// through the closing bracket. Labels cannot contain whitespace.
fn label(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix("[^")?;
    let close = inner.find(']')?;
    let label = &inner[..close];
    if label.is_empty() || label.contains(|c: char| c.is_whitespace() || c == '[') {
        return None;
    }
    Some((label, close + 3))
}

/// `[^label]: text` opens a definition. Unlike link definitions it may
/// interrupt a paragraph, so consecutive definitions need no blank line.
pub fn definition(cx: &LineCx<'_>) -> Option<BlockStart> {
    let rest = cx.marker_text()?;
    let (label, used) = label(rest)?;
    let after = rest[used..].strip_prefix(':')?;
    let consumed = cx.indent + used + 1 + leading_spaces(after);
    Some(BlockStart::Container {
        kind: ContainerKind::FootnoteDef {
            label: label.to_string(),
        },
        consumed: consumed.min(cx.text.len()),
    })
}

pub fn reference(cx: &mut InlineCx<'_, '_>) -> Option<InlineMatch> {
    let (label, used) = label(cx.rest())?;
    let def = cx.refs().footnote(label)?;
    let index = cx.note_footnote(label);
    let token = Token::leaf(TokenKind::Plugin(REF), Span::default(), label)
        .with_attr("label", def.label.as_str())
        .with_attr("index", index);
    Some(InlineMatch::new(token, used))
}

/// Appends the `footnotes` section when anything was referenced.
fn append_section(doc: &mut Document) {
    if doc.footnote_order.is_empty() {
        return;
    }
    let end = doc.source.len();
    let span = Span::new(end, end);
    let items: Vec<Token> = doc
        .used_footnotes()
        .map(|(index, def)| {
            Token::container(TokenKind::Plugin(ITEM), span, def.children.clone())
                .with_attr("label", def.label.as_str())
                .with_attr("index", index)
        })
        .collect();
    log::debug!("appending {} footnotes", items.len());
    if let Some(children) = doc.root.children_mut() {
        children.push(Token::container(TokenKind::Plugin(SECTION), span, items));
    }
}

fn index(token: &Token) -> i64 {
    token.attr_int("index").unwrap_or_default()
}

fn html_ref(token: &Token, _: &str) -> String {
    let i = index(token);
    format!("<sup class=\"footnote-ref\" id=\"fnref-{i}\"><a href=\"#fn-{i}\">{i}</a></sup>")
}

fn html_section(_: &Token, inner: &str) -> String {
    format!("<section class=\"footnotes\">\n<ol>\n{inner}</ol>\n</section>\n")
}

/// The back link goes inside a trailing paragraph when there is one.
fn html_item(token: &Token, inner: &str) -> String {
    let i = index(token);
    let back = format!("<a href=\"#fnref-{i}\" class=\"footnote\">&#8617;</a>");
    let text = inner.trim_end();
    let body = match text.strip_suffix("</p>") {
        Some(head) => format!("{head}{back}</p>"),
        None => format!("{text}{back}"),
    };
    format!("<li id=\"fn-{i}\">{body}</li>\n")
}

fn text_ref(token: &Token, _: &str) -> String {
    format!("[{}]", index(token))
}

fn text_item(token: &Token, inner: &str) -> String {
    format!("[{}] {}", index(token), inner.trim_end())
}

pub fn plugin() -> Plugin {
    let mut p = Plugin::new("footnotes")
        .tag(REF)
        .tag(SECTION)
        .tag(ITEM)
        .block_rule(BlockRule {
            name: "footnote_definition",
            precedence: 750,
            triggers: b"[",
            apply: definition,
        })
        .inline_rule(InlineRule {
            name: "footnote_ref",
            precedence: 550,
            triggers: b"[",
            action: InlineAction::Match(reference),
        })
        .render(RendererKind::Html, REF, html_ref)
        .render(RendererKind::Html, SECTION, html_section)
        .render(RendererKind::Html, ITEM, html_item)
        .after_parse(append_section);
    for renderer in [RendererKind::Text, RendererKind::Terminal] {
        p = p.render(renderer, REF, text_ref).render(renderer, ITEM, text_item);
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use crate::parsing::snapshot::invariants;
    use crate::rules::RuleRegistry;
    use pretty_assertions::assert_eq;

    fn parse(md: &str) -> Document {
        let rules = RuleRegistry::compile(vec![plugin()]).unwrap();
        let doc = parse_document(md, &rules);
        invariants(&doc, &rules);
        doc
    }

    #[test]
    fn labels() {
        assert_eq!(label("[^a]"), Some(("a", 4)));
        assert_eq!(label("[^note-1] x"), Some(("note-1", 9)));
        assert_eq!(label("[^]"), None);
        assert_eq!(label("[^a b]"), None);
        assert_eq!(label("[a]"), None);
    }

    #[test]
    fn order_follows_first_use() {
        let doc = parse("See [^A] and [^B] and [^A].\n\n[^B]: Bee\n[^A]: Ay\n");
        assert_eq!(doc.footnote_order, ["a", "b"]);
        let refs: Vec<i64> = doc.blocks()[0]
            .children()
            .iter()
            .filter(|t| t.kind == TokenKind::Plugin(REF))
            .map(index)
            .collect();
        assert_eq!(refs, [1, 2, 1]);
    }

    #[test]
    fn section_lists_used_definitions() {
        let doc = parse("x[^n]\n\n[^n]: The *note*\n    continues.\n\n[^unused]: never\n");
        let blocks = doc.blocks();
        assert_eq!(blocks.len(), 2);
        let section = &blocks[1];
        assert_eq!(section.kind, TokenKind::Plugin(SECTION));
        assert_eq!(section.children().len(), 1);
        let item = &section.children()[0];
        assert_eq!(item.attr_str("label"), Some("n"));
        assert_eq!(item.plain_text(), "The note\ncontinues.");
    }

    #[test]
    fn undefined_reference_is_text() {
        let doc = parse("x[^missing]");
        assert!(doc.footnote_order.is_empty());
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].plain_text(), "x[^missing]");
    }

    #[test]
    fn references_inside_notes_extend_the_order() {
        let doc = parse("a[^1]\n\n[^1]: see [^2]\n[^2]: deeper\n");
        assert_eq!(doc.footnote_order, ["1", "2"]);
        assert_eq!(doc.blocks()[1].children().len(), 2);
    }

    #[test]
    fn back_link_joins_the_last_paragraph() {
        let token = Token::container(TokenKind::Plugin(ITEM), Span::default(), Vec::new())
            .with_attr("index", 2_i64);
        assert_eq!(
            html_item(&token, "<p>note</p>\n"),
            "<li id=\"fn-2\"><p>note<a href=\"#fnref-2\" class=\"footnote\">&#8617;</a></p></li>\n"
        );
    }
}
