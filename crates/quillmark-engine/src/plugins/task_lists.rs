//! `- [ ] todo` / `- [x] done` list items.
//!
//! Runs after inline scanning: an item whose first line starts with a
//! checkbox becomes a `task_list_item`, and the checkbox bytes are split off
//! the leading text into a `task_marker` leaf.

use crate::document::Document;
use crate::parsing::rope::span::Span;
use crate::render::RendererKind;
use crate::token::{Body, Token, TokenKind};

use super::Plugin;

pub const ITEM: &str = "task_list_item";
pub const MARKER: &str = "task_marker";

/// Checkbox state of `text`, which must start with `[ ] `, `[x] ` or `[X] `.
fn checkbox(text: &str) -> Option<bool> {
    match text.get(..4)? {
        "[ ] " => Some(false),
        "[x] " | "[X] " => Some(true),
        _ => None,
    }
}

fn convert_item(item: &mut Token) {
    if item.kind != TokenKind::ListItem {
        return;
    }
    let Some(first_block) = item.children_mut().and_then(|c| c.first_mut()) else {
        return;
    };
    if !matches!(first_block.kind, TokenKind::BlockText | TokenKind::Paragraph) {
        return;
    }
    let Some(inline) = first_block.children_mut() else {
        return;
    };
    let Some(first) = inline.first_mut() else {
        return;
    };
    if first.kind != TokenKind::Text {
        return;
    }
    let Body::Text(text) = &mut first.body else {
        return;
    };
    let Some(checked) = checkbox(text) else {
        return;
    };

    let at = first.span.start;
    let marker = Token::leaf(TokenKind::Plugin(MARKER), Span::new(at, at + 4), &text[..4])
        .with_attr("checked", checked);
    text.drain(..4);
    first.span.start = at + 4;
    if text.is_empty() {
        inline[0] = marker;
    } else {
        inline.insert(0, marker);
    }
    item.kind = TokenKind::Plugin(ITEM);
    item.set_attr("checked", checked);
}

fn mark_tasks(doc: &mut Document) {
    doc.root.walk_mut(&mut |t| {
        if t.kind == TokenKind::List {
            if let Some(items) = t.children_mut() {
                items.iter_mut().for_each(convert_item);
            }
        }
    });
}

fn html_item(_: &Token, inner: &str) -> String {
    format!("<li class=\"task-list-item\">{inner}</li>\n")
}

fn html_marker(token: &Token, _: &str) -> String {
    let checked = if token.attr_bool("checked") { " checked" } else { "" };
    format!("<input class=\"task-list-item-checkbox\" type=\"checkbox\" disabled{checked} /> ")
}

fn terminal_marker(token: &Token, _: &str) -> String {
    if token.attr_bool("checked") {
        "☑ ".to_string()
    } else {
        "☐ ".to_string()
    }
}

pub fn plugin() -> Plugin {
    Plugin::new("task_lists")
        .tag(ITEM)
        .tag(MARKER)
        .after_parse(mark_tasks)
        .render(RendererKind::Html, ITEM, html_item)
        .render(RendererKind::Html, MARKER, html_marker)
        .render(RendererKind::Terminal, MARKER, terminal_marker)
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
    fn checkbox_states() {
        assert_eq!(checkbox("[ ] a"), Some(false));
        assert_eq!(checkbox("[X] a"), Some(true));
        assert_eq!(checkbox("[x]a"), None);
        assert_eq!(checkbox("[-] a"), None);
        assert_eq!(checkbox("[ ]"), None);
    }

    #[test]
    fn splits_marker_from_text() {
        let doc = parse("- [x] done\n- [ ] *todo*\n- plain");
        let items = doc.blocks()[0].children();
        assert_eq!(items[0].kind, TokenKind::Plugin(ITEM));
        assert!(items[0].attr_bool("checked"));
        assert!(!items[1].attr_bool("checked"));
        assert_eq!(items[2].kind, TokenKind::ListItem);

        let line = items[0].children()[0].children();
        assert_eq!(line[0].kind, TokenKind::Plugin(MARKER));
        assert_eq!(line[0].span, Span::new(0, 4));
        assert_eq!(line[1].text_payload(), Some("done"));
        assert_eq!(line[1].span, Span::new(4, 8));

        let line = items[1].children()[0].children();
        assert_eq!(line.len(), 2);
        assert_eq!(line[1].kind, TokenKind::Emphasis);
    }

    #[test]
    fn nested_lists_are_converted() {
        let doc = parse("- outer\n  - [ ] inner");
        let outer = &doc.blocks()[0].children()[0];
        let inner_list = &outer.children()[1];
        assert_eq!(inner_list.children()[0].kind, TokenKind::Plugin(ITEM));
    }
}
