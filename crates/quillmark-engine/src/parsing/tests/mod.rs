//! Whole-document parsing tests over the built-in rules.
//!
//! Every parse also runs the invariant checks from `parsing::snapshot`.

use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::document::Document;
use crate::parsing::blocks::MAX_NESTING_DEPTH;
use crate::parsing::parse_document;
use crate::parsing::snapshot::{invariants, normalize};
use crate::rules::RuleRegistry;
use crate::token::{Token, TokenKind};

fn parse(md: &str) -> Document {
    let rules = RuleRegistry::builtin();
    let doc = parse_document(md, &rules);
    invariants(&doc, &rules);
    doc
}

fn outline(md: &str) -> String {
    normalize(&parse(md)).to_string()
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn heading_and_paragraph() {
    assert_snapshot!(outline("# Title\n\nSome *text* here.\n"), @r#"
    heading 0..7 level=1
      text 0..5 "Title"
    paragraph 9..26
      text 0..5 "Some "
      emphasis 5..11
        text 6..10 "text"
      text 11..17 " here."
    "#);
}

#[test]
fn tight_list_then_quote() {
    assert_snapshot!(outline("- a\n- b\n\n> quote\n"), @r#"
    list 0..7 loose=false ordered=false
      list_item 0..3
        block_text 2..3
          text 0..1 "a"
      list_item 4..7
        block_text 6..7
          text 0..1 "b"
    block_quote 9..16
      paragraph 11..16
        text 0..5 "quote"
    "#);
}

#[test]
fn lazy_continuation_joins_the_paragraph() {
    let doc = parse("line one\nline two");
    assert_eq!(kinds(doc.blocks()), [TokenKind::Paragraph]);
    let para = &doc.blocks()[0];
    assert_eq!(
        kinds(para.children()),
        [TokenKind::Text, TokenKind::Softbreak, TokenKind::Text]
    );
    assert_eq!(para.plain_text(), "line one\nline two");
}

#[test]
fn lazy_line_stays_in_quote() {
    let doc = parse("> a\nb");
    assert_eq!(kinds(doc.blocks()), [TokenKind::BlockQuote]);
    let quote = &doc.blocks()[0];
    assert_eq!(kinds(quote.children()), [TokenKind::Paragraph]);
    assert_eq!(quote.plain_text(), "a\nb");
}

#[test]
fn unterminated_fence_runs_to_end() {
    let doc = parse("```rust\nfn main() {}\n\nlet x;");
    assert_eq!(kinds(doc.blocks()), [TokenKind::BlockCode]);
    let code = &doc.blocks()[0];
    assert_eq!(code.attr_str("info"), Some("rust"));
    assert_eq!(code.text_payload(), Some("fn main() {}\n\nlet x;\n"));
    assert_eq!(code.span.range(), 0..28);
}

#[test]
fn fence_content_is_not_parsed() {
    let doc = parse("~~~\n# not a heading\n*x*\n~~~\nafter");
    assert_eq!(
        kinds(doc.blocks()),
        [TokenKind::BlockCode, TokenKind::Paragraph]
    );
    assert_eq!(
        doc.blocks()[0].text_payload(),
        Some("# not a heading\n*x*\n")
    );
}

#[test]
fn blank_line_between_items_makes_list_loose() {
    let doc = parse("- a\n\n- b");
    let list = &doc.blocks()[0];
    assert!(list.attr_bool("loose"));
    for item in list.children() {
        assert_eq!(kinds(item.children()), [TokenKind::Paragraph]);
    }
}

#[test]
fn ordered_list_keeps_start() {
    let doc = parse("3. a\n4. b");
    let list = &doc.blocks()[0];
    assert!(list.attr_bool("ordered"));
    assert_eq!(list.attr_int("start"), Some(3));
    assert_eq!(list.children().len(), 2);
}

#[test]
fn different_bullet_starts_a_new_list() {
    let doc = parse("- a\n+ b");
    assert_eq!(kinds(doc.blocks()), [TokenKind::List, TokenKind::List]);
}

#[test]
fn nested_list_under_item() {
    let doc = parse("- a\n  - b\n- c");
    let outer = &doc.blocks()[0];
    assert_eq!(outer.children().len(), 2);
    let first = &outer.children()[0];
    assert_eq!(kinds(first.children()), [TokenKind::BlockText, TokenKind::List]);
}

#[test]
fn setext_and_thematic_break() {
    let doc = parse("Title\n===\n\nSub\n---\n\n---");
    assert_eq!(
        kinds(doc.blocks()),
        [
            TokenKind::Heading,
            TokenKind::Heading,
            TokenKind::ThematicBreak
        ]
    );
    assert_eq!(doc.blocks()[0].attr_int("level"), Some(1));
    assert_eq!(doc.blocks()[0].span.range(), 0..9);
    assert_eq!(doc.blocks()[1].attr_int("level"), Some(2));
}

#[test]
fn indented_code_drops_trailing_blank_lines() {
    let doc = parse("    code\n\n    more\n\n\npara");
    assert_eq!(
        kinds(doc.blocks()),
        [TokenKind::BlockCode, TokenKind::Paragraph]
    );
    assert_eq!(doc.blocks()[0].text_payload(), Some("code\n\nmore\n"));
}

#[test]
fn html_block_ends_at_blank_line() {
    let doc = parse("<div>\nhi\n</div>\n\npara");
    assert_eq!(
        kinds(doc.blocks()),
        [TokenKind::BlockHtml, TokenKind::Paragraph]
    );
    assert_eq!(doc.blocks()[0].text_payload(), Some("<div>\nhi\n</div>\n"));
    assert_eq!(doc.blocks()[0].span.range(), 0..15);
}

#[test]
fn forward_reference_resolves_with_normalized_label() {
    let doc = parse("[foo]\n\n[FOO]: /url \"t\"");
    assert_eq!(kinds(doc.blocks()), [TokenKind::Paragraph]);
    let link = &doc.blocks()[0].children()[0];
    assert_eq!(link.kind, TokenKind::Link);
    assert_eq!(link.attr_str("url"), Some("/url"));
    assert_eq!(link.attr_str("title"), Some("t"));
}

#[test]
fn first_definition_wins() {
    let doc = parse("[a]: /one\n[a]: /two\n\n[a]");
    assert_eq!(doc.references.link_count(), 1);
    let link = &doc.blocks()[0].children()[0];
    assert_eq!(link.attr_str("url"), Some("/one"));
}

#[test]
fn definition_cannot_interrupt_a_paragraph() {
    let doc = parse("text\n[a]: /one");
    assert_eq!(doc.references.link_count(), 0);
    assert_eq!(doc.blocks()[0].plain_text(), "text\n[a]: /one");
}

#[test]
fn crlf_and_tabs_are_normalized() {
    let doc = parse("-\ta\r\n-\tb\r\n");
    assert_eq!(doc.source, "-   a\n-   b\n");
    let list = &doc.blocks()[0];
    assert_eq!(list.children().len(), 2);
    assert_eq!(list.children()[1].plain_text(), "b");
}

#[test]
fn nesting_is_capped() {
    let md = format!("{}x", "> ".repeat(MAX_NESTING_DEPTH + 8));
    let doc = parse(&md);
    let mut depth = 0;
    let mut node = &doc.blocks()[0];
    while node.kind == TokenKind::BlockQuote {
        depth += 1;
        node = &node.children()[0];
    }
    assert!(depth < MAX_NESTING_DEPTH);
    assert_eq!(node.kind, TokenKind::Paragraph);
    assert!(node.plain_text().starts_with("> "));
}

#[test]
fn empty_document() {
    assert!(parse("").blocks().is_empty());
}

#[test]
fn blank_lines_only() {
    assert!(parse("\n\n   \n").blocks().is_empty());
}
