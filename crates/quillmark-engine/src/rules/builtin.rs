//! The built-in block and inline rule sets.

use super::{BlockRule, InlineAction, InlineRule};
use crate::parsing::blocks::kinds::{
    AtxHeading, BlockQuote, CodeFence, HtmlBlock, IndentedCode, LinkDefinition, ListItem,
    SetextHeading, ThematicBreak,
};
use crate::parsing::inline::kinds::{autolink, code_span, escape, inline_html, line_break};

pub fn block_rules() -> Vec<BlockRule> {
    vec![
        BlockRule {
            name: "setext_heading",
            precedence: 100,
            triggers: b"=-",
            apply: SetextHeading::start,
        },
        BlockRule {
            name: "thematic_break",
            precedence: 110,
            triggers: ThematicBreak::MARKERS,
            apply: ThematicBreak::start,
        },
        BlockRule {
            name: "atx_heading",
            precedence: 200,
            triggers: b"#",
            apply: AtxHeading::start,
        },
        BlockRule {
            name: "fenced_code",
            precedence: 300,
            triggers: b"`~",
            apply: CodeFence::start,
        },
        BlockRule {
            name: "indented_code",
            precedence: 400,
            triggers: b"",
            apply: IndentedCode::start,
        },
        BlockRule {
            name: "block_html",
            precedence: 450,
            triggers: b"<",
            apply: HtmlBlock::start,
        },
        BlockRule {
            name: "block_quote",
            precedence: 500,
            triggers: b">",
            apply: BlockQuote::start,
        },
        BlockRule {
            name: "list_item",
            precedence: 600,
            triggers: b"-+*0123456789",
            apply: ListItem::start,
        },
        BlockRule {
            name: "link_definition",
            precedence: 700,
            triggers: b"[",
            apply: LinkDefinition::start,
        },
    ]
}

pub fn inline_rules() -> Vec<InlineRule> {
    vec![
        InlineRule {
            name: "escape",
            precedence: 100,
            triggers: b"\\",
            action: InlineAction::Match(escape::parse),
        },
        InlineRule {
            name: "codespan",
            precedence: 200,
            triggers: b"`",
            action: InlineAction::Match(code_span::parse),
        },
        InlineRule {
            name: "inline_html",
            precedence: 300,
            triggers: b"<",
            action: InlineAction::Match(inline_html::parse),
        },
        InlineRule {
            name: "autolink",
            precedence: 400,
            triggers: b"<",
            action: InlineAction::Match(autolink::parse),
        },
        InlineRule {
            name: "linebreak",
            precedence: 500,
            triggers: b" \\\n",
            action: InlineAction::Match(line_break::parse),
        },
        InlineRule {
            name: "open_bracket",
            precedence: 600,
            triggers: b"[!",
            action: InlineAction::OpenBracket,
        },
        InlineRule {
            name: "close_bracket",
            precedence: 600,
            triggers: b"]",
            action: InlineAction::CloseBracket,
        },
        InlineRule {
            name: "emphasis",
            precedence: 700,
            triggers: b"*_",
            action: InlineAction::Delimiter,
        },
    ]
}
