//! Pipe tables.
//!
//! ```text
//! | Name | Qty |
//! | :--- | --: |
//! | pear |   3 |
//! ```
//!
//! The header is a one-line paragraph; the delimiter row turns it into a
//! table when both have the same number of cells. Following lines that
//! contain a `|` are body rows, padded or cut to the header's width. Cell
//! text is inline-scanned later like any other leaf. Row and cell tokens
//! share the table's span.

use crate::parsing::blocks::{BlockStart, LeafBlock, LineCx};
use crate::parsing::rope::span::Span;
use crate::render::RendererKind;
use crate::rules::{BlockRule, DEFAULT_PLUGIN_PRECEDENCE};
use crate::token::{Token, TokenKind};

use super::Plugin;

pub const TABLE: &str = "table";
pub const HEAD: &str = "table_head";
pub const BODY: &str = "table_body";
pub const ROW: &str = "table_row";
pub const CELL: &str = "table_cell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

impl Align {
    fn as_attr(self) -> Option<&'static str> {
        match self {
            Align::None => None,
            Align::Left => Some("left"),
            Align::Center => Some("center"),
            Align::Right => Some("right"),
        }
    }
}

/// Splits a row into trimmed cells on unescaped `|`, dropping one leading
/// and one trailing pipe.
pub fn split_row(line: &str) -> Vec<&str> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => line,
    };
    let mut cells = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'\\' if !escaped => escaped = true,
            b'|' if !escaped => {
                cells.push(line[start..i].trim());
                start = i + 1;
            }
            _ => escaped = false,
        }
    }
    cells.push(line[start..].trim());
    cells
}

/// Parses a delimiter row such as `| :--- | ---: |`.
pub fn delimiter_row(line: &str) -> Option<Vec<Align>> {
    if !line.contains('-') {
        return None;
    }
    split_row(line)
        .into_iter()
        .map(|cell| {
            let left = cell.starts_with(':');
            let right = cell.ends_with(':') && cell.len() > 1;
            let dashes = cell.trim_start_matches(':').trim_end_matches(':');
            if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
                return None;
            }
            Some(match (left, right) {
                (true, true) => Align::Center,
                (true, false) => Align::Left,
                (false, true) => Align::Right,
                (false, false) => Align::None,
            })
        })
        .collect()
}

struct TableBlock {
    aligns: Vec<Align>,
    head: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBlock {
    fn cell(&self, span: Span, col: usize, text: String, head: bool) -> Token {
        let mut cell = Token::pending_inline(TokenKind::Plugin(CELL), span, text).with_attr("head", head);
        if let Some(align) = self.aligns.get(col).and_then(|a| a.as_attr()) {
            cell.set_attr("align", align);
        }
        cell
    }
}

impl LeafBlock for TableBlock {
    fn push_line(&mut self, line: &str) -> bool {
        if line.trim().is_empty() || !line.contains('|') {
            return false;
        }
        let mut cells: Vec<String> = split_row(line).into_iter().map(str::to_string).collect();
        cells.resize(self.aligns.len(), String::new());
        self.rows.push(cells);
        true
    }

    fn finish(self: Box<Self>, span: Span) -> Token {
        let head_cells = self
            .head
            .iter()
            .enumerate()
            .map(|(col, text)| self.cell(span, col, text.clone(), true))
            .collect();
        let mut children = vec![Token::container(TokenKind::Plugin(HEAD), span, head_cells)];
        if !self.rows.is_empty() {
            let rows = self
                .rows
                .iter()
                .map(|row| {
                    let cells = row
                        .iter()
                        .enumerate()
                        .map(|(col, text)| self.cell(span, col, text.clone(), false))
                        .collect();
                    Token::container(TokenKind::Plugin(ROW), span, cells)
                })
                .collect();
            children.push(Token::container(TokenKind::Plugin(BODY), span, rows));
        }
        Token::container(TokenKind::Plugin(TABLE), span, children)
    }
}

/// Fires on the delimiter row under a one-line paragraph.
pub fn start(cx: &LineCx<'_>) -> Option<BlockStart> {
    let [header] = cx.paragraph? else {
        return None;
    };
    if cx.lazy || !header.contains('|') {
        return None;
    }
    let aligns = delimiter_row(cx.marker_text()?)?;
    let head: Vec<String> = split_row(header).into_iter().map(str::to_string).collect();
    if head.len() != aligns.len() {
        return None;
    }
    Some(BlockStart::TakeParagraph(Box::new(TableBlock {
        aligns,
        head,
        rows: Vec::new(),
    })))
}

fn html_table(_: &Token, inner: &str) -> String {
    format!("<table>\n{inner}</table>\n")
}

fn html_head(_: &Token, inner: &str) -> String {
    format!("<thead>\n<tr>\n{inner}</tr>\n</thead>\n")
}

fn html_body(_: &Token, inner: &str) -> String {
    format!("<tbody>\n{inner}</tbody>\n")
}

fn html_row(_: &Token, inner: &str) -> String {
    format!("<tr>\n{inner}</tr>\n")
}

fn html_cell(token: &Token, inner: &str) -> String {
    let tag = if token.attr_bool("head") { "th" } else { "td" };
    match token.attr_str("align") {
        Some(align) => format!("  <{tag} style=\"text-align:{align}\">{inner}</{tag}>\n"),
        None => format!("  <{tag}>{inner}</{tag}>\n"),
    }
}

/// Cells of one row as plain text, separated by ` | `.
fn row_line(row: &Token) -> String {
    row.children()
        .iter()
        .map(Token::plain_text)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Plain layouts print the header and each body row on their own line.
fn text_table(token: &Token, _: &str) -> String {
    let mut lines = Vec::new();
    for section in token.children() {
        if section.kind == TokenKind::Plugin(HEAD) {
            lines.push(row_line(section));
        } else {
            lines.extend(section.children().iter().map(row_line));
        }
    }
    lines.join("\n")
}

pub fn plugin() -> Plugin {
    let mut p = Plugin::new("table")
        .tag(TABLE)
        .tag(HEAD)
        .tag(BODY)
        .tag(ROW)
        .tag(CELL)
        .block_rule(BlockRule {
            name: "table",
            precedence: DEFAULT_PLUGIN_PRECEDENCE,
            triggers: b"|-:",
            apply: start,
        })
        .render(RendererKind::Html, TABLE, html_table)
        .render(RendererKind::Html, HEAD, html_head)
        .render(RendererKind::Html, BODY, html_body)
        .render(RendererKind::Html, ROW, html_row)
        .render(RendererKind::Html, CELL, html_cell);
    for renderer in [RendererKind::Text, RendererKind::Terminal] {
        p = p.render(renderer, TABLE, text_table);
    }
    p
}
