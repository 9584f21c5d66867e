//! ANSI-styled text for terminals, on top of the shared text layout.

use crossterm::style::Stylize;

use super::text::{Layout, Style};

const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi;

impl Style for Ansi {
    fn heading(&self, level: i64, text: &str) -> String {
        if level == 1 {
            text.bold().underlined().to_string()
        } else {
            text.bold().to_string()
        }
    }

    fn emphasis(&self, text: &str) -> String {
        text.italic().to_string()
    }

    fn strong(&self, text: &str) -> String {
        text.bold().to_string()
    }

    fn code(&self, text: &str) -> String {
        text.cyan().to_string()
    }

    // Styled line by line so gutters and hanging indents stay unstyled.
    fn code_block(&self, code: &str) -> String {
        code.lines()
            .map(|line| line.cyan().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn rule(&self) -> String {
        "─".repeat(RULE_WIDTH).dark_grey().to_string()
    }

    fn link(&self, text: &str, url: &str) -> String {
        if text == url || url.is_empty() {
            text.underlined().to_string()
        } else {
            format!("{} ({})", text.underlined(), url.dark_grey())
        }
    }

    fn quote_gutter(&self) -> &'static str {
        "│ "
    }

    fn bullet(&self) -> &'static str {
        "•"
    }
}

/// Terminal output.
pub type TerminalRenderer<'r> = Layout<'r, Ansi>;
