//! # Renderers
//!
//! Projections of a finished [`Document`] into an output format. Renderers
//! only see the token contract: tag, attributes and either children or a
//! text payload.
//!
//! Plugin tags are rendered through the hooks registered for the active
//! renderer; each hook gets the token and the already rendered output of its
//! content. A tag without a hook falls back to its content (see each
//! renderer for details).

pub mod ast;
pub mod html;
pub mod terminal;
pub mod text;

use std::fmt;
use std::str::FromStr;

use crate::document::Document;
use crate::error::ConfigError;
use crate::plugins::HookFn;
use crate::rules::RuleRegistry;
use crate::token::Token;

/// The closed set of output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RendererKind {
    #[default]
    Html,
    Ast,
    Terminal,
    Text,
}

impl RendererKind {
    pub const ALL: [RendererKind; 4] = [
        RendererKind::Html,
        RendererKind::Ast,
        RendererKind::Terminal,
        RendererKind::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RendererKind::Html => "html",
            RendererKind::Ast => "ast",
            RendererKind::Terminal => "terminal",
            RendererKind::Text => "text",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RendererKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ConfigError::UnknownRenderer(s.to_string()))
    }
}

/// A document projection.
pub trait Render {
    fn render(&self, doc: &Document) -> String;
}

/// Hook lookup for one renderer.
#[derive(Clone, Copy)]
pub struct Hooks<'r> {
    rules: &'r RuleRegistry,
    kind: RendererKind,
}

impl<'r> Hooks<'r> {
    pub fn new(rules: &'r RuleRegistry, kind: RendererKind) -> Self {
        Self { rules, kind }
    }

    pub fn get(&self, token: &Token) -> Option<HookFn> {
        self.rules.hook(self.kind, token.kind.tag())
    }
}

/// Builds the renderer selected by `kind`.
pub fn renderer<'r>(
    kind: RendererKind,
    rules: &'r RuleRegistry,
    escape: bool,
) -> Box<dyn Render + 'r> {
    let hooks = Hooks::new(rules, kind);
    match kind {
        RendererKind::Html => Box::new(html::HtmlRenderer::new(hooks, escape)),
        RendererKind::Ast => Box::new(ast::AstRenderer),
        RendererKind::Terminal => {
            Box::new(terminal::TerminalRenderer::new(hooks, terminal::Ansi))
        }
        RendererKind::Text => Box::new(text::TextRenderer::new(hooks, text::Plain)),
    }
}
