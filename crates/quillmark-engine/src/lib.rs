//! # quillmark-engine
//!
//! An extensible markdown engine: a line-oriented block scanner builds the
//! block tree and the reference table, then an inline scanner resolves the
//! text of every leaf block. Both scanners dispatch through a
//! [`RuleRegistry`] compiled once from the built-in rules and any
//! [`Plugin`]s. Renderers turn the resulting [`Document`] into HTML, JSON,
//! plain or terminal text.

mod document;
mod error;
mod markdown;
pub mod parsing;
pub mod plugins;
pub mod refs;
pub mod render;
pub mod rules;
pub mod token;

pub use document::Document;
pub use error::ConfigError;
pub use markdown::{
    Markdown, MarkdownBuilder, PluginSpec, create_markdown, html, markdown, terminal, text,
};
pub use parsing::rope::span::Span;
pub use plugins::Plugin;
pub use refs::{FootnoteDef, LinkDef, References};
pub use render::{Render, RendererKind};
pub use rules::RuleRegistry;
pub use token::{Attr, Body, Token, TokenKind};
