//! # Plugins
//!
//! A plugin is plain data: the tags it introduces, the block and inline rules
//! it contributes, render hooks for its tags and an optional pass over the
//! finished document. The [`RuleRegistry`](crate::rules::RuleRegistry)
//! merges plugins with the built-in rules once, at pipeline construction.
//!
//! Built-in plugins are looked up by name with [`lookup`]:
//!
//! - **`strikethrough`**: `~~text~~`
//! - **`footnotes`**: `[^label]` references and `[^label]:` definitions
//! - **`table`**: pipe tables
//! - **`url`**: bare `http(s)://` links
//! - **`task_lists`**: `[ ]` / `[x]` list items

pub mod footnotes;
pub mod strikethrough;
pub mod table;
pub mod task_lists;
pub mod url;

use crate::document::Document;
use crate::error::ConfigError;
use crate::render::RendererKind;
use crate::rules::{BlockRule, InlineRule};
use crate::token::Token;

/// Renders one token given the already rendered output of its children.
pub type HookFn = fn(&Token, &str) -> String;

/// Runs over the finished document, after inline scanning.
pub type AfterParse = fn(&mut Document);

/// A renderer handler for one tag.
#[derive(Debug, Clone, Copy)]
pub struct RenderHook {
    pub renderer: RendererKind,
    pub tag: &'static str,
    pub render: HookFn,
}

/// A plugin descriptor.
#[derive(Clone)]
pub struct Plugin {
    pub name: &'static str,
    /// Tags this plugin may emit, added to the registry's closed tag set.
    pub tags: Vec<&'static str>,
    pub block_rules: Vec<BlockRule>,
    pub inline_rules: Vec<InlineRule>,
    pub hooks: Vec<RenderHook>,
    pub after_parse: Option<AfterParse>,
}

impl Plugin {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tags: Vec::new(),
            block_rules: Vec::new(),
            inline_rules: Vec::new(),
            hooks: Vec::new(),
            after_parse: None,
        }
    }

    #[must_use]
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tags.push(tag);
        self
    }

    #[must_use]
    pub fn block_rule(mut self, rule: BlockRule) -> Self {
        self.block_rules.push(rule);
        self
    }

    #[must_use]
    pub fn inline_rule(mut self, rule: InlineRule) -> Self {
        self.inline_rules.push(rule);
        self
    }

    #[must_use]
    pub fn hook(mut self, hook: RenderHook) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Shorthand for a hook on `renderer` for `tag`.
    #[must_use]
    pub fn render(self, renderer: RendererKind, tag: &'static str, render: HookFn) -> Self {
        self.hook(RenderHook {
            renderer,
            tag,
            render,
        })
    }

    #[must_use]
    pub fn after_parse(mut self, f: AfterParse) -> Self {
        self.after_parse = Some(f);
        self
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field(
                "block_rules",
                &self.block_rules.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .field(
                "inline_rules",
                &self.inline_rules.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Names accepted by [`lookup`].
pub const NAMES: [&str; 5] = ["strikethrough", "footnotes", "table", "url", "task_lists"];

/// Resolves a built-in plugin by name.
pub fn lookup(name: &str) -> Result<Plugin, ConfigError> {
    match name {
        "strikethrough" => Ok(strikethrough::plugin()),
        "footnotes" => Ok(footnotes::plugin()),
        "table" => Ok(table::plugin()),
        "url" => Ok(url::plugin()),
        "task_lists" => Ok(task_lists::plugin()),
        other => Err(ConfigError::UnknownPlugin(other.to_string())),
    }
}
