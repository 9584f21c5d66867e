//! # Rule Registry
//!
//! Built once per pipeline configuration: merges the built-in block and
//! inline rules with the rules contributed by plugins into two immutable,
//! precedence-ordered lists, and precompiles a per-byte dispatch table for
//! each so the scanners never search the rule lists while scanning.
//!
//! ## Precedence
//!
//! Lower keys run first. Built-in rules use keys below
//! [`DEFAULT_PLUGIN_PRECEDENCE`], so plugin rules run after them unless a
//! plugin registers a lower key on purpose. Ties keep registration order,
//! but two rules may only share a key when their trigger bytes are disjoint;
//! anything else is reported as [`ConfigError::PrecedenceConflict`].
//!
//! ## Triggers
//!
//! Each rule lists the bytes it can start on: the first non-space byte of the
//! line for block rules, the current byte for inline rules. An empty trigger
//! list means "any byte".

pub mod builtin;

use std::collections::{BTreeSet, HashMap};

use crate::error::ConfigError;
use crate::parsing::blocks::{BlockStart, LineCx};
use crate::parsing::inline::{InlineCx, InlineMatch};
use crate::plugins::{AfterParse, HookFn, Plugin};
use crate::render::RendererKind;
use crate::token::TokenKind;

/// Precedence given to plugin rules that do not ask for a specific slot.
pub const DEFAULT_PLUGIN_PRECEDENCE: u16 = 900;

pub type BlockFn = fn(&LineCx<'_>) -> Option<BlockStart>;
pub type InlineFn = fn(&mut InlineCx<'_, '_>) -> Option<InlineMatch>;

/// A block rule descriptor.
#[derive(Clone, Copy)]
pub struct BlockRule {
    pub name: &'static str,
    pub precedence: u16,
    pub triggers: &'static [u8],
    pub apply: BlockFn,
}

/// What an inline rule does when its trigger byte is reached.
#[derive(Clone, Copy)]
pub enum InlineAction {
    /// Try to match a complete token at the cursor.
    Match(InlineFn),
    /// `[` or `![`: push a bracket opener.
    OpenBracket,
    /// `]`: try to close the nearest bracket as a link or image.
    CloseBracket,
    /// `*` / `_` runs handled by the delimiter stack.
    Delimiter,
}

/// An inline rule descriptor.
#[derive(Clone, Copy)]
pub struct InlineRule {
    pub name: &'static str,
    pub precedence: u16,
    pub triggers: &'static [u8],
    pub action: InlineAction,
}

trait Described {
    fn name(&self) -> &'static str;
    fn precedence(&self) -> u16;
    fn triggers(&self) -> &'static [u8];
}

impl Described for BlockRule {
    fn name(&self) -> &'static str {
        self.name
    }
    fn precedence(&self) -> u16 {
        self.precedence
    }
    fn triggers(&self) -> &'static [u8] {
        self.triggers
    }
}

impl Described for InlineRule {
    fn name(&self) -> &'static str {
        self.name
    }
    fn precedence(&self) -> u16 {
        self.precedence
    }
    fn triggers(&self) -> &'static [u8] {
        self.triggers
    }
}

/// Rule indices per leading byte.
#[derive(Debug, Clone)]
struct Dispatch {
    by_byte: Vec<Vec<u16>>,
}

impl Dispatch {
    fn build<R: Described>(rules: &[R]) -> Self {
        let mut by_byte = vec![Vec::new(); 256];
        for (i, rule) in rules.iter().enumerate() {
            let idx = u16::try_from(i).unwrap_or(u16::MAX);
            if rule.triggers().is_empty() {
                for slot in by_byte.iter_mut() {
                    slot.push(idx);
                }
            } else {
                for b in rule.triggers() {
                    by_byte[usize::from(*b)].push(idx);
                }
            }
        }
        Self { by_byte }
    }

    fn get(&self, b: u8) -> &[u16] {
        &self.by_byte[usize::from(b)]
    }
}

fn triggers_overlap(a: &[u8], b: &[u8]) -> bool {
    a.is_empty() || b.is_empty() || a.iter().any(|x| b.contains(x))
}

/// Stable-sorts by precedence and rejects same-key rules that could fire on
/// the same byte.
fn order_rules<R: Described>(rules: &mut [R]) -> Result<(), ConfigError> {
    rules.sort_by_key(|r| r.precedence());
    for (i, a) in rules.iter().enumerate() {
        for b in rules[i + 1..]
            .iter()
            .take_while(|b| b.precedence() == a.precedence())
        {
            if triggers_overlap(a.triggers(), b.triggers()) {
                return Err(ConfigError::PrecedenceConflict {
                    first: a.name(),
                    second: b.name(),
                    precedence: a.precedence(),
                });
            }
        }
    }
    Ok(())
}

/// The compiled, immutable rule set shared by every parse call of a pipeline.
pub struct RuleRegistry {
    block: Vec<BlockRule>,
    inline: Vec<InlineRule>,
    block_dispatch: Dispatch,
    inline_dispatch: Dispatch,
    tags: BTreeSet<&'static str>,
    /// Render hooks per renderer, keyed by tag.
    hooks: HashMap<RendererKind, HashMap<&'static str, HookFn>>,
    after_parse: Vec<AfterParse>,
    plugins: Vec<&'static str>,
}

impl RuleRegistry {
    /// Built-in rules only.
    pub fn builtin() -> Self {
        // Built-in keys are distinct by construction; this cannot fail.
        match Self::compile(Vec::new()) {
            Ok(r) => r,
            Err(e) => unreachable!("built-in rules conflict: {e}"),
        }
    }

    /// Merges the built-ins with `plugins` (applied in order).
    ///
    /// A plugin listed more than once is applied once.
    pub fn compile(plugins: Vec<Plugin>) -> Result<Self, ConfigError> {
        let mut block = builtin::block_rules();
        let mut inline = builtin::inline_rules();
        let mut tags: BTreeSet<&'static str> =
            TokenKind::BUILTIN.iter().map(|k| k.tag()).collect();
        let mut hooks: HashMap<RendererKind, HashMap<&'static str, HookFn>> = HashMap::new();
        let mut after_parse = Vec::new();
        let mut names: Vec<&'static str> = Vec::new();

        for plugin in &plugins {
            if names.contains(&plugin.name) {
                log::warn!("plugin '{}' listed more than once; ignoring repeat", plugin.name);
                continue;
            }
            names.push(plugin.name);
            tags.extend(plugin.tags.iter().copied());
        }

        let mut applied: Vec<&'static str> = Vec::new();
        for plugin in plugins {
            if applied.contains(&plugin.name) {
                continue;
            }
            applied.push(plugin.name);

            block.extend(plugin.block_rules.iter().copied());
            inline.extend(plugin.inline_rules.iter().copied());
            for hook in &plugin.hooks {
                if !tags.contains(hook.tag) {
                    return Err(ConfigError::UndeclaredTag {
                        plugin: plugin.name,
                        tag: hook.tag,
                    });
                }
                if hooks
                    .entry(hook.renderer)
                    .or_default()
                    .insert(hook.tag, hook.render)
                    .is_some()
                {
                    return Err(ConfigError::DuplicateHook {
                        renderer: hook.renderer,
                        tag: hook.tag,
                    });
                }
            }
            if let Some(f) = plugin.after_parse {
                after_parse.push(f);
            }
        }

        order_rules(&mut block)?;
        order_rules(&mut inline)?;

        let registry = Self {
            block_dispatch: Dispatch::build(&block),
            inline_dispatch: Dispatch::build(&inline),
            block,
            inline,
            tags,
            hooks,
            after_parse,
            plugins: applied,
        };
        log::debug!(
            "compiled rule registry: {} block rules, {} inline rules, plugins {:?}",
            registry.block.len(),
            registry.inline.len(),
            registry.plugins
        );
        Ok(registry)
    }

    /// Block rules in precedence order.
    pub fn block_rules(&self) -> &[BlockRule] {
        &self.block
    }

    /// Inline rules in precedence order.
    pub fn inline_rules(&self) -> &[InlineRule] {
        &self.inline
    }

    /// Block rules that can fire on a line whose first non-space byte is `b`.
    pub fn block_candidates(&self, b: u8) -> impl Iterator<Item = &BlockRule> {
        self.block_dispatch
            .get(b)
            .iter()
            .map(|i| &self.block[usize::from(*i)])
    }

    /// Inline rules that can fire at byte `b`.
    pub fn inline_candidates(&self, b: u8) -> impl Iterator<Item = &InlineRule> {
        self.inline_dispatch
            .get(b)
            .iter()
            .map(|i| &self.inline[usize::from(*i)])
    }

    /// Whether any inline rule can fire at `b`; bytes that cannot are plain text.
    pub fn is_inline_trigger(&self, b: u8) -> bool {
        !self.inline_dispatch.get(b).is_empty()
    }

    /// Runs the block rules for one line, returning the first match.
    pub fn match_block(&self, cx: &LineCx<'_>) -> Option<(&'static str, BlockStart)> {
        let b = cx.first_byte()?;
        self.block_candidates(b)
            .find_map(|rule| (rule.apply)(cx).map(|start| (rule.name, start)))
    }

    /// Whether `tag` belongs to the tag set known to this registry.
    pub fn knows_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tags.iter().copied()
    }

    pub fn hook(&self, renderer: RendererKind, tag: &str) -> Option<HookFn> {
        self.hooks.get(&renderer)?.get(tag).copied()
    }

    pub fn after_parse_hooks(&self) -> &[AfterParse] {
        &self.after_parse
    }

    /// Names of the applied plugins, in order.
    pub fn plugins(&self) -> &[&'static str] {
        &self.plugins
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field(
                "block",
                &self.block.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .field(
                "inline",
                &self.inline.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .field("plugins", &self.plugins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{self, Plugin, RenderHook};
    use pretty_assertions::assert_eq;

    fn never(_: &LineCx<'_>) -> Option<BlockStart> {
        None
    }

    fn block_names(r: &RuleRegistry) -> Vec<&'static str> {
        r.block_rules().iter().map(|r| r.name).collect()
    }

    #[test]
    fn builtin_block_order() {
        let r = RuleRegistry::builtin();
        assert_eq!(
            block_names(&r),
            [
                "setext_heading",
                "thematic_break",
                "atx_heading",
                "fenced_code",
                "indented_code",
                "block_html",
                "block_quote",
                "list_item",
                "link_definition",
            ]
        );
    }

    #[test]
    fn builtin_inline_order() {
        let r = RuleRegistry::builtin();
        let names: Vec<_> = r.inline_rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "escape",
                "codespan",
                "inline_html",
                "autolink",
                "linebreak",
                "open_bracket",
                "close_bracket",
                "emphasis",
            ]
        );
    }

    #[test]
    fn plugin_rules_follow_builtins_by_default() {
        let r = RuleRegistry::compile(vec![plugins::table::plugin()]).unwrap();
        assert_eq!(block_names(&r).last(), Some(&"table"));
    }

    #[test]
    fn plugin_with_lower_key_runs_earlier() {
        let r = RuleRegistry::compile(vec![plugins::footnotes::plugin()]).unwrap();
        let names = block_names(&r);
        let def = names.iter().position(|n| *n == "footnote_definition").unwrap();
        let link = names.iter().position(|n| *n == "link_definition").unwrap();
        assert_eq!(def, link + 1);
    }

    #[test]
    fn same_key_overlapping_triggers_conflict() {
        let clash = Plugin::new("clash").block_rule(BlockRule {
            name: "bracket_thing",
            precedence: 700,
            triggers: b"[",
            apply: never,
        });
        let err = RuleRegistry::compile(vec![clash]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::PrecedenceConflict {
                first: "link_definition",
                second: "bracket_thing",
                precedence: 700,
            }
        );
    }

    #[test]
    fn same_key_disjoint_triggers_are_fine() {
        let ok = Plugin::new("ok").block_rule(BlockRule {
            name: "percent_thing",
            precedence: 700,
            triggers: b"%",
            apply: never,
        });
        assert!(RuleRegistry::compile(vec![ok]).is_ok());
    }

    #[test]
    fn wildcard_trigger_conflicts_with_anything() {
        let a = Plugin::new("a").block_rule(BlockRule {
            name: "a_rule",
            precedence: 950,
            triggers: b"",
            apply: never,
        });
        let b = Plugin::new("b").block_rule(BlockRule {
            name: "b_rule",
            precedence: 950,
            triggers: b"%",
            apply: never,
        });
        assert!(matches!(
            RuleRegistry::compile(vec![a, b]),
            Err(ConfigError::PrecedenceConflict { .. })
        ));
    }

    #[test]
    fn repeated_plugin_is_applied_once() {
        let r = RuleRegistry::compile(vec![plugins::table::plugin(), plugins::table::plugin()])
            .unwrap();
        assert_eq!(r.plugins(), ["table"]);
    }

    #[test]
    fn hook_for_undeclared_tag_is_rejected() {
        fn render(_: &crate::Token, _: &str) -> String {
            String::new()
        }
        let p = Plugin::new("sneaky").hook(RenderHook {
            renderer: RendererKind::Html,
            tag: "mystery",
            render,
        });
        assert_eq!(
            RuleRegistry::compile(vec![p]).unwrap_err(),
            ConfigError::UndeclaredTag {
                plugin: "sneaky",
                tag: "mystery"
            }
        );
    }

    #[test]
    fn dispatch_only_lists_triggered_rules() {
        let r = RuleRegistry::builtin();
        let names: Vec<_> = r.block_candidates(b'>').map(|r| r.name).collect();
        assert_eq!(names, ["indented_code", "block_quote"]);
        assert!(!r.is_inline_trigger(b'a'));
        assert!(r.is_inline_trigger(b'*'));
    }

    #[test]
    fn hooks_are_looked_up_per_renderer() {
        let r = RuleRegistry::compile(vec![plugins::strikethrough::plugin()]).unwrap();
        assert!(r.hook(RendererKind::Html, "strikethrough").is_some());
        assert!(r.hook(RendererKind::Terminal, "strikethrough").is_some());
        assert!(r.hook(RendererKind::Text, "strikethrough").is_none());
        assert!(r.hook(RendererKind::Html, "table").is_none());
        let tag = String::from("strikethrough");
        let render = r.hook(RendererKind::Html, &tag).unwrap();
        let token = crate::Token::container(
            TokenKind::Plugin("strikethrough"),
            crate::Span::default(),
            Vec::new(),
        );
        assert_eq!(render(&token, "x"), "<del>x</del>");
    }

    #[test]
    fn duplicate_hook_is_rejected() {
        fn render(_: &crate::Token, _: &str) -> String {
            String::new()
        }
        let p = Plugin::new("twice")
            .tag("twice_tag")
            .render(RendererKind::Text, "twice_tag", render)
            .render(RendererKind::Text, "twice_tag", render);
        assert_eq!(
            RuleRegistry::compile(vec![p]).unwrap_err(),
            ConfigError::DuplicateHook {
                renderer: RendererKind::Text,
                tag: "twice_tag"
            }
        );
    }

    #[test]
    fn plugin_tags_join_the_closed_set() {
        let r = RuleRegistry::compile(vec![plugins::strikethrough::plugin()]).unwrap();
        assert!(r.knows_tag("strikethrough"));
        assert!(r.knows_tag("paragraph"));
        assert!(!r.knows_tag("table"));
    }
}
