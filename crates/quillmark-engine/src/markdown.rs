//! # Pipeline
//!
//! [`Markdown`] ties a compiled [`RuleRegistry`] to a renderer choice and an
//! escaping policy. Building one is where configuration errors surface; once
//! built, every call parses with fresh per-call state, so a single pipeline
//! can serve any number of threads.
//!
//! ```
//! let md = quillmark_engine::create_markdown(true, Some("html"), &["strikethrough"]).unwrap();
//! assert_eq!(md.convert("~~old~~ *new*"), "<p><del>old</del> <em>new</em></p>\n");
//! ```

use std::sync::{Arc, LazyLock};

use crate::document::Document;
use crate::error::ConfigError;
use crate::parsing::parse_document;
use crate::plugins::{self, Plugin};
use crate::render::{self, RendererKind};
use crate::rules::RuleRegistry;

/// A configured parse-and-render pipeline.
#[derive(Debug, Clone)]
pub struct Markdown {
    rules: Arc<RuleRegistry>,
    renderer: RendererKind,
    escape: bool,
}

impl Markdown {
    pub fn builder() -> MarkdownBuilder {
        MarkdownBuilder::default()
    }

    /// Parses `text` into a document. Never fails.
    pub fn parse(&self, text: &str) -> Document {
        parse_document(text, &self.rules)
    }

    /// Renders a parsed document with the configured renderer.
    pub fn render(&self, doc: &Document) -> String {
        render::renderer(self.renderer, &self.rules, self.escape).render(doc)
    }

    /// Parses and renders in one call.
    pub fn convert(&self, text: &str) -> String {
        self.render(&self.parse(text))
    }

    pub fn renderer_kind(&self) -> RendererKind {
        self.renderer
    }

    pub fn escape(&self) -> bool {
        self.escape
    }

    /// Names of the applied plugins, in order.
    pub fn plugins(&self) -> &[&'static str] {
        self.rules.plugins()
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }
}

/// A plugin given by name or as a descriptor.
#[derive(Debug, Clone)]
pub enum PluginSpec {
    Name(String),
    Plugin(Plugin),
}

impl PluginSpec {
    fn resolve(self) -> Result<Plugin, ConfigError> {
        match self {
            PluginSpec::Name(name) => plugins::lookup(&name),
            PluginSpec::Plugin(p) => Ok(p),
        }
    }
}

impl From<&str> for PluginSpec {
    fn from(name: &str) -> Self {
        PluginSpec::Name(name.to_string())
    }
}

impl From<String> for PluginSpec {
    fn from(name: String) -> Self {
        PluginSpec::Name(name)
    }
}

impl From<Plugin> for PluginSpec {
    fn from(p: Plugin) -> Self {
        PluginSpec::Plugin(p)
    }
}

/// Builder for [`Markdown`]. Names are only checked in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct MarkdownBuilder {
    escape: bool,
    renderer: String,
    plugins: Vec<PluginSpec>,
}

impl Default for MarkdownBuilder {
    fn default() -> Self {
        Self {
            escape: true,
            renderer: RendererKind::default().name().to_string(),
            plugins: Vec::new(),
        }
    }
}

impl MarkdownBuilder {
    /// Whether raw HTML in the source is escaped (HTML renderer only).
    #[must_use]
    pub fn escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    #[must_use]
    pub fn renderer(mut self, name: &str) -> Self {
        self.renderer = name.to_string();
        self
    }

    #[must_use]
    pub fn renderer_kind(mut self, kind: RendererKind) -> Self {
        self.renderer = kind.name().to_string();
        self
    }

    /// Adds a plugin; plugins apply in the order added.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Into<PluginSpec>) -> Self {
        self.plugins.push(plugin.into());
        self
    }

    pub fn build(self) -> Result<Markdown, ConfigError> {
        let renderer: RendererKind = self.renderer.parse()?;
        let plugins = self
            .plugins
            .into_iter()
            .map(PluginSpec::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        let rules = RuleRegistry::compile(plugins)?;
        log::debug!(
            "built {renderer} pipeline (escape: {}, plugins: {:?})",
            self.escape,
            rules.plugins()
        );
        Ok(Markdown {
            rules: Arc::new(rules),
            renderer,
            escape: self.escape,
        })
    }
}

/// Builds a pipeline from a renderer name (`None` means `html`) and plugin
/// names.
pub fn create_markdown(
    escape: bool,
    renderer: Option<&str>,
    plugins: &[&str],
) -> Result<Markdown, ConfigError> {
    let mut builder = Markdown::builder().escape(escape);
    if let Some(name) = renderer {
        builder = builder.renderer(name);
    }
    plugins
        .iter()
        .fold(builder, |b, name| b.plugin(*name))
        .build()
}

fn preset(escape: bool, renderer: RendererKind, plugins: &[&str]) -> Markdown {
    match create_markdown(escape, Some(renderer.name()), plugins) {
        Ok(md) => md,
        Err(e) => unreachable!("built-in preset is invalid: {e}"),
    }
}

static DEFAULT: LazyLock<Markdown> = LazyLock::new(|| preset(true, RendererKind::Html, &[]));
static HTML: LazyLock<Markdown> = LazyLock::new(|| {
    preset(
        false,
        RendererKind::Html,
        &["strikethrough", "footnotes", "table"],
    )
});
static TERMINAL: LazyLock<Markdown> =
    LazyLock::new(|| preset(true, RendererKind::Terminal, &["table"]));
static TEXT: LazyLock<Markdown> = LazyLock::new(|| preset(true, RendererKind::Text, &["table"]));

/// HTML without escaping, with strikethrough, footnotes and tables.
pub fn html() -> &'static Markdown {
    &HTML
}

/// Terminal output with tables.
pub fn terminal() -> &'static Markdown {
    &TERMINAL
}

/// Plain text output with tables.
pub fn text() -> &'static Markdown {
    &TEXT
}

/// Converts `text` to HTML with escaping on and no plugins.
pub fn markdown(text: &str) -> String {
    DEFAULT.convert(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn default_pipeline_escapes_html() {
        assert_eq!(markdown("<b>hi</b>"), "<p>&lt;b&gt;hi&lt;/b&gt;</p>\n");
    }

    #[test]
    fn html_preset_passes_html_and_knows_plugins() {
        assert_eq!(html().convert("<b>hi</b> ~~x~~"), "<p><b>hi</b> <del>x</del></p>\n");
        assert_eq!(html().plugins(), ["strikethrough", "footnotes", "table"]);
        assert!(!html().escape());
    }

    #[test]
    fn text_and_terminal_presets() {
        assert_eq!(text().renderer_kind(), RendererKind::Text);
        assert_eq!(terminal().renderer_kind(), RendererKind::Terminal);
        assert_eq!(text().convert("*a*"), "a\n");
    }

    #[rstest]
    #[case(Some("markdown"), &[], ConfigError::UnknownRenderer("markdown".into()))]
    #[case(None, &["table", "emoji"], ConfigError::UnknownPlugin("emoji".into()))]
    fn bad_configuration_is_rejected(
        #[case] renderer: Option<&str>,
        #[case] plugins: &[&str],
        #[case] expected: ConfigError,
    ) {
        assert_eq!(create_markdown(true, renderer, plugins).unwrap_err(), expected);
    }

    #[test]
    fn missing_renderer_means_html() {
        let md = create_markdown(true, None, &[]).unwrap();
        assert_eq!(md.renderer_kind(), RendererKind::Html);
    }

    #[test]
    fn identical_configuration_gives_identical_output() {
        let input = "# T\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nx[^1] ~~y~~\n\n[^1]: note\n";
        let names = ["table", "footnotes", "strikethrough"];
        let a = create_markdown(false, Some("html"), &names).unwrap();
        let b = create_markdown(false, Some("html"), &names).unwrap();
        assert_eq!(a.convert(input), b.convert(input));
        assert_eq!(a.plugins(), b.plugins());
    }

    #[test]
    fn plugin_descriptors_are_accepted() {
        let md = Markdown::builder()
            .renderer_kind(RendererKind::Text)
            .plugin(plugins::strikethrough::plugin())
            .plugin("url")
            .build()
            .unwrap();
        assert_eq!(md.plugins(), ["strikethrough", "url"]);
    }

    #[test]
    fn one_pipeline_serves_many_threads() {
        let md = html();
        let outputs: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| s.spawn(move || md.convert(&format!("[a]\n\n[a]: /{i}"))))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (i, out) in outputs.iter().enumerate() {
            assert_eq!(out, &format!("<p><a href=\"/{i}\">a</a></p>\n"));
        }
    }
}
