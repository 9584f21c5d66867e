//! Pipeline settings read from `~/.config/quillmark/config.toml`.
//!
//! ```toml
//! renderer = "terminal"
//! escape = true
//! plugins = ["table", "footnotes"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use quillmark_engine::{Markdown, RendererKind};

const CONFIG_DIR: &str = "~/.config/quillmark";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read quillmark config {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed quillmark config {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid pipeline configuration: {0}")]
    Engine(#[from] quillmark_engine::ConfigError),
}

/// Pipeline settings. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Renderer name, checked when the pipeline is built.
    pub renderer: String,
    pub escape: bool,
    pub plugins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            renderer: RendererKind::default().name().to_string(),
            escape: true,
            plugins: Vec::new(),
        }
    }
}

impl Config {
    /// Reads settings from `config_path`; a missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;
        Self::parse(&content, config_path).map(Some)
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    fn parse(content: &str, config_path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from(shellexpand::tilde(CONFIG_DIR).as_ref()).join(CONFIG_FILE)
    }

    /// Expands `~` and environment variables in a user-supplied path. Paths
    /// naming an unset variable are returned unchanged.
    pub fn expand_path(path: &Path) -> PathBuf {
        let raw = path.to_string_lossy();
        match shellexpand::full(&raw) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Builds the pipeline these settings describe. Unknown renderer or
    /// plugin names are reported here, not when the file is loaded.
    pub fn build_markdown(&self) -> Result<Markdown, ConfigError> {
        let builder = self
            .plugins
            .iter()
            .fold(Markdown::builder(), |b, name| b.plugin(name.as_str()));
        Ok(builder
            .escape(self.escape)
            .renderer(&self.renderer)
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_expanded() {
        let path = Config::config_path();
        let path = path.to_string_lossy();

        assert!(!path.starts_with('~'));
        assert!(path.ends_with(".config/quillmark/config.toml"));
    }

    #[test]
    fn expand_path_resolves_tilde() {
        let expanded = Config::expand_path(Path::new("~/notes/quill.toml"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("notes/quill.toml"));
    }

    #[test]
    fn expand_path_keeps_unknown_variables() {
        let path = Path::new("$QUILLMARK_SURELY_UNSET_VARIABLE/config.toml");
        assert_eq!(Config::expand_path(path), path);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config: Config = toml::from_str("plugins = [\"table\"]").unwrap();
        assert_eq!(
            config,
            Config {
                plugins: vec!["table".to_string()],
                ..Config::default()
            }
        );
        assert_eq!(config.renderer, "html");
        assert!(config.escape);
    }

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_from_path(dir.path().join("nonexistent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = TempDir::new().unwrap();
        let config_file = dir.path().join("nested/config.toml");
        let config = Config {
            renderer: "text".to_string(),
            escape: false,
            plugins: vec!["footnotes".to_string(), "url".to_string()],
        };

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_file = dir.path().join("config.toml");
        std::fs::write(&config_file, "escape = \"sometimes\"").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().starts_with("Malformed quillmark config"));
    }

    #[test]
    fn build_markdown_uses_settings() {
        let config = Config {
            renderer: "text".to_string(),
            escape: true,
            plugins: vec!["strikethrough".to_string()],
        };

        let markdown = config.build_markdown().unwrap();

        assert_eq!(markdown.renderer_kind(), RendererKind::Text);
        assert_eq!(markdown.plugins(), ["strikethrough"]);
        assert_eq!(markdown.convert("~~a~~ *b*"), "a b\n");
    }

    #[test]
    fn unknown_plugin_is_reported_on_build() {
        let config = Config {
            plugins: vec!["emoji".to_string()],
            ..Config::default()
        };

        let err = config.build_markdown().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Engine(quillmark_engine::ConfigError::UnknownPlugin(ref name)) if name == "emoji"
        ));
        assert_eq!(
            err.to_string(),
            "Invalid pipeline configuration: Unknown plugin 'emoji'"
        );
    }
}
