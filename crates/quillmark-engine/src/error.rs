use crate::render::RendererKind;

/// Construction-time configuration errors.
///
/// Parsing itself never fails; these are raised only while a
/// [`Markdown`](crate::Markdown) pipeline is being built, and a failed build
/// yields no pipeline at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown renderer '{0}'")]
    UnknownRenderer(String),
    #[error("Unknown plugin '{0}'")]
    UnknownPlugin(String),
    #[error(
        "Rules '{first}' and '{second}' both claim precedence {precedence} for overlapping triggers"
    )]
    PrecedenceConflict {
        first: &'static str,
        second: &'static str,
        precedence: u16,
    },
    #[error("Plugin '{plugin}' uses tag '{tag}' without declaring it")]
    UndeclaredTag {
        plugin: &'static str,
        tag: &'static str,
    },
    #[error("Duplicate {renderer} render hook for tag '{tag}'")]
    DuplicateHook {
        renderer: RendererKind,
        tag: &'static str,
    },
}
