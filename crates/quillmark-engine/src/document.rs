use crate::refs::{FootnoteDef, References};
use crate::token::Token;

/// The result of one parse call.
///
/// Owns everything a renderer needs: the token tree, the reference table
/// and the order in which footnotes were first referenced.
#[derive(Debug, Clone)]
pub struct Document {
    /// The `document` token; its children are the top-level blocks.
    pub root: Token,
    pub references: References,
    /// Normalized labels of used footnotes, in order of first use.
    pub footnote_order: Vec<String>,
    /// The normalized source that block spans point into.
    pub source: String,
}

impl Document {
    /// Top-level block tokens.
    pub fn blocks(&self) -> &[Token] {
        self.root.children()
    }

    /// Used footnote definitions in reference order, numbered from 1.
    pub fn used_footnotes(&self) -> impl Iterator<Item = (usize, &FootnoteDef)> {
        self.footnote_order
            .iter()
            .filter_map(|label| self.references.footnote(label))
            .enumerate()
            .map(|(i, def)| (i + 1, def))
    }
}
