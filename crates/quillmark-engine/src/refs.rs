//! # Reference Table
//!
//! Per-document link and footnote definitions, keyed by normalized label.
//! Filled by the block scanner, read by the inline scanner. The first
//! definition of a label wins; later duplicates are dropped.

use std::collections::HashMap;

use crate::token::Token;

/// Case-folds a label and collapses interior whitespace runs to one space.
///
/// `"  Foo\n  BAR "` and `"foo bar"` normalize to the same key.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A `[label]: url "title"` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDef {
    pub url: String,
    pub title: Option<String>,
}

/// A `[^label]: ...` definition with its block content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteDef {
    /// Label as written (not normalized), used for anchors.
    pub label: String,
    pub children: Vec<Token>,
}

#[derive(Debug, Default, Clone)]
pub struct References {
    links: HashMap<String, LinkDef>,
    footnotes: HashMap<String, FootnoteDef>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a link definition. Returns `false` if the label was already
    /// defined (the new definition is ignored).
    pub fn define_link(&mut self, label: &str, def: LinkDef) -> bool {
        let key = normalize_label(label);
        if key.is_empty() || self.links.contains_key(&key) {
            return false;
        }
        self.links.insert(key, def);
        true
    }

    pub fn link(&self, label: &str) -> Option<&LinkDef> {
        self.links.get(&normalize_label(label))
    }

    /// Records a footnote definition; first definition wins.
    pub fn define_footnote(&mut self, def: FootnoteDef) -> bool {
        let key = normalize_label(&def.label);
        if key.is_empty() || self.footnotes.contains_key(&key) {
            return false;
        }
        self.footnotes.insert(key, def);
        true
    }

    pub fn footnote(&self, label: &str) -> Option<&FootnoteDef> {
        self.footnotes.get(&normalize_label(label))
    }

    /// Labels of every footnote definition, as written.
    pub fn footnote_labels(&self) -> impl Iterator<Item = &str> {
        self.footnotes.values().map(|d| d.label.as_str())
    }

    pub(crate) fn footnote_mut(&mut self, label: &str) -> Option<&mut FootnoteDef> {
        self.footnotes.get_mut(&normalize_label(label))
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn footnote_count(&self) -> usize {
        self.footnotes.len()
    }
}

/// Labels of footnotes in order of first use.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FootnoteOrder {
    labels: Vec<String>,
}

impl FootnoteOrder {
    /// Records a use of `label`, returning its 1-based footnote number.
    pub fn note_use(&mut self, label: &str) -> usize {
        let key = normalize_label(label);
        if let Some(i) = self.labels.iter().position(|l| *l == key) {
            return i + 1;
        }
        self.labels.push(key);
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_labels(self) -> Vec<String> {
        self.labels
    }
}
