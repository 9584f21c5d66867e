use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::document::Document;
use crate::parsing::rope::slice::preview;
use crate::token::{Attr, Body, Token};

/// Longest text payload shown in an outline line.
const PREVIEW_LEN: usize = 40;

/// Outline of a parsed document.
#[derive(Debug, Serialize)]
pub struct Snap {
    pub blocks: Vec<NodeSnap>,
}

#[derive(Debug, Serialize)]
pub struct NodeSnap {
    pub kind: String,
    pub span: (usize, usize),
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnap>,
}

fn attr_value(attr: &Attr) -> String {
    match attr {
        Attr::Bool(b) => b.to_string(),
        Attr::Int(n) => n.to_string(),
        Attr::Str(s) => format!("{s:?}"),
    }
}

fn node(token: &Token) -> NodeSnap {
    let text = match &token.body {
        Body::Text(t) | Body::Inline(t) => Some(preview(t, PREVIEW_LEN)),
        Body::Children(_) => None,
    };
    NodeSnap {
        kind: token.kind.tag().to_string(),
        span: (token.span.start, token.span.end),
        attrs: token
            .attrs
            .iter()
            .map(|(k, v)| ((*k).to_string(), attr_value(v)))
            .collect(),
        text,
        children: token.children().iter().map(node).collect(),
    }
}

/// Converts the document's top-level blocks into a [`Snap`].
pub fn normalize(doc: &Document) -> Snap {
    Snap {
        blocks: doc.blocks().iter().map(node).collect(),
    }
}

impl NodeSnap {
    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(
            f,
            "{:indent$}{} {}..{}",
            "",
            self.kind,
            self.span.0,
            self.span.1,
            indent = depth * 2
        )?;
        for (k, v) in &self.attrs {
            write!(f, " {k}={v}")?;
        }
        if let Some(text) = &self.text {
            write!(f, " {text:?}")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write(f, depth + 1)?;
        }
        Ok(())
    }
}

/// One line per token: `kind start..end attr=value "text"`, children
/// indented by two spaces.
impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            block.write(f, 0)?;
        }
        Ok(())
    }
}
