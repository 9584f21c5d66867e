//! # Parsing
//!
//! The two scanning phases and the glue between them.
//!
//! A parse call runs strictly in order, never re-entering an earlier phase:
//!
//! 1. [`rope::normalize`]: line endings to `\n`, tabs to 4-column stops.
//! 2. [`blocks`]: every line goes through the block builder, producing the
//!    block tree and the complete reference table. Leaf blocks keep their
//!    text as pending inline source.
//! 3. [`inline`]: every pending leaf is inline-scanned against the finished
//!    reference table, so references may precede their definitions. Used
//!    footnote definitions are scanned next, in order of first use.
//! 4. The registry's after-parse hooks run over the finished [`Document`].

pub mod blocks;
pub mod inline;
pub mod rope;
pub mod snapshot;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use xi_rope::Rope;

use crate::document::Document;
use crate::refs::normalize_label;
use crate::rules::RuleRegistry;
use crate::token::{Body, Token};

use blocks::BlockBuilder;
use inline::{InlineEnv, parse_inline};
use rope::{lines_with_spans, normalize};

/// Parses `input` with `rules`. Never fails: malformed markup degrades to
/// literal text.
pub fn parse_document(input: &str, rules: &RuleRegistry) -> Document {
    let source = normalize(input);
    let rope = Rope::from(source.as_str());

    let mut builder = BlockBuilder::new(rules);
    for line in lines_with_spans(&rope) {
        builder.push(line.span, &line.text);
    }
    let (mut root, mut refs) = builder.finish(source.len());

    let (footnote_order, scanned) = {
        let mut env = InlineEnv::new(rules, &refs);
        scan_leaves(&mut root, &mut env);

        // Footnote bodies may reference further footnotes, growing the list
        // while it is walked.
        let mut scanned = Vec::new();
        let mut next = 0;
        while let Some(label) = env.footnotes.labels().get(next).cloned() {
            next += 1;
            if let Some(def) = refs.footnote(&label) {
                let mut children = def.children.clone();
                for child in &mut children {
                    scan_leaves(child, &mut env);
                }
                scanned.push((label, children));
            }
        }

        // Unreferenced definitions are scanned too; their references do not
        // count as uses.
        let mut unused_env = InlineEnv::new(rules, &refs);
        let mut seen: HashSet<String> = scanned.iter().map(|(l, _)| l.clone()).collect();
        for label in refs.footnote_labels() {
            if !seen.insert(normalize_label(label)) {
                continue;
            }
            if let Some(def) = refs.footnote(label) {
                let mut children = def.children.clone();
                for child in &mut children {
                    scan_leaves(child, &mut unused_env);
                }
                scanned.push((label.to_string(), children));
            }
        }

        (env.footnotes.into_labels(), scanned)
    };
    for (label, children) in scanned {
        if let Some(def) = refs.footnote_mut(&label) {
            def.children = children;
        }
    }

    let mut doc = Document {
        root,
        references: refs,
        footnote_order,
        source,
    };
    for hook in rules.after_parse_hooks() {
        hook(&mut doc);
    }

    log::debug!(
        "parsed {} bytes: {} blocks, {} link definitions, {} footnotes used",
        doc.source.len(),
        doc.blocks().len(),
        doc.references.link_count(),
        doc.footnote_order.len()
    );
    doc
}

/// Replaces every pending inline body under `token` with its inline tokens.
fn scan_leaves(token: &mut Token, env: &mut InlineEnv<'_>) {
    token.walk_mut(&mut |t| {
        if let Body::Inline(src) = &mut t.body {
            let src = std::mem::take(src);
            t.body = Body::Children(parse_inline(&src, env));
            t.inline_len = Some(src.len());
        }
    });
}
