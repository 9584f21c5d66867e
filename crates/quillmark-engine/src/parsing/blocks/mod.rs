//! # Block Parsing
//!
//! Line-by-line block scanning over an explicit container stack.
//!
//! ## Flow per line
//!
//! 1. **Continuation**: each open container (block quote, list item,
//!    footnote definition) checks its prefix against the line, outermost
//!    first; containers that no longer match are closed later, innermost
//!    first, unless the line turns out to be a lazy paragraph continuation.
//! 2. **Open leaf**: a fenced code, indented code, HTML or plugin leaf takes
//!    the line if it can.
//! 3. **Block rules**: the registry's precedence-ordered rules run against
//!    the line remainder; container starts loop back for more markers.
//! 4. **Paragraph of last resort**: continue the open paragraph or start one.
//!
//! ## Modules
//!
//! - **`types`**: the rule-facing types ([`LineCx`], [`BlockStart`],
//!   [`ContainerKind`], [`LeafBlock`])
//! - **`kinds`**: built-in block rules, one type per construct
//! - **`containers`**: container frames and their continuation checks
//! - **`builder`**: [`BlockBuilder`], the stack machine itself
//!
//! ## Key Invariants
//!
//! - Container nesting mirrors the marker structure at scan time and is
//!   capped at [`MAX_NESTING_DEPTH`].
//! - Fenced code blocks are raw zones: no block or inline parsing inside.
//! - Unterminated containers and leaves close implicitly at end of input.

pub mod builder;
pub mod containers;
pub mod kinds;
pub mod types;

pub use builder::BlockBuilder;
pub use types::{
    BlockStart, ContainerKind, HtmlEnd, LeafBlock, LeafStart, LineCx, ListMarker,
    MAX_NESTING_DEPTH,
};
