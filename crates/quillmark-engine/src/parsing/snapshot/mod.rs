//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: converts a parsed [`Document`](crate::Document) into a
//!   stable [`Snap`] outline, serializable and printable as indented text for
//!   `insta` snapshots
//! - **`invariants`**: runtime checks for parser correctness (closed tag set,
//!   spans in bounds, child spans contained in parents, no pending inline
//!   bodies, inline spans tiling their source)
//!
//! Parsing behavior is pinned down by these snapshots rather than by a
//! separate formal grammar.

pub mod invariants;
pub mod normalize;

pub use invariants::{check as invariants, check_coverage, check_tiling};
pub use normalize::{Snap, normalize};
