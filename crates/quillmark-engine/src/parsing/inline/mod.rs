//! # Inline Parsing
//!
//! Scans one leaf block's inline source into inline tokens.
//!
//! ## Modules
//!
//! - **`cursor`**: byte cursor over the source
//! - **`parser`**: the scan loop, bracket handling and the rule context
//!   ([`InlineCx`]) handed to inline rules
//! - **`delims`**: emphasis resolution over delimiter runs
//! - **`kinds`**: the built-in inline rules
//!
//! ## Key Invariants
//!
//! - Top-level token spans tile the source exactly: no byte is dropped or
//!   covered twice.
//! - Code spans are raw zones: no inline parsing inside them.
//! - Unmatched markup degrades to literal text; scanning never fails.

pub mod cursor;
pub mod delims;
pub mod kinds;
pub mod parser;

pub use parser::{InlineCx, InlineEnv, InlineMatch, MAX_INLINE_DEPTH, parse_inline};
