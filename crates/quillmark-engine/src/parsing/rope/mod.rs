//! Document source handling: normalization, line iteration, spans.

pub mod lines;
pub mod normalize;
pub mod slice;
pub mod span;

pub use lines::{LineRef, lines_with_spans};
pub use normalize::normalize;
pub use slice::preview;
pub use span::Span;
