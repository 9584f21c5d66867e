pub mod autolink;
pub mod code_span;
pub mod escape;
pub mod inline_html;
pub mod line_break;
pub mod link;

pub use code_span::CodeSpan;
