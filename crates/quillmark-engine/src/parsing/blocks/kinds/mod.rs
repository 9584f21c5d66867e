pub mod atx_heading;
pub mod block_quote;
pub mod code_fence;
pub mod html_block;
pub mod indented_code;
pub mod link_def;
pub mod list_item;
pub mod paragraph;
pub mod setext_heading;
pub mod thematic_break;

pub use atx_heading::AtxHeading;
pub use block_quote::BlockQuote;
pub use code_fence::CodeFence;
pub use html_block::HtmlBlock;
pub use indented_code::IndentedCode;
pub use link_def::LinkDefinition;
pub use list_item::ListItem;
pub use paragraph::Paragraph;
pub use setext_heading::SetextHeading;
pub use thematic_break::ThematicBreak;
