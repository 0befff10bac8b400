//! Comment body rendering
//!
//! Raw input flows through [`Sanitizer`], then [`QuoteParser`], then the
//! [`ProcessorChain`], and [`CommentFormatter`] wraps the result.

mod formatter;
mod link;
mod processor;
mod quote;
mod sanitizer;

pub use formatter::CommentFormatter;
pub use link::LinkProcessor;
pub use processor::{rewrite_text, ContentProcessor, ProcessorChain};
pub use quote::{Block, QuoteParser};
pub use sanitizer::Sanitizer;
