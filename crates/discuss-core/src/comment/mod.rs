//! Comment system module
//!
//! Handles comment placement in threads, thread queries and validation.

pub mod index;
pub mod model;
pub mod tree;
pub mod validator;

pub use index::ThreadIndex;
pub use model::*;
pub use tree::CommentTree;
pub use validator::CommentValidator;
