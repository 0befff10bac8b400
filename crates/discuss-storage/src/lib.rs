//! discuss-storage - Storage library for discuss
//!
//! File system persistence of comments and votes behind the
//! [`discuss_core::store::CommentStore`] trait.

mod fs_store;

pub use fs_store::{FileSystemStore, STORE_SCHEMA_VERSION};
