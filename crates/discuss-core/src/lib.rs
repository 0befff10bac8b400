//! discuss-core - Core library for discuss
//!
//! Threaded comments attached to host-application resources: the comment
//! tree with its depth and placement rules, per-author votes, the body
//! rendering pipeline and notification recipient computation. Resource
//! lookup, moderation and persistence are injected through traits.

pub mod capability;
pub mod comment;
pub mod config;
pub mod error;
pub mod format;
pub mod notify;
pub mod store;
pub mod types;
pub mod vote;

pub use error::{DiscussError, Result};
pub use types::*;
