//! Storage abstraction for comments and votes
//!
//! Storage I/O is the only blocking point of the engine. Implementations must
//! make [`CommentStore::insert_vote`] the atomic `(comment, author)` uniqueness
//! check: two concurrent inserts for the same pair must not both succeed.

mod memory;

pub use memory::MemoryStore;

use crate::comment::Comment;
use crate::error::Result;
use crate::types::{AuthorId, CommentId, ResourceRef};
use crate::vote::Vote;

/// Trait for comment and vote storage implementations
pub trait CommentStore: Send + Sync {
    /// Persist a new comment
    fn insert_comment(&self, comment: &Comment) -> Result<()>;

    /// Load a comment by ID
    fn get_comment(&self, id: &CommentId) -> Result<Comment>;

    /// Direct replies of a comment, hidden ones included, in any order
    fn children_of(&self, id: &CommentId) -> Result<Vec<Comment>>;

    /// Comments at any depth whose thread root is one of `roots`
    fn comments_under_roots(&self, roots: &[ResourceRef]) -> Result<Vec<Comment>>;

    /// Persist a vote; fails with `DuplicateVote` if the pair already voted
    fn insert_vote(&self, vote: &Vote) -> Result<()>;

    /// All votes on a comment
    fn votes_for(&self, comment: &CommentId) -> Result<Vec<Vote>>;

    /// The vote cast by `author` on `comment`, if any
    fn find_vote(&self, comment: &CommentId, author: &AuthorId) -> Result<Option<Vote>> {
        Ok(self
            .votes_for(comment)?
            .into_iter()
            .find(|v| &v.author == author))
    }

    /// Check if a comment exists
    fn comment_exists(&self, id: &CommentId) -> bool {
        self.get_comment(id).is_ok()
    }
}
