//! In-memory storage

use super::CommentStore;
use crate::comment::{Comment, ThreadIndex};
use crate::error::{DiscussError, Result};
use crate::types::{AuthorId, CommentId, ResourceRef};
use crate::vote::Vote;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    comments: HashMap<CommentId, Comment>,
    index: ThreadIndex,
    votes: HashMap<(CommentId, AuthorId), Vote>,
}

/// In-memory comment storage, used by tests and embedders without persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Total comment count
    pub fn comment_count(&self) -> usize {
        self.read().map(|t| t.comments.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| DiscussError::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| DiscussError::Storage("memory store lock poisoned".to_string()))
    }
}

impl CommentStore for MemoryStore {
    fn insert_comment(&self, comment: &Comment) -> Result<()> {
        let mut tables = self.write()?;
        if tables.comments.contains_key(&comment.id) {
            return Err(DiscussError::Storage(format!(
                "Comment with ID {} already exists",
                comment.id
            )));
        }
        tables.index.add(comment);
        tables.comments.insert(comment.id.clone(), comment.clone());
        Ok(())
    }

    fn get_comment(&self, id: &CommentId) -> Result<Comment> {
        self.read()?
            .comments
            .get(id)
            .cloned()
            .ok_or_else(|| DiscussError::CommentNotFound(id.to_string()))
    }

    fn children_of(&self, id: &CommentId) -> Result<Vec<Comment>> {
        let tables = self.read()?;
        Ok(tables
            .index
            .children(id)
            .iter()
            .filter_map(|child| tables.comments.get(child).cloned())
            .collect())
    }

    fn comments_under_roots(&self, roots: &[ResourceRef]) -> Result<Vec<Comment>> {
        let tables = self.read()?;
        Ok(roots
            .iter()
            .flat_map(|root| tables.index.under_root(root))
            .filter_map(|id| tables.comments.get(id).cloned())
            .collect())
    }

    fn insert_vote(&self, vote: &Vote) -> Result<()> {
        // Check and insert under one write lock.
        let mut tables = self.write()?;
        let key = (vote.comment.clone(), vote.author.clone());
        if tables.votes.contains_key(&key) {
            return Err(DiscussError::DuplicateVote {
                comment: vote.comment.to_string(),
                author: vote.author.to_string(),
            });
        }
        tables.votes.insert(key, vote.clone());
        Ok(())
    }

    fn votes_for(&self, comment: &CommentId) -> Result<Vec<Vote>> {
        Ok(self
            .read()?
            .votes
            .values()
            .filter(|v| &v.comment == comment)
            .cloned()
            .collect())
    }

    fn find_vote(&self, comment: &CommentId, author: &AuthorId) -> Result<Option<Vote>> {
        Ok(self
            .read()?
            .votes
            .get(&(comment.clone(), author.clone()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{Alignment, Placement};
    use crate::vote::VoteWeight;
    use std::sync::Arc;

    fn root_comment() -> Comment {
        Comment::new(
            "Test",
            AuthorId::from_string("alice"),
            Placement::under_resource(ResourceRef::new("proposal", "1")),
            Alignment::Neutral,
        )
    }

    #[test]
    fn test_memory_store_insert_get() {
        let store = MemoryStore::new();
        let comment = root_comment();

        store.insert_comment(&comment).unwrap();
        assert_eq!(store.get_comment(&comment.id).unwrap(), comment);
        assert!(store.comment_exists(&comment.id));
        assert_eq!(store.comment_count(), 1);
    }

    #[test]
    fn test_memory_store_duplicate_comment() {
        let store = MemoryStore::new();
        let comment = root_comment();
        store.insert_comment(&comment).unwrap();
        assert!(store.insert_comment(&comment).is_err());
    }

    #[test]
    fn test_memory_store_get_nonexistent() {
        let store = MemoryStore::new();
        let result = store.get_comment(&CommentId::new());
        assert!(matches!(result, Err(DiscussError::CommentNotFound(_))));
    }

    #[test]
    fn test_memory_store_children() {
        let store = MemoryStore::new();
        let parent = root_comment();
        let child = Comment::new(
            "Reply",
            AuthorId::from_string("bob"),
            Placement::under_comment(&parent),
            Alignment::Neutral,
        );
        store.insert_comment(&parent).unwrap();
        store.insert_comment(&child).unwrap();

        let children = store.children_of(&parent.id).unwrap();
        assert_eq!(children, vec![child]);
        assert_eq!(
            store
                .comments_under_roots(&[ResourceRef::new("proposal", "1")])
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_memory_store_vote_uniqueness() {
        let store = MemoryStore::new();
        let comment = CommentId::new();
        let author = AuthorId::from_string("alice");

        store
            .insert_vote(&Vote::new(comment.clone(), author.clone(), VoteWeight::Up))
            .unwrap();
        let err = store
            .insert_vote(&Vote::new(comment.clone(), author.clone(), VoteWeight::Down))
            .unwrap_err();
        assert!(err.is_duplicate_vote());

        let stored = store.find_vote(&comment, &author).unwrap().unwrap();
        assert!(stored.is_up());
    }

    #[test]
    fn test_memory_store_concurrent_votes() {
        let store = Arc::new(MemoryStore::new());
        let comment = CommentId::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let comment = comment.clone();
                std::thread::spawn(move || {
                    store
                        .insert_vote(&Vote::new(
                            comment,
                            AuthorId::from_string("alice"),
                            VoteWeight::Up,
                        ))
                        .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.votes_for(&comment).unwrap().len(), 1);
    }
}
