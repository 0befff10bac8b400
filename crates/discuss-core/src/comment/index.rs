//! Thread indexing for fast child and root lookup

use super::model::Comment;
use crate::types::{CommentId, ResourceRef};
use std::collections::HashMap;

/// Parent and root index over a set of comments
#[derive(Debug, Clone, Default)]
pub struct ThreadIndex {
    /// Direct replies by parent comment
    by_parent: HashMap<CommentId, Vec<CommentId>>,
    /// Every comment by thread root, at any depth
    by_root: HashMap<ResourceRef, Vec<CommentId>>,
}

impl ThreadIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment to the index
    pub fn add(&mut self, comment: &Comment) {
        if let Some(parent) = comment.parent_id() {
            self.by_parent
                .entry(parent.clone())
                .or_default()
                .push(comment.id.clone());
        }

        self.by_root
            .entry(comment.root_commentable.clone())
            .or_default()
            .push(comment.id.clone());
    }

    /// Direct replies of a comment, in insertion order
    pub fn children(&self, parent: &CommentId) -> &[CommentId] {
        self.by_parent.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All comments of a thread, in insertion order
    pub fn under_root(&self, root: &ResourceRef) -> &[CommentId] {
        self.by_root.get(root).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::model::{Alignment, Placement};
    use crate::types::AuthorId;

    fn root_comment(resource: &str) -> Comment {
        Comment::new(
            "Test",
            AuthorId::from_string("alice"),
            Placement::under_resource(ResourceRef::new("proposal", resource)),
            Alignment::Neutral,
        )
    }

    fn reply(parent: &Comment) -> Comment {
        Comment::new(
            "Reply",
            AuthorId::from_string("bob"),
            Placement::under_comment(parent),
            Alignment::Neutral,
        )
    }

    #[test]
    fn test_children() {
        let mut index = ThreadIndex::new();
        let parent = root_comment("1");
        let child1 = reply(&parent);
        let child2 = reply(&parent);

        index.add(&parent);
        index.add(&child1);
        index.add(&child2);

        assert_eq!(index.children(&parent.id), &[child1.id.clone(), child2.id.clone()]);
        assert!(index.children(&child1.id).is_empty());
    }

    #[test]
    fn test_under_root_spans_depths() {
        let mut index = ThreadIndex::new();
        let parent = root_comment("1");
        let child = reply(&parent);
        let grandchild = reply(&child);
        let other = root_comment("2");

        for c in [&parent, &child, &grandchild, &other] {
            index.add(c);
        }

        assert_eq!(index.under_root(&ResourceRef::new("proposal", "1")).len(), 3);
        assert_eq!(index.under_root(&ResourceRef::new("proposal", "2")).len(), 1);
        assert!(index.under_root(&ResourceRef::new("proposal", "3")).is_empty());
    }
}
