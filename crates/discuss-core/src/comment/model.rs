//! Comment data models

use crate::error::{DiscussError, Result};
use crate::types::{AuthorId, CommentId, CommentableRef, ResourceRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment in a thread attached to a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Raw body as submitted
    pub body: String,
    /// Author identity
    pub author: AuthorId,
    /// What this comment directly replies to
    pub commentable: CommentableRef,
    /// Resource the whole thread belongs to
    pub root_commentable: ResourceRef,
    /// 0 for replies to the resource, parent depth + 1 otherwise
    pub depth: u32,
    /// Author's declared position
    pub alignment: Alignment,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a comment at an already-computed placement
    pub fn new(
        body: impl Into<String>,
        author: AuthorId,
        placement: Placement,
        alignment: Alignment,
    ) -> Self {
        Self {
            id: CommentId::new(),
            body: body.into(),
            author,
            commentable: placement.commentable,
            root_commentable: placement.root_commentable,
            depth: placement.depth,
            alignment,
            created_at: Utc::now(),
        }
    }

    /// Parent comment id, `None` for depth-0 comments
    pub fn parent_id(&self) -> Option<&CommentId> {
        self.commentable.parent_comment()
    }

    /// Check if this comment replies directly to the root resource
    pub fn is_top_level(&self) -> bool {
        self.commentable.is_resource()
    }

    /// Whether the depth ceiling still leaves room for replies
    pub fn has_reply_room(&self, max_depth: u32) -> bool {
        self.depth < max_depth
    }
}

/// Where a new comment sits in its thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub commentable: CommentableRef,
    pub root_commentable: ResourceRef,
    pub depth: u32,
}

impl Placement {
    /// Placement of a direct reply to a resource
    pub fn under_resource(resource: ResourceRef) -> Self {
        Self {
            commentable: CommentableRef::Resource(resource.clone()),
            root_commentable: resource,
            depth: 0,
        }
    }

    /// Placement of a reply to `parent`; the root is inherited
    pub fn under_comment(parent: &Comment) -> Self {
        Self {
            commentable: CommentableRef::comment(parent.id.clone()),
            root_commentable: parent.root_commentable.clone(),
            depth: parent.depth + 1,
        }
    }
}

/// Author's declared position on the commented resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Alignment {
    /// Disagree (-1)
    Against,
    /// Neutral (0)
    #[default]
    Neutral,
    /// Agree (1)
    InFavor,
}

impl TryFrom<i8> for Alignment {
    type Error = DiscussError;

    fn try_from(value: i8) -> Result<Self> {
        match value {
            -1 => Ok(Alignment::Against),
            0 => Ok(Alignment::Neutral),
            1 => Ok(Alignment::InFavor),
            other => Err(DiscussError::validation(
                "alignment",
                format!("must be -1, 0 or 1, got {}", other),
            )),
        }
    }
}

impl From<Alignment> for i8 {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Against => -1,
            Alignment::Neutral => 0,
            Alignment::InFavor => 1,
        }
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Against => write!(f, "against"),
            Alignment::Neutral => write!(f, "neutral"),
            Alignment::InFavor => write!(f, "in favor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_comment() -> Comment {
        Comment::new(
            "Test comment",
            AuthorId::from_string("alice"),
            Placement::under_resource(ResourceRef::new("proposal", "1")),
            Alignment::Neutral,
        )
    }

    #[test]
    fn test_top_level_placement() {
        let comment = create_test_comment();
        assert_eq!(comment.depth, 0);
        assert!(comment.is_top_level());
        assert!(comment.parent_id().is_none());
        assert_eq!(comment.root_commentable, ResourceRef::new("proposal", "1"));
    }

    #[test]
    fn test_reply_placement_propagates_root() {
        let parent = create_test_comment();
        let placement = Placement::under_comment(&parent);
        assert_eq!(placement.depth, 1);
        assert_eq!(placement.root_commentable, parent.root_commentable);
        assert_eq!(placement.commentable.parent_comment(), Some(&parent.id));

        let reply = Comment::new("reply", AuthorId::from_string("bob"), placement, Alignment::InFavor);
        let grandchild = Placement::under_comment(&reply);
        assert_eq!(grandchild.depth, 2);
        assert_eq!(grandchild.root_commentable, parent.root_commentable);
    }

    #[test]
    fn test_reply_room() {
        let mut comment = create_test_comment();
        comment.depth = 2;
        assert!(comment.has_reply_room(3));
        comment.depth = 3;
        assert!(!comment.has_reply_room(3));
    }

    #[test]
    fn test_alignment_conversion() {
        assert_eq!(Alignment::try_from(-1).unwrap(), Alignment::Against);
        assert_eq!(Alignment::try_from(0).unwrap(), Alignment::Neutral);
        assert_eq!(Alignment::try_from(1).unwrap(), Alignment::InFavor);

        let err = Alignment::try_from(2).unwrap_err();
        assert_eq!(err.field(), Some("alignment"));
        assert!(Alignment::try_from(-2).is_err());

        assert_eq!(i8::from(Alignment::Against), -1);
    }

    #[test]
    fn test_comment_serialization() {
        let comment = create_test_comment();
        let json = serde_json::to_string(&comment).unwrap();
        assert!(json.contains("\"alignment\":0"));
        let comment2: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(comment, comment2);
    }

    #[test]
    fn test_invalid_alignment_rejected_on_load() {
        let comment = create_test_comment();
        let json = serde_json::to_string(&comment)
            .unwrap()
            .replace("\"alignment\":0", "\"alignment\":2");
        assert!(serde_json::from_str::<Comment>(&json).is_err());
    }
}
