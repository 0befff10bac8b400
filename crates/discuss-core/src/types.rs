//! Core type definitions for discuss

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a comment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    /// Generate a new CommentId
    pub fn new() -> Self {
        CommentId(Uuid::new_v4())
    }

    /// Create from UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(CommentId(Uuid::parse_str(s)?))
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a vote
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteId(pub Uuid);

impl VoteId {
    /// Generate a new VoteId
    pub fn new() -> Self {
        VoteId(Uuid::new_v4())
    }
}

impl Default for VoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identity of a participant. Only equality and ordering are relied upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuthorId(pub String);

impl AuthorId {
    /// Create an AuthorId from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        AuthorId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a commentable resource owned by the host application
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource type, e.g. "proposal"
    pub kind: String,
    /// Resource identifier within its kind
    pub id: String,
}

impl ResourceRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for ResourceRef {
    type Err = crate::DiscussError;

    /// Parse the `kind:id` form
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.split_once(':') {
            Some((kind, id)) if !kind.is_empty() && !id.is_empty() => Ok(Self::new(kind, id)),
            _ => Err(crate::DiscussError::validation(
                "resource",
                format!("expected KIND:ID, got '{}'", s),
            )),
        }
    }
}

/// What a comment directly replies to: the root resource or another comment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommentableRef {
    /// Direct reply to a resource (depth 0)
    Resource(ResourceRef),
    /// Reply to a comment
    Comment { id: CommentId },
}

impl CommentableRef {
    /// Create a reference to a resource
    pub fn resource(kind: impl Into<String>, id: impl Into<String>) -> Self {
        CommentableRef::Resource(ResourceRef::new(kind, id))
    }

    /// Create a reference to a parent comment
    pub fn comment(id: CommentId) -> Self {
        CommentableRef::Comment { id }
    }

    /// Parent comment id, if this is a reply to a comment
    pub fn parent_comment(&self) -> Option<&CommentId> {
        match self {
            CommentableRef::Comment { id } => Some(id),
            CommentableRef::Resource(_) => None,
        }
    }

    /// Check if this points at a root resource
    pub fn is_resource(&self) -> bool {
        matches!(self, CommentableRef::Resource(_))
    }
}

impl From<ResourceRef> for CommentableRef {
    fn from(resource: ResourceRef) -> Self {
        CommentableRef::Resource(resource)
    }
}
