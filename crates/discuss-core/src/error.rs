//! Error types for discuss

use thiserror::Error;

/// Main error type for discuss
#[derive(Debug, Error)]
pub enum DiscussError {
    /// Field-level validation failure (empty body, depth exceeded, bad alignment or weight)
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// The author already voted on this comment
    #[error("Author {author} has already voted on comment {comment}")]
    DuplicateVote { comment: String, author: String },

    /// The resource kind does not support commenting
    #[error("Resources of kind '{0}' do not support comments")]
    CapabilityUnsupported(String),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// Commentable resource not found
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DiscussError>,
    },
}

impl DiscussError {
    /// Build a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DiscussError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DiscussError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip context wrappers and return the underlying error
    pub fn root(&self) -> &DiscussError {
        match self {
            DiscussError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Field name of a validation error
    pub fn field(&self) -> Option<&str> {
        match self.root() {
            DiscussError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether this is a duplicate vote rejection
    pub fn is_duplicate_vote(&self) -> bool {
        matches!(self.root(), DiscussError::DuplicateVote { .. })
    }
}

/// Result type alias for discuss
pub type Result<T> = std::result::Result<T, DiscussError>;
