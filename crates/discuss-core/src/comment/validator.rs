//! Comment validation

use super::model::Alignment;
use crate::config::ThreadConfig;
use crate::error::{DiscussError, Result};

/// Validator for submitted comment fields
#[derive(Debug, Clone)]
pub struct CommentValidator {
    max_length: usize,
    min_length: usize,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self::from_config(&ThreadConfig::default())
    }

    /// Create a validator from thread configuration
    pub fn from_config(config: &ThreadConfig) -> Self {
        Self {
            max_length: config.max_body_length,
            min_length: config.min_body_length.max(1),
        }
    }

    /// Validate the body; length is counted in characters after trimming
    pub fn validate_body(&self, body: &str) -> Result<()> {
        let length = body.trim().chars().count();

        if length == 0 {
            return Err(DiscussError::validation("body", "cannot be empty"));
        }

        if length < self.min_length {
            return Err(DiscussError::validation(
                "body",
                format!("must be at least {} characters", self.min_length),
            ));
        }

        if length > self.max_length {
            return Err(DiscussError::validation(
                "body",
                format!("exceeds maximum length of {} characters", self.max_length),
            ));
        }

        Ok(())
    }

    /// Validate a raw alignment value
    pub fn validate_alignment(&self, alignment: i8) -> Result<Alignment> {
        Alignment::try_from(alignment)
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}
