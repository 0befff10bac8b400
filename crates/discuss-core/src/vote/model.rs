//! Vote data models

use crate::error::{DiscussError, Result};
use crate::types::{AuthorId, CommentId, VoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One participant's vote on one comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub comment: CommentId,
    pub author: AuthorId,
    pub weight: VoteWeight,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(comment: CommentId, author: AuthorId, weight: VoteWeight) -> Self {
        Self {
            id: VoteId::new(),
            comment,
            author,
            weight,
            created_at: Utc::now(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.weight == VoteWeight::Up
    }

    pub fn is_down(&self) -> bool {
        self.weight == VoteWeight::Down
    }
}

/// Vote direction, persisted as +1 / -1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum VoteWeight {
    Up,
    Down,
}

impl TryFrom<i8> for VoteWeight {
    type Error = DiscussError;

    fn try_from(value: i8) -> Result<Self> {
        match value {
            1 => Ok(VoteWeight::Up),
            -1 => Ok(VoteWeight::Down),
            other => Err(DiscussError::validation(
                "weight",
                format!("must be 1 or -1, got {}", other),
            )),
        }
    }
}

impl From<VoteWeight> for i8 {
    fn from(weight: VoteWeight) -> Self {
        match weight {
            VoteWeight::Up => 1,
            VoteWeight::Down => -1,
        }
    }
}

/// Up and down counts for a comment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub up: usize,
    pub down: usize,
}

impl VoteTally {
    /// Count a set of votes
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        votes.into_iter().fold(Self::default(), |mut tally, vote| {
            match vote.weight {
                VoteWeight::Up => tally.up += 1,
                VoteWeight::Down => tally.down += 1,
            }
            tally
        })
    }

    /// Up minus down
    pub fn score(&self) -> i64 {
        self.up as i64 - self.down as i64
    }
}
