//! Vote ledger

use super::model::{Vote, VoteTally, VoteWeight};
use crate::error::Result;
use crate::store::CommentStore;
use crate::types::{AuthorId, CommentId};
use std::sync::Arc;
use tracing::{debug, info};

/// Records one vote per (comment, author) and answers tally queries.
/// Votes never modify the comment they target.
pub struct VoteLedger {
    store: Arc<dyn CommentStore>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self { store }
    }

    /// Cast a vote. Fails with a `weight` validation error for anything other
    /// than 1 or -1 and with `DuplicateVote` if the author already voted.
    pub fn cast_vote(&self, comment: &CommentId, author: AuthorId, weight: i8) -> Result<Vote> {
        let weight = VoteWeight::try_from(weight)?;
        // Existence check only; the comment itself is not touched.
        self.store.get_comment(comment)?;

        let vote = Vote::new(comment.clone(), author, weight);
        if let Err(e) = self.store.insert_vote(&vote) {
            if e.is_duplicate_vote() {
                debug!(comment = %comment, author = %vote.author, "Rejected duplicate vote");
            }
            return Err(e);
        }

        info!(comment = %comment, weight = i8::from(weight), "Vote cast");
        Ok(vote)
    }

    /// Number of +1 votes
    pub fn up_vote_count(&self, comment: &CommentId) -> Result<usize> {
        Ok(self.tally(comment)?.up)
    }

    /// Number of -1 votes
    pub fn down_vote_count(&self, comment: &CommentId) -> Result<usize> {
        Ok(self.tally(comment)?.down)
    }

    /// Up and down counts together
    pub fn tally(&self, comment: &CommentId) -> Result<VoteTally> {
        let votes = self.store.votes_for(comment)?;
        Ok(VoteTally::from_votes(&votes))
    }

    pub fn has_up_voted(&self, comment: &CommentId, author: &AuthorId) -> Result<bool> {
        Ok(self.vote_of(comment, author)? == Some(VoteWeight::Up))
    }

    pub fn has_down_voted(&self, comment: &CommentId, author: &AuthorId) -> Result<bool> {
        Ok(self.vote_of(comment, author)? == Some(VoteWeight::Down))
    }

    fn vote_of(&self, comment: &CommentId, author: &AuthorId) -> Result<Option<VoteWeight>> {
        Ok(self.store.find_vote(comment, author)?.map(|v| v.weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{Alignment, Comment, Placement};
    use crate::error::DiscussError;
    use crate::store::MemoryStore;
    use crate::types::ResourceRef;

    fn setup() -> (VoteLedger, Comment) {
        let store = Arc::new(MemoryStore::new());
        let comment = Comment::new(
            "Votable",
            AuthorId::from_string("alice"),
            Placement::under_resource(ResourceRef::new("proposal", "1")),
            Alignment::Neutral,
        );
        store.insert_comment(&comment).unwrap();
        (VoteLedger::new(store), comment)
    }

    fn author(name: &str) -> AuthorId {
        AuthorId::from_string(name)
    }

    #[test]
    fn test_up_and_down_counts() {
        let (ledger, comment) = setup();
        ledger.cast_vote(&comment.id, author("a"), 1).unwrap();
        ledger.cast_vote(&comment.id, author("b"), -1).unwrap();

        assert_eq!(ledger.up_vote_count(&comment.id).unwrap(), 1);
        assert_eq!(ledger.down_vote_count(&comment.id).unwrap(), 1);
    }

    #[test]
    fn test_counts_independent_of_order() {
        let (ledger, comment) = setup();
        let weights = [-1, 1, 1, -1, 1];
        for (i, weight) in weights.iter().enumerate() {
            ledger
                .cast_vote(&comment.id, author(&format!("voter-{}", i)), *weight)
                .unwrap();
        }

        let tally = ledger.tally(&comment.id).unwrap();
        assert_eq!(tally, VoteTally { up: 3, down: 2 });
        assert_eq!(tally.score(), 1);
    }

    #[test]
    fn test_duplicate_vote_rejected() {
        let (ledger, comment) = setup();
        ledger.cast_vote(&comment.id, author("a"), 1).unwrap();

        let err = ledger.cast_vote(&comment.id, author("a"), -1).unwrap_err();
        assert!(err.is_duplicate_vote());
        assert!(matches!(err, DiscussError::DuplicateVote { .. }));

        assert_eq!(ledger.up_vote_count(&comment.id).unwrap(), 1);
        assert_eq!(ledger.down_vote_count(&comment.id).unwrap(), 0);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let (ledger, comment) = setup();
        for weight in [0, 2, -2] {
            let err = ledger.cast_vote(&comment.id, author("a"), weight).unwrap_err();
            assert_eq!(err.field(), Some("weight"));
        }
        // A rejected weight does not consume the author's vote
        assert!(ledger.cast_vote(&comment.id, author("a"), 1).is_ok());
    }

    #[test]
    fn test_vote_on_missing_comment() {
        let (ledger, _) = setup();
        let result = ledger.cast_vote(&CommentId::new(), author("a"), 1);
        assert!(matches!(result, Err(DiscussError::CommentNotFound(_))));
    }

    #[test]
    fn test_has_voted() {
        let (ledger, comment) = setup();
        ledger.cast_vote(&comment.id, author("up"), 1).unwrap();
        ledger.cast_vote(&comment.id, author("down"), -1).unwrap();

        assert!(ledger.has_up_voted(&comment.id, &author("up")).unwrap());
        assert!(!ledger.has_down_voted(&comment.id, &author("up")).unwrap());
        assert!(ledger.has_down_voted(&comment.id, &author("down")).unwrap());
        assert!(!ledger.has_up_voted(&comment.id, &author("down")).unwrap());
        assert!(!ledger.has_up_voted(&comment.id, &author("nobody")).unwrap());
        assert!(!ledger.has_down_voted(&comment.id, &author("nobody")).unwrap());
    }
}
