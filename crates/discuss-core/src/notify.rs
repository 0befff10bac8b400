//! Who to notify when a comment is created

use crate::comment::{Comment, CommentTree};
use crate::error::Result;
use crate::types::AuthorId;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Computes notification recipients for new comments
pub struct NotificationRecipients {
    tree: Arc<CommentTree>,
}

impl NotificationRecipients {
    pub fn new(tree: Arc<CommentTree>) -> Self {
        Self { tree }
    }

    /// Author of the comment, authors of every comment above it, and the
    /// identities the root resource asks to notify.
    pub fn recipients_for(&self, comment: &Comment) -> Result<BTreeSet<AuthorId>> {
        let mut recipients = BTreeSet::new();
        recipients.insert(comment.author.clone());
        recipients.extend(
            self.tree
                .ancestors_of(comment)?
                .into_iter()
                .map(|ancestor| ancestor.author),
        );

        match self.tree.root_of(comment)?.users_to_notify_on_comment_created() {
            Some(users) => recipients.extend(users),
            None => debug!(
                root = %comment.root_commentable,
                "Root resource does not report users to notify"
            ),
        }

        Ok(recipients)
    }
}
