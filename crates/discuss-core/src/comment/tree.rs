//! Comment tree: creation, placement checks and thread queries

use super::model::{Comment, Placement};
use super::validator::CommentValidator;
use crate::capability::{Commentable, CommentableResolver, ModerationState};
use crate::config::ThreadConfig;
use crate::error::{DiscussError, Result};
use crate::store::CommentStore;
use crate::types::{AuthorId, CommentId, CommentableRef, ResourceRef};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Repository of threaded comments
pub struct CommentTree {
    store: Arc<dyn CommentStore>,
    resolver: Arc<dyn CommentableResolver>,
    moderation: Arc<dyn ModerationState>,
    validator: CommentValidator,
    max_depth: u32,
}

impl CommentTree {
    /// Create a comment tree over the given collaborators
    pub fn new(
        store: Arc<dyn CommentStore>,
        resolver: Arc<dyn CommentableResolver>,
        moderation: Arc<dyn ModerationState>,
        config: &ThreadConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            moderation,
            validator: CommentValidator::from_config(config),
            max_depth: config.max_depth,
        }
    }

    /// Deepest depth that still accepts replies
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Create a comment.
    ///
    /// Checks run in order: body, placement, alignment. Depth and root are
    /// computed here once and never recomputed.
    pub fn create(
        &self,
        body: impl Into<String>,
        author: AuthorId,
        commentable: CommentableRef,
        alignment: i8,
    ) -> Result<Comment> {
        let body = body.into();
        self.validator.validate_body(&body)?;

        let placement = self.placement_for(&commentable)?;
        let alignment = self.validator.validate_alignment(alignment)?;

        let comment = Comment::new(body, author, placement, alignment);
        self.store.insert_comment(&comment)?;

        info!(
            comment = %comment.id,
            root = %comment.root_commentable,
            depth = comment.depth,
            "Created comment"
        );
        Ok(comment)
    }

    /// Load a comment by ID
    pub fn get(&self, id: &CommentId) -> Result<Comment> {
        self.store.get_comment(id)
    }

    /// Whether `comment` can receive replies: it must be shallower than the
    /// depth ceiling and its thread root must still accept comments.
    pub fn accepts_new_comments(&self, comment: &Comment) -> Result<bool> {
        if !comment.has_reply_room(self.max_depth) {
            return Ok(false);
        }
        Ok(self.root_of(comment)?.accepts_new_comments())
    }

    /// Resolved root resource of a comment's thread
    pub fn root_of(&self, comment: &Comment) -> Result<Arc<dyn Commentable>> {
        self.resolve(&comment.root_commentable)
    }

    /// Number of visible direct replies
    pub fn thread_count_of(&self, comment: &Comment) -> Result<usize> {
        Ok(self.threads_of(comment)?.len())
    }

    /// Visible direct replies, oldest first
    pub fn threads_of(&self, comment: &Comment) -> Result<Vec<Comment>> {
        let children = self.store.children_of(&comment.id)?;
        Ok(self.visible_sorted(children))
    }

    /// Visible top-level comments of a resource, oldest first
    pub fn comments_on(&self, resource: &ResourceRef) -> Result<Vec<Comment>> {
        let comments = self
            .store
            .comments_under_roots(std::slice::from_ref(resource))?
            .into_iter()
            .filter(|c| c.is_top_level())
            .collect();
        Ok(self.visible_sorted(comments))
    }

    /// Distinct authors of comments at any depth in the given resources' threads.
    ///
    /// Returns `None` when any of the resources is of a kind that does not
    /// support comments, which is not the same as having no commenters.
    pub fn commentator_ids_in(
        &self,
        resources: &[ResourceRef],
    ) -> Result<Option<BTreeSet<AuthorId>>> {
        if let Some(unsupported) = resources
            .iter()
            .find(|r| !self.resolver.supports_comments(&r.kind))
        {
            debug!(kind = %unsupported.kind, "Commentator lookup on non-commentable kind");
            return Ok(None);
        }

        let authors = self
            .store
            .comments_under_roots(resources)?
            .into_iter()
            .map(|c| c.author)
            .collect();
        Ok(Some(authors))
    }

    /// Deep link to a comment within its root resource, for moderation
    pub fn reported_content_url(&self, comment: &Comment) -> Result<String> {
        let url = self.root_of(comment)?.url();
        let separator = if url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}commentId={}", url, separator, comment.id))
    }

    /// Ancestors of a comment, nearest first
    pub fn ancestors_of(&self, comment: &Comment) -> Result<Vec<Comment>> {
        let mut ancestors = Vec::with_capacity(comment.depth as usize);
        let mut next = comment.parent_id().cloned();
        while let Some(id) = next {
            let parent = self.store.get_comment(&id)?;
            next = parent.parent_id().cloned();
            ancestors.push(parent);
        }
        Ok(ancestors)
    }

    fn placement_for(&self, commentable: &CommentableRef) -> Result<Placement> {
        match commentable {
            CommentableRef::Resource(resource) => {
                let root = self.resolve(resource)?;
                if !root.accepts_new_comments() {
                    return Err(DiscussError::validation(
                        "commentable",
                        format!("{} does not accept new comments", resource),
                    ));
                }
                Ok(Placement::under_resource(resource.clone()))
            }
            CommentableRef::Comment { id } => {
                let parent = self.store.get_comment(id)?;
                if !parent.has_reply_room(self.max_depth) {
                    return Err(DiscussError::validation(
                        "commentable",
                        format!(
                            "comment {} is at depth {} and cannot be replied to (max depth {})",
                            parent.id, parent.depth, self.max_depth
                        ),
                    ));
                }
                if !self.resolve(&parent.root_commentable)?.accepts_new_comments() {
                    return Err(DiscussError::validation(
                        "commentable",
                        format!("{} does not accept new comments", parent.root_commentable),
                    ));
                }
                Ok(Placement::under_comment(&parent))
            }
        }
    }

    fn resolve(&self, resource: &ResourceRef) -> Result<Arc<dyn Commentable>> {
        if !self.resolver.supports_comments(&resource.kind) {
            return Err(DiscussError::CapabilityUnsupported(resource.kind.clone()));
        }
        self.resolver
            .resolve(resource)
            .ok_or_else(|| DiscussError::ResourceNotFound(resource.to_string()))
    }

    fn visible_sorted(&self, mut comments: Vec<Comment>) -> Vec<Comment> {
        comments.retain(|c| !self.moderation.is_hidden(&c.id));
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        comments
    }
}
