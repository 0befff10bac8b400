//! Capabilities the engine consumes from the host application
//!
//! The engine never owns resource, identity or moderation records. It asks
//! for them through these traits, injected into the services at construction.

use crate::types::{AuthorId, CommentId, ResourceRef};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// A resource that comment threads can be attached to
pub trait Commentable: Send + Sync {
    /// Reference identifying this resource
    fn resource(&self) -> &ResourceRef;

    /// Whether new comments may be attached right now
    fn accepts_new_comments(&self) -> bool;

    /// Public URL of the resource
    fn url(&self) -> String;

    /// Extra identities to notify when a comment is created in this thread.
    /// `None` means the resource does not implement the capability.
    fn users_to_notify_on_comment_created(&self) -> Option<Vec<AuthorId>> {
        None
    }

    /// Tenant the resource belongs to
    fn organization(&self) -> Option<&str> {
        None
    }
}

/// Looks up commentable resources by reference
pub trait CommentableResolver: Send + Sync {
    /// Whether resources of this kind support comments at all
    fn supports_comments(&self, kind: &str) -> bool;

    /// Resolve a resource, `None` if it does not exist
    fn resolve(&self, resource: &ResourceRef) -> Option<Arc<dyn Commentable>>;
}

/// Moderation state lookup; hidden comments are skipped by thread queries
pub trait ModerationState: Send + Sync {
    fn is_hidden(&self, comment: &CommentId) -> bool;
}

/// Moderation backend that never hides anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModeration;

impl ModerationState for NoModeration {
    fn is_hidden(&self, _comment: &CommentId) -> bool {
        false
    }
}

/// In-memory set of hidden comments
#[derive(Debug, Default)]
pub struct HiddenSet {
    hidden: RwLock<HashSet<CommentId>>,
}

impl HiddenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide a comment
    pub fn hide(&self, comment: &CommentId) {
        self.hidden
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(comment.clone());
    }

    /// Make a hidden comment visible again
    pub fn unhide(&self, comment: &CommentId) -> bool {
        self.hidden
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(comment)
    }
}

impl ModerationState for HiddenSet {
    fn is_hidden(&self, comment: &CommentId) -> bool {
        self.hidden
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(comment)
    }
}

/// Simple commentable resource held in memory
#[derive(Debug)]
pub struct StaticResource {
    resource: ResourceRef,
    url: String,
    accepts: AtomicBool,
    notify: Option<Vec<AuthorId>>,
    organization: Option<String>,
}

impl StaticResource {
    /// Create an open resource with the given URL
    pub fn new(resource: ResourceRef, url: impl Into<String>) -> Self {
        Self {
            resource,
            url: url.into(),
            accepts: AtomicBool::new(true),
            notify: None,
            organization: None,
        }
    }

    /// Set the identities reported for new-comment notifications
    pub fn with_notify(mut self, users: Vec<AuthorId>) -> Self {
        self.notify = Some(users);
        self
    }

    /// Set the owning organization
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Open or close the resource for new comments
    pub fn set_accepts_new_comments(&self, accepts: bool) {
        self.accepts.store(accepts, Ordering::SeqCst);
    }
}

impl Commentable for StaticResource {
    fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    fn accepts_new_comments(&self) -> bool {
        self.accepts.load(Ordering::SeqCst)
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn users_to_notify_on_comment_created(&self) -> Option<Vec<AuthorId>> {
        self.notify.clone()
    }

    fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }
}

/// Resolver over a fixed, in-memory set of resources
#[derive(Default)]
pub struct StaticResolver {
    kinds: HashSet<String>,
    resources: RwLock<HashMap<ResourceRef, Arc<StaticResource>>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource kind as comment-enabled
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds.insert(kind.into());
        self
    }

    /// Register a resource; returns a handle that can later close it
    pub fn register(&self, resource: StaticResource) -> Arc<StaticResource> {
        let resource = Arc::new(resource);
        self.resources
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(resource.resource.clone(), Arc::clone(&resource));
        resource
    }
}

impl CommentableResolver for StaticResolver {
    fn supports_comments(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    fn resolve(&self, resource: &ResourceRef) -> Option<Arc<dyn Commentable>> {
        if !self.supports_comments(&resource.kind) {
            return None;
        }
        self.resources
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(resource)
            .map(|r| Arc::clone(r) as Arc<dyn Commentable>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_set() {
        let hidden = HiddenSet::new();
        let id = CommentId::new();
        assert!(!hidden.is_hidden(&id));

        hidden.hide(&id);
        assert!(hidden.is_hidden(&id));

        assert!(hidden.unhide(&id));
        assert!(!hidden.is_hidden(&id));
    }

    #[test]
    fn test_static_resolver() {
        let resolver = StaticResolver::new().with_kind("proposal");
        let handle = resolver.register(StaticResource::new(
            ResourceRef::new("proposal", "1"),
            "https://example.org/proposals/1",
        ));

        let found = resolver.resolve(&ResourceRef::new("proposal", "1")).unwrap();
        assert!(found.accepts_new_comments());
        assert_eq!(found.url(), "https://example.org/proposals/1");
        assert!(found.users_to_notify_on_comment_created().is_none());

        handle.set_accepts_new_comments(false);
        assert!(!found.accepts_new_comments());

        assert!(resolver.resolve(&ResourceRef::new("proposal", "2")).is_none());
        assert!(!resolver.supports_comments("meeting"));
    }

    #[test]
    fn test_unsupported_kind_never_resolves() {
        let resolver = StaticResolver::new();
        resolver.register(StaticResource::new(ResourceRef::new("page", "1"), "/pages/1"));
        assert!(resolver.resolve(&ResourceRef::new("page", "1")).is_none());
    }

    #[test]
    fn test_static_resource_organization() {
        let resource = StaticResource::new(ResourceRef::new("proposal", "1"), "/p/1")
            .with_organization("org-1");
        assert_eq!(resource.organization(), Some("org-1"));
    }
}
