//! Reusable head contributor component.

use super::contributor::{Contributor, ContributorId, HeadLifecycle};
use crate::types::HeadNode;

/// A contributor that owns its children and tracks its own mount state.
///
/// Framework bindings keep one `Head` per rendered head fragment and forward
/// their lifecycle callbacks to it. Mounting a mounted head, or updating and
/// unmounting an unmounted one, does nothing.
#[derive(Debug, Clone, Default)]
pub struct Head {
    children: Vec<HeadNode>,
    id: Option<ContributorId>,
}

impl Head {
    /// Create an unmounted head with the given children.
    #[must_use]
    pub fn new(children: impl IntoIterator<Item = impl Into<HeadNode>>) -> Self {
        Self {
            children: children.into_iter().map(Into::into).collect(),
            id: None,
        }
    }

    /// The registry id while mounted.
    #[must_use]
    pub fn id(&self) -> Option<ContributorId> {
        self.id
    }

    /// Check if the head is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.id.is_some()
    }

    /// Current children.
    #[must_use]
    pub fn children(&self) -> &[HeadNode] {
        &self.children
    }

    /// Mount into `lifecycle`.
    pub fn mount(&mut self, lifecycle: &mut dyn HeadLifecycle) -> ContributorId {
        if let Some(id) = self.id {
            return id;
        }
        let id = lifecycle.will_mount(&*self);
        self.id = Some(id);
        id
    }

    /// Replace the children, notifying `lifecycle` if mounted.
    pub fn set_children(
        &mut self,
        children: impl IntoIterator<Item = impl Into<HeadNode>>,
        lifecycle: &mut dyn HeadLifecycle,
    ) {
        self.children = children.into_iter().map(Into::into).collect();
        if let Some(id) = self.id {
            lifecycle.did_update(id, &*self);
        }
    }

    /// Unmount from `lifecycle`.
    pub fn unmount(&mut self, lifecycle: &mut dyn HeadLifecycle) {
        if let Some(id) = self.id.take() {
            lifecycle.will_unmount(id);
        }
    }
}

impl Contributor for Head {
    fn head_children(&self) -> Vec<HeadNode> {
        self.children.clone()
    }
}
