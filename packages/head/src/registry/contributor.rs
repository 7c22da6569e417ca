//! Traits at the seams between the registry and the outside world.

use std::fmt;

use crate::types::{HeadNode, MarkedElement};

/// Identity of a registered contributor.
///
/// Handed out by the registry on mount; two contributors with identical
/// children still get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContributorId(pub(crate) u64);

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contributor#{}", self.0)
    }
}

/// Anything that declares head children.
pub trait Contributor {
    /// The contributor's current children, in declaration order.
    fn head_children(&self) -> Vec<HeadNode>;
}

impl Contributor for [HeadNode] {
    fn head_children(&self) -> Vec<HeadNode> {
        self.to_vec()
    }
}

impl Contributor for Vec<HeadNode> {
    fn head_children(&self) -> Vec<HeadNode> {
        self.clone()
    }
}

/// Lifecycle hooks a component framework calls on contributors.
///
/// Every hook recomputes the merged head before it returns.
pub trait HeadLifecycle {
    /// A contributor is about to mount.
    fn will_mount(&mut self, contributor: &dyn Contributor) -> ContributorId;

    /// A mounted contributor's children changed.
    fn did_update(&mut self, id: ContributorId, contributor: &dyn Contributor);

    /// A contributor is about to unmount. Unknown ids are ignored.
    fn will_unmount(&mut self, id: ContributorId);
}

/// Receiver of every freshly merged head.
///
/// The client implements this to synchronize a live page; the server uses
/// [`Detached`] and drains the registry explicitly instead.
pub trait HeadSink {
    /// Apply the merged head computed after a registry mutation.
    fn apply(&mut self, merged: &[MarkedElement]);
}

/// Sink that ignores merged output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl HeadSink for Detached {
    fn apply(&mut self, _merged: &[MarkedElement]) {}
}
