//! Ordered registry of mounted contributors.

use super::contributor::{Contributor, ContributorId, Detached, HeadLifecycle, HeadSink};
use crate::aggregate::aggregate;
use crate::types::{HeadNode, MarkedElement};

struct Entry {
    id: ContributorId,
    children: Vec<HeadNode>,
}

/// Registry of active contributors in mount order.
///
/// Each registry is an explicitly owned value: a server creates one per
/// render cycle, a client one per page. Every mutation recomputes the merged
/// head synchronously and hands it to the sink before returning.
pub struct HeadRegistry<S = Detached> {
    entries: Vec<Entry>,
    next_id: u64,
    merged: Vec<MarkedElement>,
    sink: S,
}

impl HeadRegistry<Detached> {
    /// Create an empty registry without a sink (server side).
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Detached)
    }
}

impl Default for HeadRegistry<Detached> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: HeadSink> HeadRegistry<S> {
    /// Create an empty registry that reports every merged head to `sink`.
    #[must_use]
    pub fn with_sink(sink: S) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            merged: Vec::new(),
            sink,
        }
    }

    /// Register a contributor at the end of the mount order.
    pub fn register(&mut self, contributor: &(impl Contributor + ?Sized)) -> ContributorId {
        let id = ContributorId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            children: contributor.head_children(),
        });
        tracing::debug!(%id, contributors = self.entries.len(), "Registered head contributor");
        self.recompute();
        id
    }

    /// Replace the children of a registered contributor.
    ///
    /// Returns `false` (and changes nothing) if `id` is not registered.
    pub fn update(&mut self, id: ContributorId, contributor: &(impl Contributor + ?Sized)) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            tracing::debug!(%id, "Update for unregistered head contributor ignored");
            return false;
        };
        entry.children = contributor.head_children();
        self.recompute();
        true
    }

    /// Remove a contributor, keeping the order of the others.
    ///
    /// Returns `false` (and changes nothing) if `id` is not registered.
    pub fn unregister(&mut self, id: ContributorId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            tracing::debug!(%id, "Unregister for unknown head contributor ignored");
            return false;
        };
        self.entries.remove(index);
        tracing::debug!(%id, contributors = self.entries.len(), "Unregistered head contributor");
        self.recompute();
        true
    }

    /// Merge the current contributors and clear the registry.
    ///
    /// Contributors registered afterwards start from an empty registry, so
    /// consecutive render cycles never see each other's declarations. The
    /// sink is not notified.
    pub fn drain(&mut self) -> Vec<MarkedElement> {
        let merged = self.compute();
        tracing::debug!(
            contributors = self.entries.len(),
            elements = merged.len(),
            "Drained head registry"
        );
        self.entries.clear();
        self.merged.clear();
        merged
    }

    /// The merged head as of the last mutation.
    #[must_use]
    pub fn merged(&self) -> &[MarkedElement] {
        &self.merged
    }

    /// Check if a contributor is registered.
    #[must_use]
    pub fn contains(&self, id: ContributorId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of registered contributors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no contributor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a reference to the sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the registry and return its sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn compute(&self) -> Vec<MarkedElement> {
        aggregate(self.entries.iter().map(|e| e.children.as_slice()))
    }

    fn recompute(&mut self) {
        self.merged = self.compute();
        self.sink.apply(&self.merged);
    }
}

impl<S: HeadSink> HeadLifecycle for HeadRegistry<S> {
    fn will_mount(&mut self, contributor: &dyn Contributor) -> ContributorId {
        self.register(contributor)
    }

    fn did_update(&mut self, id: ContributorId, contributor: &dyn Contributor) {
        self.update(id, contributor);
    }

    fn will_unmount(&mut self, id: ContributorId) {
        self.unregister(id);
    }
}
