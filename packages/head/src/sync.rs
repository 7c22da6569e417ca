//! Client-side synchronization of a live head with the merged declarations.
//!
//! Only nodes carrying the marker class are ever removed; everything else in
//! the head belongs to someone else. For each synced kind the existing
//! marked nodes are matched against the desired nodes by structural
//! equality, as a multiset: unmatched existing nodes are removed, unmatched
//! desired nodes are appended. Identical nodes are left in place, so style,
//! script and link elements are never refetched or reflowed needlessly, and
//! a second sync with the same input changes nothing.

use crate::config::{MARKER_CLASS, SYNCED_KINDS};
use crate::dom::DomElement;
use crate::registry::HeadSink;
use crate::types::{MarkedElement, TagKind};

/// Handle of a node in a [`HeadTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A mutable page head.
pub trait HeadTarget {
    /// Current page title.
    fn title(&self) -> &str;

    /// Replace the page title.
    fn set_title(&mut self, title: &str);

    /// Nodes of `kind` whose class list contains `marker`, in document order.
    fn marked_nodes(&self, kind: &TagKind, marker: &str) -> Vec<(NodeId, DomElement)>;

    /// Remove a node.
    fn remove(&mut self, node: NodeId);

    /// Append a node at the end of the head.
    fn append(&mut self, element: DomElement) -> NodeId;
}

/// One mutation of a head target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadPatch {
    /// Write the page title.
    SetTitle(String),
    /// Remove a marked node.
    Remove { node: NodeId, element: DomElement },
    /// Append a node.
    Append(DomElement),
}

/// Ordered list of patches bringing a target in line with a merged head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    patches: Vec<HeadPatch>,
}

impl SyncPlan {
    /// The patches, in application order.
    #[must_use]
    pub fn patches(&self) -> &[HeadPatch] {
        &self.patches
    }

    /// Check if the target is already in sync.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Number of removals.
    #[must_use]
    pub fn removals(&self) -> usize {
        self.patches
            .iter()
            .filter(|p| matches!(p, HeadPatch::Remove { .. }))
            .count()
    }

    /// Number of additions.
    #[must_use]
    pub fn additions(&self) -> usize {
        self.patches
            .iter()
            .filter(|p| matches!(p, HeadPatch::Append(_)))
            .count()
    }

    /// The new title, if the plan writes one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.patches.iter().find_map(|p| match p {
            HeadPatch::SetTitle(title) => Some(title.as_str()),
            _ => None,
        })
    }
}

/// Compute the patches that bring `target` in line with `merged`.
///
/// The title is written only when a title is declared and differs from the
/// current one; an absent title never clears the page title. For every other
/// kind, removals come before additions and additions keep declaration order.
#[must_use]
pub fn plan_sync(merged: &[MarkedElement], target: &impl HeadTarget) -> SyncPlan {
    let mut patches = Vec::new();

    if let Some(title) = merged.iter().find(|el| el.tag == TagKind::Title) {
        let text = title.text_content();
        if text != target.title() {
            patches.push(HeadPatch::SetTitle(text));
        }
    }

    for kind in &SYNCED_KINDS {
        let mut existing = target.marked_nodes(kind, MARKER_CLASS);
        let mut additions = Vec::new();

        for desired in merged.iter().filter(|el| el.tag == *kind) {
            let desired = DomElement::materialize(desired);
            match existing.iter().position(|(_, node)| *node == desired) {
                Some(index) => {
                    existing.remove(index);
                }
                None => additions.push(HeadPatch::Append(desired)),
            }
        }

        patches.extend(
            existing
                .into_iter()
                .map(|(node, element)| HeadPatch::Remove { node, element }),
        );
        patches.extend(additions);
    }

    SyncPlan { patches }
}

/// Apply a plan to `target`.
pub fn apply_plan(plan: &SyncPlan, target: &mut impl HeadTarget) {
    for patch in &plan.patches {
        match patch {
            HeadPatch::SetTitle(title) => target.set_title(title),
            HeadPatch::Remove { node, .. } => target.remove(*node),
            HeadPatch::Append(element) => {
                target.append(element.clone());
            }
        }
    }
}

/// Synchronize `target` with `merged` and return the applied plan.
pub fn sync(merged: &[MarkedElement], target: &mut impl HeadTarget) -> SyncPlan {
    let plan = plan_sync(merged, target);
    apply_plan(&plan, target);
    tracing::debug!(
        removed = plan.removals(),
        added = plan.additions(),
        title_changed = plan.title().is_some(),
        "Synchronized head"
    );
    plan
}

/// Registry sink that keeps a live head in sync on every mutation.
#[derive(Debug, Default)]
pub struct ClientSync<T> {
    target: T,
    last: SyncPlan,
}

impl<T: HeadTarget> ClientSync<T> {
    /// Wrap a target.
    #[must_use]
    pub fn new(target: T) -> Self {
        Self {
            target,
            last: SyncPlan::default(),
        }
    }

    /// Get the target.
    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Get the target mutably (for changes made outside this crate).
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// The plan applied by the most recent sync.
    #[must_use]
    pub fn last_plan(&self) -> &SyncPlan {
        &self.last
    }

    /// Unwrap the target.
    #[must_use]
    pub fn into_target(self) -> T {
        self.target
    }
}

impl<T: HeadTarget> HeadSink for ClientSync<T> {
    fn apply(&mut self, merged: &[MarkedElement]) {
        self.last = sync(merged, &mut self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::dom::{DomContent, MemoryHead};
    use crate::types::{ElementDescriptor, HeadNode};

    fn merge(elements: Vec<ElementDescriptor>) -> Vec<MarkedElement> {
        let nodes: Vec<HeadNode> = elements.into_iter().map(HeadNode::from).collect();
        aggregate([nodes.as_slice()])
    }

    #[test]
    fn test_empty_merge_on_empty_target() {
        let mut head = MemoryHead::new();
        let plan = sync(&[], &mut head);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_title_is_added() {
        let mut head = MemoryHead::new();
        let plan = sync(&merge(vec![ElementDescriptor::title("hi")]), &mut head);

        assert_eq!(plan.title(), Some("hi"));
        assert_eq!(head.title(), "hi");
        assert!(head.is_empty());
    }

    #[test]
    fn test_same_title_is_not_rewritten() {
        let mut head = MemoryHead::new();
        head.set_title("hi");
        let plan = plan_sync(&merge(vec![ElementDescriptor::title("hi")]), &head);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_absent_title_keeps_external_title() {
        let mut head = MemoryHead::new();
        head.set_title("external");
        sync(&[], &mut head);
        assert_eq!(head.title(), "external");
    }

    #[test]
    fn test_sync_is_idempotent() {
        let merged = merge(vec![
            ElementDescriptor::title("t"),
            ElementDescriptor::meta([("name", "a"), ("content", "1")]),
            ElementDescriptor::new("link").with_attribute("rel", "icon"),
            ElementDescriptor::new("script").with_raw_markup("var a = 1 < 2;"),
        ]);
        let mut head = MemoryHead::new();

        let first = sync(&merged, &mut head);
        assert_eq!(first.additions(), 3);

        let second = sync(&merged, &mut head);
        assert!(second.is_empty());
        assert_eq!(head.len(), 3);
    }

    #[test]
    fn test_changed_meta_is_replaced_not_mutated() {
        let mut head = MemoryHead::new();
        let old = head.push(
            DomElement::new("meta")
                .with_attribute("name", "og:title")
                .with_attribute("content", "old")
                .with_attribute("class", MARKER_CLASS),
        );

        let merged = merge(vec![ElementDescriptor::meta([
            ("name", "og:title"),
            ("content", "new"),
        ])]);
        let plan = sync(&merged, &mut head);

        assert_eq!(plan.removals(), 1);
        assert_eq!(plan.additions(), 1);
        assert!(matches!(plan.patches()[0], HeadPatch::Remove { node, .. } if node == old));

        let metas: Vec<&DomElement> = head.elements().collect();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].attributes["content"], "new");
    }

    #[test]
    fn test_unmarked_nodes_are_untouched() {
        let mut head = MemoryHead::new();
        let external = DomElement::new("meta")
            .with_attribute("name", "description")
            .with_attribute("content", "external");
        head.push(external.clone());

        let plan = sync(
            &merge(vec![ElementDescriptor::meta([("name", "description")])]),
            &mut head,
        );
        assert_eq!(plan.removals(), 0);
        assert_eq!(head.len(), 2);
        assert_eq!(head.elements().next(), Some(&external));

        sync(&[], &mut head);
        assert_eq!(head.len(), 1);
        assert_eq!(head.elements().next(), Some(&external));
    }

    #[test]
    fn test_duplicates_match_as_multiset() {
        let script = ElementDescriptor::new("script").with_text("track()");
        let merged = merge(vec![script.clone(), script]);
        let mut head = MemoryHead::new();
        sync(&merged, &mut head);
        assert_eq!(head.len(), 2);

        let single = merge(vec![ElementDescriptor::new("script").with_text("track()")]);
        let plan = sync(&single, &mut head);
        assert_eq!(plan.removals(), 1);
        assert_eq!(plan.additions(), 0);
        assert_eq!(head.len(), 1);
    }

    #[test]
    fn test_additions_keep_declaration_order() {
        let merged = merge(vec![
            ElementDescriptor::new("style").with_text("a"),
            ElementDescriptor::new("style").with_text("b"),
            ElementDescriptor::new("style").with_text("c"),
        ]);
        let mut head = MemoryHead::new();
        sync(&merged, &mut head);

        let styles: Vec<String> = head
            .elements()
            .map(|el| match &el.content {
                DomContent::Text(text) => text.clone(),
                other => panic!("unexpected content {other:?}"),
            })
            .collect();
        assert_eq!(styles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_client_sync_sink() {
        let mut client = ClientSync::new(MemoryHead::new());
        client.apply(&merge(vec![ElementDescriptor::title("hi")]));
        assert_eq!(client.target().title(), "hi");
        assert_eq!(client.last_plan().title(), Some("hi"));
    }
}
