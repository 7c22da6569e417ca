//! In-memory head target.

use super::element::DomElement;
use super::html::parse_head;
use crate::render::{HeadRenderer, MarkupRenderer};
use crate::sync::{HeadTarget, NodeId};
use crate::types::TagKind;

/// A page head held in memory: a title slot plus an ordered node list.
///
/// Behaves like a live head for synchronization, so it serves tests, the
/// CLI, and any host that mirrors its head outside a browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryHead {
    title: String,
    nodes: Vec<(NodeId, DomElement)>,
    next_id: u64,
}

impl MemoryHead {
    /// Create an empty head.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a head from existing markup (for hydration).
    #[must_use]
    pub fn from_markup(markup: &str) -> Self {
        let parsed = parse_head(markup);
        let mut head = Self::new();
        if let Some(title) = parsed.title {
            head.title = title;
        }
        for element in parsed.elements {
            head.push(element);
        }
        head
    }

    /// Append a node, marked or not.
    pub fn push(&mut self, element: DomElement) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push((id, element));
        id
    }

    /// All nodes in document order.
    pub fn elements(&self) -> impl Iterator<Item = &DomElement> {
        self.nodes.iter().map(|(_, element)| element)
    }

    /// Number of nodes (the title slot is not a node).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if there are no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render the head as `<head>...</head>` markup.
    ///
    /// A non-empty title slot is emitted first as `<title>`.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let renderer = MarkupRenderer;
        let mut out = String::from("<head>");
        if !self.title.is_empty() {
            renderer.render_element(&DomElement::new(TagKind::Title).with_text(&self.title), &mut out);
        }
        for (_, element) in &self.nodes {
            renderer.render_element(element, &mut out);
        }
        out.push_str("</head>");
        out
    }
}

impl HeadTarget for MemoryHead {
    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn marked_nodes(&self, kind: &TagKind, marker: &str) -> Vec<(NodeId, DomElement)> {
        self.nodes
            .iter()
            .filter(|(_, element)| element.tag == *kind && element.has_class(marker))
            .cloned()
            .collect()
    }

    fn remove(&mut self, node: NodeId) {
        self.nodes.retain(|(id, _)| *id != node);
    }

    fn append(&mut self, element: DomElement) -> NodeId {
        self.push(element)
    }
}
