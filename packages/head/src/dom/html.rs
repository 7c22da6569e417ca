//! Reading existing head markup into materialized nodes.
//!
//! Used to hydrate a target from server-rendered markup. Markup is parsed
//! with a browser-compatible HTML5 parser, so unclosed void tags, `>` inside
//! attribute values and raw `script`/`style` text read the way a browser
//! reads them. Malformed markup never fails; the parser recovers instead.

use std::collections::BTreeMap;

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::element::{DomContent, DomElement};
use crate::types::TagKind;

/// Head content read from markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHead {
    /// Text of the first `<title>`, if any.
    pub title: Option<String>,
    /// All other elements, in document order.
    pub elements: Vec<DomElement>,
}

/// Local tag name of an element node.
fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Find the first child element with the given tag name.
fn find_child(node: &Handle, tag: &str) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| tag_name(child).is_some_and(|name| name == tag))
        .cloned()
}

/// All element children of a node.
fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// Concatenated text of all descendant text nodes.
fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => push_text(child, out),
            _ => {}
        }
    }
}

/// Parse head markup.
///
/// Accepts a full document, a `<head>` element, or a bare fragment of head
/// elements; the parser places head elements in the head either way.
///
/// # Examples
/// ```
/// use elmo_head::dom::parse_head;
///
/// let parsed = parse_head(r#"<title>a &amp; b</title><meta content="1 > 0"><script>x && y</script>"#);
/// assert_eq!(parsed.title.as_deref(), Some("a & b"));
/// assert_eq!(parsed.elements.len(), 2);
/// assert_eq!(parsed.elements[0].attributes["content"], "1 > 0");
/// ```
#[must_use]
pub fn parse_head(markup: &str) -> ParsedHead {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    if !dom.errors.is_empty() {
        tracing::debug!(errors = dom.errors.len(), "Recovered from errors in head markup");
    }

    let mut parsed = ParsedHead::default();
    let head = find_child(&dom.document, "html").and_then(|html| find_child(&html, "head"));
    let Some(head) = head else {
        return parsed;
    };

    for child in element_children(&head) {
        let Some(name) = tag_name(&child) else {
            continue;
        };
        let tag = TagKind::parse(&name);
        if tag == TagKind::Title {
            if parsed.title.is_none() {
                parsed.title = Some(text_content(&child));
            }
            continue;
        }
        parsed.elements.push(read_element(&child, tag));
    }

    tracing::debug!(
        elements = parsed.elements.len(),
        has_title = parsed.title.is_some(),
        "Parsed head markup"
    );
    parsed
}

fn read_element(node: &Handle, tag: TagKind) -> DomElement {
    let attributes: BTreeMap<String, String> = match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect(),
        _ => BTreeMap::new(),
    };

    let text = text_content(node);
    let content = if text.is_empty() {
        DomContent::Empty
    } else {
        DomContent::Text(text)
    };

    DomElement {
        tag,
        attributes,
        content,
    }
}
