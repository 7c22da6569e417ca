//! Core data types: head element descriptors and their content.
//!
//! Descriptors are plain values. They carry no identity and know nothing
//! about a live page; the registry and synchronizer give them meaning.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::config::{dom_attribute_name, has_class_token, CLASS_ATTRIBUTE};

/// Kind of a head element, derived from its tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagKind {
    Title,
    Meta,
    Base,
    Link,
    Style,
    Script,
    /// Any tag that does not belong in the head (stored lower-case).
    Other(String),
}

impl TagKind {
    /// Parse a tag name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "title" => Self::Title,
            "meta" => Self::Meta,
            "base" => Self::Base,
            "link" => Self::Link,
            "style" => Self::Style,
            "script" => Self::Script,
            _ => Self::Other(lower),
        }
    }

    /// Get the tag name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Meta => "meta",
            Self::Base => "base",
            Self::Link => "link",
            Self::Style => "style",
            Self::Script => "script",
            Self::Other(name) => name,
        }
    }

    /// Whether elements of this kind are placed in the head.
    #[must_use]
    pub fn is_managed(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Whether at most one element of this kind may survive deduplication.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        matches!(self, Self::Title | Self::Base)
    }

    /// Whether the element never has content (serialized self-closing).
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Meta | Self::Base | Self::Link)
    }
}

impl From<&str> for TagKind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for TagKind {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<TagKind> for String {
    fn from(kind: TagKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute mapping of a descriptor, keyed by internal attribute name.
///
/// Ordered by key so that two descriptors declaring the same attributes in a
/// different order compare equal.
pub type Attributes = BTreeMap<String, String>;

/// Scalar value accepted where declarations expect text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Flag(b) => b.to_string(),
        }
    }

    /// Attribute value: `true` is a present boolean attribute, `false` is absent.
    fn into_attribute(self) -> Option<String> {
        match self {
            Self::Flag(true) => Some(String::new()),
            Self::Flag(false) => None,
            other => Some(other.into_text()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttributes {
    Map(BTreeMap<String, Option<Scalar>>),
    Malformed(IgnoredAny),
}

/// Deserialize attributes, treating anything that is not a flat map as empty.
fn lenient_attributes<'de, D>(deserializer: D) -> std::result::Result<Attributes, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawAttributes::deserialize(deserializer)? {
        RawAttributes::Map(map) => map
            .into_iter()
            .filter_map(|(name, value)| value.and_then(Scalar::into_attribute).map(|v| (name, v)))
            .collect(),
        RawAttributes::Malformed(_) => {
            tracing::debug!("Malformed attributes on head element, treating as empty");
            Attributes::new()
        }
    })
}

/// One element of a mixed content list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text(String),
    Element(ElementDescriptor),
}

impl ContentPart {
    fn push_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => out.push_str(&element.content.text()),
        }
    }
}

/// Content of a head element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawContent")]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Parts(Vec<ContentPart>),
    /// Pre-rendered markup injected verbatim (inner HTML).
    RawMarkup { raw_markup: String },
}

impl Content {
    /// Whether there is no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Flattened text content.
    ///
    /// Text parts are joined without separator and nested elements contribute
    /// their own text. Raw markup flattens to its payload unchanged.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => {
                let mut out = String::new();
                for part in parts {
                    part.push_text(&mut out);
                }
                out
            }
            Self::RawMarkup { raw_markup } => raw_markup.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPart {
    Scalar(Scalar),
    Element(ElementDescriptor),
    Opaque(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Empty,
    Scalar(Scalar),
    Parts(Vec<RawPart>),
    Raw { raw_markup: String },
}

impl From<RawContent> for Content {
    fn from(raw: RawContent) -> Self {
        match raw {
            RawContent::Empty => Self::Empty,
            RawContent::Scalar(scalar) => Self::Text(scalar.into_text()),
            RawContent::Parts(parts) => Self::Parts(
                parts
                    .into_iter()
                    .filter_map(|part| match part {
                        RawPart::Scalar(scalar) => Some(ContentPart::Text(scalar.into_text())),
                        RawPart::Element(element) => Some(ContentPart::Element(element)),
                        RawPart::Opaque(_) => None,
                    })
                    .collect(),
            ),
            RawContent::Raw { raw_markup } => Self::RawMarkup { raw_markup },
        }
    }
}

/// Immutable description of one head element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Tag kind.
    pub tag: TagKind,

    /// Attributes keyed by internal name (`className`, `httpEquiv`, ...).
    #[serde(
        default,
        deserialize_with = "lenient_attributes",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub attributes: Attributes,

    /// Element content.
    #[serde(default, skip_serializing_if = "Content::is_empty")]
    pub content: Content,
}

impl ElementDescriptor {
    /// Create a descriptor without attributes or content.
    #[must_use]
    pub fn new(tag: impl Into<TagKind>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            content: Content::Empty,
        }
    }

    /// Create a title descriptor.
    #[must_use]
    pub fn title(text: impl Into<String>) -> Self {
        Self::new(TagKind::Title).with_text(text)
    }

    /// Create a meta descriptor from attribute pairs.
    #[must_use]
    pub fn meta<K, V>(attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        attributes
            .into_iter()
            .fold(Self::new(TagKind::Meta), |el, (k, v)| el.with_attribute(k, v))
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    /// Set mixed content.
    #[must_use]
    pub fn with_parts(mut self, parts: Vec<ContentPart>) -> Self {
        self.content = Content::Parts(parts);
        self
    }

    /// Set raw markup content.
    #[must_use]
    pub fn with_raw_markup(mut self, markup: impl Into<String>) -> Self {
        self.content = Content::RawMarkup {
            raw_markup: markup.into(),
        };
        self
    }

    /// Look up an attribute by its serialized name (`class`, `http-equiv`, ...).
    #[must_use]
    pub fn dom_attribute(&self, dom_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| dom_attribute_name(name) == dom_name)
            .map(|(_, value)| value.as_str())
    }

    /// Flattened text content.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.content.text()
    }
}

/// A child declared by a contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawNode")]
pub enum HeadNode {
    /// Stray text between elements.
    Text(String),
    /// A head element declaration.
    Element(ElementDescriptor),
    /// A shape with neither tag nor text.
    Opaque,
}

impl HeadNode {
    /// Get the element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&ElementDescriptor> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<ElementDescriptor> for HeadNode {
    fn from(element: ElementDescriptor) -> Self {
        Self::Element(element)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNode {
    Text(String),
    Element(ElementDescriptor),
    Opaque(IgnoredAny),
}

impl From<RawNode> for HeadNode {
    fn from(raw: RawNode) -> Self {
        match raw {
            RawNode::Text(text) => Self::Text(text),
            RawNode::Element(element) => Self::Element(element),
            RawNode::Opaque(_) => Self::Opaque,
        }
    }
}

/// A descriptor stamped with the synchronization marker.
///
/// Only [`MarkedElement::stamp`] creates one, so every value of this type is
/// guaranteed to carry the marker in its class attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MarkedElement(ElementDescriptor);

impl MarkedElement {
    /// Append `marker` to the element's class attribute.
    ///
    /// An existing class (under either `className` or `class`) is kept and
    /// the marker appended; a marker already present is not repeated. When
    /// both spellings are present their class lists are joined under the
    /// first one, so that the serialized element still carries the marker.
    #[must_use]
    pub fn stamp(mut element: ElementDescriptor, marker: &str) -> Self {
        let keys: Vec<String> = element
            .attributes
            .keys()
            .filter(|name| dom_attribute_name(name) == CLASS_ATTRIBUTE)
            .cloned()
            .collect();
        let key = keys
            .first()
            .cloned()
            .unwrap_or_else(|| "className".to_string());

        let mut classes = keys
            .iter()
            .filter_map(|name| element.attributes.remove(name))
            .filter(|value| !value.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !has_class_token(&classes, marker) {
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str(marker);
        }
        element.attributes.insert(key, classes);
        Self(element)
    }

    /// Get the underlying descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ElementDescriptor {
        &self.0
    }

    /// Take the underlying descriptor.
    #[must_use]
    pub fn into_descriptor(self) -> ElementDescriptor {
        self.0
    }
}

impl Deref for MarkedElement {
    type Target = ElementDescriptor;

    fn deref(&self) -> &ElementDescriptor {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MARKER_CLASS;

    #[test]
    fn test_tag_kind_parse() {
        assert_eq!(TagKind::parse("TITLE"), TagKind::Title);
        assert_eq!(TagKind::parse("meta"), TagKind::Meta);
        assert_eq!(TagKind::parse("Div"), TagKind::Other("div".to_string()));
        assert!(!TagKind::parse("div").is_managed());
        assert!(TagKind::Base.is_singleton());
        assert!(!TagKind::Meta.is_singleton());
    }

    #[test]
    fn test_content_text_flattening() {
        let el = ElementDescriptor::new("title").with_parts(vec![
            ContentPart::Text("a".to_string()),
            ContentPart::Element(ElementDescriptor::new("span").with_text("b")),
            ContentPart::Text("c".to_string()),
        ]);
        assert_eq!(el.text_content(), "abc");
        assert_eq!(ElementDescriptor::new("meta").text_content(), "");
    }

    #[test]
    fn test_stamp_appends_marker() {
        let el = ElementDescriptor::title("hi").with_attribute("className", "page");
        let marked = MarkedElement::stamp(el, MARKER_CLASS);
        assert_eq!(marked.attributes["className"], "page elmo-head");
    }

    #[test]
    fn test_stamp_uses_existing_class_key() {
        let el = ElementDescriptor::title("hi").with_attribute("class", "x");
        let marked = MarkedElement::stamp(el, MARKER_CLASS);
        assert_eq!(marked.attributes.get("class").map(String::as_str), Some("x elmo-head"));
        assert!(!marked.attributes.contains_key("className"));
    }

    #[test]
    fn test_stamp_joins_both_class_spellings() {
        let el = ElementDescriptor::new("link")
            .with_attribute("class", "a")
            .with_attribute("className", "b");
        let marked = MarkedElement::stamp(el, MARKER_CLASS);

        assert_eq!(marked.attributes.len(), 1);
        assert_eq!(marked.attributes["class"], "a b elmo-head");
        assert_eq!(marked.dom_attribute("class"), Some("a b elmo-head"));
    }

    #[test]
    fn test_stamp_is_idempotent() {
        let once = MarkedElement::stamp(ElementDescriptor::title("hi"), MARKER_CLASS);
        let twice = MarkedElement::stamp(once.clone().into_descriptor(), MARKER_CLASS);
        assert_eq!(once, twice);
        assert_eq!(twice.dom_attribute("class"), Some(MARKER_CLASS));
    }

    #[test]
    fn test_deserialize_element_yaml() {
        let yaml = r#"
tag: meta
attributes:
  name: description
  content: 5
  async: true
  defer: false
  itemProp: ~
"#;
        let el: ElementDescriptor = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(el.tag, TagKind::Meta);
        assert_eq!(el.attributes["content"], "5");
        assert_eq!(el.attributes["async"], "");
        assert!(!el.attributes.contains_key("defer"));
        assert!(!el.attributes.contains_key("itemProp"));
    }

    #[test]
    fn test_deserialize_malformed_attributes() {
        let yaml = "tag: title\nattributes: [1, 2]\ncontent: hi\n";
        let el: ElementDescriptor = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(el.attributes.is_empty());
        assert_eq!(el.content, Content::Text("hi".to_string()));
    }

    #[test]
    fn test_deserialize_content_shapes() {
        let parts: ElementDescriptor =
            serde_yaml_ng::from_str("tag: title\ncontent: [\"count: \", 3]\n").unwrap();
        assert_eq!(parts.text_content(), "count: 3");

        let raw: ElementDescriptor =
            serde_yaml_ng::from_str("tag: script\ncontent:\n  raw_markup: \"a<b\"\n").unwrap();
        assert_eq!(
            raw.content,
            Content::RawMarkup {
                raw_markup: "a<b".to_string()
            }
        );

        let empty: ElementDescriptor = serde_yaml_ng::from_str("tag: base\ncontent: ~\n").unwrap();
        assert!(empty.content.is_empty());
    }

    #[test]
    fn test_deserialize_head_nodes() {
        let yaml = r#"
- tag: title
  content: hi
- "  "
- ~
- attributes: { name: orphan }
"#;
        let nodes: Vec<HeadNode> = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0], HeadNode::Element(ElementDescriptor::title("hi")));
        assert_eq!(nodes[1], HeadNode::Text("  ".to_string()));
        assert_eq!(nodes[2], HeadNode::Opaque);
        assert_eq!(nodes[3], HeadNode::Opaque);
    }

    #[test]
    fn test_serialize_marked_element_json() {
        let marked = MarkedElement::stamp(ElementDescriptor::title("hi"), MARKER_CLASS);
        let json = serde_json::to_value(&marked).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tag": "title",
                "attributes": { "className": "elmo-head" },
                "content": "hi"
            })
        );
    }
}
