//! Materialized head nodes and their structural equality.

use std::collections::BTreeMap;

use crate::config::{dom_attribute_name, has_class_token, CLASS_ATTRIBUTE};
use crate::types::{Content, ElementDescriptor, TagKind};

/// Content of a materialized node.
#[derive(Debug, Clone, Default)]
pub enum DomContent {
    #[default]
    Empty,
    /// Text content, set as text.
    Text(String),
    /// Markup injected as inner HTML.
    Html(String),
}

impl DomContent {
    /// Normal form used for comparison.
    ///
    /// Empty text is no content, and markup without any markup characters is
    /// indistinguishable from the same text once injected.
    #[must_use]
    pub fn normalized(&self) -> Self {
        match self {
            Self::Text(text) | Self::Html(text) if text.is_empty() => Self::Empty,
            Self::Html(html) if !html.contains(['<', '&']) => Self::Text(html.clone()),
            other => other.clone(),
        }
    }

    /// Whether there is no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.normalized(), Self::Empty)
    }
}

impl PartialEq for DomContent {
    fn eq(&self, other: &Self) -> bool {
        match (self.normalized(), other.normalized()) {
            (Self::Empty, Self::Empty) => true,
            (Self::Text(a), Self::Text(b)) | (Self::Html(a), Self::Html(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for DomContent {}

/// A head node as it exists (or would exist) in a live page.
///
/// Attribute names are in serialized form. Equality is structural: tag,
/// attributes and normalized content, never identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomElement {
    pub tag: TagKind,
    pub attributes: BTreeMap<String, String>,
    pub content: DomContent,
}

impl DomElement {
    /// Create an element without attributes or content.
    #[must_use]
    pub fn new(tag: impl Into<TagKind>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            content: DomContent::Empty,
        }
    }

    /// Set an attribute (name in serialized form).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_content(DomContent::Text(text.into()))
    }

    /// Set the content.
    #[must_use]
    pub fn with_content(mut self, content: DomContent) -> Self {
        self.content = content;
        self
    }

    /// Materialize a descriptor.
    ///
    /// Attribute names go through the translation table. Raw markup becomes
    /// inner HTML, except in `script` and `style` whose inner HTML is their
    /// text; any other content becomes its flattened text.
    #[must_use]
    pub fn materialize(element: &ElementDescriptor) -> Self {
        let attributes = element
            .attributes
            .iter()
            .map(|(name, value)| (dom_attribute_name(name).into_owned(), value.clone()))
            .collect();

        let content = match &element.content {
            Content::Empty => DomContent::Empty,
            Content::RawMarkup { raw_markup } if is_raw_text(&element.tag) => {
                DomContent::Text(raw_markup.clone())
            }
            Content::RawMarkup { raw_markup } => DomContent::Html(raw_markup.clone()),
            other => DomContent::Text(other.text()),
        };

        Self {
            tag: element.tag.clone(),
            attributes,
            content,
        }
    }

    /// Check if the class attribute contains `token`.
    #[must_use]
    pub fn has_class(&self, token: &str) -> bool {
        self.attributes
            .get(CLASS_ATTRIBUTE)
            .is_some_and(|classes| has_class_token(classes, token))
    }
}

/// Whether the tag's content is raw text (inner HTML and text coincide).
pub(crate) fn is_raw_text(tag: &TagKind) -> bool {
    matches!(tag, TagKind::Script | TagKind::Style)
}
