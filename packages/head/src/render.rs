//! Serializing head elements to markup.
//!
//! The merge core only produces element values; turning them into markup is
//! the job of a [`HeadRenderer`]. [`MarkupRenderer`] writes HTML that
//! [`crate::dom::parse_head`] reads back into equal nodes, which is what lets
//! a hydrating client adopt server-rendered elements unchanged.

use crate::dom::{is_raw_text, DomContent, DomElement};
use crate::types::MarkedElement;

/// Turns materialized head elements into markup.
pub trait HeadRenderer {
    /// Append the markup of one element to `out`.
    fn render_element(&self, element: &DomElement, out: &mut String);

    /// Render a merged head, one element after the other.
    fn render(&self, elements: &[MarkedElement]) -> String {
        let mut out = String::new();
        for element in elements {
            self.render_element(&DomElement::materialize(element), &mut out);
        }
        out
    }
}

/// Default renderer.
///
/// Void tags are self-closed, attributes are written in name order with
/// escaped values, and text is escaped except inside `script` and `style`.
/// Raw markup is written verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupRenderer;

impl HeadRenderer for MarkupRenderer {
    fn render_element(&self, element: &DomElement, out: &mut String) {
        let tag = element.tag.as_str();
        out.push('<');
        out.push_str(tag);
        for (name, value) in &element.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }

        if element.tag.is_void() && element.content.is_empty() {
            out.push_str(" />");
            return;
        }

        out.push('>');
        match &element.content {
            DomContent::Empty => {}
            DomContent::Text(text) if is_raw_text(&element.tag) => out.push_str(text),
            DomContent::Text(text) => out.push_str(&escape_html(text)),
            DomContent::Html(html) => out.push_str(html),
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

/// Escape text for use in element content or a quoted attribute value.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
