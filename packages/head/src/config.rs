//! Configuration constants shared by the server and client paths.
//!
//! The marker class and the attribute translation table must agree between
//! server-rendered markup and client lookups, otherwise a hydrating client
//! cannot find the nodes the server emitted. Both live here so there is a
//! single source for either side.

use std::borrow::Cow;

use crate::types::TagKind;

/// Class token stamped on every element this crate manages.
///
/// Nodes in a live head without this token belong to someone else and are
/// never touched by synchronization.
pub const MARKER_CLASS: &str = "elmo-head";

/// Tag names that may be placed in the head.
pub const MANAGED_TAGS: [&str; 6] = ["title", "meta", "base", "link", "style", "script"];

/// Tag kinds reconciled node-by-node, in synchronization order.
///
/// `title` is absent: it is written through the page-title slot instead.
pub const SYNCED_KINDS: [TagKind; 5] = [
    TagKind::Meta,
    TagKind::Base,
    TagKind::Link,
    TagKind::Style,
    TagKind::Script,
];

/// Serialized names of the meta attributes that categorize a meta element.
///
/// At most one meta element survives per (attribute, value) pair; for
/// `charset` the value is irrelevant and only one survives overall.
pub const META_CATEGORIES: [&str; 4] = ["name", "http-equiv", "charset", "itemprop"];

/// Serialized name of the charset categorization attribute.
pub const CHARSET_ATTRIBUTE: &str = "charset";

/// Serialized name of the class attribute.
pub const CLASS_ATTRIBUTE: &str = "class";

/// Internal attribute names whose serialized form is not just lower-case.
pub const DOM_ATTRIBUTE_NAMES: [(&str, &str); 4] = [
    ("acceptCharset", "accept-charset"),
    ("className", "class"),
    ("htmlFor", "for"),
    ("httpEquiv", "http-equiv"),
];

/// Maximum declaration file size in bytes (1 MB).
///
/// Declarations are a handful of head tags; anything near this size is
/// almost certainly the wrong file.
pub const MAX_DECLARATION_SIZE: u64 = 1_000_000;

/// Translate an internal attribute name to its serialized form.
///
/// Every path that reads or writes attribute names (dedup, materialization,
/// markup rendering) goes through this function.
///
/// # Examples
/// ```
/// use elmo_head::config::dom_attribute_name;
///
/// assert_eq!(dom_attribute_name("className"), "class");
/// assert_eq!(dom_attribute_name("httpEquiv"), "http-equiv");
/// assert_eq!(dom_attribute_name("charSet"), "charset");
/// assert_eq!(dom_attribute_name("content"), "content");
/// ```
pub fn dom_attribute_name(name: &str) -> Cow<'_, str> {
    if let Some((_, dom)) = DOM_ATTRIBUTE_NAMES.iter().find(|(key, _)| *key == name) {
        return Cow::Borrowed(dom);
    }
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Check whether a whitespace-separated class list contains `token`.
pub fn has_class_token(classes: &str, token: &str) -> bool {
    classes.split_ascii_whitespace().any(|c| c == token)
}
