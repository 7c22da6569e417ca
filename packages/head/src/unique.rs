//! Last-wins stable filter for head elements.
//!
//! Several contributors may declare the same logical element (two titles,
//! two `description` metas). Exactly one must survive, and it must be the one
//! declared last, yet the survivors must keep their original relative order
//! so that re-applying the same declarations is idempotent.
//!
//! # Last-wins stable filter
//!
//! 1. Scan the sequence in reverse, feeding every element to a
//!    [`UniquenessFilter`]. The first occurrence seen in reverse is the last
//!    occurrence in declaration order, so it is the one admitted.
//! 2. Reverse the admitted elements again to restore declaration order.
//!
//! Uniqueness rules, checked in reverse order:
//! - `title` and `base` are singletons: only one of each kind survives.
//! - A `meta` carrying `charset` survives only if no later meta did.
//! - A `meta` carrying `name`, `http-equiv` or `itemprop` survives only if no
//!   later meta carried the same (attribute, value) pair. Different values of
//!   the same attribute do not conflict.
//! - Every other element always survives.

use std::collections::{HashMap, HashSet};

use crate::config::{dom_attribute_name, CHARSET_ATTRIBUTE, META_CATEGORIES};
use crate::types::{ElementDescriptor, TagKind};

/// Stateful admission check used by the reverse scan.
///
/// Feed elements from last to first; `admit` returns whether each survives.
#[derive(Debug, Default)]
pub struct UniquenessFilter {
    singletons: HashSet<TagKind>,
    charset_seen: bool,
    categories: HashMap<&'static str, HashSet<String>>,
}

impl UniquenessFilter {
    /// Create a filter that has seen nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `element` survives and record what it claims.
    ///
    /// A rejected element records nothing, so it cannot shadow an earlier
    /// element that does not conflict with any survivor.
    pub fn admit(&mut self, element: &ElementDescriptor) -> bool {
        if element.tag.is_singleton() {
            return self.singletons.insert(element.tag.clone());
        }
        if element.tag == TagKind::Meta {
            return self.admit_meta(element);
        }
        true
    }

    fn admit_meta(&mut self, element: &ElementDescriptor) -> bool {
        let mut has_charset = false;
        let mut pairs: Vec<(&'static str, &str)> = Vec::new();

        for (name, value) in &element.attributes {
            let dom_name = dom_attribute_name(name);
            let Some(&category) = META_CATEGORIES.iter().find(|c| **c == dom_name) else {
                continue;
            };

            if category == CHARSET_ATTRIBUTE {
                if self.charset_seen {
                    return false;
                }
                has_charset = true;
            } else {
                let seen = self
                    .categories
                    .get(category)
                    .is_some_and(|values| values.contains(value.as_str()));
                if seen {
                    return false;
                }
                pairs.push((category, value.as_str()));
            }
        }

        self.charset_seen |= has_charset;
        for (category, value) in pairs {
            self.categories
                .entry(category)
                .or_default()
                .insert(value.to_string());
        }
        true
    }
}

/// Apply the last-wins stable filter to a sequence of elements.
///
/// Conflicts resolve in favor of the later element; survivors keep their
/// original relative order.
///
/// # Examples
/// ```
/// use elmo_head::types::ElementDescriptor;
/// use elmo_head::unique::filter_unique;
///
/// let kept = filter_unique(vec![
///     ElementDescriptor::title("first"),
///     ElementDescriptor::meta([("name", "a")]),
///     ElementDescriptor::title("second"),
/// ]);
/// assert_eq!(kept.len(), 2);
/// assert_eq!(kept[0].tag.as_str(), "meta");
/// assert_eq!(kept[1].text_content(), "second");
/// ```
#[must_use]
pub fn filter_unique(elements: Vec<ElementDescriptor>) -> Vec<ElementDescriptor> {
    let mut filter = UniquenessFilter::new();
    let mut kept: Vec<ElementDescriptor> = elements
        .into_iter()
        .rev()
        .filter(|element| {
            let admitted = filter.admit(element);
            if !admitted {
                tracing::trace!(tag = %element.tag, "Dropping element shadowed by a later declaration");
            }
            admitted
        })
        .collect();
    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(elements: &[ElementDescriptor]) -> Vec<String> {
        elements.iter().map(ElementDescriptor::text_content).collect()
    }

    #[test]
    fn test_empty_sequence() {
        assert!(filter_unique(Vec::new()).is_empty());
    }

    #[test]
    fn test_last_title_wins() {
        let kept = filter_unique(vec![
            ElementDescriptor::title("hi"),
            ElementDescriptor::title("cool"),
        ]);
        assert_eq!(texts(&kept), vec!["cool"]);
    }

    #[test]
    fn test_last_base_wins() {
        let kept = filter_unique(vec![
            ElementDescriptor::new("base").with_attribute("href", "/a/"),
            ElementDescriptor::new("base").with_attribute("href", "/b/"),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].attributes["href"], "/b/");
    }

    #[test]
    fn test_survivors_keep_relative_order() {
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("name", "a")]).with_text("1"),
            ElementDescriptor::title("old"),
            ElementDescriptor::meta([("name", "b")]).with_text("2"),
            ElementDescriptor::new("link").with_text("3"),
            ElementDescriptor::title("new"),
        ]);
        assert_eq!(texts(&kept), vec!["1", "2", "3", "new"]);
    }

    #[test]
    fn test_meta_same_pair_last_wins() {
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("name", "description"), ("content", "old")]),
            ElementDescriptor::meta([("name", "description"), ("content", "new")]),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].attributes["content"], "new");
    }

    #[test]
    fn test_meta_same_attribute_different_value_both_survive() {
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("name", "description")]),
            ElementDescriptor::meta([("name", "keywords")]),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_meta_categories_are_independent() {
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("name", "x")]),
            ElementDescriptor::meta([("itemProp", "x")]),
            ElementDescriptor::meta([("httpEquiv", "x")]),
        ]);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_single_charset_survives() {
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("charSet", "latin1")]),
            ElementDescriptor::meta([("charset", "utf-8")]),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].attributes["charset"], "utf-8");
    }

    #[test]
    fn test_http_equiv_spellings_collide() {
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("httpEquiv", "refresh"), ("content", "5")]),
            ElementDescriptor::meta([("http-equiv", "refresh"), ("content", "10")]),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].attributes["content"], "10");
    }

    #[test]
    fn test_rejected_meta_records_nothing() {
        // The middle meta loses on `name=a`; its `itemprop=b` must not
        // shadow the first meta.
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("itemProp", "b")]).with_text("first"),
            ElementDescriptor::meta([("name", "a"), ("itemProp", "b")]).with_text("middle"),
            ElementDescriptor::meta([("name", "a")]).with_text("last"),
        ]);
        assert_eq!(texts(&kept), vec!["first", "last"]);
    }

    #[test]
    fn test_uncategorized_meta_always_survives() {
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("property", "og:title"), ("content", "a")]),
            ElementDescriptor::meta([("property", "og:title"), ("content", "b")]),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_raw_markup_meta_is_deduplicated() {
        let kept = filter_unique(vec![
            ElementDescriptor::meta([("name", "w")]).with_raw_markup("x"),
            ElementDescriptor::meta([("name", "w")]).with_raw_markup("y"),
        ]);
        assert_eq!(texts(&kept), vec!["y"]);
    }

    #[test]
    fn test_filter_admit_directly() {
        let mut filter = UniquenessFilter::new();
        assert!(filter.admit(&ElementDescriptor::title("a")));
        assert!(!filter.admit(&ElementDescriptor::title("b")));
        assert!(filter.admit(&ElementDescriptor::new("script")));
        assert!(filter.admit(&ElementDescriptor::new("script")));
    }
}
