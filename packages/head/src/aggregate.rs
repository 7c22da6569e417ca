//! Merges the children of all active contributors into one head.

use crate::config::MARKER_CLASS;
use crate::types::{HeadNode, MarkedElement};
use crate::unique::filter_unique;

/// Merge contributor children into the deduplicated, marked head sequence.
///
/// Contributors are taken in the given (mount) order and their children in
/// declaration order. Text and opaque nodes are skipped, elements of a kind
/// that does not belong in the head are dropped, the rest goes through the
/// last-wins stable filter and every survivor is stamped with
/// [`MARKER_CLASS`].
///
/// # Examples
/// ```
/// use elmo_head::aggregate::aggregate;
/// use elmo_head::types::{ElementDescriptor, HeadNode};
///
/// let first = vec![HeadNode::from(ElementDescriptor::title("hi"))];
/// let second = vec![
///     HeadNode::from(ElementDescriptor::new("div")),
///     HeadNode::from(ElementDescriptor::title("cool")),
/// ];
///
/// let merged = aggregate([first.as_slice(), second.as_slice()]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].text_content(), "cool");
/// ```
#[must_use]
pub fn aggregate<'a, I>(contributions: I) -> Vec<MarkedElement>
where
    I: IntoIterator<Item = &'a [HeadNode]>,
{
    let recognized = contributions
        .into_iter()
        .flatten()
        .filter_map(HeadNode::as_element)
        .filter(|element| {
            let managed = element.tag.is_managed();
            if !managed {
                tracing::trace!(tag = %element.tag, "Dropping element that does not belong in the head");
            }
            managed
        })
        .cloned()
        .collect();

    filter_unique(recognized)
        .into_iter()
        .map(|element| MarkedElement::stamp(element, MARKER_CLASS))
        .collect()
}
