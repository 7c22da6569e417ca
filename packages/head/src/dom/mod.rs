//! Materialized head nodes, markup parsing and the in-memory target.

mod element;
mod html;
mod memory;

pub use element::{DomContent, DomElement};
pub(crate) use element::is_raw_text;
pub use html::{parse_head, ParsedHead};
pub use memory::MemoryHead;
