//! Elmo Head - merge document-head declarations from many fragments.
//!
//! Independently rendered fragments each declare head content (titles, meta
//! tags, links, styles, scripts). This crate merges those declarations into
//! one deduplicated head and applies it, either by synchronizing a live head
//! with a minimal set of changes (client) or by rendering markup (server).
//!
//! # Example
//!
//! ```
//! use elmo_head::registry::{Head, HeadRegistry};
//! use elmo_head::render::MarkupRenderer;
//! use elmo_head::server::rewind_markup;
//! use elmo_head::types::ElementDescriptor;
//!
//! let mut registry = HeadRegistry::new();
//! let mut page = Head::new([ElementDescriptor::title("Home")]);
//! let mut article = Head::new([ElementDescriptor::title("Article")]);
//! page.mount(&mut registry);
//! article.mount(&mut registry);
//!
//! assert_eq!(
//!     rewind_markup(&mut registry, &MarkupRenderer),
//!     r#"<title class="elmo-head">Article</title>"#
//! );
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`]: Constants (marker class, tag kinds, attribute names)
//! - [`types`]: Core data types (ElementDescriptor, HeadNode, MarkedElement)
//! - [`error`]: Error types and Result alias
//! - [`unique`]: Last-wins uniqueness filter
//! - [`aggregate`]: Merging contributor children into one head
//! - [`registry`]: Contributor registry and lifecycle hooks
//! - [`dom`]: Materialized nodes, markup parsing, in-memory head
//! - [`sync`]: Client-side synchronization of a live head
//! - [`render`]: Markup rendering
//! - [`server`]: Server-side rewind per render cycle
//! - [`declarations`]: Reading contributor declarations from files
//! - [`cli`]: Command-line interface

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod declarations;
pub mod dom;
pub mod error;
pub mod registry;
pub mod render;
pub mod server;
pub mod sync;
pub mod types;
pub mod unique;

// Re-export commonly used items
pub use config::MARKER_CLASS;
pub use error::{HeadError, Result};
pub use registry::{Contributor, ContributorId, Head, HeadLifecycle, HeadRegistry, HeadSink};
pub use server::{rewind, rewind_markup, ServerHead};
pub use sync::{sync, ClientSync, HeadTarget};
pub use types::{Content, ElementDescriptor, HeadNode, MarkedElement, TagKind};
