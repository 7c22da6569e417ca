//! Contributor registry and lifecycle seams.
//!
//! Contributors register in mount order. Every mutation recomputes the merged
//! head synchronously; a [`HeadSink`] attached at construction receives the
//! result (the client synchronizer), or the caller drains the registry
//! explicitly (server rendering).

mod contributor;
mod core;
mod head;

pub use contributor::{Contributor, ContributorId, Detached, HeadLifecycle, HeadSink};
pub use self::core::HeadRegistry;
pub use head::Head;
