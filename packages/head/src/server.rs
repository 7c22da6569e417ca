//! Server-side rendering of the merged head.
//!
//! Rendering code mounts contributors into a registry owned by the current
//! render cycle; once the page body is rendered, the head is rewound out of
//! the registry. Rewinding empties the registry, so a registry reused for the
//! next request starts clean. Elements keep the marker class so that the
//! client can adopt server-rendered nodes on hydration.

use crate::registry::{Detached, HeadLifecycle, HeadRegistry, HeadSink};
use crate::render::HeadRenderer;
use crate::types::{ElementDescriptor, MarkedElement};

/// Drain the registry and return the merged head as descriptors.
pub fn rewind<S: HeadSink>(registry: &mut HeadRegistry<S>) -> Vec<ElementDescriptor> {
    registry
        .drain()
        .into_iter()
        .map(MarkedElement::into_descriptor)
        .collect()
}

/// Drain the registry and render the merged head as markup.
pub fn rewind_markup<S: HeadSink>(
    registry: &mut HeadRegistry<S>,
    renderer: &impl HeadRenderer,
) -> String {
    renderer.render(&registry.drain())
}

/// Head state of one server render cycle.
///
/// Create one per request and hand [`ServerHead::lifecycle`] to the code that
/// mounts contributors. Concurrent requests each use their own value.
#[derive(Default)]
pub struct ServerHead {
    registry: HeadRegistry<Detached>,
}

impl ServerHead {
    /// Start a render cycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle hooks for contributors rendered in this cycle.
    pub fn lifecycle(&mut self) -> &mut dyn HeadLifecycle {
        &mut self.registry
    }

    /// Number of contributors mounted so far.
    #[must_use]
    pub fn contributors(&self) -> usize {
        self.registry.len()
    }

    /// Finish the cycle and return the merged head.
    pub fn rewind(&mut self) -> Vec<ElementDescriptor> {
        rewind(&mut self.registry)
    }

    /// Finish the cycle and return the merged head as markup.
    pub fn rewind_markup(&mut self, renderer: &impl HeadRenderer) -> String {
        rewind_markup(&mut self.registry, renderer)
    }
}
