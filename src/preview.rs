//! Live-drag preview side-channel.
//!
//! During a move/resize/rotate gesture the engine writes per-element visual
//! transforms here instead of dispatching into the reducer, so a drag never
//! re-renders the committed document. The host applies these as direct DOM
//! transform writes each frame. The contract is narrow: previews are
//! visual-only, the reducer never sees them, and the channel is cleared
//! atomically with the commit on pointer-up (or on cancel).

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use std::collections::HashMap;

use crate::element::{ElementId, Transform};

/// Ephemeral visual transform overrides, keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct LivePreview {
    transforms: HashMap<ElementId, Transform>,
}

impl LivePreview {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the preview transform for an element.
    pub fn set(&mut self, id: ElementId, transform: Transform) {
        self.transforms.insert(id, transform);
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Transform> {
        self.transforms.get(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Iterate the previewed `(id, transform)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Transform)> {
        self.transforms.iter().map(|(id, t)| (*id, t))
    }

    /// Drain every override, returning the ids that were previewed so the
    /// host can reset their DOM nodes to committed state.
    pub fn take(&mut self) -> Vec<(ElementId, Transform)> {
        self.transforms.drain().collect()
    }

    pub fn clear(&mut self) {
        self.transforms.clear();
    }
}
