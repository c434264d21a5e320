//! Selection model: which elements are selected, which one is active, and
//! what interaction mode the canvas is in.
//!
//! `active` identifies the element driving single-element property panels
//! and is always a member of the selected set (or none). The ordered set
//! keeps click order so "last selected" is well defined for toggles.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::{Deserialize, Serialize};

use crate::bounds::{self, Bounds};
use crate::doc::Document;
use crate::element::ElementId;

/// The interaction mode the canvas is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Idle,
    Marquee,
    Dragging,
    Resizing,
    Rotating,
}

/// Current selection: ordered id set, active id, and mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    selected: Vec<ElementId>,
    active: Option<ElementId>,
    pub mode: SelectionMode,
}

impl SelectionState {
    /// The selected ids in selection order.
    #[must_use]
    pub fn selected(&self) -> &[ElementId] {
        &self.selected
    }

    #[must_use]
    pub fn active(&self) -> Option<ElementId> {
        self.active
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Replace the selection with a single element.
    pub fn select(&mut self, id: ElementId) {
        self.selected = vec![id];
        self.active = Some(id);
    }

    /// Replace the selection with a set; `active` falls back to the last id.
    pub fn set(&mut self, ids: Vec<ElementId>, active: Option<ElementId>) {
        let mut deduped: Vec<ElementId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        self.active = match active {
            Some(a) if deduped.contains(&a) => Some(a),
            _ => deduped.last().copied(),
        };
        self.selected = deduped;
    }

    /// Shift-click semantics: remove if present (active moves to the last
    /// remaining id), append and activate if absent.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
            self.active = self.selected.last().copied();
        } else {
            self.selected.push(id);
            self.active = Some(id);
        }
    }

    /// Add to the selection; no-op if already present.
    pub fn add(&mut self, id: ElementId) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
            self.active = Some(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.active = None;
    }

    /// Drop ids that no longer resolve in the document; fixes `active`.
    pub fn retain_existing(&mut self, doc: &Document) {
        self.selected.retain(|id| doc.contains(*id));
        if self.active.is_some_and(|a| !self.selected.contains(&a)) {
            self.active = self.selected.last().copied();
        }
    }
}

/// Union of bounds for the given ids. Ids that no longer resolve (deleted
/// elements in a stale selection) are silently skipped.
#[must_use]
pub fn selection_bounds(ids: &[ElementId], doc: &Document) -> Option<Bounds> {
    bounds::union_all(
        ids.iter()
            .filter_map(|id| doc.find(*id))
            .filter_map(|(_, element)| bounds::element_bounds(element)),
    )
}
