//! Versioned document history: snapshots, the command reducer, and bounded
//! undo/redo stacks.
//!
//! Commands split into two update policies:
//!
//! - **Checkpointed** commands (add/remove/reorder/set-layer/artboard/
//!   explicit [`Command::Commit`]) push the current snapshot onto `past`
//!   (capped, oldest dropped), apply, and clear `future`.
//! - **Transient** commands (element/transform updates, every selection
//!   change) replace the present snapshot in place without touching the
//!   stacks.
//!
//! The split is what makes live dragging cheap: a drag streams any number of
//! transient updates and becomes exactly one undo step by dispatching
//! `Commit` first. Dispatch never fails; commands referencing unknown ids
//! are applied to whatever still resolves and the rest is skipped.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::consts::HISTORY_CAP;
use crate::doc::{Artboard, Document, LayerId};
use crate::element::{Element, ElementId, ElementPatch, LayerKind, Transform};
use crate::selection::{SelectionMode, SelectionState};

/// One committed state of the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub document: Document,
    pub selection: SelectionState,
    pub timestamp_ms: f64,
}

impl Snapshot {
    #[must_use]
    pub fn new(document: Document, selection: SelectionState) -> Self {
        Self { document, selection, timestamp_ms: now_ms() }
    }
}

/// The closed set of edits the reducer understands.
#[derive(Debug, Clone)]
pub enum Command {
    AddElement(Element),
    RemoveElements(Vec<ElementId>),
    UpdateElement { id: ElementId, patch: ElementPatch },
    /// Batched absolute transform updates, one per element.
    UpdateTransform(Vec<(ElementId, Transform)>),
    SetLayer { ids: Vec<ElementId>, layer: LayerKind },
    ReorderElements { layer_id: LayerId, order: Vec<ElementId> },
    Select { ids: Vec<ElementId>, active: Option<ElementId> },
    SelectAll,
    ClearSelection,
    SetSelectionMode(SelectionMode),
    UpdateArtboard(Artboard),
    Undo,
    Redo,
    /// Checkpoint the current present so following transient updates fold
    /// into a single undo step.
    Commit,
    /// Replace the whole history with a fresh document; used on parametric
    /// rebuilds, which are deliberately not undoable.
    Reset(Document),
}

/// Bounded undo/redo state over [`Snapshot`]s.
#[derive(Debug, Clone)]
pub struct History {
    past: Vec<Snapshot>,
    present: Snapshot,
    future: Vec<Snapshot>,
    cap: usize,
}

impl History {
    /// Start a history at the given document with the default 50-entry cap.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self::with_cap(document, HISTORY_CAP)
    }

    #[must_use]
    pub fn with_cap(document: Document, cap: usize) -> Self {
        Self {
            past: Vec::new(),
            present: Snapshot::new(document, SelectionState::default()),
            future: Vec::new(),
            cap,
        }
    }

    #[must_use]
    pub fn present(&self) -> &Snapshot {
        &self.present
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.present.document
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.present.selection
    }

    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Apply a command. Never fails; see the module docs for the
    /// checkpointed/transient split.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::AddElement(element) => {
                self.checkpoint();
                self.present.document.insert(element);
                self.touch();
            }
            Command::RemoveElements(ids) => {
                self.checkpoint();
                self.present.document.remove(&ids);
                let Snapshot { document, selection, .. } = &mut self.present;
                selection.retain_existing(document);
                self.touch();
            }
            Command::UpdateElement { id, patch } => {
                if let Some(element) = self.present.document.find_mut(id) {
                    patch.apply(element);
                    self.touch();
                }
            }
            Command::UpdateTransform(batch) => {
                for (id, transform) in batch {
                    if let Some(element) = self.present.document.find_mut(id) {
                        element.transform = transform;
                    }
                }
                self.touch();
            }
            Command::SetLayer { ids, layer } => {
                self.checkpoint();
                self.present.document.set_layer(&ids, layer);
                self.touch();
            }
            Command::ReorderElements { layer_id, order } => {
                self.checkpoint();
                self.present.document.reorder(layer_id, &order);
                self.touch();
            }
            Command::Select { ids, active } => {
                self.present.selection.set(ids, active);
            }
            Command::SelectAll => {
                let ids: Vec<ElementId> = self
                    .present
                    .document
                    .layers
                    .iter()
                    .filter(|l| l.visible)
                    .flat_map(|l| l.elements.iter())
                    .filter(|e| e.visible)
                    .map(|e| e.id)
                    .collect();
                let active = ids.last().copied();
                self.present.selection.set(ids, active);
            }
            Command::ClearSelection => {
                self.present.selection.clear();
            }
            Command::SetSelectionMode(mode) => {
                self.present.selection.mode = mode;
            }
            Command::UpdateArtboard(artboard) => {
                self.checkpoint();
                self.present.document.artboard = artboard;
                self.touch();
            }
            Command::Undo => {
                if let Some(previous) = self.past.pop() {
                    let current = std::mem::replace(&mut self.present, previous);
                    self.future.insert(0, current);
                }
            }
            Command::Redo => {
                if self.future.is_empty() {
                    return;
                }
                let next = self.future.remove(0);
                let current = std::mem::replace(&mut self.present, next);
                self.past.push(current);
                self.enforce_cap();
            }
            Command::Commit => {
                self.checkpoint();
            }
            Command::Reset(document) => {
                self.past.clear();
                self.future.clear();
                self.present = Snapshot::new(document, SelectionState::default());
            }
        }
    }

    /// Push the present onto `past` (dropping the oldest entries beyond the
    /// cap) and clear `future` — any new committed edit kills redo.
    fn checkpoint(&mut self) {
        self.past.push(self.present.clone());
        self.enforce_cap();
        self.future.clear();
    }

    fn enforce_cap(&mut self) {
        if self.past.len() > self.cap {
            let overflow = self.past.len() - self.cap;
            self.past.drain(0..overflow);
        }
    }

    fn touch(&mut self) {
        self.present.timestamp_ms = now_ms();
    }
}

/// Wall-clock milliseconds; JS clock in the browser, system clock natively.
fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }
}
