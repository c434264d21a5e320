//! Document model: the artboard, its layers, and the elements they contain.
//!
//! A [`Document`] is the committed, serializable description of one design:
//! a fixed-size millimeter artboard plus an ordered set of layers holding
//! elements. Rendering and hit-testing iterate layers by descending `order`
//! (topmost first) and elements within a layer from last-drawn to first.
//! All interactive mutation flows through the history reducer; the methods
//! here are the primitive container operations it is built from.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::{Element, ElementId, LayerKind};

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// The artboard's base outline shape family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtboardShape {
    Rect,
    Circle,
    Hex,
    Octagon,
    Scallop,
    Shield,
}

/// The fixed-size laser work surface, in millimeters.
///
/// Immutable except through a full document rebuild; `outline_d` is the
/// generated base path for non-rectangular shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artboard {
    pub width_mm: f64,
    pub height_mm: f64,
    pub shape: ArtboardShape,
    pub outline_d: String,
}

/// An ordered, named container of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub visible: bool,
    pub locked: bool,
    pub opacity: f64,
    /// Stacking position; higher values render on top.
    pub order: i32,
    pub elements: Vec<Element>,
}

impl Layer {
    #[must_use]
    pub fn new(name: &str, kind: LayerKind, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            kind,
            visible: true,
            locked: false,
            opacity: 1.0,
            order,
            elements: Vec::new(),
        }
    }
}

/// The committed document: artboard plus layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub artboard: Artboard,
    pub layers: Vec<Layer>,
}

impl Document {
    /// Create a document with the canonical three layers: GUIDE on top,
    /// ENGRAVE in the middle, CUT at the bottom.
    #[must_use]
    pub fn new(artboard: Artboard) -> Self {
        Self {
            artboard,
            layers: vec![
                Layer::new("Cut", LayerKind::Cut, 1),
                Layer::new("Engrave", LayerKind::Engrave, 2),
                Layer::new("Guide", LayerKind::Guide, 3),
            ],
        }
    }

    /// Layers sorted topmost-first (descending `order`, id as tiebreak).
    #[must_use]
    pub fn layers_top_down(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.iter().collect();
        layers.sort_by(|a, b| b.order.cmp(&a.order).then_with(|| a.id.cmp(&b.id)));
        layers
    }

    /// The topmost layer of the given kind, if any.
    #[must_use]
    pub fn layer_of_kind(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers_top_down().into_iter().find(|l| l.kind == kind)
    }

    fn layer_of_kind_mut(&mut self, kind: LayerKind) -> Option<&mut Layer> {
        let mut best: Option<usize> = None;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.kind != kind {
                continue;
            }
            match best {
                Some(b) if self.layers[b].order >= layer.order => {}
                _ => best = Some(index),
            }
        }
        best.map(|index| &mut self.layers[index])
    }

    /// Find an element and its containing layer by id.
    #[must_use]
    pub fn find(&self, id: ElementId) -> Option<(&Layer, &Element)> {
        self.layers
            .iter()
            .find_map(|layer| layer.elements.iter().find(|e| e.id == id).map(|e| (layer, e)))
    }

    /// Mutable lookup by id.
    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.layers
            .iter_mut()
            .find_map(|layer| layer.elements.iter_mut().find(|e| e.id == id))
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.find(id).is_some()
    }

    /// True when the element or its containing layer is locked. Unknown ids
    /// report locked so stale references are never mutated.
    #[must_use]
    pub fn is_locked(&self, id: ElementId) -> bool {
        self.find(id).is_none_or(|(layer, element)| layer.locked || element.locked)
    }

    /// Insert an element into the topmost layer matching its kind tag,
    /// creating that layer if the document somehow lacks one.
    pub fn insert(&mut self, element: Element) {
        let kind = element.layer;
        if let Some(layer) = self.layer_of_kind_mut(kind) {
            layer.elements.push(element);
            return;
        }
        let next_order = self.layers.iter().map(|l| l.order).max().unwrap_or(0) + 1;
        let mut layer = Layer::new(layer_default_name(kind), kind, next_order);
        layer.elements.push(element);
        self.layers.push(layer);
    }

    /// Remove the listed elements wherever they live. Returns how many were
    /// actually removed; unknown ids are skipped silently.
    pub fn remove(&mut self, ids: &[ElementId]) -> usize {
        let mut removed = 0;
        for layer in &mut self.layers {
            let before = layer.elements.len();
            layer.elements.retain(|e| !ids.contains(&e.id));
            removed += before - layer.elements.len();
        }
        removed
    }

    /// Re-tag the listed elements and move them into the topmost layer of the
    /// target kind, preserving their relative order.
    pub fn set_layer(&mut self, ids: &[ElementId], kind: LayerKind) {
        let mut moved = Vec::new();
        for layer in &mut self.layers {
            let mut kept = Vec::with_capacity(layer.elements.len());
            for element in layer.elements.drain(..) {
                if ids.contains(&element.id) {
                    moved.push(element);
                } else {
                    kept.push(element);
                }
            }
            layer.elements = kept;
        }
        for mut element in moved {
            element.layer = kind;
            self.insert(element);
        }
    }

    /// Reorder a layer's elements so the ids in `order` appear in that
    /// sequence on top; unlisted elements keep their relative order below.
    pub fn reorder(&mut self, layer_id: LayerId, order: &[ElementId]) {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == layer_id) else {
            return;
        };
        let mut unlisted = Vec::new();
        let mut listed: Vec<Option<Element>> = vec![None; order.len()];
        for element in layer.elements.drain(..) {
            match order.iter().position(|id| *id == element.id) {
                Some(pos) => listed[pos] = Some(element),
                None => unlisted.push(element),
            }
        }
        unlisted.extend(listed.into_iter().flatten());
        layer.elements = unlisted;
    }

    /// Iterate every element across all layers in storage order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.layers.iter().flat_map(|l| l.elements.iter())
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.layers.iter().map(|l| l.elements.len()).sum()
    }
}

fn layer_default_name(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Cut => "Cut",
        LayerKind::Engrave => "Engrave",
        LayerKind::Guide => "Guide",
    }
}
