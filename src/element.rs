//! Element model: the tagged union of everything that can sit on the artboard.
//!
//! An element couples a kind-specific geometry payload ([`ElementKind`]) with
//! the fields every kind shares: id, layer assignment, affine transform,
//! lock/visibility flags, and the `system` marker that distinguishes
//! parametrically regenerated elements from user-placed ones. World bounds
//! are always derived from the kind-local geometry plus the transform; no
//! absolute coordinates are cached on the element.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Laser layer assignment, controlling render color and export grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayerKind {
    /// Vector outlines the laser cuts through.
    Cut,
    /// Artwork the laser rasters or scores onto the surface.
    Engrave,
    /// On-canvas guides; never exported.
    Guide,
}

/// 2D affine transform: translation + rotation + non-uniform scale about the
/// element's local origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation along x, in millimeters.
    pub x_mm: f64,
    /// Translation along y, in millimeters.
    pub y_mm: f64,
    /// Clockwise rotation in degrees.
    pub rotate_deg: f64,
    /// Horizontal scale factor; negative values flip.
    pub scale_x: f64,
    /// Vertical scale factor; negative values flip.
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x_mm: 0.0, y_mm: 0.0, rotate_deg: 0.0, scale_x: 1.0, scale_y: 1.0 }
    }
}

impl Transform {
    /// A transform that only translates.
    #[must_use]
    pub fn at(x_mm: f64, y_mm: f64) -> Self {
        Self { x_mm, y_mm, ..Self::default() }
    }

    /// This transform shifted by `(dx_mm, dy_mm)`.
    #[must_use]
    pub fn translated(&self, dx_mm: f64, dy_mm: f64) -> Self {
        Self { x_mm: self.x_mm + dx_mm, y_mm: self.y_mm + dy_mm, ..*self }
    }
}

/// Shaped-text cache produced by the font collaborator: outlined glyphs plus
/// the measured extent, stored so bounds and export don't re-shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapedText {
    /// Outlined glyph path data in local millimeters.
    pub d: String,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Kind-specific geometry payload. Closed set; all dispatch is exhaustive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ElementKind {
    /// The artboard's base outline (system-generated).
    Shape { d: String },
    /// Decorative border inset from the base outline (system-generated).
    Border { d: String },
    /// A line of text; `shaped` is filled once the font collaborator runs.
    Text {
        content: String,
        font_id: String,
        size_mm: f64,
        letter_spacing_mm: f64,
        shaped: Option<ShapedText>,
    },
    /// Stock decorative vector artwork.
    Ornament { d: String },
    /// User-drawn primitive (rectangle, ellipse, …) already flattened to a path.
    BasicShape { d: String },
    /// A single path returned by the raster-trace endpoint.
    TracedPath { d: String },
    /// A multi-path trace result kept as one selectable unit.
    TracedPathGroup { paths: Vec<String> },
    /// Raster image engraved as-is.
    EngraveImage { data_url: String, width_mm: f64, height_mm: f64 },
    /// Raster sketch/AI output engraved as-is.
    EngraveSketch { data_url: String, width_mm: f64, height_mm: f64 },
    /// Uploaded vector logo; `cut_out` subtracts it from the base CUT path.
    Logo { d: String, cut_out: bool },
    /// Built-in icon path.
    Icon { d: String },
}

/// An element as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub layer: LayerKind,
    pub transform: Transform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub locked: bool,
    pub visible: bool,
    /// True for elements regenerated by parameter rebuilds; they are replaced
    /// wholesale on rebuild and cannot be deleted directly.
    pub system: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create a visible, unlocked, user-authored element with a fresh id and
    /// identity transform.
    #[must_use]
    pub fn new(kind: ElementKind, layer: LayerKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            transform: Transform::default(),
            name: None,
            locked: false,
            visible: true,
            system: false,
            kind,
        }
    }

    /// Same as [`Element::new`] but tagged as system-generated.
    #[must_use]
    pub fn new_system(kind: ElementKind, layer: LayerKind) -> Self {
        Self { system: true, ..Self::new(kind, layer) }
    }

    /// The element's primary path data, for the kinds that carry one.
    #[must_use]
    pub fn path_data(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Shape { d }
            | ElementKind::Border { d }
            | ElementKind::Ornament { d }
            | ElementKind::BasicShape { d }
            | ElementKind::TracedPath { d }
            | ElementKind::Logo { d, .. }
            | ElementKind::Icon { d } => Some(d),
            ElementKind::Text { shaped, .. } => shaped.as_ref().map(|s| s.d.as_str()),
            ElementKind::TracedPathGroup { .. }
            | ElementKind::EngraveImage { .. }
            | ElementKind::EngraveSketch { .. } => None,
        }
    }
}

/// Sparse update for an element. Only present fields are applied.
///
/// `name` uses a double `Option` so callers can distinguish "leave the name
/// alone" (`None`) from "clear the name" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Replacement text content, applied only to `Text` elements. Changing
    /// content invalidates the shaped cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

impl ElementPatch {
    /// Apply this patch to an element in place.
    pub fn apply(&self, element: &mut Element) {
        if let Some(x) = self.x_mm {
            element.transform.x_mm = x;
        }
        if let Some(y) = self.y_mm {
            element.transform.y_mm = y;
        }
        if let Some(r) = self.rotate_deg {
            element.transform.rotate_deg = r;
        }
        if let Some(sx) = self.scale_x {
            element.transform.scale_x = sx;
        }
        if let Some(sy) = self.scale_y {
            element.transform.scale_y = sy;
        }
        if let Some(ref name) = self.name {
            element.name = name.clone();
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(ref content) = self.text_content {
            if let ElementKind::Text { content: existing, shaped, .. } = &mut element.kind {
                existing.clone_from(content);
                *shaped = None;
            }
        }
    }
}
