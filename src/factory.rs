//! Parametric document factory.
//!
//! User-facing parameters (artboard shape and size, text lines, border) are
//! turned into a full document here. Any parameter change rebuilds the
//! document from scratch: every `system`-tagged element is regenerated, and
//! every element the user placed manually (logos, traces, ornaments) is
//! spliced back unchanged — same id, same transform. The export and
//! interaction layers both rely on that preservation invariant. Rebuilds go
//! through [`crate::history::Command::Reset`], so they are not undoable.

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::consts::TEXT_WIDTH_FACTOR;
use crate::doc::{Artboard, ArtboardShape, Document};
use crate::element::{Element, ElementKind, LayerKind, Transform};
use crate::sanitize::sanitize_number;

/// One line of parametric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParams {
    pub content: String,
    pub font_id: String,
    pub size_mm: f64,
    pub letter_spacing_mm: f64,
}

/// Border generation parameters: a scored outline inset from the edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderParams {
    pub margin_mm: f64,
}

/// Everything the parametric tools expose to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParams {
    pub shape: ArtboardShape,
    pub width_mm: f64,
    pub height_mm: f64,
    pub texts: Vec<TextParams>,
    pub border: Option<BorderParams>,
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            shape: ArtboardShape::Rect,
            width_mm: 100.0,
            height_mm: 100.0,
            texts: Vec::new(),
            border: None,
        }
    }
}

/// Line height multiple used when stacking text lines.
const TEXT_LINE_HEIGHT: f64 = 1.4;

/// Number of lobes on the scalloped outline.
const SCALLOP_LOBES: usize = 12;

/// Build a fresh document from parameters: artboard, base cut outline,
/// optional border, and one system text element per line.
#[must_use]
pub fn build_document(params: &DesignParams) -> Document {
    let outline_d = outline_path(params.shape, params.width_mm, params.height_mm);
    let artboard = Artboard {
        width_mm: params.width_mm,
        height_mm: params.height_mm,
        shape: params.shape,
        outline_d: outline_d.clone(),
    };
    let mut doc = Document::new(artboard);

    doc.insert(Element::new_system(ElementKind::Shape { d: outline_d }, LayerKind::Cut));

    if let Some(border) = params.border {
        doc.insert(border_element(params, border));
    }

    for (index, text) in params.texts.iter().enumerate() {
        doc.insert(text_element(params, text, index));
    }

    doc
}

/// Rebuild after a parameter change, splicing every non-system element from
/// the current document back into the fresh one.
#[must_use]
pub fn rebuild_document(current: &Document, params: &DesignParams) -> Document {
    let mut fresh = build_document(params);
    for layer in &current.layers {
        for element in &layer.elements {
            if !element.system {
                fresh.insert(element.clone());
            }
        }
    }
    fresh
}

fn border_element(params: &DesignParams, border: BorderParams) -> Element {
    let margin = border.margin_mm.clamp(0.0, params.width_mm.min(params.height_mm) * 0.4);
    let d = outline_path(
        params.shape,
        (params.width_mm - 2.0 * margin).max(1.0),
        (params.height_mm - 2.0 * margin).max(1.0),
    );
    let mut element = Element::new_system(ElementKind::Border { d }, LayerKind::Engrave);
    element.transform = Transform::at(margin, margin);
    element
}

fn text_element(params: &DesignParams, text: &TextParams, index: usize) -> Element {
    let total_height: f64 =
        params.texts.iter().map(|t| t.size_mm * TEXT_LINE_HEIGHT).sum::<f64>();
    let mut y = (params.height_mm - total_height).max(0.0) * 0.5;
    for line in &params.texts[..index] {
        y += line.size_mm * TEXT_LINE_HEIGHT;
    }

    let chars = text.content.chars().count();
    #[allow(clippy::cast_precision_loss)]
    let est_width = text.size_mm * TEXT_WIDTH_FACTOR * chars as f64
        + text.letter_spacing_mm * chars.saturating_sub(1) as f64;
    let x = (params.width_mm - est_width).max(0.0) * 0.5;

    let mut element = Element::new_system(
        ElementKind::Text {
            content: text.content.clone(),
            font_id: text.font_id.clone(),
            size_mm: text.size_mm,
            letter_spacing_mm: text.letter_spacing_mm,
            shaped: None,
        },
        LayerKind::Engrave,
    );
    element.transform = Transform::at(x, y);
    element
}

/// Generate the base outline path for a shape, spanning `0..w` × `0..h`.
#[must_use]
pub fn outline_path(shape: ArtboardShape, w: f64, h: f64) -> String {
    match shape {
        ArtboardShape::Rect => {
            format!("M 0 0 H {} V {} H 0 Z", sanitize_number(w), sanitize_number(h))
        }
        ArtboardShape::Circle => ellipse_path(w, h),
        ArtboardShape::Hex => polygon_path(6, w, h, -90.0),
        ArtboardShape::Octagon => polygon_path(8, w, h, -67.5),
        ArtboardShape::Scallop => scallop_path(w, h),
        ArtboardShape::Shield => shield_path(w, h),
    }
}

fn ellipse_path(w: f64, h: f64) -> String {
    let rx = w * 0.5;
    let ry = h * 0.5;
    let cy = ry;
    format!(
        "M 0 {cy} A {rx} {ry} 0 1 0 {w} {cy} A {rx} {ry} 0 1 0 0 {cy} Z",
        cy = sanitize_number(cy),
        rx = sanitize_number(rx),
        ry = sanitize_number(ry),
        w = sanitize_number(w),
    )
}

/// Regular polygon inscribed in the `w` × `h` box, first vertex at
/// `start_deg` (measured clockwise from +x, -90 = top center).
fn polygon_path(sides: usize, w: f64, h: f64, start_deg: f64) -> String {
    let points = ring_points(sides, w, h, start_deg);
    let mut d = String::new();
    for (index, (x, y)) in points.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{command} {} {} ", sanitize_number(*x), sanitize_number(*y));
    }
    d.push('Z');
    d
}

/// Scalloped disc: lobes bulging outward between points on the bounding
/// ellipse.
fn scallop_path(w: f64, h: f64) -> String {
    let points = ring_points(SCALLOP_LOBES, w, h, -90.0);
    let mut d = String::new();
    let (first_x, first_y) = points[0];
    let _ = write!(d, "M {} {} ", sanitize_number(first_x), sanitize_number(first_y));
    for index in 1..=points.len() {
        let (x, y) = points[index % points.len()];
        let (px, py) = points[index - 1];
        let chord = ((x - px).powi(2) + (y - py).powi(2)).sqrt();
        let r = sanitize_number(chord * 0.6);
        let _ = write!(d, "A {r} {r} 0 0 1 {} {} ", sanitize_number(x), sanitize_number(y));
    }
    d.push('Z');
    d
}

/// Heraldic shield: straight shoulders, curved flanks meeting at a bottom
/// point.
fn shield_path(w: f64, h: f64) -> String {
    let n = sanitize_number;
    format!(
        "M 0 0 H {w} V {waist} C {w} {hip}, {cx_hi} {toe}, {cx} {h} C {cx_lo} {toe}, 0 {hip}, 0 {waist} Z",
        w = n(w),
        waist = n(h * 0.55),
        hip = n(h * 0.78),
        toe = n(h * 0.94),
        cx_hi = n(w * 0.68),
        cx_lo = n(w * 0.32),
        cx = n(w * 0.5),
        h = n(h),
    )
}

fn ring_points(count: usize, w: f64, h: f64, start_deg: f64) -> Vec<(f64, f64)> {
    let cx = w * 0.5;
    let cy = h * 0.5;
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = (start_deg + 360.0 * i as f64 / count as f64).to_radians();
            (cx + cx * angle.cos(), cy + cy * angle.sin())
        })
        .collect()
}
