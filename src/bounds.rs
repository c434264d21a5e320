//! Axis-aligned bounds in world millimeters.
//!
//! Element bounds are computed from kind-local geometry, scaled (flips
//! included), then translated into place. Rotation is deliberately NOT
//! applied: selection boxes and overlays use the unrotated footprint, the
//! same simplification the on-canvas handles are drawn with. Path bounds use
//! a numeric-token scan rather than a real path parser, so control points of
//! curves count as extremes — a known, accepted approximation for this
//! domain (closed ornament/logo paths whose control points sit near the
//! outline).

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::TEXT_WIDTH_FACTOR;
use crate::element::{Element, ElementKind};

/// An axis-aligned rectangle in world millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x_mm: f64, y_mm: f64, width_mm: f64, height_mm: f64) -> Self {
        Self { x_mm, y_mm, width_mm, height_mm }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x_mm + self.width_mm
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y_mm + self.height_mm
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x_mm + self.width_mm * 0.5, self.y_mm + self.height_mm * 0.5)
    }

    /// Grow (or shrink, for negative `margin`) by `margin` on every side.
    #[must_use]
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            x_mm: self.x_mm - margin,
            y_mm: self.y_mm - margin,
            width_mm: (self.width_mm + 2.0 * margin).max(0.0),
            height_mm: (self.height_mm + 2.0 * margin).max(0.0),
        }
    }

    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x_mm && p.x <= self.right() && p.y >= self.y_mm && p.y <= self.bottom()
    }

    /// True when the two rectangles overlap at all (edge touch counts).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_mm <= other.right()
            && other.x_mm <= self.right()
            && self.y_mm <= other.bottom()
            && other.y_mm <= self.bottom()
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x_mm.min(other.x_mm);
        let y = self.y_mm.min(other.y_mm);
        Self {
            x_mm: x,
            y_mm: y,
            width_mm: self.right().max(other.right()) - x,
            height_mm: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Union of any number of bounds; `None` for an empty input.
pub fn union_all<I>(bounds: I) -> Option<Bounds>
where
    I: IntoIterator<Item = Bounds>,
{
    bounds.into_iter().reduce(|acc, b| acc.union(&b))
}

/// Scan path data for numeric tokens, pair them positionally as (x, y), and
/// take the min/max envelope. `None` when fewer than one full pair is found.
#[must_use]
pub fn path_data_bounds(d: &str) -> Option<Bounds> {
    let numbers = scan_numbers(d);
    let mut pairs = numbers.chunks_exact(2);
    let first = pairs.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first[0], first[1], first[0], first[1]);
    for pair in pairs {
        min_x = min_x.min(pair[0]);
        max_x = max_x.max(pair[0]);
        min_y = min_y.min(pair[1]);
        max_y = max_y.max(pair[1]);
    }
    Some(Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// World-space bounds for an element: kind-local bounds, scaled about the
/// local origin (min/max taken after scaling so negative scales flip
/// correctly), then translated. Rotation is ignored by design.
#[must_use]
pub fn element_bounds(element: &Element) -> Option<Bounds> {
    let local = local_bounds(element)?;
    let t = &element.transform;
    let x1 = local.x_mm * t.scale_x;
    let x2 = local.right() * t.scale_x;
    let y1 = local.y_mm * t.scale_y;
    let y2 = local.bottom() * t.scale_y;
    Some(Bounds {
        x_mm: x1.min(x2) + t.x_mm,
        y_mm: y1.min(y2) + t.y_mm,
        width_mm: (x2 - x1).abs(),
        height_mm: (y2 - y1).abs(),
    })
}

/// Bounds in the element's own coordinate space, before its transform.
fn local_bounds(element: &Element) -> Option<Bounds> {
    match &element.kind {
        ElementKind::Shape { d }
        | ElementKind::Border { d }
        | ElementKind::Ornament { d }
        | ElementKind::BasicShape { d }
        | ElementKind::TracedPath { d }
        | ElementKind::Logo { d, .. }
        | ElementKind::Icon { d } => path_data_bounds(d),
        ElementKind::TracedPathGroup { paths } => {
            union_all(paths.iter().filter_map(|p| path_data_bounds(p)))
        }
        ElementKind::Text { content, size_mm, letter_spacing_mm, shaped, .. } => {
            if let Some(shaped) = shaped {
                return Some(Bounds::new(0.0, 0.0, shaped.width_mm, shaped.height_mm));
            }
            text_heuristic_bounds(content, *size_mm, *letter_spacing_mm)
        }
        ElementKind::EngraveImage { width_mm, height_mm, .. }
        | ElementKind::EngraveSketch { width_mm, height_mm, .. } => {
            Some(Bounds::new(0.0, 0.0, *width_mm, *height_mm))
        }
    }
}

/// Character-count estimate used until the font collaborator has shaped the
/// text: width ≈ chars × size × 0.6 plus letter spacing between glyphs.
fn text_heuristic_bounds(content: &str, size_mm: f64, letter_spacing_mm: f64) -> Option<Bounds> {
    let chars = content.chars().count();
    if chars == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let width = size_mm * TEXT_WIDTH_FACTOR * chars as f64 + letter_spacing_mm * (chars - 1) as f64;
    Some(Bounds::new(0.0, 0.0, width, size_mm))
}

/// Extract numeric tokens from path data. A sign character starts a new token
/// unless it follows an exponent marker; anything unparseable is skipped.
fn scan_numbers(d: &str) -> Vec<f64> {
    let mut numbers = Vec::new();
    let mut token = String::new();
    for ch in d.chars() {
        match ch {
            '0'..='9' | '.' => token.push(ch),
            'e' | 'E' if !token.is_empty() => token.push(ch),
            '-' | '+' => {
                if token.ends_with(['e', 'E']) {
                    token.push(ch);
                } else {
                    flush_token(&mut token, &mut numbers);
                    token.push(ch);
                }
            }
            _ => flush_token(&mut token, &mut numbers),
        }
    }
    flush_token(&mut token, &mut numbers);
    numbers
}

fn flush_token(token: &mut String, numbers: &mut Vec<f64>) {
    if token.is_empty() {
        return;
    }
    if let Ok(value) = token.parse::<f64>() {
        numbers.push(value);
    }
    token.clear();
}
