//! Hit-testing against document elements and selection-box handles.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::bounds::{self, Bounds};
use crate::camera::{Camera, Point};
use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::doc::{Document, LayerId};
use crate::element::ElementId;

/// Anchor position of a resize handle on the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    /// The handle diagonally/axially opposite this one — the point that stays
    /// fixed while this handle is dragged.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::N => Self::S,
            Self::Ne => Self::Sw,
            Self::E => Self::W,
            Self::Se => Self::Nw,
            Self::S => Self::N,
            Self::Sw => Self::Ne,
            Self::W => Self::E,
            Self::Nw => Self::Se,
        }
    }

    /// This handle's location on a bounds rectangle, in world mm.
    #[must_use]
    pub fn point_on(self, b: &Bounds) -> Point {
        let cx = b.x_mm + b.width_mm * 0.5;
        let cy = b.y_mm + b.height_mm * 0.5;
        match self {
            Self::N => Point::new(cx, b.y_mm),
            Self::Ne => Point::new(b.right(), b.y_mm),
            Self::E => Point::new(b.right(), cy),
            Self::Se => Point::new(b.right(), b.bottom()),
            Self::S => Point::new(cx, b.bottom()),
            Self::Sw => Point::new(b.x_mm, b.bottom()),
            Self::W => Point::new(b.x_mm, cy),
            Self::Nw => Point::new(b.x_mm, b.y_mm),
        }
    }

    /// Whether this handle drives the horizontal / vertical axis.
    #[must_use]
    pub fn axes(self) -> (bool, bool) {
        match self {
            Self::N | Self::S => (false, true),
            Self::E | Self::W => (true, false),
            Self::Ne | Self::Se | Self::Sw | Self::Nw => (true, true),
        }
    }
}

/// Which selection-box handle a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    Resize(ResizeAnchor),
    Rotate,
}

/// Result of a document hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTarget {
    pub element_id: ElementId,
    pub layer_id: LayerId,
}

/// Test which element (if any) is under `point_mm`.
///
/// Iterates layers topmost-first, skipping invisible layers, and elements
/// within each layer from last-drawn to first, so the visually topmost
/// element wins. Bounds are expanded by `tolerance_mm` of slop.
#[must_use]
pub fn hit_test(point_mm: Point, doc: &Document, tolerance_mm: f64) -> Option<HitTarget> {
    for layer in doc.layers_top_down() {
        if !layer.visible {
            continue;
        }
        for element in layer.elements.iter().rev() {
            if !element.visible {
                continue;
            }
            let Some(b) = bounds::element_bounds(element) else {
                continue;
            };
            if b.expand(tolerance_mm).contains_point(point_mm) {
                return Some(HitTarget { element_id: element.id, layer_id: layer.id });
            }
        }
    }
    None
}

/// Every visible element whose bounds overlap `rect` — overlap, not full
/// containment, qualifies. Returned in layer storage order.
#[must_use]
pub fn marquee_hits(rect: &Bounds, doc: &Document) -> Vec<ElementId> {
    let mut hits = Vec::new();
    for layer in &doc.layers {
        if !layer.visible {
            continue;
        }
        for element in &layer.elements {
            if !element.visible {
                continue;
            }
            if bounds::element_bounds(element).is_some_and(|b| b.intersects(rect)) {
                hits.push(element.id);
            }
        }
    }
    hits
}

/// Test whether a screen-space press lands on one of the selection box's
/// eight resize handles or its rotate handle. Handles live in screen space
/// so their hit radius does not change with zoom.
#[must_use]
pub fn hit_handle(
    screen_pt: Point,
    selection_bounds_mm: &Bounds,
    camera: &Camera,
    origin: Point,
) -> Option<HandleHit> {
    for anchor in ResizeAnchor::ALL {
        let handle_screen = camera.world_to_screen(anchor.point_on(selection_bounds_mm), origin);
        if dist_sq(screen_pt, handle_screen) <= HANDLE_RADIUS_PX * HANDLE_RADIUS_PX {
            return Some(HandleHit::Resize(anchor));
        }
    }
    let top_center = Point::new(
        selection_bounds_mm.x_mm + selection_bounds_mm.width_mm * 0.5,
        selection_bounds_mm.y_mm,
    );
    let mut rotate_screen = camera.world_to_screen(top_center, origin);
    rotate_screen.y -= ROTATE_HANDLE_OFFSET_PX;
    if dist_sq(screen_pt, rotate_screen) <= HANDLE_RADIUS_PX * HANDLE_RADIUS_PX {
        return Some(HandleHit::Rotate);
    }
    None
}

fn dist_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
