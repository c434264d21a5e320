//! Input model: tools, modifier keys, mouse buttons, and the gesture state
//! machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each variant carries the context captured at the moment the
//! gesture began — starting positions, transforms, the shared resize anchor —
//! so that every pointer-move can recompute the preview from a stable
//! baseline instead of accumulating deltas frame to frame.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::bounds::Bounds;
use crate::camera::Point;
use crate::element::{ElementId, Transform};
use crate::hit::ResizeAnchor;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Drag-to-pan tool.
    Pan,
}

/// Keyboard/mouse modifier keys held during an event.
///
/// Meaning by gesture: `shift` is additive selection on click/marquee,
/// aspect lock during resize, angle snap during rotate, and the coarse
/// nudge step; `alt` resizes from the center and switches nudges to the
/// fine step; `ctrl` snaps moves to the grid.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Cmd, whichever the platform uses for chords.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key, holding the name as reported by the browser
/// (e.g. `"Delete"`, `"Escape"`, `"ArrowLeft"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta in pixels (positive `dy` = down).
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Per-element position captured when a move gesture is seeded.
#[derive(Debug, Clone, Copy)]
pub struct MoveStart {
    pub id: ElementId,
    pub x_mm: f64,
    pub y_mm: f64,
}

/// Per-element transform captured when a resize gesture is seeded.
#[derive(Debug, Clone, Copy)]
pub struct ResizeStart {
    pub id: ElementId,
    pub transform: Transform,
}

/// Per-element rotation captured when a rotate gesture is seeded.
#[derive(Debug, Clone, Copy)]
pub struct RotateStart {
    pub id: ElementId,
    pub rotate_deg: f64,
}

/// The active gesture between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the canvas itself.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// Pressed on an element; becomes `Moving` once the drag threshold is
    /// crossed. A release before that is a pure click and must not touch
    /// the document.
    PendingMove {
        start_screen: Point,
        /// Starting position of every selected element that will move.
        starts: Vec<MoveStart>,
    },
    /// Committed element move; previews stream, the reducer hears nothing
    /// until release.
    Moving {
        start_screen: Point,
        starts: Vec<MoveStart>,
    },
    /// Pressed on empty canvas; becomes `Marquee` past the drag threshold.
    PendingMarquee {
        start_screen: Point,
        /// Union with the existing selection instead of replacing it.
        additive: bool,
    },
    /// Rubber-band selection in progress.
    Marquee {
        start_screen: Point,
        last_screen: Point,
        additive: bool,
    },
    /// Dragging a resize handle.
    Resizing {
        /// The handle being dragged.
        handle: ResizeAnchor,
        /// World point that stays fixed: the opposite handle, or the bounds
        /// center under the from-center modifier.
        anchor_mm: Point,
        /// Selection bounds at drag start.
        start_bounds: Bounds,
        starts: Vec<ResizeStart>,
    },
    /// Dragging the rotate handle.
    Rotating {
        /// Rotation pivot: the selection bounds center at drag start.
        center_mm: Point,
        /// Pointer bearing (degrees, screen convention) at drag start.
        start_pointer_deg: f64,
        starts: Vec<RotateStart>,
    },
}

impl InputState {
    /// Whether a gesture that mutates element geometry is in progress.
    #[must_use]
    pub fn is_transforming(&self) -> bool {
        matches!(self, Self::Moving { .. } | Self::Resizing { .. } | Self::Rotating { .. })
    }
}
