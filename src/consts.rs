//! Shared numeric constants for the canvas core.

// ── Camera ──────────────────────────────────────────────────────

/// CSS pixels per millimeter at zoom 1.0 (96 dpi ÷ 25.4 mm/inch).
pub const PX_PER_MM: f64 = 96.0 / 25.4;

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Zoom ceiling when fitting the artboard into a container.
pub const FIT_MAX_ZOOM: f64 = 2.0;

/// Symmetric padding around the artboard when fitting, in pixels.
pub const FIT_PADDING_PX: f64 = 24.0;

// ── Interaction ─────────────────────────────────────────────────

/// Squared pointer displacement (px²) at which a press becomes a drag.
pub const DRAG_THRESHOLD_SQ_PX: f64 = 9.0;

/// Grid step for snapped moves, in millimeters.
pub const GRID_SNAP_MM: f64 = 5.0;

/// Rotation snap step under the angle-snap modifier, in degrees.
pub const ANGLE_SNAP_DEG: f64 = 15.0;

/// Arrow-key nudge distance, in millimeters.
pub const NUDGE_MM: f64 = 1.0;

/// Arrow-key nudge distance with the fine modifier, in millimeters.
pub const NUDGE_FINE_MM: f64 = 0.1;

/// Arrow-key nudge distance with the coarse modifier, in millimeters.
pub const NUDGE_COARSE_MM: f64 = 5.0;

/// Scale factor floor applied during a resize drag.
pub const MIN_SCALE: f64 = 0.05;

/// Scale factor ceiling applied during a resize drag.
pub const MAX_SCALE: f64 = 20.0;

/// Net displacement (mm) below which a released drag is a no-op.
pub const COMMIT_EPSILON_MM: f64 = 0.01;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around element bounds.
pub const HIT_TOLERANCE_PX: f64 = 4.0;

/// Screen-space hit radius for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the selection box top edge to the rotate handle, in pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of undo snapshots retained; older ones drop silently.
pub const HISTORY_CAP: usize = 50;

// ── Text ────────────────────────────────────────────────────────

/// Fallback font id used when a requested font fails to load.
pub const DEFAULT_FONT_ID: &str = "inter-regular";

/// Width-per-character factor for the unshaped text bounds heuristic.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

// ── Export ──────────────────────────────────────────────────────

/// Finite stand-in written for ±Infinity in sanitized numeric output.
pub const INFINITY_SENTINEL: f64 = 1.0e6;
