//! The canvas interaction controller.
//!
//! [`EngineCore`] is the browser-free state machine: it owns the history,
//! camera, gesture state, and live-preview channel, and turns pointer,
//! wheel, and keyboard events into document commands. It is fully testable
//! natively. [`Engine`] wraps it for the browser, applying preview
//! transforms as direct DOM attribute writes.
//!
//! Two invariants drive the event flow:
//!
//! - **Click vs drag**: a press only becomes a drag once squared pointer
//!   displacement exceeds the threshold. A pure click may change the
//!   selection but never touches the document or the undo stacks.
//! - **Preview, then commit**: while a move/resize/rotate is in progress
//!   the reducer hears nothing; per-frame transforms go to the
//!   [`LivePreview`] side-channel. On release the whole gesture folds into
//!   one undo step (`Commit` + one batched `UpdateTransform`), or into
//!   nothing at all if the net displacement is ~0.
//!
//! Pointer-moves are latched into a single pending slot and consumed by
//! [`EngineCore::on_frame`], which the host calls once per animation frame —
//! a second move event arriving before the frame fires coalesces into the
//! pending one.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::bounds::Bounds;
use crate::camera::{Camera, Point};
use crate::consts;
use crate::doc::Document;
use crate::element::{ElementId, Transform};
use crate::history::{Command, History};
use crate::hit::{self, HandleHit, ResizeAnchor};
use crate::input::{
    Button, InputState, Key, Modifiers, MoveStart, ResizeStart, RotateStart, Tool, WheelDelta,
};
use crate::preview::LivePreview;
use crate::selection::{SelectionMode, selection_bounds};

/// Tunable interaction parameters, injected at construction. Defaults come
/// from [`crate::consts`].
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub fit_padding_px: f64,
    pub drag_threshold_sq_px: f64,
    pub grid_snap_mm: f64,
    pub angle_snap_deg: f64,
    pub nudge_mm: f64,
    pub nudge_fine_mm: f64,
    pub nudge_coarse_mm: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub hit_tolerance_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: consts::MIN_ZOOM,
            max_zoom: consts::MAX_ZOOM,
            fit_padding_px: consts::FIT_PADDING_PX,
            drag_threshold_sq_px: consts::DRAG_THRESHOLD_SQ_PX,
            grid_snap_mm: consts::GRID_SNAP_MM,
            angle_snap_deg: consts::ANGLE_SNAP_DEG,
            nudge_mm: consts::NUDGE_MM,
            nudge_fine_mm: consts::NUDGE_FINE_MM,
            nudge_coarse_mm: consts::NUDGE_COARSE_MM,
            min_scale: consts::MIN_SCALE,
            max_scale: consts::MAX_SCALE,
            hit_tolerance_px: consts::HIT_TOLERANCE_PX,
        }
    }
}

/// Non-fatal conditions surfaced to the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// Some selected elements were excluded from a mutation because they or
    /// their layer are locked.
    LockedElementsSkipped { count: usize },
}

/// Notifications returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Overlays or the scene need a redraw.
    RenderNeeded,
    /// Schedule one animation frame that calls [`EngineCore::on_frame`].
    FrameRequested,
    /// The selection set or active element changed.
    SelectionChanged,
    /// The committed document changed (commit, delete, undo, redo).
    DocChanged,
    /// Change the canvas cursor.
    SetCursor(String),
    Warning(Warning),
}

/// Core engine state — everything that doesn't touch the DOM.
pub struct EngineCore {
    pub history: History,
    pub camera: Camera,
    pub tool: Tool,
    pub input: InputState,
    pub preview: LivePreview,
    pub config: EngineConfig,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pending_pointer: Option<(Point, Modifiers)>,
    frame_scheduled: bool,
}

impl EngineCore {
    #[must_use]
    pub fn new(document: Document, config: EngineConfig) -> Self {
        Self {
            history: History::new(document),
            camera: Camera::default(),
            tool: Tool::default(),
            input: InputState::default(),
            preview: LivePreview::new(),
            config,
            viewport_width: 0.0,
            viewport_height: 0.0,
            pending_pointer: None,
            frame_scheduled: false,
        }
    }

    // --- Viewport / camera ---

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Center the artboard in the viewport at a fitted zoom.
    pub fn fit_view(&mut self) {
        let artboard = &self.history.document().artboard;
        self.camera = Camera::fit_to_container(
            artboard.width_mm,
            artboard.height_mm,
            self.viewport_width,
            self.viewport_height,
            self.config.fit_padding_px,
        );
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    // --- Queries ---

    #[must_use]
    pub fn document(&self) -> &Document {
        self.history.document()
    }

    /// The marquee rectangle in world mm while a marquee drag is active.
    #[must_use]
    pub fn marquee_rect_mm(&self) -> Option<Bounds> {
        let InputState::Marquee { start_screen, last_screen, .. } = &self.input else {
            return None;
        };
        Some(self.screen_rect_to_world(*start_screen, *last_screen))
    }

    // --- Pointer events ---

    pub fn on_pointer_down(
        &mut self,
        screen: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        if button == Button::Middle || self.tool == Tool::Pan {
            self.input = InputState::Panning { last_screen: screen };
            return vec![Action::SetCursor("grabbing".to_owned())];
        }
        if button != Button::Primary {
            return Vec::new();
        }

        let mut actions = Vec::new();

        // Selection-box handles take precedence over element bodies.
        if !self.history.selection().is_empty() {
            if let Some(bounds) =
                selection_bounds(self.history.selection().selected(), self.history.document())
            {
                if let Some(handle) = hit::hit_handle(screen, &bounds, &self.camera, Point::ZERO) {
                    return self.start_handle_gesture(handle, &bounds, screen, modifiers);
                }
            }
        }

        let world = self.camera.screen_to_world(screen, Point::ZERO);
        let tolerance_mm = self.camera.screen_dist_to_world(self.config.hit_tolerance_px);
        match hit::hit_test(world, self.history.document(), tolerance_mm) {
            Some(target) => {
                let was_selected = self.history.selection().contains(target.element_id);
                if modifiers.shift {
                    let mut next = self.history.selection().clone();
                    next.toggle(target.element_id);
                    let active = next.active();
                    self.history
                        .dispatch(Command::Select { ids: next.selected().to_vec(), active });
                    actions.push(Action::SelectionChanged);
                } else if !was_selected {
                    self.history.dispatch(Command::Select {
                        ids: vec![target.element_id],
                        active: Some(target.element_id),
                    });
                    actions.push(Action::SelectionChanged);
                }

                if self.history.selection().contains(target.element_id)
                    && !self.history.document().is_locked(target.element_id)
                {
                    let starts = self.seed_move();
                    self.input = InputState::PendingMove { start_screen: screen, starts };
                }
                actions.push(Action::RenderNeeded);
            }
            None => {
                self.input =
                    InputState::PendingMarquee { start_screen: screen, additive: modifiers.shift };
            }
        }
        actions
    }

    /// Latch the pointer position for the next frame. Returns
    /// [`Action::FrameRequested`] only when no frame is already scheduled —
    /// further moves coalesce into the pending slot.
    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        self.pending_pointer = Some((screen, modifiers));
        if self.frame_scheduled {
            return Vec::new();
        }
        self.frame_scheduled = true;
        vec![Action::FrameRequested]
    }

    /// Consume the latched pointer position and advance the gesture state
    /// machine. Called by the host once per animation frame.
    pub fn on_frame(&mut self) -> Vec<Action> {
        self.frame_scheduled = false;
        let Some((screen, modifiers)) = self.pending_pointer.take() else {
            return Vec::new();
        };

        let mut actions = Vec::new();
        let state = std::mem::take(&mut self.input);
        match state {
            InputState::Idle => {}
            InputState::Panning { last_screen } => {
                self.camera.pan_x += screen.x - last_screen.x;
                self.camera.pan_y += screen.y - last_screen.y;
                self.input = InputState::Panning { last_screen: screen };
                actions.push(Action::RenderNeeded);
            }
            InputState::PendingMove { start_screen, starts } => {
                if dist_sq(screen, start_screen) >= self.config.drag_threshold_sq_px {
                    let skipped = self.history.selection().len().saturating_sub(starts.len());
                    if skipped > 0 {
                        actions.push(Action::Warning(Warning::LockedElementsSkipped {
                            count: skipped,
                        }));
                    }
                    self.history.dispatch(Command::SetSelectionMode(SelectionMode::Dragging));
                    self.apply_move(screen, start_screen, modifiers, &starts);
                    self.input = InputState::Moving { start_screen, starts };
                    actions.push(Action::RenderNeeded);
                } else {
                    self.input = InputState::PendingMove { start_screen, starts };
                }
            }
            InputState::Moving { start_screen, starts } => {
                self.apply_move(screen, start_screen, modifiers, &starts);
                self.input = InputState::Moving { start_screen, starts };
                actions.push(Action::RenderNeeded);
            }
            InputState::PendingMarquee { start_screen, additive } => {
                if dist_sq(screen, start_screen) >= self.config.drag_threshold_sq_px {
                    self.history.dispatch(Command::SetSelectionMode(SelectionMode::Marquee));
                    self.input =
                        InputState::Marquee { start_screen, last_screen: screen, additive };
                    actions.push(Action::RenderNeeded);
                } else {
                    self.input = InputState::PendingMarquee { start_screen, additive };
                }
            }
            InputState::Marquee { start_screen, additive, .. } => {
                self.input = InputState::Marquee { start_screen, last_screen: screen, additive };
                actions.push(Action::RenderNeeded);
            }
            InputState::Resizing { handle, anchor_mm, start_bounds, starts } => {
                self.apply_resize(screen, modifiers, handle, anchor_mm, &start_bounds, &starts);
                self.input = InputState::Resizing { handle, anchor_mm, start_bounds, starts };
                actions.push(Action::RenderNeeded);
            }
            InputState::Rotating { center_mm, start_pointer_deg, starts } => {
                self.apply_rotate(screen, modifiers, center_mm, start_pointer_deg, &starts);
                self.input = InputState::Rotating { center_mm, start_pointer_deg, starts };
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    pub fn on_pointer_up(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        // A latched move that never got its frame still counts for the
        // final geometry.
        let mut actions = if self.pending_pointer.is_some() { self.on_frame() } else { Vec::new() };

        let state = std::mem::take(&mut self.input);
        match state {
            InputState::Idle => {}
            InputState::Panning { .. } => {
                actions.push(Action::SetCursor("default".to_owned()));
            }
            InputState::PendingMove { .. } => {
                // Pure click: selection was handled on pointer-down; the
                // document and history stay untouched.
            }
            InputState::Moving { .. } | InputState::Resizing { .. } | InputState::Rotating { .. } => {
                actions.extend(self.commit_preview());
            }
            InputState::PendingMarquee { additive, .. } => {
                if !additive && !self.history.selection().is_empty() {
                    self.history.dispatch(Command::ClearSelection);
                    actions.push(Action::SelectionChanged);
                }
                actions.push(Action::RenderNeeded);
            }
            InputState::Marquee { start_screen, additive, .. } => {
                let rect = self.screen_rect_to_world(start_screen, screen);
                let mut ids = if additive {
                    self.history.selection().selected().to_vec()
                } else {
                    Vec::new()
                };
                for id in hit::marquee_hits(&rect, self.history.document()) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                let active = ids.last().copied();
                self.history.dispatch(Command::Select { ids, active });
                self.history.dispatch(Command::SetSelectionMode(SelectionMode::Idle));
                actions.push(Action::SelectionChanged);
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            let factor = if delta.dy < 0.0 { 1.1 } else { 1.0 / 1.1 };
            let target =
                (self.camera.zoom * factor).clamp(self.config.min_zoom, self.config.max_zoom);
            self.camera = self.camera.zoomed_at_point(target, screen, Point::ZERO);
        } else {
            self.camera.pan_x -= delta.dx;
            self.camera.pan_y -= delta.dy;
        }
        vec![Action::RenderNeeded]
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "Escape" => self.escape(),
            "ArrowLeft" => self.nudge(-1.0, 0.0, modifiers),
            "ArrowRight" => self.nudge(1.0, 0.0, modifiers),
            "ArrowUp" => self.nudge(0.0, -1.0, modifiers),
            "ArrowDown" => self.nudge(0.0, 1.0, modifiers),
            "a" | "A" if modifiers.command() => {
                self.history.dispatch(Command::SelectAll);
                vec![Action::SelectionChanged, Action::RenderNeeded]
            }
            "z" | "Z" if modifiers.command() => {
                if modifiers.shift {
                    self.history.dispatch(Command::Redo);
                } else {
                    self.history.dispatch(Command::Undo);
                }
                vec![Action::DocChanged, Action::SelectionChanged, Action::RenderNeeded]
            }
            "y" | "Y" if modifiers.command() => {
                self.history.dispatch(Command::Redo);
                vec![Action::DocChanged, Action::SelectionChanged, Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    /// Cancel any in-flight gesture without committing it.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        self.pending_pointer = None;
        self.input = InputState::Idle;
        self.preview.clear();
        self.history.dispatch(Command::SetSelectionMode(SelectionMode::Idle));
        vec![Action::RenderNeeded]
    }

    // --- Gesture internals ---

    fn start_handle_gesture(
        &mut self,
        handle: HandleHit,
        bounds: &Bounds,
        screen: Point,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let mut actions = Vec::new();
        let world = self.camera.screen_to_world(screen, Point::ZERO);
        match handle {
            HandleHit::Rotate => {
                let (starts, skipped) = self.seed_rotate();
                if skipped > 0 {
                    actions.push(Action::Warning(Warning::LockedElementsSkipped { count: skipped }));
                }
                if starts.is_empty() {
                    return actions;
                }
                let center = bounds.center();
                self.input = InputState::Rotating {
                    center_mm: center,
                    start_pointer_deg: pointer_bearing(center, world),
                    starts,
                };
                self.history.dispatch(Command::SetSelectionMode(SelectionMode::Rotating));
            }
            HandleHit::Resize(anchor) => {
                let (starts, skipped) = self.seed_resize();
                if skipped > 0 {
                    actions.push(Action::Warning(Warning::LockedElementsSkipped { count: skipped }));
                }
                if starts.is_empty() {
                    return actions;
                }
                let anchor_mm = if modifiers.alt {
                    bounds.center()
                } else {
                    anchor.opposite().point_on(bounds)
                };
                self.input = InputState::Resizing {
                    handle: anchor,
                    anchor_mm,
                    start_bounds: *bounds,
                    starts,
                };
                self.history.dispatch(Command::SetSelectionMode(SelectionMode::Resizing));
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn seed_move(&self) -> Vec<MoveStart> {
        let doc = self.history.document();
        self.history
            .selection()
            .selected()
            .iter()
            .filter(|id| !doc.is_locked(**id))
            .filter_map(|id| {
                doc.find(*id).map(|(_, el)| MoveStart {
                    id: *id,
                    x_mm: el.transform.x_mm,
                    y_mm: el.transform.y_mm,
                })
            })
            .collect()
    }

    fn seed_resize(&self) -> (Vec<ResizeStart>, usize) {
        let doc = self.history.document();
        let mut starts = Vec::new();
        let mut skipped = 0;
        for id in self.history.selection().selected() {
            if doc.is_locked(*id) {
                skipped += 1;
                continue;
            }
            if let Some((_, el)) = doc.find(*id) {
                starts.push(ResizeStart { id: *id, transform: el.transform });
            }
        }
        (starts, skipped)
    }

    fn seed_rotate(&self) -> (Vec<RotateStart>, usize) {
        let doc = self.history.document();
        let mut starts = Vec::new();
        let mut skipped = 0;
        for id in self.history.selection().selected() {
            if doc.is_locked(*id) {
                skipped += 1;
                continue;
            }
            if let Some((_, el)) = doc.find(*id) {
                starts.push(RotateStart { id: *id, rotate_deg: el.transform.rotate_deg });
            }
        }
        (starts, skipped)
    }

    fn apply_move(
        &mut self,
        screen: Point,
        start_screen: Point,
        modifiers: Modifiers,
        starts: &[MoveStart],
    ) {
        let scale = self.camera.scale();
        let dx = (screen.x - start_screen.x) / scale;
        let dy = (screen.y - start_screen.y) / scale;
        for start in starts {
            let Some((_, element)) = self.history.document().find(start.id) else {
                continue;
            };
            let mut x = start.x_mm + dx;
            let mut y = start.y_mm + dy;
            if modifiers.ctrl {
                x = snap(x, self.config.grid_snap_mm);
                y = snap(y, self.config.grid_snap_mm);
            }
            self.preview.set(start.id, Transform { x_mm: x, y_mm: y, ..element.transform });
        }
    }

    fn apply_resize(
        &mut self,
        screen: Point,
        modifiers: Modifiers,
        handle: ResizeAnchor,
        anchor_mm: Point,
        start_bounds: &Bounds,
        starts: &[ResizeStart],
    ) {
        let world = self.camera.screen_to_world(screen, Point::ZERO);
        let handle_pt = handle.point_on(start_bounds);
        let (drive_x, drive_y) = handle.axes();

        let mut sx = if drive_x {
            extent_ratio(world.x - anchor_mm.x, handle_pt.x - anchor_mm.x)
        } else {
            1.0
        };
        let mut sy = if drive_y {
            extent_ratio(world.y - anchor_mm.y, handle_pt.y - anchor_mm.y)
        } else {
            1.0
        };

        if modifiers.shift {
            // Aspect lock: the axis with the larger pointer displacement
            // from the handle's start position drives both dimensions.
            let uniform = if drive_x && drive_y {
                if (world.x - handle_pt.x).abs() >= (world.y - handle_pt.y).abs() { sx } else { sy }
            } else if drive_x {
                sx
            } else {
                sy
            };
            sx = uniform;
            sy = uniform;
        }

        sx = clamp_scale(sx, self.config.min_scale, self.config.max_scale);
        sy = clamp_scale(sy, self.config.min_scale, self.config.max_scale);

        for start in starts {
            let t0 = start.transform;
            // Re-derive position relative to the shared anchor so the whole
            // group scales rigidly around it.
            let x = anchor_mm.x + (t0.x_mm - anchor_mm.x) * sx;
            let y = anchor_mm.y + (t0.y_mm - anchor_mm.y) * sy;
            self.preview.set(
                start.id,
                Transform {
                    x_mm: x,
                    y_mm: y,
                    rotate_deg: t0.rotate_deg,
                    scale_x: t0.scale_x * sx,
                    scale_y: t0.scale_y * sy,
                },
            );
        }
    }

    fn apply_rotate(
        &mut self,
        screen: Point,
        modifiers: Modifiers,
        center_mm: Point,
        start_pointer_deg: f64,
        starts: &[RotateStart],
    ) {
        let world = self.camera.screen_to_world(screen, Point::ZERO);
        let delta = pointer_bearing(center_mm, world) - start_pointer_deg;
        for start in starts {
            let Some((_, element)) = self.history.document().find(start.id) else {
                continue;
            };
            let mut deg = start.rotate_deg + delta;
            if modifiers.shift {
                deg = snap(deg, self.config.angle_snap_deg);
            }
            self.preview
                .set(start.id, Transform { rotate_deg: normalize_deg(deg), ..element.transform });
        }
    }

    /// Fold the preview into history: one `Commit` plus one batched
    /// transform update — or nothing at all when the net change is ~0.
    fn commit_preview(&mut self) -> Vec<Action> {
        let batch: Vec<(ElementId, Transform)> =
            self.preview.iter().map(|(id, t)| (id, *t)).collect();
        self.preview.clear();
        self.history.dispatch(Command::SetSelectionMode(SelectionMode::Idle));

        let doc = self.history.document();
        let changed = batch.iter().any(|(id, t)| {
            doc.find(*id).is_some_and(|(_, el)| transform_changed(&el.transform, t))
        });
        if !changed {
            return vec![Action::RenderNeeded];
        }

        debug!(elements = batch.len(), "committing gesture");
        self.history.dispatch(Command::Commit);
        self.history.dispatch(Command::UpdateTransform(batch));
        vec![Action::DocChanged, Action::RenderNeeded]
    }

    fn delete_selected(&mut self) -> Vec<Action> {
        let doc = self.history.document();
        let mut locked_skipped = 0;
        let mut ids = Vec::new();
        for id in self.history.selection().selected() {
            if doc.is_locked(*id) {
                locked_skipped += 1;
                continue;
            }
            // System elements are owned by the parametric rebuild and can't
            // be deleted directly.
            if doc.find(*id).is_some_and(|(_, el)| !el.system) {
                ids.push(*id);
            }
        }

        let mut actions = Vec::new();
        if locked_skipped > 0 {
            actions.push(Action::Warning(Warning::LockedElementsSkipped { count: locked_skipped }));
        }
        if !ids.is_empty() {
            self.history.dispatch(Command::RemoveElements(ids));
            actions.push(Action::DocChanged);
            actions.push(Action::SelectionChanged);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn escape(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Idle) {
            if self.history.selection().is_empty() {
                return Vec::new();
            }
            self.history.dispatch(Command::ClearSelection);
            return vec![Action::SelectionChanged, Action::RenderNeeded];
        }
        self.cancel_gesture()
    }

    fn nudge(&mut self, dir_x: f64, dir_y: f64, modifiers: Modifiers) -> Vec<Action> {
        let step = if modifiers.alt {
            self.config.nudge_fine_mm
        } else if modifiers.shift {
            self.config.nudge_coarse_mm
        } else {
            self.config.nudge_mm
        };

        let doc = self.history.document();
        let mut skipped = 0;
        let mut batch = Vec::new();
        for id in self.history.selection().selected() {
            if doc.is_locked(*id) {
                skipped += 1;
                continue;
            }
            if let Some((_, el)) = doc.find(*id) {
                batch.push((*id, el.transform.translated(dir_x * step, dir_y * step)));
            }
        }

        let mut actions = Vec::new();
        if skipped > 0 {
            actions.push(Action::Warning(Warning::LockedElementsSkipped { count: skipped }));
        }
        if !batch.is_empty() {
            self.history.dispatch(Command::Commit);
            self.history.dispatch(Command::UpdateTransform(batch));
            actions.push(Action::DocChanged);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn screen_rect_to_world(&self, a: Point, b: Point) -> Bounds {
        let wa = self.camera.screen_to_world(a, Point::ZERO);
        let wb = self.camera.screen_to_world(b, Point::ZERO);
        Bounds::new(
            wa.x.min(wb.x),
            wa.y.min(wb.y),
            (wb.x - wa.x).abs(),
            (wb.y - wa.y).abs(),
        )
    }
}

/// Pointer bearing around `center` in the screen rotation convention:
/// straight up is 0°, growing clockwise.
fn pointer_bearing(center: Point, pointer: Point) -> f64 {
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees() + 90.0
}

fn normalize_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

fn snap(value: f64, step: f64) -> f64 {
    if step <= 0.0 { value } else { (value / step).round() * step }
}

fn extent_ratio(new_extent: f64, old_extent: f64) -> f64 {
    if old_extent.abs() < f64::EPSILON { 1.0 } else { new_extent / old_extent }
}

fn clamp_scale(raw: f64, min: f64, max: f64) -> f64 {
    if raw < 0.0 { raw.clamp(-max, -min) } else { raw.clamp(min, max) }
}

fn dist_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

fn transform_changed(a: &Transform, b: &Transform) -> bool {
    (a.x_mm - b.x_mm).abs() > consts::COMMIT_EPSILON_MM
        || (a.y_mm - b.y_mm).abs() > consts::COMMIT_EPSILON_MM
        || (a.rotate_deg - b.rotate_deg).abs() > consts::COMMIT_EPSILON_MM
        || (a.scale_x - b.scale_x).abs() > consts::COMMIT_EPSILON_MM
        || (a.scale_y - b.scale_y).abs() > consts::COMMIT_EPSILON_MM
}

/// The browser-facing engine: wraps [`EngineCore`] and applies the live
/// preview as direct DOM writes against the host's render tree, where each
/// element node carries its element id as the DOM id.
pub struct Engine {
    root: web_sys::Element,
    pub core: EngineCore,
    previewed: std::collections::HashSet<ElementId>,
}

impl Engine {
    #[must_use]
    pub fn new(root: web_sys::Element, document: Document, config: EngineConfig) -> Self {
        Self { root, core: EngineCore::new(document, config), previewed: std::collections::HashSet::new() }
    }

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen, button, modifiers);
        self.after(&actions);
        actions
    }

    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen, modifiers)
    }

    pub fn on_frame(&mut self) -> Vec<Action> {
        let actions = self.core.on_frame();
        self.after(&actions);
        actions
    }

    pub fn on_pointer_up(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_up(screen, modifiers);
        self.after(&actions);
        actions
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_wheel(screen, delta, modifiers);
        self.after(&actions);
        actions
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.after(&actions);
        actions
    }

    fn after(&mut self, actions: &[Action]) {
        for action in actions {
            if let Action::SetCursor(cursor) = action {
                // The host styles the container off this attribute.
                let _ = self.root.set_attribute("data-cursor", cursor);
            }
        }
        self.sync_preview();
    }

    /// Write preview transforms straight onto the DOM nodes, and restore the
    /// committed transform on nodes whose preview just ended.
    fn sync_preview(&mut self) {
        let Some(dom) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let live: std::collections::HashSet<ElementId> =
            self.core.preview.iter().map(|(id, _)| id).collect();

        for id in self.previewed.difference(&live) {
            if let Some(node) = dom.get_element_by_id(&id.to_string()) {
                let committed = self
                    .core
                    .document()
                    .find(*id)
                    .map(|(_, el)| crate::export::transform_attr(&el.transform))
                    .unwrap_or_default();
                let _ = node.set_attribute("transform", &committed);
            }
        }
        for (id, transform) in self.core.preview.iter() {
            if let Some(node) = dom.get_element_by_id(&id.to_string()) {
                let _ = node.set_attribute("transform", &crate::export::transform_attr(transform));
            }
        }
        self.previewed = live;
    }
}
