#![allow(clippy::float_cmp)]

use super::*;
use crate::bounds::element_bounds;
use crate::doc::{Artboard, ArtboardShape};
use crate::element::{Element, ElementKind, LayerKind};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn make_doc() -> Document {
    Document::new(Artboard {
        width_mm: 100.0,
        height_mm: 100.0,
        shape: ArtboardShape::Rect,
        outline_d: "M 0 0 H 100 V 100 H 0 Z".into(),
    })
}

fn rect_element(x: f64, y: f64, w: f64, h: f64) -> Element {
    let mut el = Element::new(
        ElementKind::BasicShape { d: format!("M 0 0 L {w} 0 L {w} {h} L 0 {h} Z") },
        LayerKind::Engrave,
    );
    el.transform = Transform::at(x, y);
    el
}

/// Engine with a 1px = 1mm camera so screen and world coordinates coincide.
fn unit_engine(doc: Document) -> EngineCore {
    let mut core = EngineCore::new(doc, EngineConfig::default());
    core.camera.px_per_mm = 1.0;
    core
}

fn engine_with_rect(x: f64, y: f64, w: f64, h: f64) -> (EngineCore, ElementId) {
    let mut doc = make_doc();
    let el = rect_element(x, y, w, h);
    let id = el.id;
    doc.insert(el);
    (unit_engine(doc), id)
}

fn press(core: &mut EngineCore, at: Point) -> Vec<Action> {
    core.on_pointer_down(at, Button::Primary, Modifiers::default())
}

fn drag(core: &mut EngineCore, from: Point, to: Point, modifiers: Modifiers) -> Vec<Action> {
    let mut actions = core.on_pointer_down(from, Button::Primary, modifiers);
    actions.extend(core.on_pointer_move(to, modifiers));
    actions.extend(core.on_frame());
    actions.extend(core.on_pointer_up(to, modifiers));
    actions
}

fn element_x(core: &EngineCore, id: ElementId) -> f64 {
    core.document().find(id).unwrap().1.transform.x_mm
}

fn has_warning(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::Warning(_)))
}

// =============================================================
// Click vs drag
// =============================================================

#[test]
fn click_selects_without_history_entry() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    press(&mut core, pt(15.0, 15.0));
    core.on_pointer_move(pt(16.0, 16.0), Modifiers::default());
    core.on_frame();
    core.on_pointer_up(pt(16.0, 16.0), Modifiers::default());

    assert!(core.history.selection().contains(id));
    assert_eq!(core.history.past_len(), 0);
    assert_eq!(element_x(&core, id), 10.0);
}

#[test]
fn click_without_any_move_event_also_selects() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    press(&mut core, pt(15.0, 15.0));
    core.on_pointer_up(pt(15.0, 15.0), Modifiers::default());
    assert!(core.history.selection().contains(id));
    assert_eq!(core.history.past_len(), 0);
}

#[test]
fn click_on_empty_canvas_clears_selection() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    press(&mut core, pt(15.0, 15.0));
    core.on_pointer_up(pt(15.0, 15.0), Modifiers::default());
    assert!(core.history.selection().contains(id));

    press(&mut core, pt(90.0, 90.0));
    let actions = core.on_pointer_up(pt(90.0, 90.0), Modifiers::default());
    assert!(core.history.selection().is_empty());
    assert!(actions.contains(&Action::SelectionChanged));
}

#[test]
fn shift_click_toggles_membership() {
    let mut doc = make_doc();
    let a = rect_element(0.0, 0.0, 30.0, 30.0);
    let b = rect_element(50.0, 50.0, 30.0, 30.0);
    let (id_a, id_b) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut core = unit_engine(doc);
    let shift = Modifiers { shift: true, ..Default::default() };

    press(&mut core, pt(15.0, 15.0));
    core.on_pointer_up(pt(15.0, 15.0), Modifiers::default());
    core.on_pointer_down(pt(65.0, 65.0), Button::Primary, shift);
    core.on_pointer_up(pt(65.0, 65.0), shift);
    assert!(core.history.selection().contains(id_a));
    assert!(core.history.selection().contains(id_b));

    core.on_pointer_down(pt(15.0, 15.0), Button::Primary, shift);
    core.on_pointer_up(pt(15.0, 15.0), shift);
    assert!(!core.history.selection().contains(id_a));
    assert!(core.history.selection().contains(id_b));
}

// =============================================================
// Move
// =============================================================

#[test]
fn drag_moves_element_and_commits_once() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    drag(&mut core, pt(20.0, 20.0), pt(45.0, 50.0), Modifiers::default());

    let t = core.document().find(id).unwrap().1.transform;
    assert!(approx_eq(t.x_mm, 35.0));
    assert!(approx_eq(t.y_mm, 40.0));
    assert_eq!(core.history.past_len(), 1);
    assert!(core.preview.is_empty());

    core.history.dispatch(Command::Undo);
    assert_eq!(element_x(&core, id), 10.0);
}

#[test]
fn pointer_up_consumes_a_latched_move_without_a_frame() {
    // The final move event may land after the last animation frame; the
    // release still uses it.
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    press(&mut core, pt(20.0, 20.0));
    core.on_pointer_move(pt(30.0, 20.0), Modifiers::default());
    core.on_frame();
    core.on_pointer_move(pt(44.0, 20.0), Modifiers::default());
    core.on_pointer_up(pt(44.0, 20.0), Modifiers::default());
    assert!(approx_eq(element_x(&core, id), 34.0));
}

#[test]
fn drag_returning_to_start_commits_nothing() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    press(&mut core, pt(20.0, 20.0));
    core.on_pointer_move(pt(35.0, 35.0), Modifiers::default());
    core.on_frame();
    core.on_pointer_move(pt(20.0, 20.0), Modifiers::default());
    core.on_frame();
    core.on_pointer_up(pt(20.0, 20.0), Modifiers::default());

    assert_eq!(core.history.past_len(), 0);
    assert_eq!(element_x(&core, id), 10.0);
    assert!(core.preview.is_empty());
}

#[test]
fn move_streams_previews_not_commands() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    press(&mut core, pt(20.0, 20.0));
    core.on_pointer_move(pt(40.0, 20.0), Modifiers::default());
    core.on_frame();

    // Mid-drag: preview holds the new position, the document does not.
    assert!(approx_eq(core.preview.get(id).unwrap().x_mm, 30.0));
    assert_eq!(element_x(&core, id), 10.0);
    assert_eq!(core.history.past_len(), 0);
    assert_eq!(core.history.selection().mode, SelectionMode::Dragging);
}

#[test]
fn ctrl_drag_snaps_to_grid() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    let ctrl = Modifiers { ctrl: true, ..Default::default() };
    drag(&mut core, pt(20.0, 20.0), pt(27.3, 21.8), ctrl);

    let t = core.document().find(id).unwrap().1.transform;
    // 10 + 7.3 = 17.3 snaps to 15; 10 + 1.8 = 11.8 snaps to 10.
    assert!(approx_eq(t.x_mm, 15.0));
    assert!(approx_eq(t.y_mm, 10.0));
}

#[test]
fn group_move_carries_all_selected_elements() {
    let mut doc = make_doc();
    let a = rect_element(0.0, 0.0, 20.0, 20.0);
    let b = rect_element(40.0, 0.0, 20.0, 20.0);
    let (id_a, id_b) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut core = unit_engine(doc);
    core.history.dispatch(Command::Select { ids: vec![id_a, id_b], active: Some(id_b) });

    drag(&mut core, pt(10.0, 10.0), pt(20.0, 30.0), Modifiers::default());
    assert!(approx_eq(element_x(&core, id_a), 10.0));
    assert!(approx_eq(element_x(&core, id_b), 50.0));
    assert_eq!(core.history.past_len(), 1);
}

// =============================================================
// Locked immunity
// =============================================================

fn locked_pair() -> (EngineCore, ElementId, ElementId) {
    let mut doc = make_doc();
    let free = rect_element(0.0, 0.0, 20.0, 20.0);
    let mut locked = rect_element(40.0, 0.0, 20.0, 20.0);
    locked.locked = true;
    let (free_id, locked_id) = (free.id, locked.id);
    doc.insert(free);
    doc.insert(locked);
    let mut core = unit_engine(doc);
    core.history
        .dispatch(Command::Select { ids: vec![free_id, locked_id], active: Some(locked_id) });
    (core, free_id, locked_id)
}

#[test]
fn locked_element_survives_group_move_with_warning() {
    let (mut core, free_id, locked_id) = locked_pair();
    let actions = drag(&mut core, pt(10.0, 10.0), pt(30.0, 10.0), Modifiers::default());

    assert!(approx_eq(element_x(&core, free_id), 20.0));
    assert!(approx_eq(element_x(&core, locked_id), 40.0));
    assert!(has_warning(&actions));
}

#[test]
fn locked_element_survives_nudge() {
    let (mut core, free_id, locked_id) = locked_pair();
    let actions = core.on_key_down(&Key("ArrowRight".into()), Modifiers::default());
    assert!(approx_eq(element_x(&core, free_id), 1.0));
    assert!(approx_eq(element_x(&core, locked_id), 40.0));
    assert!(has_warning(&actions));
}

#[test]
fn locked_element_survives_delete() {
    let (mut core, free_id, locked_id) = locked_pair();
    core.on_key_down(&Key("Delete".into()), Modifiers::default());
    assert!(!core.document().contains(free_id));
    assert!(core.document().contains(locked_id));
}

#[test]
fn locked_layer_locks_its_elements() {
    let mut doc = make_doc();
    let el = rect_element(0.0, 0.0, 30.0, 30.0);
    let id = el.id;
    doc.insert(el);
    doc.layers.iter_mut().find(|l| l.kind == LayerKind::Engrave).unwrap().locked = true;
    let mut core = unit_engine(doc);
    core.history.dispatch(Command::Select { ids: vec![id], active: Some(id) });

    drag(&mut core, pt(15.0, 15.0), pt(35.0, 35.0), Modifiers::default());
    assert!(approx_eq(element_x(&core, id), 0.0));
    assert_eq!(core.history.past_len(), 0);
}

#[test]
fn system_element_survives_delete() {
    let mut doc = make_doc();
    let mut base = Element::new_system(
        ElementKind::Shape { d: "M 0 0 H 100 V 100 H 0 Z".into() },
        LayerKind::Cut,
    );
    base.transform = Transform::default();
    let base_id = base.id;
    doc.insert(base);
    let mut core = unit_engine(doc);
    core.history.dispatch(Command::Select { ids: vec![base_id], active: Some(base_id) });

    let actions = core.on_key_down(&Key("Delete".into()), Modifiers::default());
    assert!(core.document().contains(base_id));
    assert!(actions.is_empty());
}

// =============================================================
// Nudge steps
// =============================================================

#[test]
fn nudge_steps_default_fine_coarse() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 10.0, 10.0);
    core.history.dispatch(Command::Select { ids: vec![id], active: Some(id) });

    core.on_key_down(&Key("ArrowRight".into()), Modifiers::default());
    assert!(approx_eq(element_x(&core, id), 11.0));

    core.on_key_down(&Key("ArrowRight".into()), Modifiers { alt: true, ..Default::default() });
    assert!(approx_eq(element_x(&core, id), 11.1));

    core.on_key_down(&Key("ArrowLeft".into()), Modifiers { shift: true, ..Default::default() });
    assert!(approx_eq(element_x(&core, id), 6.1));

    core.on_key_down(&Key("ArrowDown".into()), Modifiers::default());
    assert!(approx_eq(core.document().find(id).unwrap().1.transform.y_mm, 11.0));

    // Each nudge is one undo step.
    assert_eq!(core.history.past_len(), 4);
}

// =============================================================
// Marquee
// =============================================================

#[test]
fn marquee_selects_overlapping_elements() {
    let (mut core, id) = engine_with_rect(40.0, 40.0, 30.0, 30.0);
    let actions = drag(&mut core, pt(85.0, 85.0), pt(65.0, 65.0), Modifiers::default());

    assert!(core.history.selection().contains(id));
    assert_eq!(core.history.selection().mode, SelectionMode::Idle);
    assert!(actions.contains(&Action::SelectionChanged));
    assert_eq!(core.history.past_len(), 0);
}

#[test]
fn marquee_misses_disjoint_elements() {
    let (mut core, _id) = engine_with_rect(40.0, 40.0, 30.0, 30.0);
    drag(&mut core, pt(85.0, 85.0), pt(75.0, 75.0), Modifiers::default());
    assert!(core.history.selection().is_empty());
}

#[test]
fn additive_marquee_unions_with_existing_selection() {
    let mut doc = make_doc();
    let a = rect_element(0.0, 0.0, 10.0, 10.0);
    let b = rect_element(60.0, 60.0, 10.0, 10.0);
    let (id_a, id_b) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut core = unit_engine(doc);
    core.history.dispatch(Command::Select { ids: vec![id_a], active: Some(id_a) });

    let shift = Modifiers { shift: true, ..Default::default() };
    drag(&mut core, pt(85.0, 85.0), pt(65.0, 65.0), shift);
    assert!(core.history.selection().contains(id_a));
    assert!(core.history.selection().contains(id_b));
}

#[test]
fn replacing_marquee_drops_prior_selection() {
    let mut doc = make_doc();
    let a = rect_element(0.0, 0.0, 10.0, 10.0);
    let b = rect_element(60.0, 60.0, 10.0, 10.0);
    let (id_a, id_b) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut core = unit_engine(doc);
    core.history.dispatch(Command::Select { ids: vec![id_a], active: Some(id_a) });

    drag(&mut core, pt(85.0, 85.0), pt(65.0, 65.0), Modifiers::default());
    assert!(!core.history.selection().contains(id_a));
    assert!(core.history.selection().contains(id_b));
}

#[test]
fn marquee_rect_accessor_tracks_the_drag() {
    let (mut core, _id) = engine_with_rect(40.0, 40.0, 30.0, 30.0);
    press(&mut core, pt(80.0, 90.0));
    core.on_pointer_move(pt(60.0, 70.0), Modifiers::default());
    core.on_frame();

    let rect = core.marquee_rect_mm().unwrap();
    assert!(approx_eq(rect.x_mm, 60.0));
    assert!(approx_eq(rect.y_mm, 70.0));
    assert!(approx_eq(rect.width_mm, 20.0));
    assert!(approx_eq(rect.height_mm, 20.0));

    core.on_pointer_up(pt(60.0, 70.0), Modifiers::default());
    assert!(core.marquee_rect_mm().is_none());
}

// =============================================================
// Resize
// =============================================================

fn selected_square(side: f64) -> (EngineCore, ElementId) {
    let (mut core, id) = engine_with_rect(0.0, 0.0, side, side);
    core.history.dispatch(Command::Select { ids: vec![id], active: Some(id) });
    (core, id)
}

#[test]
fn se_resize_doubles_scale_and_keeps_nw_anchor() {
    let (mut core, id) = selected_square(50.0);
    drag(&mut core, pt(50.0, 50.0), pt(100.0, 100.0), Modifiers::default());

    let el = core.document().find(id).unwrap().1;
    assert!(approx_eq(el.transform.scale_x, 2.0));
    assert!(approx_eq(el.transform.scale_y, 2.0));
    assert!(approx_eq(el.transform.x_mm, 0.0));
    assert!(approx_eq(el.transform.y_mm, 0.0));

    let b = element_bounds(el).unwrap();
    assert!(approx_eq(b.x_mm, 0.0));
    assert!(approx_eq(b.y_mm, 0.0));
    assert!(approx_eq(b.width_mm, 100.0));
    assert!(approx_eq(b.height_mm, 100.0));
    assert_eq!(core.history.past_len(), 1);
}

#[test]
fn non_uniform_resize_scales_axes_independently() {
    let (mut core, id) = selected_square(50.0);
    drag(&mut core, pt(50.0, 50.0), pt(100.0, 75.0), Modifiers::default());
    let t = core.document().find(id).unwrap().1.transform;
    assert!(approx_eq(t.scale_x, 2.0));
    assert!(approx_eq(t.scale_y, 1.5));
}

#[test]
fn aspect_locked_resize_follows_dominant_axis() {
    let (mut core, id) = selected_square(50.0);
    let shift = Modifiers { shift: true, ..Default::default() };
    drag(&mut core, pt(50.0, 50.0), pt(100.0, 60.0), shift);
    let t = core.document().find(id).unwrap().1.transform;
    assert!(approx_eq(t.scale_x, 2.0));
    assert!(approx_eq(t.scale_y, 2.0));
}

#[test]
fn edge_handle_resizes_one_axis() {
    let (mut core, id) = selected_square(50.0);
    // E handle at (50, 25), dragged to x=75: scale_x 1.5, y untouched.
    drag(&mut core, pt(50.0, 25.0), pt(75.0, 25.0), Modifiers::default());
    let t = core.document().find(id).unwrap().1.transform;
    assert!(approx_eq(t.scale_x, 1.5));
    assert!(approx_eq(t.scale_y, 1.0));
}

#[test]
fn alt_resize_anchors_at_center() {
    let (mut core, id) = selected_square(50.0);
    let alt = Modifiers { alt: true, ..Default::default() };
    drag(&mut core, pt(50.0, 50.0), pt(75.0, 75.0), alt);

    let el = core.document().find(id).unwrap().1;
    assert!(approx_eq(el.transform.scale_x, 2.0));
    // Position re-derived around the center (25, 25): 25 + (0-25)*2 = -25.
    assert!(approx_eq(el.transform.x_mm, -25.0));
    let b = element_bounds(el).unwrap();
    assert!(approx_eq(b.center().x, 25.0));
    assert!(approx_eq(b.center().y, 25.0));
}

#[test]
fn resize_scale_is_clamped() {
    let (mut core, id) = selected_square(50.0);
    drag(&mut core, pt(50.0, 50.0), pt(5000.0, 5000.0), Modifiers::default());
    let t = core.document().find(id).unwrap().1.transform;
    assert!(approx_eq(t.scale_x, 20.0));
    assert!(approx_eq(t.scale_y, 20.0));
}

#[test]
fn group_resize_scales_rigidly_around_shared_anchor() {
    let mut doc = make_doc();
    let a = rect_element(0.0, 0.0, 10.0, 10.0);
    let b = rect_element(40.0, 40.0, 10.0, 10.0);
    let (id_a, id_b) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut core = unit_engine(doc);
    core.history.dispatch(Command::Select { ids: vec![id_a, id_b], active: Some(id_b) });

    // Group bounds {0,0,50,50}; SE drag to (100,100) doubles everything.
    drag(&mut core, pt(50.0, 50.0), pt(100.0, 100.0), Modifiers::default());
    let ta = core.document().find(id_a).unwrap().1.transform;
    let tb = core.document().find(id_b).unwrap().1.transform;
    assert!(approx_eq(ta.x_mm, 0.0));
    assert!(approx_eq(tb.x_mm, 80.0));
    assert!(approx_eq(ta.scale_x, 2.0));
    assert!(approx_eq(tb.scale_x, 2.0));
}

// =============================================================
// Rotate
// =============================================================

#[test]
fn rotate_handle_drag_sets_bearing_rotation() {
    let (mut core, id) = selected_square(50.0);
    // Rotate handle sits 24px above the top center (25, 0).
    drag(&mut core, pt(25.0, -24.0), pt(75.0, 25.0), Modifiers::default());
    let t = core.document().find(id).unwrap().1.transform;
    assert!(approx_eq(t.rotate_deg, 90.0));
    assert_eq!(core.history.past_len(), 1);
    assert_eq!(core.history.selection().mode, SelectionMode::Idle);
}

#[test]
fn shift_rotate_snaps_to_fifteen_degrees() {
    let (mut core, id) = selected_square(50.0);
    let shift = Modifiers { shift: true, ..Default::default() };
    // Bearing just shy of 90° snaps onto it.
    drag(&mut core, pt(25.0, -24.0), pt(74.0, 20.0), shift);
    let t = core.document().find(id).unwrap().1.transform;
    assert!(approx_eq(t.rotate_deg, 90.0));
}

#[test]
fn group_rotate_offsets_each_start_rotation() {
    let mut doc = make_doc();
    let mut a = rect_element(0.0, 0.0, 10.0, 10.0);
    a.transform.rotate_deg = 30.0;
    let b = rect_element(40.0, 40.0, 10.0, 10.0);
    let (id_a, id_b) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut core = unit_engine(doc);
    core.history.dispatch(Command::Select { ids: vec![id_a, id_b], active: Some(id_b) });

    // Group bounds {0,0,50,50}: handle above (25,0); drag 90° clockwise.
    drag(&mut core, pt(25.0, -24.0), pt(75.0, 25.0), Modifiers::default());
    let ra = core.document().find(id_a).unwrap().1.transform.rotate_deg;
    let rb = core.document().find(id_b).unwrap().1.transform.rotate_deg;
    assert!(approx_eq(ra, 120.0));
    assert!(approx_eq(rb, 90.0));
}

// =============================================================
// Escape / cancel
// =============================================================

#[test]
fn escape_cancels_an_active_drag_without_history() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    press(&mut core, pt(20.0, 20.0));
    core.on_pointer_move(pt(40.0, 40.0), Modifiers::default());
    core.on_frame();
    assert!(!core.preview.is_empty());

    core.on_key_down(&Key("Escape".into()), Modifiers::default());
    assert!(core.preview.is_empty());
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(core.history.past_len(), 0);
    assert!(approx_eq(element_x(&core, id), 10.0));

    // The release after a cancel is inert.
    core.on_pointer_up(pt(40.0, 40.0), Modifiers::default());
    assert_eq!(core.history.past_len(), 0);
}

#[test]
fn escape_when_idle_clears_selection() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    core.history.dispatch(Command::Select { ids: vec![id], active: Some(id) });
    let actions = core.on_key_down(&Key("Escape".into()), Modifiers::default());
    assert!(core.history.selection().is_empty());
    assert!(actions.contains(&Action::SelectionChanged));
}

#[test]
fn escape_with_nothing_to_do_is_silent() {
    let (mut core, _id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    assert!(core.on_key_down(&Key("Escape".into()), Modifiers::default()).is_empty());
}

// =============================================================
// Pan and zoom
// =============================================================

#[test]
fn middle_button_drag_pans_the_camera() {
    let (mut core, _id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    let actions =
        core.on_pointer_down(pt(100.0, 100.0), Button::Middle, Modifiers::default());
    assert!(actions.iter().any(|a| matches!(a, Action::SetCursor(c) if c == "grabbing")));

    core.on_pointer_move(pt(120.0, 110.0), Modifiers::default());
    core.on_frame();
    assert!(approx_eq(core.camera.pan_x, 20.0));
    assert!(approx_eq(core.camera.pan_y, 10.0));

    let actions = core.on_pointer_up(pt(120.0, 110.0), Modifiers::default());
    assert!(actions.iter().any(|a| matches!(a, Action::SetCursor(c) if c == "default")));
}

#[test]
fn pan_tool_pans_with_primary_button() {
    let (mut core, _id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    core.set_tool(Tool::Pan);
    press(&mut core, pt(0.0, 0.0));
    core.on_pointer_move(pt(-15.0, 5.0), Modifiers::default());
    core.on_frame();
    assert!(approx_eq(core.camera.pan_x, -15.0));
    assert!(approx_eq(core.camera.pan_y, 5.0));
}

#[test]
fn command_wheel_zooms_about_the_cursor() {
    let (mut core, _id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    let cursor = pt(60.0, 40.0);
    let before = core.camera.screen_to_world(cursor, Point::ZERO);
    core.on_wheel(
        cursor,
        WheelDelta { dx: 0.0, dy: -120.0 },
        Modifiers { ctrl: true, ..Default::default() },
    );
    assert!(core.camera.zoom > 1.0);
    let after = core.camera.screen_to_world(cursor, Point::ZERO);
    assert!(approx_eq(before.x, after.x));
    assert!(approx_eq(before.y, after.y));
}

#[test]
fn plain_wheel_pans() {
    let (mut core, _id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 4.0, dy: 7.0 }, Modifiers::default());
    assert!(approx_eq(core.camera.pan_x, -4.0));
    assert!(approx_eq(core.camera.pan_y, -7.0));
    assert!(approx_eq(core.camera.zoom, 1.0));
}

#[test]
fn fit_view_centers_the_artboard() {
    let mut core = EngineCore::new(make_doc(), EngineConfig::default());
    core.set_viewport(500.0, 400.0);
    core.fit_view();
    let center = core
        .camera
        .world_to_screen(pt(50.0, 50.0), Point::ZERO);
    assert!(approx_eq(center.x, 250.0));
    assert!(approx_eq(center.y, 200.0));
}

// =============================================================
// Frame coalescing
// =============================================================

#[test]
fn second_move_before_the_frame_coalesces() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    press(&mut core, pt(20.0, 20.0));

    let first = core.on_pointer_move(pt(30.0, 20.0), Modifiers::default());
    assert_eq!(first, vec![Action::FrameRequested]);
    let second = core.on_pointer_move(pt(50.0, 20.0), Modifiers::default());
    assert!(second.is_empty());

    core.on_frame();
    // Only the latest position was applied.
    assert!(approx_eq(core.preview.get(id).unwrap().x_mm, 40.0));

    // After the frame fires, the next move schedules a new one.
    let third = core.on_pointer_move(pt(60.0, 20.0), Modifiers::default());
    assert_eq!(third, vec![Action::FrameRequested]);
}

#[test]
fn frame_without_pending_pointer_is_a_noop() {
    let (mut core, _id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    assert!(core.on_frame().is_empty());
}

// =============================================================
// Keyboard chords
// =============================================================

#[test]
fn undo_redo_chords() {
    let (mut core, id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    drag(&mut core, pt(20.0, 20.0), pt(40.0, 20.0), Modifiers::default());
    assert!(approx_eq(element_x(&core, id), 30.0));

    core.on_key_down(&Key("z".into()), Modifiers { ctrl: true, ..Default::default() });
    assert!(approx_eq(element_x(&core, id), 10.0));

    core.on_key_down(
        &Key("z".into()),
        Modifiers { ctrl: true, shift: true, ..Default::default() },
    );
    assert!(approx_eq(element_x(&core, id), 30.0));

    core.on_key_down(&Key("z".into()), Modifiers { ctrl: true, ..Default::default() });
    core.on_key_down(&Key("y".into()), Modifiers { ctrl: true, ..Default::default() });
    assert!(approx_eq(element_x(&core, id), 30.0));
}

#[test]
fn select_all_chord_selects_visible_elements() {
    let mut doc = make_doc();
    let a = rect_element(0.0, 0.0, 10.0, 10.0);
    let b = rect_element(30.0, 30.0, 10.0, 10.0);
    let (id_a, id_b) = (a.id, b.id);
    doc.insert(a);
    doc.insert(b);
    let mut core = unit_engine(doc);

    let actions = core.on_key_down(&Key("a".into()), Modifiers { meta: true, ..Default::default() });
    assert!(core.history.selection().contains(id_a));
    assert!(core.history.selection().contains(id_b));
    assert!(actions.contains(&Action::SelectionChanged));
}

#[test]
fn plain_letter_keys_do_nothing() {
    let (mut core, _id) = engine_with_rect(10.0, 10.0, 30.0, 30.0);
    assert!(core.on_key_down(&Key("a".into()), Modifiers::default()).is_empty());
    assert!(core.on_key_down(&Key("q".into()), Modifiers::default()).is_empty());
}
