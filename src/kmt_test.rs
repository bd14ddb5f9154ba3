#![allow(clippy::float_cmp)]

use super::*;
use crate::camera::{Camera, CameraOptions};
use crate::input::HeadlessCanvas;

fn machine_with(align_with_dom: bool) -> (KmtMachine, Rc<HeadlessCanvas>) {
    let canvas = Rc::new(HeadlessCanvas::new(800.0, 600.0));
    let context = KmtContext::new(canvas.clone(), canvas.clone(), align_with_dom, InputTuning::default());
    (kmt_machine(context), canvas)
}

fn machine() -> (KmtMachine, Rc<HeadlessCanvas>) {
    machine_with(true)
}

fn wheel(dx: f64, dy: f64) -> KmtEvent {
    KmtEvent::Scroll { delta: WheelDelta { dx, dy }, cursor: Point::new(400.0, 300.0) }
}

fn ctrl_wheel(dy: f64, x: f64, y: f64) -> KmtEvent {
    KmtEvent::ScrollWithCtrl { delta: WheelDelta { dx: 0.0, dy }, cursor: Point::new(x, y) }
}

fn zoom_delta(output: Option<GestureOutput>) -> f64 {
    match output {
        Some(GestureOutput::Zoom { delta, .. }) => delta,
        other => panic!("expected zoom, got {other:?}"),
    }
}

// --- spacebar pan ---

#[test]
fn spacebar_pan_lifecycle() {
    let (mut m, canvas) = machine();
    assert_eq!(m.current_state(), KmtState::Idle);

    let t = m.happens(&KmtEvent::SpacebarDown);
    assert_eq!(t.next_state, KmtState::ReadyToPanViaSpacebar);
    assert_eq!(canvas.cursor(), CursorStyle::Grab);

    let t = m.happens(&KmtEvent::LeftPointerDown(Point::new(100.0, 100.0)));
    assert_eq!(t.next_state, KmtState::InitialPan);
    assert_eq!(canvas.cursor(), CursorStyle::Grabbing);

    let t = m.happens(&KmtEvent::LeftPointerMove(Point::new(90.0, 100.0)));
    assert_eq!(t.next_state, KmtState::Pan);
    assert_eq!(t.output, Some(GestureOutput::Pan { delta: Point::new(10.0, 0.0) }));

    let t = m.happens(&KmtEvent::LeftPointerUp(Point::new(90.0, 100.0)));
    assert_eq!(t.next_state, KmtState::ReadyToPanViaSpacebar);
    assert_eq!(canvas.cursor(), CursorStyle::Grab);

    let t = m.happens(&KmtEvent::SpacebarUp);
    assert_eq!(t.next_state, KmtState::Idle);
    assert_eq!(canvas.cursor(), CursorStyle::Default);
}

#[test]
fn continued_drag_uses_previous_cursor() {
    let (mut m, _) = machine();
    m.happens(&KmtEvent::SpacebarDown);
    m.happens(&KmtEvent::LeftPointerDown(Point::new(100.0, 100.0)));
    m.happens(&KmtEvent::LeftPointerMove(Point::new(90.0, 100.0)));
    let t = m.happens(&KmtEvent::LeftPointerMove(Point::new(95.0, 80.0)));
    assert_eq!(t.next_state, KmtState::Pan);
    assert_eq!(t.output, Some(GestureOutput::Pan { delta: Point::new(-5.0, 20.0) }));
}

#[test]
fn unaligned_drag_flips_y() {
    let (mut m, _) = machine_with(false);
    m.happens(&KmtEvent::SpacebarDown);
    m.happens(&KmtEvent::LeftPointerDown(Point::new(100.0, 100.0)));
    let t = m.happens(&KmtEvent::LeftPointerMove(Point::new(100.0, 90.0)));
    assert_eq!(t.output, Some(GestureOutput::Pan { delta: Point::new(0.0, -10.0) }));
}

#[test]
fn click_without_move_returns_to_ready() {
    let (mut m, _) = machine();
    m.happens(&KmtEvent::SpacebarDown);
    m.happens(&KmtEvent::LeftPointerDown(Point::new(10.0, 10.0)));
    let t = m.happens(&KmtEvent::LeftPointerUp(Point::new(10.0, 10.0)));
    assert_eq!(t.next_state, KmtState::ReadyToPanViaSpacebar);
}

#[test]
fn releasing_spacebar_mid_drag_goes_idle() {
    let (mut m, canvas) = machine();
    m.happens(&KmtEvent::SpacebarDown);
    m.happens(&KmtEvent::LeftPointerDown(Point::new(10.0, 10.0)));
    m.happens(&KmtEvent::LeftPointerMove(Point::new(20.0, 10.0)));
    let t = m.happens(&KmtEvent::SpacebarUp);
    assert_eq!(t.next_state, KmtState::Idle);
    assert_eq!(canvas.cursor(), CursorStyle::Default);
}

#[test]
fn left_drag_without_spacebar_is_ignored() {
    let (mut m, _) = machine();
    assert!(!m.happens(&KmtEvent::LeftPointerDown(Point::new(1.0, 1.0))).handled);
    assert!(!m.happens(&KmtEvent::LeftPointerMove(Point::new(2.0, 1.0))).handled);
}

// --- middle button pan ---

#[test]
fn middle_button_pan() {
    let (mut m, canvas) = machine();
    let t = m.happens(&KmtEvent::MiddlePointerDown(Point::new(50.0, 50.0)));
    assert_eq!(t.next_state, KmtState::ReadyToPanViaScrollWheel);
    assert_eq!(canvas.cursor(), CursorStyle::Grabbing);

    let t = m.happens(&KmtEvent::MiddlePointerMove(Point::new(40.0, 55.0)));
    assert_eq!(t.next_state, KmtState::PanViaScrollWheel);
    assert_eq!(t.output, Some(GestureOutput::Pan { delta: Point::new(10.0, -5.0) }));

    let t = m.happens(&KmtEvent::MiddlePointerMove(Point::new(30.0, 55.0)));
    assert_eq!(t.output, Some(GestureOutput::Pan { delta: Point::new(10.0, 0.0) }));

    let t = m.happens(&KmtEvent::MiddlePointerUp(Point::new(30.0, 55.0)));
    assert_eq!(t.next_state, KmtState::Idle);
    assert_eq!(canvas.cursor(), CursorStyle::Default);
}

// --- scroll ---

#[test]
fn scroll_pans_by_wheel_delta() {
    let (mut m, _) = machine();
    let t = m.happens(&wheel(3.0, 4.0));
    assert_eq!(t.next_state, KmtState::Idle);
    assert_eq!(t.output, Some(GestureOutput::Pan { delta: Point::new(3.0, 4.0) }));
}

#[test]
fn unaligned_scroll_flips_y() {
    let (mut m, _) = machine_with(false);
    let t = m.happens(&wheel(3.0, 4.0));
    assert_eq!(t.output, Some(GestureOutput::Pan { delta: Point::new(3.0, -4.0) }));
}

#[test]
fn ctrl_scroll_zooms_about_cursor() {
    let (mut m, _) = machine();
    let t = m.happens(&ctrl_wheel(10.0, 400.0, 300.0));
    assert_eq!(t.next_state, KmtState::Idle);
    match t.output {
        Some(GestureOutput::Zoom { delta, anchor_point_in_viewport }) => {
            assert!((delta + 0.25).abs() < 1e-12);
            assert_eq!(anchor_point_in_viewport, Point::ZERO);
        }
        other => panic!("expected zoom, got {other:?}"),
    }
}

#[test]
fn ctrl_scroll_uses_coarse_sensitivity_for_large_deltas() {
    let (mut m, _) = machine();
    let delta = zoom_delta(m.happens(&ctrl_wheel(-120.0, 0.0, 0.0)).output);
    assert!((delta - 0.3).abs() < 1e-12);
}

#[test]
fn ctrl_scroll_anchor_respects_canvas_offset() {
    let (mut m, canvas) = machine();
    canvas.set_position(Point::new(100.0, 100.0));
    match m.happens(&ctrl_wheel(1.0, 100.0, 100.0)).output {
        Some(GestureOutput::Zoom { anchor_point_in_viewport, .. }) => {
            assert_eq!(anchor_point_in_viewport, Point::new(-400.0, -300.0));
        }
        other => panic!("expected zoom, got {other:?}"),
    }
}

// --- device modality ---

#[test]
fn vertical_only_wheel_becomes_mouse_and_zooms() {
    let (mut m, _) = machine();
    for _ in 0..4 {
        assert!(matches!(m.happens(&wheel(0.0, 100.0)).output, Some(GestureOutput::Pan { .. })));
    }
    let delta = zoom_delta(m.happens(&wheel(0.0, 100.0)).output);
    assert!((delta + 2.5).abs() < 1e-12);
    assert_eq!(m.context().device_modality(), DeviceModality::Mouse);
}

#[test]
fn two_axis_scroll_becomes_trackpad() {
    let (mut m, _) = machine();
    for _ in 0..5 {
        m.happens(&wheel(1.0, 3.0));
    }
    assert_eq!(m.context().device_modality(), DeviceModality::Trackpad);
    for _ in 0..10 {
        assert!(matches!(m.happens(&wheel(0.0, 3.0)).output, Some(GestureOutput::Pan { .. })));
    }
    assert_eq!(m.context().device_modality(), DeviceModality::Trackpad);
}

#[test]
fn mixed_scrolls_stay_undetermined() {
    let (mut m, _) = machine();
    for _ in 0..4 {
        m.happens(&wheel(0.0, 10.0));
    }
    m.happens(&wheel(2.0, 0.0));
    for _ in 0..4 {
        m.happens(&wheel(0.0, 10.0));
    }
    assert_eq!(m.context().device_modality(), DeviceModality::Undetermined);
}

#[test]
fn modality_survives_disable_and_resets_explicitly() {
    let (mut m, _) = machine();
    for _ in 0..5 {
        m.happens(&wheel(0.0, 10.0));
    }
    m.happens(&KmtEvent::Disable);
    m.happens(&KmtEvent::Enable);
    assert_eq!(m.context().device_modality(), DeviceModality::Mouse);

    m.context_mut().reset_device_modality();
    assert_eq!(m.context().device_modality(), DeviceModality::Undetermined);
    assert!(matches!(m.happens(&wheel(0.0, 10.0)).output, Some(GestureOutput::Pan { .. })));
}

#[test]
fn new_machine_starts_undetermined() {
    let (m, _) = machine();
    assert_eq!(m.context().device_modality(), DeviceModality::Undetermined);
}

// --- disable / enable ---

#[test]
fn disabled_state_swallows_input() {
    let (mut m, _) = machine();
    let t = m.happens(&KmtEvent::Disable);
    assert_eq!(t.next_state, KmtState::Disabled);

    assert!(!m.happens(&wheel(1.0, 1.0)).handled);
    assert!(!m.happens(&KmtEvent::LeftPointerDown(Point::new(1.0, 1.0))).handled);
    assert!(!m.happens(&KmtEvent::SpacebarDown).handled);
    assert_eq!(m.current_state(), KmtState::Disabled);

    let t = m.happens(&KmtEvent::Enable);
    assert!(t.handled);
    assert_eq!(t.next_state, KmtState::Idle);
}

#[test]
fn disable_mid_pan_abandons_gesture() {
    let (mut m, canvas) = machine();
    m.happens(&KmtEvent::SpacebarDown);
    m.happens(&KmtEvent::LeftPointerDown(Point::new(100.0, 100.0)));
    m.happens(&KmtEvent::LeftPointerMove(Point::new(90.0, 100.0)));

    m.happens(&KmtEvent::Disable);
    assert_eq!(canvas.cursor(), CursorStyle::Default);
    m.happens(&KmtEvent::Enable);

    assert_eq!(m.current_state(), KmtState::Idle);
    assert!(!m.happens(&KmtEvent::LeftPointerMove(Point::new(80.0, 100.0))).handled);
}

#[test]
fn enable_while_enabled_is_unhandled() {
    let (mut m, _) = machine();
    assert!(!m.happens(&KmtEvent::Enable).handled);
}

// --- sign round trip ---

#[test]
fn drag_delta_moves_camera_by_same_vector() {
    let (mut m, _) = machine();
    let mut camera = Camera::new(CameraOptions::default()).unwrap();
    let a = Point::new(120.0, 80.0);
    let b = Point::new(150.0, 60.0);

    m.happens(&KmtEvent::SpacebarDown);
    m.happens(&KmtEvent::LeftPointerDown(a));
    let Some(GestureOutput::Pan { delta }) = m.happens(&KmtEvent::LeftPointerMove(b)).output else {
        panic!("expected pan");
    };
    assert_eq!(delta, a - b);

    let before = camera.position();
    camera.move_from_gesture(delta).unwrap();
    assert_eq!(camera.position() - before, delta);
}
