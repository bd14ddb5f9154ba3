#![allow(clippy::float_cmp)]

use std::cell::RefCell;

use super::*;
use crate::animation::linear;
use crate::input::{CursorStyle, HeadlessCanvas};
use crate::mux::GatedMux;

// =============================================================
// Helpers
// =============================================================

fn options() -> EngineOptions {
    EngineOptions {
        camera: CameraOptions { viewport_width: 800.0, viewport_height: 600.0, ..Default::default() },
        ..Default::default()
    }
}

fn engine() -> (Engine, Rc<HeadlessCanvas>) {
    let canvas = Rc::new(HeadlessCanvas::new(800.0, 600.0));
    let engine = Engine::new(options(), canvas.clone(), canvas.clone()).unwrap();
    (engine, canvas)
}

fn space() -> Key {
    Key(" ".to_owned())
}

fn spacebar_drag(engine: &mut Engine, from: Point, to: Point) {
    engine.on_key_down(&space());
    engine.on_pointer_down(from, Button::Primary);
    engine.on_pointer_move(to);
    engine.on_pointer_up(to, Button::Primary);
    engine.on_key_up(&space());
}

// =============================================================
// Construction
// =============================================================

#[test]
fn invalid_camera_options_fail_construction() {
    let canvas = Rc::new(HeadlessCanvas::new(800.0, 600.0));
    let mut bad = options();
    bad.camera.zoom_level = 0.0;
    assert!(Engine::new(bad, canvas.clone(), canvas).is_err());
}

#[test]
fn options_load_from_partial_json() {
    let parsed: EngineOptions = serde_json::from_str(r#"{"align_with_dom": false}"#).unwrap();
    assert!(!parsed.align_with_dom);
    assert_eq!(parsed.rig, RigConfig::default());
    assert_eq!(parsed.tuning, InputTuning::default());
}

// =============================================================
// Pointer and keys
// =============================================================

#[test]
fn spacebar_drag_pans_camera() {
    let (mut e, canvas) = engine();
    spacebar_drag(&mut e, Point::new(100.0, 100.0), Point::new(90.0, 100.0));
    assert!(e.camera().position().approx_eq(Point::new(10.0, 0.0), 1e-9));
    assert_eq!(e.kmt_state(), KmtState::Idle);
    assert_eq!(canvas.cursor(), CursorStyle::Default);
}

#[test]
fn drag_without_spacebar_does_nothing() {
    let (mut e, _) = engine();
    e.on_pointer_down(Point::new(100.0, 100.0), Button::Primary);
    let out = e.on_pointer_move(Point::new(50.0, 100.0));
    assert_eq!(out, GestureOutput::None);
    assert_eq!(e.camera().position(), Point::ZERO);
}

#[test]
fn middle_button_drag_pans() {
    let (mut e, _) = engine();
    e.on_pointer_down(Point::new(100.0, 100.0), Button::Middle);
    assert_eq!(e.kmt_state(), KmtState::ReadyToPanViaScrollWheel);
    let out = e.on_pointer_move(Point::new(100.0, 80.0));
    assert_eq!(out, GestureOutput::Pan { delta: Point::new(0.0, 20.0) });
    e.on_pointer_up(Point::new(100.0, 80.0), Button::Middle);
    assert_eq!(e.kmt_state(), KmtState::Idle);
    assert!(e.camera().position().approx_eq(Point::new(0.0, 20.0), 1e-9));
}

#[test]
fn secondary_button_is_ignored() {
    let (mut e, _) = engine();
    assert_eq!(e.on_pointer_down(Point::new(1.0, 1.0), Button::Secondary), GestureOutput::None);
    assert_eq!(e.kmt_state(), KmtState::Idle);
}

#[test]
fn other_keys_are_ignored() {
    let (mut e, _) = engine();
    assert_eq!(e.on_key_down(&Key("Escape".to_owned())), GestureOutput::None);
    assert_eq!(e.kmt_state(), KmtState::Idle);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn ctrl_wheel_zooms_about_cursor() {
    let (mut e, _) = engine();
    let cursor = Point::new(600.0, 150.0);
    let anchor = Point::new(200.0, -150.0);
    let before = e.camera().convert_from_viewport_to_world(anchor);

    e.on_wheel(cursor, WheelDelta { dx: 0.0, dy: -10.0 }, Modifiers { ctrl: true, ..Default::default() });

    assert!((e.camera().zoom_level() - 1.25).abs() < 1e-12);
    assert!(e.camera().convert_from_viewport_to_world(anchor).approx_eq(before, 1e-9));
}

#[test]
fn plain_wheel_pans_until_device_looks_like_a_mouse() {
    let (mut e, _) = engine();
    let center = Point::new(400.0, 300.0);
    for _ in 0..4 {
        e.on_wheel(center, WheelDelta { dx: 0.0, dy: 10.0 }, Modifiers::default());
    }
    assert!(e.camera().position().approx_eq(Point::new(0.0, 40.0), 1e-9));
    assert_eq!(e.device_modality(), DeviceModality::Undetermined);

    e.on_wheel(center, WheelDelta { dx: 0.0, dy: 10.0 }, Modifiers::default());
    assert_eq!(e.device_modality(), DeviceModality::Mouse);
    assert!((e.camera().zoom_level() - 0.75).abs() < 1e-12);

    e.reset_device_modality();
    assert_eq!(e.device_modality(), DeviceModality::Undetermined);
}

// =============================================================
// Touch
// =============================================================

#[test]
fn pinch_zooms_camera() {
    let (mut e, _) = engine();
    e.on_touch_start(vec![TouchPoint::new(1, 300.0, 300.0), TouchPoint::new(2, 500.0, 300.0)]);
    assert_eq!(e.touch_state(), TouchState::Pending);

    e.on_touch_move(vec![TouchPoint::new(2, 600.0, 300.0)]);

    assert_eq!(e.touch_state(), TouchState::InProgress);
    assert!((e.camera().zoom_level() - 1.5).abs() < 1e-12);

    e.on_touch_cancel(vec![TouchPoint::new(1, 300.0, 300.0), TouchPoint::new(2, 600.0, 300.0)]);
    assert_eq!(e.touch_state(), TouchState::Idle);
}

#[test]
fn two_finger_drag_pans_camera() {
    let (mut e, _) = engine();
    e.on_touch_start(vec![TouchPoint::new(1, 300.0, 300.0), TouchPoint::new(2, 500.0, 300.0)]);
    e.on_touch_move(vec![TouchPoint::new(1, 320.0, 300.0), TouchPoint::new(2, 520.0, 300.0)]);
    e.on_touch_end(vec![TouchPoint::new(1, 320.0, 300.0)]);
    assert!(e.camera().position().approx_eq(Point::new(-20.0, 0.0), 1e-9));
    assert_eq!(e.touch_state(), TouchState::Idle);
}

// =============================================================
// Enable / disable
// =============================================================

#[test]
fn disabled_input_ignores_gestures() {
    let (mut e, canvas) = engine();
    e.on_key_down(&space());
    e.on_pointer_down(Point::new(100.0, 100.0), Button::Primary);
    e.disable_input();
    assert_eq!(e.kmt_state(), KmtState::Disabled);
    assert_eq!(canvas.cursor(), CursorStyle::Default);

    e.on_pointer_move(Point::new(0.0, 100.0));
    e.on_wheel(Point::new(400.0, 300.0), WheelDelta { dx: 5.0, dy: 5.0 }, Modifiers::default());
    assert_eq!(e.camera().position(), Point::ZERO);

    e.enable_input();
    assert_eq!(e.kmt_state(), KmtState::Idle);
}

// =============================================================
// Observers, mux, frames
// =============================================================

#[test]
fn observers_receive_camera_and_raw_events() {
    let (mut e, _) = engine();
    let pans = Rc::new(RefCell::new(0));
    let raw = Rc::new(RefCell::new(0));
    let pan_sink = Rc::clone(&pans);
    let raw_sink = Rc::clone(&raw);
    let _pan = e.on_camera(CameraEventKind::Pan, move |_| *pan_sink.borrow_mut() += 1);
    let _raw = e.on_raw_gesture(move |_| *raw_sink.borrow_mut() += 1);

    spacebar_drag(&mut e, Point::new(100.0, 100.0), Point::new(90.0, 100.0));

    assert_eq!(*pans.borrow(), 1);
    assert_eq!(*raw.borrow(), 1);
}

#[test]
fn held_mux_blocks_camera_but_not_recognition() {
    let (mut e, _) = engine();
    let mut mux = GatedMux::new();
    mux.hold_pan(true);
    e.set_mux(Box::new(mux));

    e.on_key_down(&space());
    e.on_pointer_down(Point::new(100.0, 100.0), Button::Primary);
    let out = e.on_pointer_move(Point::new(90.0, 100.0));

    assert_eq!(out, GestureOutput::Pan { delta: Point::new(10.0, 0.0) });
    assert_eq!(e.camera().position(), Point::ZERO);
}

#[test]
fn update_advances_animations() {
    let (mut e, _) = engine();
    e.rig_mut().camera_mut().set_position_with_animation(Point::new(100.0, 0.0), 1.0, linear);
    e.update(0.5);
    assert!(e.camera().position().approx_eq(Point::new(50.0, 0.0), 1e-9));
    e.update(0.5);
    assert!(e.camera().position().approx_eq(Point::new(100.0, 0.0), 1e-9));
    assert!(!e.camera().is_animating());
}

#[test]
fn unaligned_engine_flips_drag_y() {
    let (mut e, _) = engine();
    e.set_align_with_dom(false);
    e.on_pointer_down(Point::new(100.0, 100.0), Button::Middle);
    e.on_pointer_move(Point::new(100.0, 80.0));
    assert!(e.camera().position().approx_eq(Point::new(0.0, -20.0), 1e-9));
}

#[test]
fn viewport_resize_reaches_camera() {
    let (mut e, _) = engine();
    e.set_viewport_size(1024.0, 768.0).unwrap();
    assert_eq!(e.camera().viewport_width(), 1024.0);
    assert!(e.set_viewport_size(0.0, 768.0).is_err());
}
