#![allow(clippy::float_cmp)]

use super::*;
use crate::animation::linear;
use crate::camera::CameraOptions;

fn camera() -> Camera {
    Camera::new(CameraOptions::default()).unwrap()
}

fn zoom(delta: f64) -> ZoomInput {
    ZoomInput { delta, anchor: Point::new(1.0, 2.0) }
}

#[test]
fn relay_passes_everything_unchanged() {
    let cam = camera();
    let mut relay = Relay;
    assert_eq!(relay.notify_pan_input(Point::new(3.0, -1.0), &cam), Permission::allow(Point::new(3.0, -1.0)));
    assert_eq!(relay.notify_zoom_input(zoom(0.2), &cam), Permission::allow(zoom(0.2)));
    assert_eq!(relay.notify_rotation_input(0.4, &cam), Permission::allow(0.4));
}

#[test]
fn permission_constructors_set_flag() {
    assert!(Permission::allow(1).allow_pass_through);
    assert!(!Permission::deny(1).allow_pass_through);
    assert_eq!(Permission::deny(7).value, 7);
}

#[test]
fn gated_mux_holds_each_kind_independently() {
    let cam = camera();
    let mut mux = GatedMux::new();
    mux.hold_zoom(true);

    assert!(mux.notify_pan_input(Point::new(1.0, 0.0), &cam).allow_pass_through);
    assert!(!mux.notify_zoom_input(zoom(0.1), &cam).allow_pass_through);
    assert!(mux.notify_rotation_input(0.1, &cam).allow_pass_through);

    mux.hold_zoom(false);
    mux.hold_pan(true);
    mux.hold_rotation(true);
    assert!(!mux.notify_pan_input(Point::new(1.0, 0.0), &cam).allow_pass_through);
    assert!(mux.notify_zoom_input(zoom(0.1), &cam).allow_pass_through);
    assert!(!mux.notify_rotation_input(0.1, &cam).allow_pass_through);
}

#[test]
fn yielding_mux_denies_during_animation() {
    let mut cam = camera();
    let mut mux = GatedMux::yielding_to_camera();
    cam.set_position_with_animation(Point::new(50.0, 0.0), 1.0, linear);
    assert!(!mux.notify_pan_input(Point::new(1.0, 0.0), &cam).allow_pass_through);

    cam.step(1.0);
    assert!(mux.notify_pan_input(Point::new(1.0, 0.0), &cam).allow_pass_through);
}

#[test]
fn non_yielding_mux_ignores_animation() {
    let mut cam = camera();
    let mut mux = GatedMux::new();
    cam.set_zoom_level_with_animation(2.0, 1.0, linear, None);
    assert!(mux.notify_zoom_input(zoom(0.1), &cam).allow_pass_through);
    mux.set_yield_to_camera(true);
    assert!(!mux.notify_zoom_input(zoom(0.1), &cam).allow_pass_through);
}

#[test]
fn denied_value_is_preserved() {
    let cam = camera();
    let mut mux = GatedMux::new();
    mux.hold_rotation(true);
    assert_eq!(mux.notify_rotation_input(0.75, &cam), Permission::deny(0.75));
}
