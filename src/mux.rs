//! Camera mux: the permission layer between recognized gestures and the rig.
//!
//! Gesture recognition never talks to the camera directly. Every pan, zoom,
//! and rotate intent is offered to a [`CameraMux`] first, which may let it
//! through unchanged, rewrite it, or deny it (for example while a programmatic
//! animation or an external lock owns the camera).

#[cfg(test)]
#[path = "mux_test.rs"]
mod mux_test;

use crate::camera::Camera;
use crate::geometry::Point;

/// A mux decision: whether the input may reach the rig, and with which value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Permission<T> {
    pub allow_pass_through: bool,
    pub value: T,
}

impl<T> Permission<T> {
    #[must_use]
    pub fn allow(value: T) -> Self {
        Self { allow_pass_through: true, value }
    }

    #[must_use]
    pub fn deny(value: T) -> Self {
        Self { allow_pass_through: false, value }
    }
}

/// A zoom intent: relative `delta` about `anchor` (viewport space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomInput {
    pub delta: f64,
    pub anchor: Point,
}

/// Arbitrates gesture intents before they reach the camera rig.
pub trait CameraMux {
    fn notify_pan_input(&mut self, delta: Point, camera: &Camera) -> Permission<Point>;
    fn notify_zoom_input(&mut self, input: ZoomInput, camera: &Camera) -> Permission<ZoomInput>;
    fn notify_rotation_input(&mut self, delta: f64, camera: &Camera) -> Permission<f64>;
}

/// Lets every input through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relay;

impl CameraMux for Relay {
    fn notify_pan_input(&mut self, delta: Point, _camera: &Camera) -> Permission<Point> {
        Permission::allow(delta)
    }

    fn notify_zoom_input(&mut self, input: ZoomInput, _camera: &Camera) -> Permission<ZoomInput> {
        Permission::allow(input)
    }

    fn notify_rotation_input(&mut self, delta: f64, _camera: &Camera) -> Permission<f64> {
        Permission::allow(delta)
    }
}

/// Denies inputs per kind while held, and optionally while the camera is
/// animating or following a lock-on target.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct GatedMux {
    pan_held: bool,
    zoom_held: bool,
    rotation_held: bool,
    yield_to_camera: bool,
}

impl GatedMux {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny every input while the camera is animating or locked on.
    #[must_use]
    pub fn yielding_to_camera() -> Self {
        Self { yield_to_camera: true, ..Self::default() }
    }

    pub fn hold_pan(&mut self, held: bool) {
        self.pan_held = held;
    }

    pub fn hold_zoom(&mut self, held: bool) {
        self.zoom_held = held;
    }

    pub fn hold_rotation(&mut self, held: bool) {
        self.rotation_held = held;
    }

    pub fn set_yield_to_camera(&mut self, yield_to_camera: bool) {
        self.yield_to_camera = yield_to_camera;
    }

    fn camera_busy(&self, camera: &Camera) -> bool {
        self.yield_to_camera && (camera.is_animating() || camera.is_locked())
    }

    fn gate<T>(&self, held: bool, value: T, camera: &Camera) -> Permission<T> {
        if held || self.camera_busy(camera) { Permission::deny(value) } else { Permission::allow(value) }
    }
}

impl CameraMux for GatedMux {
    fn notify_pan_input(&mut self, delta: Point, camera: &Camera) -> Permission<Point> {
        self.gate(self.pan_held, delta, camera)
    }

    fn notify_zoom_input(&mut self, input: ZoomInput, camera: &Camera) -> Permission<ZoomInput> {
        self.gate(self.zoom_held, input, camera)
    }

    fn notify_rotation_input(&mut self, delta: f64, camera: &Camera) -> Permission<f64> {
        self.gate(self.rotation_held, delta, camera)
    }
}
