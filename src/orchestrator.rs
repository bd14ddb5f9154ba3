//! Input orchestrator: routes recognized gestures to observers and the camera.
//!
//! For every pan, zoom, or rotate output the orchestrator
//! 1. publishes the raw gesture to subscribers, regardless of what happens next,
//! 2. asks the [`CameraMux`] for permission, and
//! 3. applies the (possibly rewritten) value to the [`CameraRig`] if allowed.
//!
//! Cursor and `None` outputs stop here: the state machines already updated
//! the canvas cursor through their hooks.

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod orchestrator_test;

use std::fmt;

use crate::camera::Camera;
use crate::input::GestureOutput;
use crate::mux::{CameraMux, ZoomInput};
use crate::observer::{Observable, Subscription};
use crate::rig::CameraRig;

pub struct InputOrchestrator {
    rig: CameraRig,
    mux: Box<dyn CameraMux>,
    raw_gestures: Observable<GestureOutput>,
}

impl fmt::Debug for InputOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputOrchestrator")
            .field("rig", &self.rig)
            .field("raw_gestures", &self.raw_gestures)
            .finish_non_exhaustive()
    }
}

impl InputOrchestrator {
    #[must_use]
    pub fn new(rig: CameraRig, mux: Box<dyn CameraMux>) -> Self {
        Self { rig, mux, raw_gestures: Observable::new() }
    }

    #[must_use]
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        self.rig.camera()
    }

    pub fn set_mux(&mut self, mux: Box<dyn CameraMux>) {
        self.mux = mux;
    }

    /// Subscribe to every pan, zoom, and rotate gesture as recognized,
    /// before the mux or the camera get a say.
    pub fn on_raw_gesture<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&GestureOutput) + 'static,
    {
        self.raw_gestures.subscribe(callback)
    }

    /// Publish, arbitrate, and apply one gesture. Returns whether the camera accepted it.
    pub fn process_input_event(&mut self, output: &GestureOutput) -> bool {
        match *output {
            GestureOutput::Pan { delta } => {
                self.raw_gestures.notify(output);
                let permission = self.mux.notify_pan_input(delta, self.rig.camera());
                if !permission.allow_pass_through {
                    tracing::debug!(?delta, "pan denied by mux");
                    return false;
                }
                match self.rig.pan_by_viewport(permission.value) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::debug!(error = %e, ?delta, "pan rejected by camera");
                        false
                    }
                }
            }
            GestureOutput::Zoom { delta, anchor_point_in_viewport } => {
                self.raw_gestures.notify(output);
                let input = ZoomInput { delta, anchor: anchor_point_in_viewport };
                let permission = self.mux.notify_zoom_input(input, self.rig.camera());
                if !permission.allow_pass_through {
                    tracing::debug!(delta, "zoom denied by mux");
                    return false;
                }
                match self.rig.zoom_by_at(permission.value.delta, permission.value.anchor) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::debug!(error = %e, delta, "zoom rejected by camera");
                        false
                    }
                }
            }
            GestureOutput::Rotate { delta_rotation } => {
                self.raw_gestures.notify(output);
                let permission = self.mux.notify_rotation_input(delta_rotation, self.rig.camera());
                if !permission.allow_pass_through {
                    tracing::debug!(delta_rotation, "rotation denied by mux");
                    return false;
                }
                match self.rig.rotate_by(permission.value) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::debug!(error = %e, delta_rotation, "rotation rejected by camera");
                        false
                    }
                }
            }
            GestureOutput::Cursor { .. } | GestureOutput::None => false,
        }
    }
}
