//! Host-facing facade over the whole input pipeline.
//!
//! [`Engine`] owns both gesture machines, the orchestrator, and the camera
//! rig. The host forwards native pointer, wheel, key, and touch events to the
//! `on_*` handlers and calls [`Engine::update`] once per frame.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CameraEvent, CameraEventKind, CameraOptions};
use crate::config::InputTuning;
use crate::error::CameraError;
use crate::geometry::Point;
use crate::input::{
    Button, CanvasQuery, CursorSink, GestureOutput, Key, KmtEvent, Modifiers, TouchEvent, TouchPoint, WheelDelta,
};
use crate::kmt::{DeviceModality, KmtContext, KmtMachine, KmtState, kmt_machine};
use crate::mux::{CameraMux, Relay};
use crate::observer::Subscription;
use crate::orchestrator::InputOrchestrator;
use crate::rig::{CameraRig, RigConfig};
use crate::touch::{TouchContext, TouchMachine, TouchState, touch_machine};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Everything needed to assemble an [`Engine`]. Loadable from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub camera: CameraOptions,
    pub rig: RigConfig,
    pub tuning: InputTuning,
    /// Whether viewport Y grows downward like the DOM. When false, pan deltas flip Y.
    pub align_with_dom: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            camera: CameraOptions::default(),
            rig: RigConfig::default(),
            tuning: InputTuning::default(),
            align_with_dom: true,
        }
    }
}

/// The full input pipeline: host events in, camera changes out.
///
/// Host-level pointer, wheel, key, and touch callbacks are mapped onto the
/// machines' event vocabulary; each machine output then flows through the
/// orchestrator (observers, mux, rig). Every handler returns the gesture the
/// machine recognized, whether or not the camera accepted it.
pub struct Engine {
    kmt: KmtMachine,
    touch: TouchMachine,
    orchestrator: InputOrchestrator,
    pressed: Option<Button>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("kmt", &self.kmt.current_state())
            .field("touch", &self.touch.current_state())
            .field("orchestrator", &self.orchestrator)
            .field("pressed", &self.pressed)
            .finish()
    }
}

impl Engine {
    /// Assemble the pipeline with a pass-through mux.
    ///
    /// # Errors
    ///
    /// Returns the camera's construction error when `options.camera` is invalid.
    pub fn new(
        options: EngineOptions,
        canvas: Rc<dyn CanvasQuery>,
        cursor_sink: Rc<dyn CursorSink>,
    ) -> Result<Self, CameraError> {
        let camera = Camera::new(options.camera)?;
        let rig = CameraRig::new(camera, options.rig);
        let kmt = kmt_machine(KmtContext::new(Rc::clone(&canvas), cursor_sink, options.align_with_dom, options.tuning));
        let touch = touch_machine(TouchContext::new(canvas, options.align_with_dom, options.tuning));
        Ok(Self { kmt, touch, orchestrator: InputOrchestrator::new(rig, Box::new(Relay)), pressed: None })
    }

    // --- Pointer ---

    pub fn on_pointer_down(&mut self, window_point: Point, button: Button) -> GestureOutput {
        let event = match button {
            Button::Primary => KmtEvent::LeftPointerDown(window_point),
            Button::Middle => KmtEvent::MiddlePointerDown(window_point),
            Button::Secondary => return GestureOutput::None,
        };
        self.pressed = Some(button);
        self.dispatch_kmt(&event)
    }

    /// Routed as a middle move while the middle button is held, otherwise as a left move.
    pub fn on_pointer_move(&mut self, window_point: Point) -> GestureOutput {
        let event = match self.pressed {
            Some(Button::Middle) => KmtEvent::MiddlePointerMove(window_point),
            _ => KmtEvent::LeftPointerMove(window_point),
        };
        self.dispatch_kmt(&event)
    }

    pub fn on_pointer_up(&mut self, window_point: Point, button: Button) -> GestureOutput {
        let event = match button {
            Button::Primary => KmtEvent::LeftPointerUp(window_point),
            Button::Middle => KmtEvent::MiddlePointerUp(window_point),
            Button::Secondary => return GestureOutput::None,
        };
        if self.pressed == Some(button) {
            self.pressed = None;
        }
        self.dispatch_kmt(&event)
    }

    // --- Wheel / keys ---

    pub fn on_wheel(&mut self, window_point: Point, delta: WheelDelta, modifiers: Modifiers) -> GestureOutput {
        let event = if modifiers.ctrl {
            KmtEvent::ScrollWithCtrl { delta, cursor: window_point }
        } else {
            KmtEvent::Scroll { delta, cursor: window_point }
        };
        self.dispatch_kmt(&event)
    }

    pub fn on_key_down(&mut self, key: &Key) -> GestureOutput {
        if !key.is_space() {
            return GestureOutput::None;
        }
        self.dispatch_kmt(&KmtEvent::SpacebarDown)
    }

    pub fn on_key_up(&mut self, key: &Key) -> GestureOutput {
        if !key.is_space() {
            return GestureOutput::None;
        }
        self.dispatch_kmt(&KmtEvent::SpacebarUp)
    }

    // --- Touch ---

    pub fn on_touch_start(&mut self, changed: Vec<TouchPoint>) -> GestureOutput {
        self.dispatch_touch(&TouchEvent::Start(changed))
    }

    pub fn on_touch_move(&mut self, changed: Vec<TouchPoint>) -> GestureOutput {
        self.dispatch_touch(&TouchEvent::Move(changed))
    }

    pub fn on_touch_end(&mut self, changed: Vec<TouchPoint>) -> GestureOutput {
        self.dispatch_touch(&TouchEvent::End(changed))
    }

    pub fn on_touch_cancel(&mut self, changed: Vec<TouchPoint>) -> GestureOutput {
        self.dispatch_touch(&TouchEvent::Cancel(changed))
    }

    // --- Enable / disable ---

    /// Park the keyboard/mouse/trackpad machine in `Disabled`, dropping any gesture in progress.
    pub fn disable_input(&mut self) {
        self.pressed = None;
        self.dispatch_kmt(&KmtEvent::Disable);
    }

    pub fn enable_input(&mut self) {
        self.dispatch_kmt(&KmtEvent::Enable);
    }

    // --- Frame / configuration ---

    /// Advance animations and lock-on tracking by `delta_time` seconds.
    pub fn update(&mut self, delta_time: f64) {
        self.orchestrator.rig_mut().update(delta_time);
    }

    /// Resize the camera viewport. The host resizes its canvas element itself.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidViewportSize`] for non-positive dimensions.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Result<(), CameraError> {
        self.orchestrator.rig_mut().set_viewport_size(width, height)
    }

    pub fn set_rig_config(&mut self, config: RigConfig) {
        self.orchestrator.rig_mut().set_config(config);
    }

    pub fn set_mux(&mut self, mux: Box<dyn CameraMux>) {
        self.orchestrator.set_mux(mux);
    }

    pub fn set_align_with_dom(&mut self, align_with_dom: bool) {
        self.kmt.context_mut().set_align_with_dom(align_with_dom);
        self.touch.context_mut().set_align_with_dom(align_with_dom);
    }

    pub fn reset_device_modality(&mut self) {
        self.kmt.context_mut().reset_device_modality();
    }

    // --- Subscriptions ---

    pub fn on_camera<F>(&self, kind: CameraEventKind, callback: F) -> Subscription
    where
        F: FnMut(&CameraEvent) + 'static,
    {
        self.orchestrator.camera().on(kind, callback)
    }

    pub fn on_raw_gesture<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&GestureOutput) + 'static,
    {
        self.orchestrator.on_raw_gesture(callback)
    }

    // --- Queries ---

    #[must_use]
    pub fn camera(&self) -> &Camera {
        self.orchestrator.camera()
    }

    #[must_use]
    pub fn rig(&self) -> &CameraRig {
        self.orchestrator.rig()
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        self.orchestrator.rig_mut()
    }

    #[must_use]
    pub fn kmt_state(&self) -> KmtState {
        self.kmt.current_state()
    }

    #[must_use]
    pub fn touch_state(&self) -> TouchState {
        self.touch.current_state()
    }

    #[must_use]
    pub fn device_modality(&self) -> DeviceModality {
        self.kmt.context().device_modality()
    }

    // --- Dispatch ---

    fn dispatch_kmt(&mut self, event: &KmtEvent) -> GestureOutput {
        let output = self.kmt.happens(event).output.unwrap_or_default();
        self.orchestrator.process_input_event(&output);
        output
    }

    fn dispatch_touch(&mut self, event: &TouchEvent) -> GestureOutput {
        let output = self.touch.happens(event).output.unwrap_or_default();
        self.orchestrator.process_input_event(&output);
        output
    }
}
