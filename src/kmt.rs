//! Keyboard / mouse / trackpad gesture machine.
//!
//! | State | Reached by | Leaves on |
//! |-------|------------|-----------|
//! | `Idle` | start, spacebar up, middle up, enable | spacebar down, middle down |
//! | `ReadyToPanViaSpacebar` | spacebar down, left up while panning | left down, spacebar up |
//! | `InitialPan` | left down while ready | first left move, left up, spacebar up |
//! | `Pan` | left move | left up, spacebar up |
//! | `ReadyToPanViaScrollWheel` | middle down | first middle move, middle up |
//! | `PanViaScrollWheel` | middle move | middle up |
//! | `Disabled` | disable (from any state) | enable |
//!
//! Plain scroll pans, or zooms once the pointing device has been classified
//! as a mouse. Ctrl-scroll always zooms about the cursor. Drag pans emit
//! `previous − current` cursor deltas, with Y flipped when the consuming
//! coordinate system is not aligned with the DOM.

#[cfg(test)]
#[path = "kmt_test.rs"]
mod kmt_test;

use std::fmt;
use std::rc::Rc;

use crate::config::InputTuning;
use crate::fsm::{Reaction, StateBehavior, StateMachine};
use crate::geometry::Point;
use crate::input::{
    CanvasQuery, CursorSink, CursorStyle, GestureOutput, KmtEvent, KmtEventKind, WheelDelta, canvas_viewport_point,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KmtState {
    Idle,
    ReadyToPanViaSpacebar,
    InitialPan,
    Pan,
    ReadyToPanViaScrollWheel,
    PanViaScrollWheel,
    Disabled,
}

/// What kind of device the scroll events appear to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceModality {
    #[default]
    Undetermined,
    /// Two-axis scroll deltas: plain scroll pans.
    Trackpad,
    /// Vertical-only wheel deltas: plain scroll zooms.
    Mouse,
}

/// Mutable state shared by every KMT state.
pub struct KmtContext {
    canvas: Rc<dyn CanvasQuery>,
    cursor_sink: Rc<dyn CursorSink>,
    align_with_dom: bool,
    tuning: InputTuning,
    initial_cursor: Point,
    trackpad_score: u32,
    mouse_score: u32,
    modality: DeviceModality,
}

impl fmt::Debug for KmtContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KmtContext")
            .field("align_with_dom", &self.align_with_dom)
            .field("initial_cursor", &self.initial_cursor)
            .field("modality", &self.modality)
            .finish_non_exhaustive()
    }
}

impl KmtContext {
    #[must_use]
    pub fn new(
        canvas: Rc<dyn CanvasQuery>,
        cursor_sink: Rc<dyn CursorSink>,
        align_with_dom: bool,
        tuning: InputTuning,
    ) -> Self {
        Self {
            canvas,
            cursor_sink,
            align_with_dom,
            tuning,
            initial_cursor: Point::ZERO,
            trackpad_score: 0,
            mouse_score: 0,
            modality: DeviceModality::Undetermined,
        }
    }

    #[must_use]
    pub fn align_with_dom(&self) -> bool {
        self.align_with_dom
    }

    pub fn set_align_with_dom(&mut self, align_with_dom: bool) {
        self.align_with_dom = align_with_dom;
    }

    #[must_use]
    pub fn tuning(&self) -> InputTuning {
        self.tuning
    }

    #[must_use]
    pub fn device_modality(&self) -> DeviceModality {
        self.modality
    }

    /// Forget the device classification. It otherwise persists for the life of the machine.
    pub fn reset_device_modality(&mut self) {
        self.modality = DeviceModality::Undetermined;
        self.trackpad_score = 0;
        self.mouse_score = 0;
    }

    fn observe_scroll(&mut self, delta: WheelDelta) {
        if self.modality != DeviceModality::Undetermined {
            return;
        }
        if delta.dx != 0.0 {
            self.trackpad_score += 1;
            self.mouse_score = 0;
        } else if delta.dy != 0.0 {
            self.mouse_score += 1;
            self.trackpad_score = 0;
        }
        let threshold = self.tuning.device_modality_score_threshold;
        if self.trackpad_score >= threshold {
            self.modality = DeviceModality::Trackpad;
        } else if self.mouse_score >= threshold {
            self.modality = DeviceModality::Mouse;
        }
        if self.modality != DeviceModality::Undetermined {
            tracing::debug!(modality = ?self.modality, "pointing device classified");
        }
    }

    fn wheel_zoom(&self, delta: WheelDelta, cursor: Point) -> GestureOutput {
        GestureOutput::Zoom {
            delta: self.tuning.wheel_zoom_delta(delta.dy),
            anchor_point_in_viewport: canvas_viewport_point(self.canvas.as_ref(), cursor, self.align_with_dom),
        }
    }

    fn drag_delta(&mut self, cursor: Point) -> Point {
        let delta = self.initial_cursor - cursor;
        self.initial_cursor = cursor;
        if self.align_with_dom { delta } else { delta.flip_y() }
    }
}

pub type KmtMachine = StateMachine<KmtState, KmtContext, KmtEvent, GestureOutput>;

// =============================================================================
// ACTIONS
// =============================================================================

fn scroll(ctx: &mut KmtContext, event: &KmtEvent) -> GestureOutput {
    let KmtEvent::Scroll { delta, cursor } = *event else {
        return GestureOutput::None;
    };
    ctx.observe_scroll(delta);
    let output = if ctx.modality == DeviceModality::Mouse {
        ctx.wheel_zoom(delta, cursor)
    } else {
        let pan = Point::new(delta.dx, delta.dy);
        GestureOutput::Pan { delta: if ctx.align_with_dom { pan } else { pan.flip_y() } }
    };
    tracing::trace!(?output, "kmt scroll");
    output
}

fn scroll_with_ctrl(ctx: &mut KmtContext, event: &KmtEvent) -> GestureOutput {
    let KmtEvent::ScrollWithCtrl { delta, cursor } = *event else {
        return GestureOutput::None;
    };
    let output = ctx.wheel_zoom(delta, cursor);
    tracing::trace!(?output, "kmt ctrl scroll");
    output
}

fn grab_cursor(_ctx: &mut KmtContext, _event: &KmtEvent) -> GestureOutput {
    GestureOutput::Cursor { style: CursorStyle::Grab }
}

fn default_cursor(_ctx: &mut KmtContext, _event: &KmtEvent) -> GestureOutput {
    GestureOutput::Cursor { style: CursorStyle::Default }
}

fn start_drag(ctx: &mut KmtContext, event: &KmtEvent) -> GestureOutput {
    if let Some(cursor) = event.cursor() {
        ctx.initial_cursor = cursor;
    }
    GestureOutput::Cursor { style: CursorStyle::Grabbing }
}

fn drag(ctx: &mut KmtContext, event: &KmtEvent) -> GestureOutput {
    let Some(cursor) = event.cursor() else {
        return GestureOutput::None;
    };
    let delta = ctx.drag_delta(cursor);
    tracing::trace!(?delta, "kmt drag pan");
    GestureOutput::Pan { delta }
}

fn enable(_ctx: &mut KmtContext, _event: &KmtEvent) -> GestureOutput {
    GestureOutput::None
}

// =============================================================================
// HOOKS
// =============================================================================

fn show_default(ctx: &mut KmtContext) {
    ctx.cursor_sink.set_cursor(CursorStyle::Default);
}

fn show_grab(ctx: &mut KmtContext) {
    ctx.cursor_sink.set_cursor(CursorStyle::Grab);
}

fn show_grabbing(ctx: &mut KmtContext) {
    ctx.cursor_sink.set_cursor(CursorStyle::Grabbing);
}

fn abandon_gesture(ctx: &mut KmtContext) {
    ctx.initial_cursor = Point::ZERO;
    ctx.cursor_sink.set_cursor(CursorStyle::Default);
}

// =============================================================================
// TABLE
// =============================================================================

type Behavior = StateBehavior<KmtState, KmtContext, KmtEvent, GestureOutput>;

/// Reactions shared by every state except `Disabled`.
fn enabled_state() -> Behavior {
    Behavior::new().on(KmtEventKind::Disable, Reaction::new(default_cursor, KmtState::Disabled))
}

fn scrolling_state(stay: KmtState) -> Behavior {
    enabled_state()
        .on(KmtEventKind::Scroll, Reaction::new(scroll, stay))
        .on(KmtEventKind::ScrollWithCtrl, Reaction::new(scroll_with_ctrl, stay))
}

/// Build the keyboard/mouse/trackpad machine, starting in `Idle`.
#[must_use]
pub fn kmt_machine(context: KmtContext) -> KmtMachine {
    use KmtState::{Disabled, Idle, InitialPan, Pan, PanViaScrollWheel, ReadyToPanViaScrollWheel, ReadyToPanViaSpacebar};

    StateMachine::new("kmt", Idle, context)
        .with_state(
            Idle,
            scrolling_state(Idle)
                .on(KmtEventKind::SpacebarDown, Reaction::new(grab_cursor, ReadyToPanViaSpacebar))
                .on(KmtEventKind::MiddlePointerDown, Reaction::new(start_drag, ReadyToPanViaScrollWheel))
                .with_enter(show_default),
        )
        .with_state(
            ReadyToPanViaSpacebar,
            scrolling_state(ReadyToPanViaSpacebar)
                .on(KmtEventKind::LeftPointerDown, Reaction::new(start_drag, InitialPan))
                .on(KmtEventKind::SpacebarUp, Reaction::new(default_cursor, Idle))
                .with_enter(show_grab),
        )
        .with_state(
            InitialPan,
            enabled_state()
                .on(KmtEventKind::LeftPointerMove, Reaction::new(drag, Pan))
                .on(KmtEventKind::LeftPointerUp, Reaction::new(grab_cursor, ReadyToPanViaSpacebar))
                .on(KmtEventKind::SpacebarUp, Reaction::new(default_cursor, Idle))
                .with_enter(show_grabbing),
        )
        .with_state(
            Pan,
            enabled_state()
                .on(KmtEventKind::LeftPointerMove, Reaction::new(drag, Pan))
                .on(KmtEventKind::LeftPointerUp, Reaction::new(grab_cursor, ReadyToPanViaSpacebar))
                .on(KmtEventKind::SpacebarUp, Reaction::new(default_cursor, Idle))
                .with_enter(show_grabbing),
        )
        .with_state(
            ReadyToPanViaScrollWheel,
            enabled_state()
                .on(KmtEventKind::MiddlePointerMove, Reaction::new(drag, PanViaScrollWheel))
                .on(KmtEventKind::MiddlePointerUp, Reaction::new(default_cursor, Idle))
                .with_enter(show_grabbing),
        )
        .with_state(
            PanViaScrollWheel,
            enabled_state()
                .on(KmtEventKind::MiddlePointerMove, Reaction::new(drag, PanViaScrollWheel))
                .on(KmtEventKind::MiddlePointerUp, Reaction::new(default_cursor, Idle))
                .with_enter(show_grabbing),
        )
        .with_state(
            Disabled,
            Behavior::new().on(KmtEventKind::Enable, Reaction::new(enable, Idle)).with_enter(abandon_gesture),
        )
}
