//! Two-finger touch gesture machine.
//!
//! Every contact is tracked in a table keyed by its identifier, but only an
//! exactly-two-finger gesture produces output. One finger or three and more
//! are left alone so taps and UI interactions pass through untouched.
//!
//! The two starting positions are captured once when the pair forms
//! (`Pending` entry) and never updated during the gesture, so classification
//! uses cumulative motion since the gesture began. The emitted pan and zoom
//! magnitudes are frame to frame, not cumulative: the rig applies every output
//! relative to the current camera, so cumulative deltas would be counted again
//! on each move. On the first move both readings coincide.
//!
//! Moves while `Idle` only keep the touch table current and are reported as
//! unhandled.

#[cfg(test)]
#[path = "touch_test.rs"]
mod touch_test;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::config::InputTuning;
use crate::fsm::{Reaction, StateBehavior, StateMachine};
use crate::geometry::Point;
use crate::input::{CanvasQuery, GestureOutput, TouchEvent, TouchEventKind, canvas_viewport_point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchState {
    Idle,
    Pending,
    InProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFingerGesture {
    Panning,
    Zooming,
}

/// Pinch when the finger separation changed more than the pair's midpoint moved.
#[must_use]
pub fn classify_two_finger_gesture(initial: [Point; 2], current: [Point; 2]) -> TwoFingerGesture {
    let initial_distance = initial[0].distance(initial[1]);
    let current_distance = current[0].distance(current[1]);
    let initial_midpoint = initial[0].lerp(initial[1], 0.5);
    let current_midpoint = current[0].lerp(current[1], 0.5);
    if (current_distance - initial_distance).abs() > initial_midpoint.distance(current_midpoint) {
        TwoFingerGesture::Zooming
    } else {
        TwoFingerGesture::Panning
    }
}

pub struct TouchContext {
    canvas: Rc<dyn CanvasQuery>,
    align_with_dom: bool,
    tuning: InputTuning,
    touches: BTreeMap<i64, Point>,
    initial_pair: Option<[Point; 2]>,
    previous_pair: Option<[Point; 2]>,
    gesture: Option<TwoFingerGesture>,
}

impl fmt::Debug for TouchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouchContext")
            .field("align_with_dom", &self.align_with_dom)
            .field("touches", &self.touches)
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}

impl TouchContext {
    #[must_use]
    pub fn new(canvas: Rc<dyn CanvasQuery>, align_with_dom: bool, tuning: InputTuning) -> Self {
        Self {
            canvas,
            align_with_dom,
            tuning,
            touches: BTreeMap::new(),
            initial_pair: None,
            previous_pair: None,
            gesture: None,
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
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Tracked position of a contact, in window space.
    #[must_use]
    pub fn touch(&self, identifier: i64) -> Option<Point> {
        self.touches.get(&identifier).copied()
    }

    /// Classification of the most recent move of the current gesture.
    #[must_use]
    pub fn gesture(&self) -> Option<TwoFingerGesture> {
        self.gesture
    }

    /// The two tracked contacts, ordered by identifier, when exactly two are down.
    fn pair(&self) -> Option<[Point; 2]> {
        let mut positions = self.touches.values().copied();
        match (positions.next(), positions.next(), positions.next()) {
            (Some(a), Some(b), None) => Some([a, b]),
            _ => None,
        }
    }

    fn two_fingers(&self) -> bool {
        self.touches.len() == 2
    }

    fn window_to_viewport(&self, point: Point) -> Point {
        canvas_viewport_point(self.canvas.as_ref(), point, self.align_with_dom)
    }
}

pub type TouchMachine = StateMachine<TouchState, TouchContext, TouchEvent, GestureOutput>;

// =============================================================================
// ACTIONS
// =============================================================================

fn add_touches(ctx: &mut TouchContext, event: &TouchEvent) -> GestureOutput {
    for point in event.points() {
        ctx.touches.insert(point.identifier, point.position);
    }
    GestureOutput::None
}

fn remove_touches(ctx: &mut TouchContext, event: &TouchEvent) -> GestureOutput {
    for point in event.points() {
        ctx.touches.remove(&point.identifier);
    }
    GestureOutput::None
}

/// Update known contacts; unknown identifiers are ignored.
fn update_positions(ctx: &mut TouchContext, event: &TouchEvent) {
    for point in event.points() {
        if let Some(position) = ctx.touches.get_mut(&point.identifier) {
            *position = point.position;
        }
    }
}

fn track_moves(ctx: &mut TouchContext, event: &TouchEvent) -> GestureOutput {
    update_positions(ctx, event);
    GestureOutput::None
}

fn two_finger_move(ctx: &mut TouchContext, event: &TouchEvent) -> GestureOutput {
    update_positions(ctx, event);
    let (Some(initial), Some(current)) = (ctx.initial_pair, ctx.pair()) else {
        return GestureOutput::None;
    };
    let previous = ctx.previous_pair.unwrap_or(initial);
    let gesture = classify_two_finger_gesture(initial, current);
    ctx.previous_pair = Some(current);
    ctx.gesture = Some(gesture);

    let current_midpoint = current[0].lerp(current[1], 0.5);
    let output = match gesture {
        TwoFingerGesture::Zooming => {
            let separation_change = current[0].distance(current[1]) - previous[0].distance(previous[1]);
            GestureOutput::Zoom {
                delta: separation_change * ctx.tuning.pinch_zoom_scale,
                anchor_point_in_viewport: ctx.window_to_viewport(current_midpoint),
            }
        }
        TwoFingerGesture::Panning => {
            let delta = previous[0].lerp(previous[1], 0.5) - current_midpoint;
            GestureOutput::Pan { delta: if ctx.align_with_dom { delta } else { delta.flip_y() } }
        }
    };
    tracing::trace!(?gesture, ?output, "two-finger move");
    output
}

// =============================================================================
// HOOKS AND GUARDS
// =============================================================================

fn capture_initial_pair(ctx: &mut TouchContext) {
    ctx.initial_pair = ctx.pair();
    ctx.previous_pair = ctx.initial_pair;
    ctx.gesture = None;
}

fn forget_gesture(ctx: &mut TouchContext) {
    ctx.initial_pair = None;
    ctx.previous_pair = None;
    ctx.gesture = None;
}

fn has_two_fingers(ctx: &TouchContext) -> bool {
    ctx.two_fingers()
}

fn lacks_two_fingers(ctx: &TouchContext) -> bool {
    !ctx.two_fingers()
}

// =============================================================================
// TABLE
// =============================================================================

type Behavior = StateBehavior<TouchState, TouchContext, TouchEvent, GestureOutput>;

/// Reactions that keep the touch table current and leave once the pair breaks.
fn paired_state(stay: TouchState) -> Behavior {
    Behavior::new()
        .on(TouchEventKind::Start, Reaction::new(add_touches, stay).guard(lacks_two_fingers, TouchState::Idle))
        .on(TouchEventKind::Move, Reaction::new(two_finger_move, TouchState::InProgress))
        .on(TouchEventKind::End, Reaction::new(remove_touches, stay).guard(lacks_two_fingers, TouchState::Idle))
        .on(TouchEventKind::Cancel, Reaction::new(remove_touches, stay).guard(lacks_two_fingers, TouchState::Idle))
}

/// Build the two-finger touch machine, starting in `Idle`.
#[must_use]
pub fn touch_machine(context: TouchContext) -> TouchMachine {
    let idle = Behavior::new()
        .on(TouchEventKind::Start, Reaction::new(add_touches, TouchState::Idle).guard(has_two_fingers, TouchState::Pending))
        .on(TouchEventKind::Move, Reaction::new(track_moves, TouchState::Idle).passive())
        .on(TouchEventKind::End, Reaction::new(remove_touches, TouchState::Idle).guard(has_two_fingers, TouchState::Pending))
        .on(
            TouchEventKind::Cancel,
            Reaction::new(remove_touches, TouchState::Idle).guard(has_two_fingers, TouchState::Pending),
        )
        .with_enter(forget_gesture);

    StateMachine::new("touch", TouchState::Idle, context)
        .with_state(TouchState::Idle, idle)
        .with_state(
            TouchState::Pending,
            paired_state(TouchState::Pending).with_enter(capture_initial_pair),
        )
        .with_state(TouchState::InProgress, paired_state(TouchState::InProgress))
}
