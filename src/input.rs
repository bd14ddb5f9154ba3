//! Input vocabulary: host-level input types, the raw events the state machines
//! consume, the gesture outputs they produce, and the canvas seams they use.
//!
//! `Button`, `Modifiers`, `Key`, and `WheelDelta` describe what the host
//! reports. `KmtEvent` and `TouchEvent` are the machine-level events derived
//! from them. `GestureOutput` is what a machine hands to the orchestrator.
//! The machines never touch a real canvas element: they read its size and
//! position through [`CanvasQuery`] and write the cursor through
//! [`CursorSink`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::cell::Cell;

use crate::coords::window_to_viewport;
use crate::fsm::MachineEvent;
use crate::geometry::Point;

// =============================================================================
// HOST INPUT
// =============================================================================

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `" "`, `"Space"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key is the spacebar.
    #[must_use]
    pub fn is_space(&self) -> bool {
        matches!(self.0.as_str(), " " | "Space" | "Spacebar")
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

// =============================================================================
// CANVAS SEAMS
// =============================================================================

/// Pointer cursor shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    Grab,
    Grabbing,
    #[default]
    Default,
}

/// Read access to the canvas geometry.
pub trait CanvasQuery {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Top-left corner of the canvas in window coordinates.
    fn position(&self) -> Point;
}

/// Where cursor changes are written.
pub trait CursorSink {
    fn set_cursor(&self, style: CursorStyle);
}

/// Window point to viewport point for the canvas behind `canvas`.
#[must_use]
pub fn canvas_viewport_point(canvas: &dyn CanvasQuery, window_point: Point, align_with_dom: bool) -> Point {
    window_to_viewport(window_point, canvas.position(), canvas.width(), canvas.height(), align_with_dom)
}

/// In-memory canvas for headless hosts and tests.
#[derive(Debug)]
pub struct HeadlessCanvas {
    width: Cell<f64>,
    height: Cell<f64>,
    position: Cell<Point>,
    cursor: Cell<CursorStyle>,
}

impl HeadlessCanvas {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Cell::new(width),
            height: Cell::new(height),
            position: Cell::new(Point::ZERO),
            cursor: Cell::new(CursorStyle::Default),
        }
    }

    pub fn set_size(&self, width: f64, height: f64) {
        self.width.set(width);
        self.height.set(height);
    }

    pub fn set_position(&self, position: Point) {
        self.position.set(position);
    }

    /// The cursor most recently written through [`CursorSink`].
    #[must_use]
    pub fn cursor(&self) -> CursorStyle {
        self.cursor.get()
    }
}

impl CanvasQuery for HeadlessCanvas {
    fn width(&self) -> f64 {
        self.width.get()
    }

    fn height(&self) -> f64 {
        self.height.get()
    }

    fn position(&self) -> Point {
        self.position.get()
    }
}

impl CursorSink for HeadlessCanvas {
    fn set_cursor(&self, style: CursorStyle) {
        self.cursor.set(style);
    }
}

// =============================================================================
// GESTURE OUTPUT
// =============================================================================

/// What a state machine recognized from one raw event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureOutput {
    /// Pan by a viewport-space delta.
    Pan { delta: Point },
    /// Relative zoom (`0.1` is +10%) about a viewport-space anchor.
    Zoom { delta: f64, anchor_point_in_viewport: Point },
    /// Rotate by radians.
    Rotate { delta_rotation: f64 },
    /// Cursor change; the canvas has already been updated.
    Cursor { style: CursorStyle },
    #[default]
    None,
}

// =============================================================================
// KEYBOARD / MOUSE / TRACKPAD EVENTS
// =============================================================================

/// Raw event for the keyboard/mouse/trackpad machine. Positions are in window space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KmtEvent {
    Scroll { delta: WheelDelta, cursor: Point },
    ScrollWithCtrl { delta: WheelDelta, cursor: Point },
    SpacebarDown,
    SpacebarUp,
    LeftPointerDown(Point),
    LeftPointerMove(Point),
    LeftPointerUp(Point),
    MiddlePointerDown(Point),
    MiddlePointerMove(Point),
    MiddlePointerUp(Point),
    Disable,
    Enable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KmtEventKind {
    Scroll,
    ScrollWithCtrl,
    SpacebarDown,
    SpacebarUp,
    LeftPointerDown,
    LeftPointerMove,
    LeftPointerUp,
    MiddlePointerDown,
    MiddlePointerMove,
    MiddlePointerUp,
    Disable,
    Enable,
}

impl MachineEvent for KmtEvent {
    type Kind = KmtEventKind;

    fn kind(&self) -> KmtEventKind {
        match self {
            Self::Scroll { .. } => KmtEventKind::Scroll,
            Self::ScrollWithCtrl { .. } => KmtEventKind::ScrollWithCtrl,
            Self::SpacebarDown => KmtEventKind::SpacebarDown,
            Self::SpacebarUp => KmtEventKind::SpacebarUp,
            Self::LeftPointerDown(_) => KmtEventKind::LeftPointerDown,
            Self::LeftPointerMove(_) => KmtEventKind::LeftPointerMove,
            Self::LeftPointerUp(_) => KmtEventKind::LeftPointerUp,
            Self::MiddlePointerDown(_) => KmtEventKind::MiddlePointerDown,
            Self::MiddlePointerMove(_) => KmtEventKind::MiddlePointerMove,
            Self::MiddlePointerUp(_) => KmtEventKind::MiddlePointerUp,
            Self::Disable => KmtEventKind::Disable,
            Self::Enable => KmtEventKind::Enable,
        }
    }
}

impl KmtEvent {
    /// The pointer position carried by pointer and scroll events.
    #[must_use]
    pub fn cursor(&self) -> Option<Point> {
        match self {
            Self::Scroll { cursor, .. } | Self::ScrollWithCtrl { cursor, .. } => Some(*cursor),
            Self::LeftPointerDown(p)
            | Self::LeftPointerMove(p)
            | Self::LeftPointerUp(p)
            | Self::MiddlePointerDown(p)
            | Self::MiddlePointerMove(p)
            | Self::MiddlePointerUp(p) => Some(*p),
            Self::SpacebarDown | Self::SpacebarUp | Self::Disable | Self::Enable => None,
        }
    }
}

// =============================================================================
// TOUCH EVENTS
// =============================================================================

/// One changed touch contact, in window space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub identifier: i64,
    pub position: Point,
}

impl TouchPoint {
    #[must_use]
    pub fn new(identifier: i64, x: f64, y: f64) -> Self {
        Self { identifier, position: Point::new(x, y) }
    }
}

/// Raw event for the touch machine. Each carries the contacts that changed.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchEvent {
    Start(Vec<TouchPoint>),
    Move(Vec<TouchPoint>),
    End(Vec<TouchPoint>),
    Cancel(Vec<TouchPoint>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchEventKind {
    Start,
    Move,
    End,
    Cancel,
}

impl MachineEvent for TouchEvent {
    type Kind = TouchEventKind;

    fn kind(&self) -> TouchEventKind {
        match self {
            Self::Start(_) => TouchEventKind::Start,
            Self::Move(_) => TouchEventKind::Move,
            Self::End(_) => TouchEventKind::End,
            Self::Cancel(_) => TouchEventKind::Cancel,
        }
    }
}

impl TouchEvent {
    #[must_use]
    pub fn points(&self) -> &[TouchPoint] {
        match self {
            Self::Start(points) | Self::Move(points) | Self::End(points) | Self::Cancel(points) => points,
        }
    }
}
