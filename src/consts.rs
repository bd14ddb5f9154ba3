//! Shared numeric constants for the camera core.

// ── Zoom ────────────────────────────────────────────────────────

/// Zoom level substituted whenever clamping would otherwise produce a value `<= 0`.
pub const ZOOM_LEVEL_FLOOR: f64 = 1e-4;

// ── Wheel ───────────────────────────────────────────────────────

/// Zoom sensitivity for fine (trackpad-sized) wheel deltas.
pub const WHEEL_ZOOM_SENSITIVITY_FINE: f64 = 0.005;

/// Zoom sensitivity for coarse (notched mouse wheel) deltas.
pub const WHEEL_ZOOM_SENSITIVITY_COARSE: f64 = 0.0005;

/// Multiplier applied on top of the wheel sensitivity.
pub const WHEEL_ZOOM_MULTIPLIER: f64 = 5.0;

/// `|deltaY|` above which a wheel event counts as coarse.
pub const WHEEL_COARSE_DELTA_THRESHOLD: f64 = 100.0;

/// Consecutive scroll events needed before the pointing device is classified.
pub const DEVICE_MODALITY_SCORE_THRESHOLD: u32 = 5;

// ── Touch ───────────────────────────────────────────────────────

/// Zoom delta per pixel of change in two-finger separation.
pub const PINCH_ZOOM_SCALE: f64 = 0.005;

// ── Comparison ──────────────────────────────────────────────────

/// Tolerance below which a position or zoom change is treated as no change.
pub const CHANGE_EPSILON: f64 = 1e-10;
