//! Error type for camera construction and rejected camera mutations.
//!
//! Only the construction variants are fatal. Everything else is an expected,
//! recoverable outcome: the caller may retry through a clamped entry point or
//! simply drop the request.

/// Why a camera operation did not apply.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CameraError {
    /// Zoom level must be strictly positive.
    #[error("invalid zoom level {0}: must be > 0")]
    InvalidZoomLevel(f64),

    /// Viewport dimensions must be strictly positive.
    #[error("invalid viewport size {width}x{height}: both dimensions must be > 0")]
    InvalidViewportSize { width: f64, height: f64 },

    /// A zoom limit must be strictly positive.
    #[error("invalid zoom limit {0}: must be > 0")]
    InvalidZoomLimits(f64),

    /// The requested position lies outside the camera boundaries.
    #[error("position ({x}, {y}) is outside the camera boundaries")]
    OutOfBounds { x: f64, y: f64 },

    /// The requested zoom level lies outside the configured limits.
    #[error("zoom level {0} is outside the zoom level limits")]
    ZoomOutOfRange(f64),

    /// The requested rotation lies outside the configured rotation limits.
    #[error("rotation {0} is outside the rotation limits")]
    RotationOutOfRange(f64),

    /// The camera already sits at the zoom limit the request would clamp to.
    #[error("already at zoom limit {0}")]
    AtZoomLimit(f64),

    /// A gesture restriction flag vetoed the whole request.
    #[error("gesture restricted")]
    Restricted,

    /// The lock-on target has no usable state (e.g. outside boundaries).
    #[error("lock-on target position ({x}, {y}) is outside the camera boundaries")]
    TargetOutOfBounds { x: f64, y: f64 },
}
