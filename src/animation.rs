//! Easing functions and the per-kind tween bookkeeping driven by `Camera::step`.
//!
//! A tween never stores absolute targets. Each step yields the *increment*
//! between the previous and current eased fraction, and the camera applies
//! `diff * increment` through its clamped setters. Clamping mid-animation
//! therefore only trims the blocked portion of that frame instead of causing
//! a snap back toward an unreachable destination.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use crate::geometry::Point;

/// Maps linear progress in `[0, 1]` to eased progress (normally also `[0, 1]`).
pub type EasingFn = fn(f64) -> f64;

#[must_use]
pub fn linear(t: f64) -> f64 {
    t
}

#[must_use]
pub fn ease_in_quad(t: f64) -> f64 {
    t * t
}

#[must_use]
pub fn ease_out_quad(t: f64) -> f64 {
    t * (2.0 - t)
}

#[must_use]
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 { 2.0 * t * t } else { -1.0 + (4.0 - 2.0 * t) * t }
}

#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 { 4.0 * t * t * t } else { 1.0 - (-2.0 * t + 2.0).powi(3) / 2.0 }
}

#[must_use]
pub fn ease_in_out_sine(t: f64) -> f64 {
    -((std::f64::consts::PI * t).cos() - 1.0) / 2.0
}

// =============================================================================
// TWEEN
// =============================================================================

/// Result of advancing a [`Tween`] by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    /// Eased progress gained this frame; multiply by the animation's diff.
    pub increment: f64,
    /// The tween reached its end on this frame.
    pub finished: bool,
}

/// Time-based progress with easing. Durations and deltas share one unit.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    percentage: f64,
    duration: f64,
    easing: EasingFn,
}

impl Tween {
    #[must_use]
    pub fn new(duration: f64, easing: EasingFn) -> Self {
        Self { percentage: 0.0, duration, easing }
    }

    /// Linear progress so far; values `>= 1` mean the tween is done.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Advance by `delta_time` and report the eased increment.
    ///
    /// A non-positive duration completes on the first step.
    pub fn advance(&mut self, delta_time: f64) -> TweenStep {
        let before = (self.easing)(self.percentage.min(1.0));
        self.percentage = if self.duration > 0.0 {
            self.percentage + delta_time.max(0.0) / self.duration
        } else {
            1.0
        };
        let after = (self.easing)(self.percentage.min(1.0));
        TweenStep { increment: after - before, finished: self.percentage >= 1.0 }
    }
}

// =============================================================================
// ANIMATIONS
// =============================================================================

/// In-flight translation by `diff` (world units).
#[derive(Debug, Clone, Copy)]
pub struct PositionAnimation {
    pub tween: Tween,
    pub diff: Point,
}

/// In-flight rotation by `diff` radians (signed, shortest direction).
#[derive(Debug, Clone, Copy)]
pub struct RotationAnimation {
    pub tween: Tween,
    pub diff: f64,
}

/// In-flight zoom change by `diff`, optionally keeping `anchor` fixed on screen.
#[derive(Debug, Clone, Copy)]
pub struct ZoomAnimation {
    pub tween: Tween,
    pub diff: f64,
    pub anchor: Option<Point>,
}
