//! Boundary and limit types plus the pure clamping functions built on them.
//!
//! Every bound is independently optional: `None` on a side means the camera
//! is unbounded in that direction. Setters normalize reversed pairs so that
//! `min <= max` holds whenever both are present.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::{Deserialize, Serialize};

use crate::coords::viewport_to_world;
use crate::error::CameraError;
use crate::geometry::{Point, angle_span, normalize_angle_zero_to_two_pi};

// =============================================================================
// BOUNDARIES
// =============================================================================

/// Axis-aligned world-space region the camera position is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Boundaries {
    pub min_x: Option<f64>,
    pub min_y: Option<f64>,
    pub max_x: Option<f64>,
    pub max_y: Option<f64>,
}

impl Boundaries {
    /// Fully bounded rectangle from two corners. Reversed corners are swapped.
    #[must_use]
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self { min_x: Some(min.x), min_y: Some(min.y), max_x: Some(max.x), max_y: Some(max.y) }.normalized()
    }

    /// Unbounded on every side.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Swap any axis whose min exceeds its max.
    #[must_use]
    pub fn normalized(self) -> Self {
        let (min_x, max_x) = order(self.min_x, self.max_x);
        let (min_y, max_y) = order(self.min_y, self.max_y);
        Self { min_x, min_y, max_x, max_y }
    }

    /// Width when both horizontal bounds are present.
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        Some(self.max_x? - self.min_x?)
    }

    /// Height when both vertical bounds are present.
    #[must_use]
    pub fn height(&self) -> Option<f64> {
        Some(self.max_y? - self.min_y?)
    }
}

fn order(min: Option<f64>, max: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
        other => other,
    }
}

/// Whether `point` satisfies every present bound.
#[must_use]
pub fn within_boundaries(point: Point, boundaries: &Boundaries) -> bool {
    boundaries.min_x.is_none_or(|min| point.x >= min)
        && boundaries.max_x.is_none_or(|max| point.x <= max)
        && boundaries.min_y.is_none_or(|min| point.y >= min)
        && boundaries.max_y.is_none_or(|max| point.y <= max)
}

/// Clamp each axis of `point` independently into `boundaries`.
///
/// A point already inside is returned unchanged.
#[must_use]
pub fn clamp_point(point: Point, boundaries: &Boundaries) -> Point {
    if within_boundaries(point, boundaries) {
        return point;
    }
    Point::new(
        clamp_axis(point.x, boundaries.min_x, boundaries.max_x),
        clamp_axis(point.y, boundaries.min_y, boundaries.max_y),
    )
}

fn clamp_axis(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let value = min.map_or(value, |min| value.max(min));
    max.map_or(value, |max| value.min(max))
}

/// Shift `center` by the smallest amount that brings every corner of the
/// viewport inside `boundaries`.
///
/// Each corner is clamped on its own; the per-axis correction with the
/// largest magnitude among the four corners is applied to the center. When
/// the viewport is larger than the boundaries on an axis the result cannot
/// satisfy both sides; the rig prevents that by raising the minimum zoom.
#[must_use]
pub fn clamp_point_entire_viewport(
    center: Point,
    viewport_width: f64,
    viewport_height: f64,
    boundaries: &Boundaries,
    zoom_level: f64,
    rotation: f64,
) -> Point {
    let mut largest = Point::ZERO;
    for corner in viewport_corners(viewport_width, viewport_height) {
        let world = viewport_to_world(corner, center, zoom_level, rotation);
        let diff = clamp_point(world, boundaries) - world;
        if diff.x.abs() > largest.x.abs() {
            largest.x = diff.x;
        }
        if diff.y.abs() > largest.y.abs() {
            largest.y = diff.y;
        }
    }
    center + largest
}

/// Whether every corner of the viewport centered at `center` is inside `boundaries`.
#[must_use]
pub fn viewport_within_boundaries(
    center: Point,
    viewport_width: f64,
    viewport_height: f64,
    boundaries: &Boundaries,
    zoom_level: f64,
    rotation: f64,
) -> bool {
    viewport_corners(viewport_width, viewport_height)
        .into_iter()
        .all(|corner| within_boundaries(viewport_to_world(corner, center, zoom_level, rotation), boundaries))
}

/// Viewport corners in viewport space (origin at the viewport center):
/// top-left, top-right, bottom-left, bottom-right.
#[must_use]
pub fn viewport_corners(viewport_width: f64, viewport_height: f64) -> [Point; 4] {
    let hw = viewport_width / 2.0;
    let hh = viewport_height / 2.0;
    [Point::new(-hw, -hh), Point::new(hw, -hh), Point::new(-hw, hh), Point::new(hw, hh)]
}

/// Smallest zoom level at which the (rotated) viewport fits inside `boundaries`.
///
/// Only axes bounded on both sides constrain the result. Returns `None` when
/// no axis is fully bounded.
#[must_use]
pub fn min_zoom_level_for_boundaries(
    boundaries: &Boundaries,
    viewport_width: f64,
    viewport_height: f64,
    rotation: f64,
) -> Option<f64> {
    let (sin, cos) = rotation.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let extent_x = viewport_width * cos + viewport_height * sin;
    let extent_y = viewport_width * sin + viewport_height * cos;

    let by_width = boundaries.width().filter(|w| *w > 0.0).map(|w| extent_x / w);
    let by_height = boundaries.height().filter(|h| *h > 0.0).map(|h| extent_y / h);
    match (by_width, by_height) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

// =============================================================================
// ZOOM LIMITS
// =============================================================================

/// Optional lower and upper zoom level bounds. Both must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLevelLimits {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ZoomLevelLimits {
    /// Build limits, swapping a reversed pair.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidZoomLimits`] if either limit is `<= 0` or not finite.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, CameraError> {
        for limit in [min, max].into_iter().flatten() {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(CameraError::InvalidZoomLimits(limit));
            }
        }
        let (min, max) = order(min, max);
        Ok(Self { min, max })
    }

    /// Whether `zoom` satisfies both present limits.
    #[must_use]
    pub fn contains(&self, zoom: f64) -> bool {
        self.min.is_none_or(|min| zoom >= min) && self.max.is_none_or(|max| zoom <= max)
    }
}

/// Clamp `zoom` into `limits`; a non-positive result is replaced by `floor`.
#[must_use]
pub fn clamp_zoom_level(zoom: f64, limits: &ZoomLevelLimits, floor: f64) -> f64 {
    let clamped = clamp_axis(zoom, limits.min, limits.max);
    if clamped > 0.0 && clamped.is_finite() { clamped } else { floor }
}

// =============================================================================
// ROTATION LIMITS
// =============================================================================

/// An angular window the camera rotation is confined to.
///
/// The window starts at `start` and sweeps to `end`, counter-clockwise when
/// `ccw` is set and clockwise otherwise. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationLimits {
    pub start: f64,
    pub end: f64,
    pub ccw: bool,
}

impl RotationLimits {
    #[must_use]
    pub fn contains(&self, angle: f64) -> bool {
        let (span, offset) = if self.ccw {
            (
                normalize_angle_zero_to_two_pi(self.end - self.start),
                normalize_angle_zero_to_two_pi(angle - self.start),
            )
        } else {
            (
                normalize_angle_zero_to_two_pi(self.start - self.end),
                normalize_angle_zero_to_two_pi(self.start - angle),
            )
        };
        offset <= span
    }

    /// Snap `angle` to the nearer end of the window if it lies outside.
    ///
    /// Ties go to `start`. The result is normalized to `[0, 2π)`.
    #[must_use]
    pub fn clamp(&self, angle: f64) -> f64 {
        if self.contains(angle) {
            return normalize_angle_zero_to_two_pi(angle);
        }
        let to_start = angle_span(angle, self.start).abs();
        let to_end = angle_span(angle, self.end).abs();
        let snapped = if to_end < to_start { self.end } else { self.start };
        normalize_angle_zero_to_two_pi(snapped)
    }
}
