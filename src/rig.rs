//! Camera rig: turns viewport-space gesture deltas into camera calls.
//!
//! The rig owns the [`Camera`] and a [`RigConfig`]. The config decides which
//! camera entry point every gesture goes through (clamped or rejecting,
//! center-only or whole-viewport containment) and which restriction flags are
//! pushed into the camera. With `limit_entire_viewport` set, any change to the
//! viewport size, the boundaries, or the rotation recomputes the minimum zoom
//! so the viewport can never show more than the boundaries contain.

#[cfg(test)]
#[path = "rig_test.rs"]
mod rig_test;

use serde::{Deserialize, Serialize};

use crate::bounds::{Boundaries, ZoomLevelLimits, min_zoom_level_for_boundaries};
use crate::camera::{Camera, GestureRestrictions, TranslationClamp};
use crate::coords::viewport_delta_to_world;
use crate::error::CameraError;
use crate::geometry::Point;

/// Rig behavior switches.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Keep the whole viewport (not just its center) inside the boundaries.
    pub limit_entire_viewport: bool,
    pub restrict_x_translation: bool,
    pub restrict_y_translation: bool,
    pub restrict_relative_x_translation: bool,
    pub restrict_relative_y_translation: bool,
    pub restrict_zoom: bool,
    pub restrict_rotation: bool,
    /// Clamp pans into the boundaries instead of rejecting them.
    pub clamp_translation: bool,
    /// Clamp zoom into the limits instead of rejecting it.
    pub clamp_zoom: bool,
    /// Clamp rotation into the rotation limits instead of rejecting it.
    pub clamp_rotation: bool,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            limit_entire_viewport: true,
            restrict_x_translation: false,
            restrict_y_translation: false,
            restrict_relative_x_translation: false,
            restrict_relative_y_translation: false,
            restrict_zoom: false,
            restrict_rotation: false,
            clamp_translation: true,
            clamp_zoom: true,
            clamp_rotation: true,
        }
    }
}

impl RigConfig {
    #[must_use]
    pub fn restrictions(&self) -> GestureRestrictions {
        GestureRestrictions {
            restrict_x_translation: self.restrict_x_translation,
            restrict_y_translation: self.restrict_y_translation,
            restrict_relative_x_translation: self.restrict_relative_x_translation,
            restrict_relative_y_translation: self.restrict_relative_y_translation,
            restrict_zoom: self.restrict_zoom,
            restrict_rotation: self.restrict_rotation,
        }
    }

    /// Translation policy implied by the clamp and containment switches.
    #[must_use]
    pub fn translation_clamp(&self) -> TranslationClamp {
        match (self.clamp_translation, self.limit_entire_viewport) {
            (false, _) => TranslationClamp::Reject,
            (true, true) => TranslationClamp::EntireViewport,
            (true, false) => TranslationClamp::Center,
        }
    }
}

/// A camera plus the policy that drives it from gestures.
#[derive(Debug)]
pub struct CameraRig {
    camera: Camera,
    config: RigConfig,
    /// Limits as configured by the caller, before the containment floor.
    user_limits: ZoomLevelLimits,
}

impl CameraRig {
    #[must_use]
    pub fn new(camera: Camera, config: RigConfig) -> Self {
        let user_limits = camera.zoom_level_limits();
        let mut rig = Self { camera, config, user_limits };
        rig.apply_config();
        rig
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Direct camera access for programmatic control (animations, lock-on, listeners).
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[must_use]
    pub fn config(&self) -> RigConfig {
        self.config
    }

    pub fn set_config(&mut self, config: RigConfig) {
        self.config = config;
        self.apply_config();
    }

    // --- Pan ---

    /// Pan by a viewport-space delta (screen pixels).
    ///
    /// # Errors
    ///
    /// Propagates restriction vetoes and, when translation clamping is off,
    /// out-of-bounds rejections.
    pub fn pan_by_viewport(&mut self, delta: Point) -> Result<Point, CameraError> {
        let world = viewport_delta_to_world(delta, self.camera.zoom_level(), self.camera.rotation());
        self.pan_by_world(world)
    }

    /// Pan by a world-space delta.
    ///
    /// # Errors
    ///
    /// See [`Self::pan_by_viewport`].
    pub fn pan_by_world(&mut self, delta: Point) -> Result<Point, CameraError> {
        self.camera.gesture_move(delta, self.config.translation_clamp())
    }

    /// Pan so the camera center lands on `target` (world space).
    ///
    /// # Errors
    ///
    /// See [`Self::pan_by_viewport`].
    pub fn pan_to_world(&mut self, target: Point) -> Result<Point, CameraError> {
        self.pan_by_world(target - self.camera.position())
    }

    /// Pan so the world point currently under viewport `point` becomes the center.
    ///
    /// # Errors
    ///
    /// See [`Self::pan_by_viewport`].
    pub fn pan_to_viewport(&mut self, point: Point) -> Result<Point, CameraError> {
        self.pan_to_world(self.camera.convert_from_viewport_to_world(point))
    }

    // --- Zoom ---

    /// Zoom by a relative `delta` (`0.1` is +10%) keeping `anchor` (viewport space) fixed.
    ///
    /// # Errors
    ///
    /// Restriction vetoes, [`CameraError::AtZoomLimit`], or, when zoom
    /// clamping is off, out-of-range rejections.
    pub fn zoom_by_at(&mut self, delta: f64, anchor: Point) -> Result<f64, CameraError> {
        let zoom = self.camera.zoom_level();
        self.zoom_to_at(zoom + delta * zoom, anchor)
    }

    /// Zoom to an absolute level keeping `anchor` (viewport space) fixed.
    ///
    /// # Errors
    ///
    /// See [`Self::zoom_by_at`].
    pub fn zoom_to_at(&mut self, zoom_level: f64, anchor: Point) -> Result<f64, CameraError> {
        self.camera
            .gesture_zoom_at_anchor(zoom_level, anchor, self.config.clamp_zoom, self.config.translation_clamp())
    }

    /// Zoom by a relative `delta` about the viewport center.
    ///
    /// # Errors
    ///
    /// See [`Self::zoom_by_at`].
    pub fn zoom_by(&mut self, delta: f64) -> Result<f64, CameraError> {
        self.zoom_by_at(delta, Point::ZERO)
    }

    /// Zoom to an absolute level about the viewport center.
    ///
    /// # Errors
    ///
    /// See [`Self::zoom_by_at`].
    pub fn zoom_to(&mut self, zoom_level: f64) -> Result<f64, CameraError> {
        self.zoom_to_at(zoom_level, Point::ZERO)
    }

    // --- Rotate ---

    /// Rotate by `delta` radians.
    ///
    /// # Errors
    ///
    /// Restriction vetoes or, when rotation clamping is off, out-of-range rejections.
    pub fn rotate_by(&mut self, delta: f64) -> Result<f64, CameraError> {
        self.rotate_to(self.camera.rotation() + delta)
    }

    /// Rotate to an absolute angle.
    ///
    /// # Errors
    ///
    /// See [`Self::rotate_by`].
    pub fn rotate_to(&mut self, rotation: f64) -> Result<f64, CameraError> {
        let applied = if self.config.clamp_rotation {
            self.camera.set_rotation_with_clamp_from_gesture(rotation)?
        } else {
            self.camera.set_rotation_from_gesture(rotation)?
        };
        self.refresh_min_zoom();
        Ok(applied)
    }

    // --- Frame and layout ---

    /// Advance camera animations and lock-on tracking.
    pub fn update(&mut self, delta_time: f64) {
        self.camera.step(delta_time);
    }

    /// Resize the viewport and recompute the containment zoom floor.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidViewportSize`] for a non-positive size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Result<(), CameraError> {
        self.camera.set_viewport_size(width, height)?;
        self.refresh_min_zoom();
        Ok(())
    }

    /// Replace the boundaries and recompute the containment zoom floor.
    pub fn set_boundaries(&mut self, boundaries: Option<Boundaries>) {
        self.camera.set_boundaries(boundaries);
        self.refresh_min_zoom();
    }

    /// Replace the configured zoom limits. Under viewport containment the
    /// effective minimum never drops below the boundary floor.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidZoomLimits`] for a non-positive limit;
    /// the previous limits stay in force.
    pub fn set_zoom_level_limits(&mut self, limits: ZoomLevelLimits) -> Result<(), CameraError> {
        self.user_limits = ZoomLevelLimits::new(limits.min, limits.max)?;
        self.refresh_min_zoom();
        Ok(())
    }

    fn apply_config(&mut self) {
        self.camera.set_restrictions(self.config.restrictions());
        self.refresh_min_zoom();
        let containment = if self.config.limit_entire_viewport {
            TranslationClamp::EntireViewport
        } else {
            TranslationClamp::Center
        };
        self.camera.set_containment(containment);
    }

    /// Combine the configured limits with the containment floor, if any.
    fn refresh_min_zoom(&mut self) {
        let floor = if self.config.limit_entire_viewport {
            self.camera.boundaries().and_then(|boundaries| {
                min_zoom_level_for_boundaries(
                    &boundaries,
                    self.camera.viewport_width(),
                    self.camera.viewport_height(),
                    self.camera.rotation(),
                )
            })
        } else {
            None
        };

        let Some(floor) = floor else {
            if let Err(e) = self.camera.set_zoom_level_limits(self.user_limits) {
                tracing::warn!(error = %e, "configured zoom limits rejected");
            }
            return;
        };

        let min = self.user_limits.min.map_or(floor, |min| min.max(floor));
        let max = self.user_limits.max.map(|max| max.max(min));
        if let Err(e) = self.camera.set_zoom_level_limits(ZoomLevelLimits { min: Some(min), max }) {
            tracing::warn!(error = %e, min, "containment zoom floor rejected");
            return;
        }
        tracing::debug!(floor, min, "containment zoom floor recomputed");
        let position = self.camera.position();
        self.camera.set_position_with_clamp_entire_viewport(position);
    }
}
