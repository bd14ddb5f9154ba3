//! Camera model: authoritative 2D camera state and every safe way to change it.
//!
//! Mutators come in three flavours:
//!
//! - **direct** (`set_position`, `set_zoom_level`, `move_by`, ...) reject a
//!   change that would break an invariant and leave the state untouched;
//! - **clamped** (`..._with_clamp`) always succeed, trimming the change so the
//!   invariants hold, and report what was actually applied;
//! - **gesture** (`..._from_gesture`) honor the [`GestureRestrictions`] flags,
//!   then cancel every in-flight animation and release any lock-on target
//!   before applying the change.
//!
//! Every successful change to position, zoom, or rotation is published once to
//! the matching [`CameraEventKind`] subscribers and to `All`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::animation::{EasingFn, PositionAnimation, RotationAnimation, Tween, ZoomAnimation};
use crate::bounds::{
    Boundaries, RotationLimits, ZoomLevelLimits, clamp_point, clamp_point_entire_viewport, clamp_zoom_level,
    viewport_corners, within_boundaries,
};
use crate::consts::{CHANGE_EPSILON, ZOOM_LEVEL_FLOOR};
use crate::coords::{viewport_to_world, world_to_viewport};
use crate::error::CameraError;
use crate::geometry::{Point, angle_span, normalize_angle_zero_to_two_pi};
use crate::observer::{Observable, Subscription};

// =============================================================================
// SUPPORTING TYPES
// =============================================================================

/// Something the camera can follow: position, rotation, and a preferred zoom.
pub trait LockOnTarget {
    fn position(&self) -> Point;
    fn rotation(&self) -> f64;
    fn optimal_zoom_level(&self) -> f64;
}

/// How a translation is kept inside the boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationClamp {
    /// No clamping: out-of-bounds moves are rejected.
    Reject,
    /// Clamp the camera center only.
    #[default]
    Center,
    /// Clamp so the whole viewport stays inside.
    EntireViewport,
}

/// Gesture restriction flags. They only affect the `..._from_gesture` entry points.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureRestrictions {
    /// Block movement along the world X axis.
    pub restrict_x_translation: bool,
    /// Block movement along the world Y axis.
    pub restrict_y_translation: bool,
    /// Block movement along the camera's own horizontal axis.
    pub restrict_relative_x_translation: bool,
    /// Block movement along the camera's own vertical axis.
    pub restrict_relative_y_translation: bool,
    /// Block zoom changes.
    pub restrict_zoom: bool,
    /// Block rotation changes.
    pub restrict_rotation: bool,
}

impl GestureRestrictions {
    /// Remove the restricted components of a world-space `delta` for a camera at `rotation`.
    #[must_use]
    pub fn restrict_translation(&self, delta: Point, rotation: f64) -> Point {
        let mut delta = delta;
        if self.restrict_x_translation {
            delta.x = 0.0;
        }
        if self.restrict_y_translation {
            delta.y = 0.0;
        }
        if self.restrict_relative_x_translation {
            let up = Point::new(0.0, 1.0).rotate(rotation);
            delta = up * up.dot(delta);
        }
        if self.restrict_relative_y_translation {
            let right = Point::new(1.0, 0.0).rotate(rotation);
            delta = right * right.dot(delta);
        }
        delta
    }
}

/// A snapshot of the observable camera state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Point,
    pub rotation: f64,
    pub zoom_level: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

/// Change notification published after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    Pan { delta: Point, state: CameraState },
    Zoom { delta_zoom: f64, state: CameraState },
    Rotate { delta_rotation: f64, state: CameraState },
}

impl CameraEvent {
    #[must_use]
    pub fn kind(&self) -> CameraEventKind {
        match self {
            Self::Pan { .. } => CameraEventKind::Pan,
            Self::Zoom { .. } => CameraEventKind::Zoom,
            Self::Rotate { .. } => CameraEventKind::Rotate,
        }
    }

    #[must_use]
    pub fn state(&self) -> CameraState {
        match self {
            Self::Pan { state, .. } | Self::Zoom { state, .. } | Self::Rotate { state, .. } => *state,
        }
    }
}

/// Subscription channel selector for [`Camera::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraEventKind {
    Pan,
    Zoom,
    Rotate,
    All,
}

#[derive(Debug, Default)]
struct CameraObservers {
    pan: Observable<CameraEvent>,
    zoom: Observable<CameraEvent>,
    rotate: Observable<CameraEvent>,
    all: Observable<CameraEvent>,
}

impl CameraObservers {
    fn channel(&self, kind: CameraEventKind) -> &Observable<CameraEvent> {
        match kind {
            CameraEventKind::Pan => &self.pan,
            CameraEventKind::Zoom => &self.zoom,
            CameraEventKind::Rotate => &self.rotate,
            CameraEventKind::All => &self.all,
        }
    }

    fn publish(&self, event: &CameraEvent) {
        self.channel(event.kind()).notify(event);
        self.all.notify(event);
    }
}

/// Construction parameters for [`Camera::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    pub position: Point,
    pub rotation: f64,
    pub zoom_level: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub boundaries: Option<Boundaries>,
    pub zoom_level_limits: ZoomLevelLimits,
    pub rotation_limits: Option<RotationLimits>,
    pub restrictions: GestureRestrictions,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            rotation: 0.0,
            zoom_level: 1.0,
            viewport_width: 1000.0,
            viewport_height: 1000.0,
            boundaries: None,
            zoom_level_limits: ZoomLevelLimits::default(),
            rotation_limits: None,
            restrictions: GestureRestrictions::default(),
        }
    }
}

struct LockOn {
    target: Rc<dyn LockOnTarget>,
    position: bool,
    rotation: bool,
    zoom: bool,
    /// `false` while a transition animation is still carrying the camera to the target.
    engaged: bool,
}

// =============================================================================
// CAMERA
// =============================================================================

/// The 2D camera over the infinite canvas.
pub struct Camera {
    position: Point,
    rotation: f64,
    zoom_level: f64,
    viewport_width: f64,
    viewport_height: f64,
    boundaries: Option<Boundaries>,
    zoom_level_limits: ZoomLevelLimits,
    rotation_limits: Option<RotationLimits>,
    restrictions: GestureRestrictions,
    /// Containment policy used by animations and lock-on tracking.
    containment: TranslationClamp,
    position_animation: Option<PositionAnimation>,
    rotation_animation: Option<RotationAnimation>,
    zoom_animation: Option<ZoomAnimation>,
    lock: Option<LockOn>,
    observers: CameraObservers,
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("zoom_level", &self.zoom_level)
            .field("viewport_width", &self.viewport_width)
            .field("viewport_height", &self.viewport_height)
            .field("boundaries", &self.boundaries)
            .field("zoom_level_limits", &self.zoom_level_limits)
            .field("animating", &self.is_animating())
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

impl Camera {
    /// Build a camera.
    ///
    /// The initial position and rotation are clamped into the supplied
    /// boundaries and rotation limits.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidZoomLevel`] for a zoom level `<= 0`,
    /// [`CameraError::InvalidViewportSize`] for a non-positive viewport, and
    /// [`CameraError::InvalidZoomLimits`] for non-positive zoom limits.
    pub fn new(options: CameraOptions) -> Result<Self, CameraError> {
        if !(options.zoom_level.is_finite() && options.zoom_level > 0.0) {
            return Err(CameraError::InvalidZoomLevel(options.zoom_level));
        }
        validate_viewport(options.viewport_width, options.viewport_height)?;
        let zoom_level_limits = ZoomLevelLimits::new(options.zoom_level_limits.min, options.zoom_level_limits.max)?;
        let boundaries = options.boundaries.map(Boundaries::normalized);
        let position = boundaries.map_or(options.position, |b| clamp_point(options.position, &b));
        let rotation = options
            .rotation_limits
            .map_or(normalize_angle_zero_to_two_pi(options.rotation), |limits| limits.clamp(options.rotation));

        Ok(Self {
            position,
            rotation,
            zoom_level: clamp_zoom_level(options.zoom_level, &zoom_level_limits, ZOOM_LEVEL_FLOOR),
            viewport_width: options.viewport_width,
            viewport_height: options.viewport_height,
            boundaries,
            zoom_level_limits,
            rotation_limits: options.rotation_limits,
            restrictions: options.restrictions,
            containment: TranslationClamp::Center,
            position_animation: None,
            rotation_animation: None,
            zoom_animation: None,
            lock: None,
            observers: CameraObservers::default(),
        })
    }

    // --- Queries ---

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Rotation in radians, always in `[0, 2π)`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    #[must_use]
    pub fn boundaries(&self) -> Option<Boundaries> {
        self.boundaries
    }

    #[must_use]
    pub fn zoom_level_limits(&self) -> ZoomLevelLimits {
        self.zoom_level_limits
    }

    #[must_use]
    pub fn rotation_limits(&self) -> Option<RotationLimits> {
        self.rotation_limits
    }

    #[must_use]
    pub fn restrictions(&self) -> GestureRestrictions {
        self.restrictions
    }

    #[must_use]
    pub fn containment(&self) -> TranslationClamp {
        self.containment
    }

    #[must_use]
    pub fn state(&self) -> CameraState {
        CameraState {
            position: self.position,
            rotation: self.rotation,
            zoom_level: self.zoom_level,
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
        }
    }

    /// Whether any position, rotation, or zoom animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.position_animation.is_some() || self.rotation_animation.is_some() || self.zoom_animation.is_some()
    }

    /// Whether a lock-on target is attached (engaged or still transitioning).
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    #[must_use]
    pub fn convert_from_viewport_to_world(&self, point: Point) -> Point {
        viewport_to_world(point, self.position, self.zoom_level, self.rotation)
    }

    #[must_use]
    pub fn convert_from_world_to_viewport(&self, point: Point) -> Point {
        world_to_viewport(point, self.position, self.zoom_level, self.rotation)
    }

    /// Viewport corners in world space: top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn viewport_corners_in_world(&self) -> [Point; 4] {
        viewport_corners(self.viewport_width, self.viewport_height).map(|c| self.convert_from_viewport_to_world(c))
    }

    // --- Observers ---

    /// Subscribe to camera change events.
    pub fn on<F>(&self, kind: CameraEventKind, callback: F) -> Subscription
    where
        F: FnMut(&CameraEvent) + 'static,
    {
        self.observers.channel(kind).subscribe(callback)
    }

    // --- Configuration ---

    /// Replace the boundaries (reversed axes are swapped) and pull the camera back inside.
    pub fn set_boundaries(&mut self, boundaries: Option<Boundaries>) {
        self.boundaries = boundaries.map(Boundaries::normalized);
        self.reclamp_position();
    }

    /// Replace the zoom level limits and clamp the current zoom into them.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidZoomLimits`] for a non-positive limit.
    pub fn set_zoom_level_limits(&mut self, limits: ZoomLevelLimits) -> Result<(), CameraError> {
        self.zoom_level_limits = ZoomLevelLimits::new(limits.min, limits.max)?;
        self.apply_zoom(clamp_zoom_level(self.zoom_level, &self.zoom_level_limits, ZOOM_LEVEL_FLOOR));
        Ok(())
    }

    /// Set only the minimum zoom level.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidZoomLimits`] for a non-positive limit.
    pub fn set_min_zoom_level(&mut self, min: Option<f64>) -> Result<(), CameraError> {
        self.set_zoom_level_limits(ZoomLevelLimits { min, max: self.zoom_level_limits.max })
    }

    /// Set only the maximum zoom level.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidZoomLimits`] for a non-positive limit.
    pub fn set_max_zoom_level(&mut self, max: Option<f64>) -> Result<(), CameraError> {
        self.set_zoom_level_limits(ZoomLevelLimits { min: self.zoom_level_limits.min, max })
    }

    /// Replace the rotation limits and clamp the current rotation into them.
    pub fn set_rotation_limits(&mut self, limits: Option<RotationLimits>) {
        self.rotation_limits = limits;
        if let Some(limits) = limits {
            self.apply_rotation(limits.clamp(self.rotation));
        }
    }

    /// Resize the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidViewportSize`] if either dimension is `<= 0`.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Result<(), CameraError> {
        validate_viewport(width, height)?;
        self.viewport_width = width;
        self.viewport_height = height;
        self.reclamp_position();
        Ok(())
    }

    /// Choose how animations and lock-on tracking keep the camera inside the boundaries.
    pub fn set_containment(&mut self, containment: TranslationClamp) {
        self.containment = containment;
        self.reclamp_position();
    }

    pub fn set_restrictions(&mut self, restrictions: GestureRestrictions) {
        self.restrictions = restrictions;
    }

    pub fn set_restrict_x_translation(&mut self, restrict: bool) {
        self.restrictions.restrict_x_translation = restrict;
    }

    pub fn set_restrict_y_translation(&mut self, restrict: bool) {
        self.restrictions.restrict_y_translation = restrict;
    }

    pub fn set_restrict_relative_x_translation(&mut self, restrict: bool) {
        self.restrictions.restrict_relative_x_translation = restrict;
    }

    pub fn set_restrict_relative_y_translation(&mut self, restrict: bool) {
        self.restrictions.restrict_relative_y_translation = restrict;
    }

    pub fn set_restrict_zoom(&mut self, restrict: bool) {
        self.restrictions.restrict_zoom = restrict;
    }

    pub fn set_restrict_rotation(&mut self, restrict: bool) {
        self.restrictions.restrict_rotation = restrict;
    }

    // =========================================================================
    // DIRECT AND CLAMPED MUTATORS
    // =========================================================================

    /// Move to `destination`, rejecting positions outside the boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::OutOfBounds`] when `destination` violates the boundaries.
    pub fn set_position(&mut self, destination: Point) -> Result<(), CameraError> {
        if let Some(boundaries) = &self.boundaries
            && !within_boundaries(destination, boundaries)
        {
            return Err(CameraError::OutOfBounds { x: destination.x, y: destination.y });
        }
        self.apply_position(destination);
        Ok(())
    }

    /// Move toward `destination`, clamping the camera center into the boundaries.
    /// Returns the position actually reached.
    pub fn set_position_with_clamp(&mut self, destination: Point) -> Point {
        let clamped = self.clamp_center(destination);
        self.apply_position(clamped);
        self.position
    }

    /// Move toward `destination`, clamping so the whole viewport stays inside.
    /// Returns the position actually reached.
    pub fn set_position_with_clamp_entire_viewport(&mut self, destination: Point) -> Point {
        let clamped = self.clamp_viewport(destination, self.zoom_level, self.rotation);
        self.apply_position(clamped);
        self.position
    }

    /// Translate by `delta`, rejecting the move if it would leave the boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::OutOfBounds`] when the destination violates the boundaries.
    pub fn move_by(&mut self, delta: Point) -> Result<Point, CameraError> {
        let before = self.position;
        self.set_position(before + delta)?;
        Ok(self.position - before)
    }

    /// Translate by up to `delta`, clamping the center. Returns the applied delta.
    pub fn move_with_clamp(&mut self, delta: Point) -> Point {
        let before = self.position;
        self.set_position_with_clamp(before + delta) - before
    }

    /// Translate by up to `delta`, keeping the whole viewport inside. Returns the applied delta.
    pub fn move_with_clamp_entire_viewport(&mut self, delta: Point) -> Point {
        let before = self.position;
        self.set_position_with_clamp_entire_viewport(before + delta) - before
    }

    /// Set the zoom level, rejecting values outside the limits.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidZoomLevel`] for values `<= 0` and
    /// [`CameraError::ZoomOutOfRange`] for values outside the limits.
    pub fn set_zoom_level(&mut self, zoom_level: f64) -> Result<(), CameraError> {
        if !(zoom_level.is_finite() && zoom_level > 0.0) {
            return Err(CameraError::InvalidZoomLevel(zoom_level));
        }
        if !self.zoom_level_limits.contains(zoom_level) {
            return Err(CameraError::ZoomOutOfRange(zoom_level));
        }
        self.apply_zoom(zoom_level);
        Ok(())
    }

    /// Set the zoom level clamped into the limits. Returns the zoom actually applied.
    pub fn set_zoom_level_with_clamp(&mut self, zoom_level: f64) -> f64 {
        self.apply_zoom(clamp_zoom_level(zoom_level, &self.zoom_level_limits, ZOOM_LEVEL_FLOOR));
        self.zoom_level
    }

    /// Zoom while keeping the world point under `anchor` (viewport space) fixed on screen.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::AtZoomLimit`] when the camera already sits at the
    /// limit the request clamps to.
    pub fn set_zoom_level_with_clamp_at_anchor_point(&mut self, zoom_level: f64, anchor: Point) -> Result<f64, CameraError> {
        self.zoom_at_anchor(zoom_level, anchor, true, self.containment, false)
    }

    /// Set the rotation, rejecting angles outside the rotation limits.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::RotationOutOfRange`] when outside the limits.
    pub fn set_rotation(&mut self, rotation: f64) -> Result<(), CameraError> {
        let rotation = normalize_angle_zero_to_two_pi(rotation);
        if let Some(limits) = &self.rotation_limits
            && !limits.contains(rotation)
        {
            return Err(CameraError::RotationOutOfRange(rotation));
        }
        self.apply_rotation(rotation);
        Ok(())
    }

    /// Set the rotation clamped into the rotation limits. Returns the applied rotation.
    pub fn set_rotation_with_clamp(&mut self, rotation: f64) -> f64 {
        let rotation = self
            .rotation_limits
            .map_or(normalize_angle_zero_to_two_pi(rotation), |limits| limits.clamp(rotation));
        self.apply_rotation(rotation);
        self.rotation
    }

    // =========================================================================
    // GESTURE MUTATORS
    // =========================================================================

    /// Gesture translation, rejected if it would leave the boundaries.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] if the restriction flags veto the whole
    /// delta, [`CameraError::OutOfBounds`] if the destination is outside.
    pub fn move_from_gesture(&mut self, delta: Point) -> Result<Point, CameraError> {
        self.gesture_move(delta, TranslationClamp::Reject)
    }

    /// Gesture translation with the camera center clamped.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] if the restriction flags veto the whole delta.
    pub fn move_with_clamp_from_gesture(&mut self, delta: Point) -> Result<Point, CameraError> {
        self.gesture_move(delta, TranslationClamp::Center)
    }

    /// Gesture translation keeping the whole viewport inside.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] if the restriction flags veto the whole delta.
    pub fn move_with_clamp_entire_viewport_from_gesture(&mut self, delta: Point) -> Result<Point, CameraError> {
        self.gesture_move(delta, TranslationClamp::EntireViewport)
    }

    /// Gesture translation with an explicit clamp policy. Returns the applied delta.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] if the restriction flags veto the whole
    /// delta, [`CameraError::OutOfBounds`] for a rejected unclamped move.
    pub fn gesture_move(&mut self, delta: Point, clamp: TranslationClamp) -> Result<Point, CameraError> {
        let restricted = self.restrictions.restrict_translation(delta, self.rotation);
        if restricted == Point::ZERO && delta != Point::ZERO {
            return Err(CameraError::Restricted);
        }
        self.release_for_gesture();
        self.translate(restricted, clamp)
    }

    /// Gesture zoom, rejected if outside the limits.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`], [`CameraError::InvalidZoomLevel`], or
    /// [`CameraError::ZoomOutOfRange`].
    pub fn set_zoom_level_from_gesture(&mut self, zoom_level: f64) -> Result<f64, CameraError> {
        self.check_zoom_restriction()?;
        self.release_for_gesture();
        self.set_zoom_level(zoom_level)?;
        Ok(self.zoom_level)
    }

    /// Gesture zoom clamped into the limits.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] when zoom is restricted.
    pub fn set_zoom_level_with_clamp_from_gesture(&mut self, zoom_level: f64) -> Result<f64, CameraError> {
        self.check_zoom_restriction()?;
        self.release_for_gesture();
        Ok(self.set_zoom_level_with_clamp(zoom_level))
    }

    /// Gesture zoom about `anchor`, rejected if outside the limits.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`], [`CameraError::InvalidZoomLevel`], or
    /// [`CameraError::ZoomOutOfRange`].
    pub fn set_zoom_level_from_gesture_at_anchor_point(&mut self, zoom_level: f64, anchor: Point) -> Result<f64, CameraError> {
        self.check_zoom_restriction()?;
        self.release_for_gesture();
        self.zoom_at_anchor(zoom_level, anchor, false, TranslationClamp::Reject, true)
    }

    /// Gesture zoom about `anchor`, clamped into the limits; the compensating
    /// pan clamps the camera center.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] or [`CameraError::AtZoomLimit`].
    pub fn set_zoom_level_with_clamp_from_gesture_at_anchor_point(
        &mut self,
        zoom_level: f64,
        anchor: Point,
    ) -> Result<f64, CameraError> {
        self.gesture_zoom_at_anchor(zoom_level, anchor, true, TranslationClamp::Center)
    }

    /// Gesture zoom about `anchor`, clamped into the limits; the compensating
    /// pan keeps the whole viewport inside.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] or [`CameraError::AtZoomLimit`].
    pub fn set_zoom_level_with_clamp_entire_viewport_from_gesture_at_anchor_point(
        &mut self,
        zoom_level: f64,
        anchor: Point,
    ) -> Result<f64, CameraError> {
        self.gesture_zoom_at_anchor(zoom_level, anchor, true, TranslationClamp::EntireViewport)
    }

    /// Gesture zoom about `anchor` with explicit zoom and translation policies.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`], [`CameraError::AtZoomLimit`], or an
    /// unclamped zoom rejection.
    pub fn gesture_zoom_at_anchor(
        &mut self,
        zoom_level: f64,
        anchor: Point,
        clamp_zoom: bool,
        translation: TranslationClamp,
    ) -> Result<f64, CameraError> {
        self.check_zoom_restriction()?;
        self.release_for_gesture();
        self.zoom_at_anchor(zoom_level, anchor, clamp_zoom, translation, true)
    }

    /// Gesture rotation by `delta`, rejected outside the rotation limits.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] or [`CameraError::RotationOutOfRange`].
    pub fn spin_from_gesture(&mut self, delta: f64) -> Result<f64, CameraError> {
        self.set_rotation_from_gesture(self.rotation + delta)
    }

    /// Gesture rotation by `delta`, clamped into the rotation limits.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] when rotation is restricted.
    pub fn spin_with_clamp_from_gesture(&mut self, delta: f64) -> Result<f64, CameraError> {
        self.set_rotation_with_clamp_from_gesture(self.rotation + delta)
    }

    /// Gesture rotation to `rotation`, rejected outside the rotation limits.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] or [`CameraError::RotationOutOfRange`].
    pub fn set_rotation_from_gesture(&mut self, rotation: f64) -> Result<f64, CameraError> {
        self.check_rotation_restriction()?;
        self.release_for_gesture();
        self.set_rotation(rotation)?;
        Ok(self.rotation)
    }

    /// Gesture rotation to `rotation`, clamped into the rotation limits.
    ///
    /// # Errors
    ///
    /// [`CameraError::Restricted`] when rotation is restricted.
    pub fn set_rotation_with_clamp_from_gesture(&mut self, rotation: f64) -> Result<f64, CameraError> {
        self.check_rotation_restriction()?;
        self.release_for_gesture();
        Ok(self.set_rotation_with_clamp(rotation))
    }

    // =========================================================================
    // ANIMATION
    // =========================================================================

    /// Tween toward `destination` (clamped into the boundaries) over `duration`.
    ///
    /// Replaces any position animation in flight and releases the position lock.
    pub fn set_position_with_animation(&mut self, destination: Point, duration: f64, easing: EasingFn) {
        let destination = self.clamp_center(destination);
        self.release_position_lock();
        self.position_animation =
            Some(PositionAnimation { tween: Tween::new(duration, easing), diff: destination - self.position });
        tracing::debug!(?destination, duration, "position animation started");
    }

    /// Tween toward `rotation` the short way round over `duration`.
    ///
    /// Replaces any rotation animation in flight and releases the rotation lock.
    pub fn set_rotation_with_animation(&mut self, rotation: f64, duration: f64, easing: EasingFn) {
        let destination = self
            .rotation_limits
            .map_or(normalize_angle_zero_to_two_pi(rotation), |limits| limits.clamp(rotation));
        self.release_rotation_lock();
        self.rotation_animation = Some(RotationAnimation {
            tween: Tween::new(duration, easing),
            diff: angle_span(self.rotation, destination),
        });
        tracing::debug!(destination, duration, "rotation animation started");
    }

    /// Tween toward `zoom_level` (clamped into the limits) over `duration`,
    /// optionally keeping `anchor` (viewport space) fixed on screen.
    ///
    /// Replaces any zoom animation in flight and releases the zoom lock.
    pub fn set_zoom_level_with_animation(&mut self, zoom_level: f64, duration: f64, easing: EasingFn, anchor: Option<Point>) {
        let destination = clamp_zoom_level(zoom_level, &self.zoom_level_limits, ZOOM_LEVEL_FLOOR);
        self.release_zoom_lock();
        self.zoom_animation = Some(ZoomAnimation {
            tween: Tween::new(duration, easing),
            diff: destination - self.zoom_level,
            anchor,
        });
        tracing::debug!(destination, duration, "zoom animation started");
    }

    /// Abandon every animation at its current interpolated value.
    pub fn cancel_animations(&mut self) {
        self.position_animation = None;
        self.rotation_animation = None;
        self.zoom_animation = None;
    }

    /// Advance animations and lock-on tracking by `delta_time`.
    ///
    /// An engaged lock re-reads the target for the components it still
    /// follows; released components keep animating independently.
    pub fn step(&mut self, delta_time: f64) {
        let engaged = self.lock.as_ref().is_some_and(|lock| lock.engaged);
        if engaged {
            self.track_target();
        }

        if let Some(mut animation) = self.zoom_animation.take() {
            let step = animation.tween.advance(delta_time);
            let target = self.zoom_level + animation.diff * step.increment;
            match animation.anchor {
                Some(anchor) => {
                    if let Err(e) = self.zoom_at_anchor(target, anchor, true, self.containment, false) {
                        tracing::trace!(error = %e, "zoom animation step blocked");
                    }
                }
                None => {
                    self.set_zoom_level_with_clamp(target);
                }
            }
            if !step.finished {
                self.zoom_animation = Some(animation);
            }
        }

        if let Some(mut animation) = self.rotation_animation.take() {
            let step = animation.tween.advance(delta_time);
            self.set_rotation_with_clamp(self.rotation + animation.diff * step.increment);
            if !step.finished {
                self.rotation_animation = Some(animation);
            }
        }

        if let Some(mut animation) = self.position_animation.take() {
            let step = animation.tween.advance(delta_time);
            self.clamped_translate(animation.diff * step.increment, self.containment);
            if !step.finished {
                self.position_animation = Some(animation);
            }
        }

        if !engaged && self.lock.is_some() && !self.is_animating() {
            if let Some(lock) = self.lock.as_mut() {
                lock.engaged = true;
            }
            tracing::debug!("lock-on transition finished; tracking target");
            self.track_target();
        }
    }

    // =========================================================================
    // LOCK-ON
    // =========================================================================

    /// Snap to `target` and follow it on every `step` until released.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::TargetOutOfBounds`] if the target's position is
    /// outside the boundaries.
    pub fn lock_onto(&mut self, target: Rc<dyn LockOnTarget>) -> Result<(), CameraError> {
        self.check_target(target.as_ref())?;
        self.cancel_animations();
        self.lock = Some(LockOn { target, position: true, rotation: true, zoom: true, engaged: true });
        tracing::debug!("locked onto target");
        self.track_target();
        Ok(())
    }

    /// Animate to `target` over `duration`, then follow it like [`Self::lock_onto`].
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::TargetOutOfBounds`] if the target's position is
    /// outside the boundaries.
    pub fn lock_onto_with_transition(
        &mut self,
        target: Rc<dyn LockOnTarget>,
        duration: f64,
        easing: EasingFn,
    ) -> Result<(), CameraError> {
        self.check_target(target.as_ref())?;
        self.lock = None;
        self.set_zoom_level_with_animation(target.optimal_zoom_level(), duration, easing, None);
        self.set_rotation_with_animation(target.rotation(), duration, easing);
        self.set_position_with_animation(target.position(), duration, easing);
        self.lock = Some(LockOn { target, position: true, rotation: true, zoom: true, engaged: false });
        tracing::debug!(duration, "lock-on transition started");
        Ok(())
    }

    /// Stop following the lock-on target entirely.
    pub fn release_lock(&mut self) {
        if self.lock.take().is_some() {
            tracing::debug!("lock-on released");
        }
    }

    /// Stop following the target's position; rotation and zoom tracking continue.
    pub fn release_position_lock(&mut self) {
        self.release_lock_part(|lock| lock.position = false);
    }

    /// Stop following the target's rotation; position and zoom tracking continue.
    pub fn release_rotation_lock(&mut self) {
        self.release_lock_part(|lock| lock.rotation = false);
    }

    /// Stop following the target's zoom; position and rotation tracking continue.
    pub fn release_zoom_lock(&mut self) {
        self.release_lock_part(|lock| lock.zoom = false);
    }

    fn release_lock_part(&mut self, clear: impl FnOnce(&mut LockOn)) {
        if let Some(lock) = self.lock.as_mut() {
            clear(lock);
            if !(lock.position || lock.rotation || lock.zoom) {
                self.release_lock();
            }
        }
    }

    fn check_target(&self, target: &dyn LockOnTarget) -> Result<(), CameraError> {
        let position = target.position();
        match &self.boundaries {
            Some(boundaries) if !within_boundaries(position, boundaries) => {
                Err(CameraError::TargetOutOfBounds { x: position.x, y: position.y })
            }
            _ => Ok(()),
        }
    }

    fn track_target(&mut self) {
        let Some(lock) = self.lock.as_ref() else {
            return;
        };
        let target = Rc::clone(&lock.target);
        let (follow_position, follow_rotation, follow_zoom) = (lock.position, lock.rotation, lock.zoom);
        if follow_zoom {
            self.set_zoom_level_with_clamp(target.optimal_zoom_level());
        }
        if follow_rotation {
            self.set_rotation_with_clamp(target.rotation());
        }
        if follow_position {
            let destination = target.position();
            match self.containment {
                TranslationClamp::EntireViewport => {
                    self.set_position_with_clamp_entire_viewport(destination);
                }
                TranslationClamp::Center | TranslationClamp::Reject => {
                    self.set_position_with_clamp(destination);
                }
            }
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn check_zoom_restriction(&self) -> Result<(), CameraError> {
        if self.restrictions.restrict_zoom { Err(CameraError::Restricted) } else { Ok(()) }
    }

    fn check_rotation_restriction(&self) -> Result<(), CameraError> {
        if self.restrictions.restrict_rotation { Err(CameraError::Restricted) } else { Ok(()) }
    }

    /// Manual input reclaims control: every animation and any lock-on are dropped.
    fn release_for_gesture(&mut self) {
        if self.is_animating() {
            tracing::debug!("gesture cancelled in-flight animations");
        }
        self.cancel_animations();
        self.release_lock();
    }

    fn translate(&mut self, delta: Point, clamp: TranslationClamp) -> Result<Point, CameraError> {
        match clamp {
            TranslationClamp::Reject => self.move_by(delta),
            TranslationClamp::Center | TranslationClamp::EntireViewport => Ok(self.clamped_translate(delta, clamp)),
        }
    }

    fn clamped_translate(&mut self, delta: Point, clamp: TranslationClamp) -> Point {
        match clamp {
            TranslationClamp::EntireViewport => self.move_with_clamp_entire_viewport(delta),
            TranslationClamp::Center | TranslationClamp::Reject => self.move_with_clamp(delta),
        }
    }

    /// Shared anchored-zoom routine.
    ///
    /// With `clamp_zoom` the target is clamped into the limits, and a request
    /// that clamps to the limit the camera already sits at is refused so the
    /// compensating pan is not repeated at the boundary.
    fn zoom_at_anchor(
        &mut self,
        zoom_level: f64,
        anchor: Point,
        clamp_zoom: bool,
        translation: TranslationClamp,
        restrict_compensation: bool,
    ) -> Result<f64, CameraError> {
        let anchor_before = self.convert_from_viewport_to_world(anchor);
        if clamp_zoom {
            let clamped = clamp_zoom_level(zoom_level, &self.zoom_level_limits, ZOOM_LEVEL_FLOOR);
            let at_limit = (self.zoom_level - clamped).abs() <= CHANGE_EPSILON;
            if at_limit && (zoom_level - clamped).abs() > CHANGE_EPSILON {
                return Err(CameraError::AtZoomLimit(clamped));
            }
            self.apply_zoom(clamped);
        } else {
            self.set_zoom_level(zoom_level)?;
        }
        let anchor_after = self.convert_from_viewport_to_world(anchor);

        let mut compensation = anchor_before - anchor_after;
        if restrict_compensation {
            compensation = self.restrictions.restrict_translation(compensation, self.rotation);
        }
        if let Err(e) = self.translate(compensation, translation) {
            tracing::debug!(error = %e, "anchor compensation rejected");
        }
        Ok(self.zoom_level)
    }

    fn clamp_center(&self, destination: Point) -> Point {
        self.boundaries.map_or(destination, |b| clamp_point(destination, &b))
    }

    fn clamp_viewport(&self, destination: Point, zoom_level: f64, rotation: f64) -> Point {
        self.boundaries.map_or(destination, |b| {
            clamp_point_entire_viewport(destination, self.viewport_width, self.viewport_height, &b, zoom_level, rotation)
        })
    }

    fn reclamp_position(&mut self) {
        match self.containment {
            TranslationClamp::EntireViewport => {
                self.set_position_with_clamp_entire_viewport(self.position);
            }
            TranslationClamp::Center | TranslationClamp::Reject => {
                self.set_position_with_clamp(self.position);
            }
        }
    }

    fn apply_position(&mut self, position: Point) {
        let delta = position - self.position;
        if delta.x.abs() <= CHANGE_EPSILON && delta.y.abs() <= CHANGE_EPSILON {
            return;
        }
        self.position = position;
        self.observers.publish(&CameraEvent::Pan { delta, state: self.state() });
    }

    fn apply_zoom(&mut self, zoom_level: f64) {
        let delta_zoom = zoom_level - self.zoom_level;
        if delta_zoom.abs() <= CHANGE_EPSILON {
            return;
        }
        self.zoom_level = zoom_level;
        self.observers.publish(&CameraEvent::Zoom { delta_zoom, state: self.state() });
    }

    fn apply_rotation(&mut self, rotation: f64) {
        let delta_rotation = angle_span(self.rotation, rotation);
        if delta_rotation.abs() <= CHANGE_EPSILON {
            return;
        }
        self.rotation = rotation;
        self.observers.publish(&CameraEvent::Rotate { delta_rotation, state: self.state() });
    }
}

fn validate_viewport(width: f64, height: f64) -> Result<(), CameraError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidViewportSize { width, height })
    }
}
