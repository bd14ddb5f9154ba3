//! Input tuning knobs.
//!
//! The defaults are empirically tuned literals carried over unchanged for
//! behavioral compatibility. Hosts can override individual values from JSON
//! (via serde) or from `BOARD_CAMERA_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEVICE_MODALITY_SCORE_THRESHOLD, PINCH_ZOOM_SCALE, WHEEL_COARSE_DELTA_THRESHOLD, WHEEL_ZOOM_MULTIPLIER,
    WHEEL_ZOOM_SENSITIVITY_COARSE, WHEEL_ZOOM_SENSITIVITY_FINE,
};

/// Sensitivities and thresholds used by the input state machines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Zoom sensitivity for small wheel deltas.
    pub wheel_zoom_sensitivity_fine: f64,
    /// Zoom sensitivity for large wheel deltas.
    pub wheel_zoom_sensitivity_coarse: f64,
    /// Multiplier applied to every wheel zoom.
    pub wheel_zoom_multiplier: f64,
    /// `|deltaY|` above which the coarse sensitivity applies.
    pub wheel_coarse_delta_threshold: f64,
    /// Zoom delta per pixel of pinch separation change.
    pub pinch_zoom_scale: f64,
    /// Scroll events needed to classify the device as mouse or trackpad.
    pub device_modality_score_threshold: u32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            wheel_zoom_sensitivity_fine: WHEEL_ZOOM_SENSITIVITY_FINE,
            wheel_zoom_sensitivity_coarse: WHEEL_ZOOM_SENSITIVITY_COARSE,
            wheel_zoom_multiplier: WHEEL_ZOOM_MULTIPLIER,
            wheel_coarse_delta_threshold: WHEEL_COARSE_DELTA_THRESHOLD,
            pinch_zoom_scale: PINCH_ZOOM_SCALE,
            device_modality_score_threshold: DEVICE_MODALITY_SCORE_THRESHOLD,
        }
    }
}

impl InputTuning {
    /// Defaults, overridden by any parseable `BOARD_CAMERA_*` variable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let tuning = Self {
            wheel_zoom_sensitivity_fine: env_parse(
                "BOARD_CAMERA_WHEEL_ZOOM_SENSITIVITY_FINE",
                defaults.wheel_zoom_sensitivity_fine,
            ),
            wheel_zoom_sensitivity_coarse: env_parse(
                "BOARD_CAMERA_WHEEL_ZOOM_SENSITIVITY_COARSE",
                defaults.wheel_zoom_sensitivity_coarse,
            ),
            wheel_zoom_multiplier: env_parse("BOARD_CAMERA_WHEEL_ZOOM_MULTIPLIER", defaults.wheel_zoom_multiplier),
            wheel_coarse_delta_threshold: env_parse(
                "BOARD_CAMERA_WHEEL_COARSE_DELTA_THRESHOLD",
                defaults.wheel_coarse_delta_threshold,
            ),
            pinch_zoom_scale: env_parse("BOARD_CAMERA_PINCH_ZOOM_SCALE", defaults.pinch_zoom_scale),
            device_modality_score_threshold: env_parse(
                "BOARD_CAMERA_DEVICE_MODALITY_SCORE_THRESHOLD",
                defaults.device_modality_score_threshold,
            ),
        };
        if tuning != defaults {
            tracing::info!(?tuning, "input tuning overridden from environment");
        }
        tuning
    }

    /// Wheel zoom delta for a vertical scroll of `delta_y`.
    ///
    /// Scrolling up (negative `delta_y`) zooms in.
    #[must_use]
    pub fn wheel_zoom_delta(&self, delta_y: f64) -> f64 {
        let sensitivity = if delta_y.abs() > self.wheel_coarse_delta_threshold {
            self.wheel_zoom_sensitivity_coarse
        } else {
            self.wheel_zoom_sensitivity_fine
        };
        -(delta_y * sensitivity * self.wheel_zoom_multiplier)
    }
}

/// Parse `key` from the environment, falling back to `default` when unset or invalid.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            default
        }),
        Err(_) => default,
    }
}
