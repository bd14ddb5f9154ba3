//! Coordinate-space conversions.
//!
//! | Space | Origin | Y axis |
//! |-------|--------|--------|
//! | window | top-left of the page/window | down |
//! | canvas | top-left of the canvas element | down |
//! | viewport | center of the canvas | down when aligned with the DOM, up otherwise |
//! | world | camera-independent board origin | same as viewport |
//!
//! World ↔ viewport applies the camera zoom, then rotation, then translation
//! by the camera position (and the inverse in the other direction).

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use crate::geometry::Point;

/// Window coordinates to canvas coordinates, given the canvas' top-left in window space.
#[must_use]
pub fn window_to_canvas(point: Point, canvas_origin: Point) -> Point {
    point - canvas_origin
}

/// Scale CSS-pixel canvas coordinates into backing-store pixels.
#[must_use]
pub fn scale_by_device_pixel_ratio(point: Point, device_pixel_ratio: f64) -> Point {
    point * device_pixel_ratio
}

/// Canvas coordinates to viewport coordinates (recentered on the canvas midpoint).
#[must_use]
pub fn canvas_to_viewport(point: Point, canvas_width: f64, canvas_height: f64, align_with_dom: bool) -> Point {
    let centered = Point::new(point.x - canvas_width / 2.0, point.y - canvas_height / 2.0);
    if align_with_dom { centered } else { centered.flip_y() }
}

/// Inverse of [`canvas_to_viewport`].
#[must_use]
pub fn viewport_to_canvas(point: Point, canvas_width: f64, canvas_height: f64, align_with_dom: bool) -> Point {
    let point = if align_with_dom { point } else { point.flip_y() };
    Point::new(point.x + canvas_width / 2.0, point.y + canvas_height / 2.0)
}

/// Window coordinates straight to viewport coordinates.
#[must_use]
pub fn window_to_viewport(
    point: Point,
    canvas_origin: Point,
    canvas_width: f64,
    canvas_height: f64,
    align_with_dom: bool,
) -> Point {
    canvas_to_viewport(window_to_canvas(point, canvas_origin), canvas_width, canvas_height, align_with_dom)
}

/// Viewport point to world point for a camera at `camera_position`.
#[must_use]
pub fn viewport_to_world(point: Point, camera_position: Point, zoom_level: f64, rotation: f64) -> Point {
    camera_position + (point / zoom_level).rotate(rotation)
}

/// World point to viewport point for a camera at `camera_position`.
#[must_use]
pub fn world_to_viewport(point: Point, camera_position: Point, zoom_level: f64, rotation: f64) -> Point {
    (point - camera_position).rotate(-rotation) * zoom_level
}

/// Viewport-space displacement to world-space displacement.
#[must_use]
pub fn viewport_delta_to_world(delta: Point, zoom_level: f64, rotation: f64) -> Point {
    (delta / zoom_level).rotate(rotation)
}
