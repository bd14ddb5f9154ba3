#![allow(clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

fn square(half: f64) -> Boundaries {
    Boundaries::from_corners(Point::new(-half, -half), Point::new(half, half))
}

// =============================================================
// Boundaries
// =============================================================

#[test]
fn from_corners_swaps_reversed() {
    let b = Boundaries::from_corners(Point::new(10.0, 10.0), Point::new(-10.0, -5.0));
    assert_eq!(b.min_x, Some(-10.0));
    assert_eq!(b.max_x, Some(10.0));
    assert_eq!(b.min_y, Some(-5.0));
    assert_eq!(b.max_y, Some(10.0));
}

#[test]
fn normalized_leaves_half_open_axes_alone() {
    let b = Boundaries { min_x: Some(50.0), max_y: Some(-50.0), ..Default::default() }.normalized();
    assert_eq!(b.min_x, Some(50.0));
    assert_eq!(b.max_y, Some(-50.0));
}

#[test]
fn width_and_height_need_both_sides() {
    let b = square(5.0);
    assert_eq!(b.width(), Some(10.0));
    assert_eq!(b.height(), Some(10.0));
    let half = Boundaries { min_x: Some(0.0), ..Default::default() };
    assert_eq!(half.width(), None);
}

// =============================================================
// within_boundaries / clamp_point
// =============================================================

#[test]
fn unbounded_contains_everything() {
    let b = Boundaries::unbounded();
    assert!(within_boundaries(Point::new(1e12, -1e12), &b));
}

#[test]
fn within_checks_each_side_independently() {
    let b = Boundaries { min_x: Some(0.0), max_y: Some(10.0), ..Default::default() };
    assert!(within_boundaries(Point::new(5.0, -1000.0), &b));
    assert!(!within_boundaries(Point::new(-1.0, 0.0), &b));
    assert!(!within_boundaries(Point::new(1.0, 11.0), &b));
}

#[test]
fn boundary_edges_are_inclusive() {
    let b = square(10.0);
    assert!(within_boundaries(Point::new(10.0, -10.0), &b));
}

#[test]
fn clamp_point_inside_is_unchanged() {
    let p = Point::new(3.0, -4.0);
    assert_eq!(clamp_point(p, &square(10.0)), p);
}

#[test]
fn clamp_point_clamps_each_axis() {
    let p = clamp_point(Point::new(25.0, -30.0), &square(10.0));
    assert_eq!(p, Point::new(10.0, -10.0));
}

#[test]
fn clamp_point_respects_missing_sides() {
    let b = Boundaries { max_x: Some(0.0), ..Default::default() };
    assert_eq!(clamp_point(Point::new(5.0, 999.0), &b), Point::new(0.0, 999.0));
}

#[test]
fn clamp_point_always_lands_inside() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..1000 {
        let a = Point::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0));
        let b = Point::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0));
        let bounds = Boundaries::from_corners(a, b);
        let p = Point::new(rng.random_range(-300.0..300.0), rng.random_range(-300.0..300.0));
        let clamped = clamp_point(p, &bounds);
        assert!(within_boundaries(clamped, &bounds));
        if within_boundaries(p, &bounds) {
            assert_eq!(clamped, p);
        }
    }
}

// =============================================================
// Entire-viewport clamping
// =============================================================

#[test]
fn entire_viewport_inside_is_unchanged() {
    let center = Point::new(0.0, 0.0);
    let p = clamp_point_entire_viewport(center, 100.0, 100.0, &square(500.0), 1.0, 0.0);
    assert_eq!(p, center);
}

#[test]
fn entire_viewport_shifts_by_largest_corner_correction() {
    // 200x100 viewport at zoom 1: corners reach x = center.x ± 100.
    let p = clamp_point_entire_viewport(Point::new(450.0, 0.0), 200.0, 100.0, &square(500.0), 1.0, 0.0);
    assert!(p.approx_eq(Point::new(400.0, 0.0), 1e-9));
}

#[test]
fn entire_viewport_accounts_for_zoom() {
    // At zoom 2 the 200-wide viewport only covers 100 world units.
    let p = clamp_point_entire_viewport(Point::new(480.0, 0.0), 200.0, 100.0, &square(500.0), 2.0, 0.0);
    assert!(p.approx_eq(Point::new(450.0, 0.0), 1e-9));
}

#[test]
fn entire_viewport_result_contains_all_corners() {
    let mut rng = StdRng::seed_from_u64(17);
    let bounds = square(1000.0);
    for _ in 0..500 {
        let rotation = rng.random_range(0.0..(2.0 * PI));
        let min_zoom = min_zoom_level_for_boundaries(&bounds, 300.0, 200.0, rotation).unwrap_or(1.0);
        let zoom = min_zoom * rng.random_range(1.0..4.0);
        let center = Point::new(rng.random_range(-3000.0..3000.0), rng.random_range(-3000.0..3000.0));
        let clamped = clamp_point_entire_viewport(center, 300.0, 200.0, &bounds, zoom, rotation);
        let grown = Boundaries::from_corners(Point::new(-1000.0 - 1e-6, -1000.0 - 1e-6), Point::new(1000.0 + 1e-6, 1000.0 + 1e-6));
        assert!(viewport_within_boundaries(clamped, 300.0, 200.0, &grown, zoom, rotation));
    }
}

#[test]
fn viewport_corners_are_centered() {
    let corners = viewport_corners(80.0, 60.0);
    assert_eq!(corners[0], Point::new(-40.0, -30.0));
    assert_eq!(corners[3], Point::new(40.0, 30.0));
}

// =============================================================
// min_zoom_level_for_boundaries
// =============================================================

#[test]
fn min_zoom_unbounded_is_none() {
    assert_eq!(min_zoom_level_for_boundaries(&Boundaries::unbounded(), 800.0, 600.0, 0.0), None);
}

#[test]
fn min_zoom_uses_tighter_axis() {
    // 800 wide over 1000 units -> 0.8; 600 tall over 400 units -> 1.5
    let b = Boundaries::from_corners(Point::new(0.0, 0.0), Point::new(1000.0, 400.0));
    let z = min_zoom_level_for_boundaries(&b, 800.0, 600.0, 0.0);
    assert!((z.unwrap_or(0.0) - 1.5).abs() < 1e-9);
}

#[test]
fn min_zoom_single_axis() {
    let b = Boundaries { min_x: Some(0.0), max_x: Some(400.0), ..Default::default() };
    let z = min_zoom_level_for_boundaries(&b, 800.0, 600.0, 0.0);
    assert!((z.unwrap_or(0.0) - 2.0).abs() < 1e-9);
}

#[test]
fn min_zoom_quarter_turn_swaps_extents() {
    let b = Boundaries::from_corners(Point::new(0.0, 0.0), Point::new(600.0, 800.0));
    let z = min_zoom_level_for_boundaries(&b, 800.0, 600.0, FRAC_PI_2);
    assert!((z.unwrap_or(0.0) - 1.0).abs() < 1e-9);
}

// =============================================================
// Zoom limits
// =============================================================

#[test]
fn zoom_limits_reject_non_positive() {
    assert!(matches!(ZoomLevelLimits::new(Some(0.0), None), Err(CameraError::InvalidZoomLimits(_))));
    assert!(matches!(ZoomLevelLimits::new(None, Some(-1.0)), Err(CameraError::InvalidZoomLimits(_))));
}

#[test]
fn zoom_limits_swap_reversed() {
    let limits = ZoomLevelLimits::new(Some(5.0), Some(0.5));
    assert_eq!(limits, Ok(ZoomLevelLimits { min: Some(0.5), max: Some(5.0) }));
}

#[test]
fn clamp_zoom_level_respects_limits() {
    let limits = ZoomLevelLimits { min: Some(0.5), max: Some(4.0) };
    assert_eq!(clamp_zoom_level(10.0, &limits, 0.01), 4.0);
    assert_eq!(clamp_zoom_level(0.1, &limits, 0.01), 0.5);
    assert_eq!(clamp_zoom_level(2.0, &limits, 0.01), 2.0);
}

#[test]
fn clamp_zoom_level_never_returns_non_positive() {
    let limits = ZoomLevelLimits::default();
    assert_eq!(clamp_zoom_level(-3.0, &limits, 0.01), 0.01);
    assert_eq!(clamp_zoom_level(0.0, &limits, 0.01), 0.01);
}

#[test]
fn zoom_limits_contains() {
    let limits = ZoomLevelLimits { min: Some(1.0), max: None };
    assert!(limits.contains(1.0));
    assert!(limits.contains(1e9));
    assert!(!limits.contains(0.99));
}

// =============================================================
// Rotation limits
// =============================================================

#[test]
fn rotation_limits_ccw_window() {
    let limits = RotationLimits { start: 0.0, end: FRAC_PI_2, ccw: true };
    assert!(limits.contains(FRAC_PI_4));
    assert!(!limits.contains(PI));
}

#[test]
fn rotation_limits_cw_window_wraps() {
    let limits = RotationLimits { start: FRAC_PI_4, end: -FRAC_PI_4, ccw: false };
    assert!(limits.contains(0.0));
    assert!(!limits.contains(PI));
}

#[test]
fn rotation_limits_clamp_snaps_to_nearer_end() {
    let limits = RotationLimits { start: 0.0, end: FRAC_PI_2, ccw: true };
    assert!((limits.clamp(FRAC_PI_2 + 0.2) - FRAC_PI_2).abs() < 1e-9);
    assert!(limits.clamp(-0.2).abs() < 1e-9);
}
