//! # Tests for Config Constants
//!
//! Checks that the constants agree with each other: loop resolutions stay
//! cap-compatible and tolerances sit below the output rounding.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_finer_than_output_rounding() {
    // Heights equal after rounding must still compare equal before it
    assert!(EPSILON > 0.0);
    assert!(EPSILON < 10f64.powi(-COORDINATE_PRECISION));
}

#[test]
fn test_round_to_precision_keeps_eight_places() {
    assert_eq!(round_to_precision(1.000000004), 1.0);
    assert_eq!(round_to_precision(-2.123456789), -2.12345679);
    assert_eq!(round_to_precision(3.5), 3.5);
}

// =============================================================================
// RESOLUTION TESTS
// =============================================================================

#[test]
fn test_base_vertices_is_cap_compatible() {
    // Caps need loops that are multiples of 8
    assert_eq!(BASE_VERTICES % 8, 0);
}

#[test]
fn test_vertices_per_loop_doubles() {
    for level in 0..4 {
        assert_eq!(vertices_per_loop(level + 1), vertices_per_loop(level) * 2);
    }
}

#[test]
fn test_vertices_per_loop_is_clamped() {
    assert_eq!(
        vertices_per_loop(MAX_SUBDIVISION + 5),
        vertices_per_loop(MAX_SUBDIVISION)
    );
}

#[test]
fn test_subdivided_loop_count() {
    assert_eq!(subdivided_loop_count(3, 0), 3);
    assert_eq!(subdivided_loop_count(3, 1), 6);
    assert_eq!(subdivided_loop_count(0, 4), 0);
}

#[test]
fn test_rounded_rect_raw_points_four_per_side() {
    assert_eq!(ROUNDED_RECT_RAW_POINTS, 16);
}

// =============================================================================
// CURVE TESTS
// =============================================================================

#[test]
fn test_default_spline_degree_is_cubic() {
    assert_eq!(DEFAULT_SPLINE_DEGREE, 3);
}

#[test]
fn test_circle_start_is_top_left_diagonal() {
    let angle = CIRCLE_START_ANGLE_DEG.to_radians();
    assert!(angle.cos() < 0.0);
    assert!(angle.sin() < 0.0);
}

// =============================================================================
// HELPER TESTS
// =============================================================================

#[test]
fn test_approx_equal_within_epsilon() {
    assert!(approx_equal(0.0, EPSILON / 2.0));
    assert!(!approx_equal(0.0, EPSILON * 2.0));
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_vertex_limit_fits_face_indices() {
    assert!(MAX_VERTICES >= 1_000_000);
    assert!(MAX_VERTICES <= u32::MAX as usize);
}

#[test]
fn test_max_faces_reasonable() {
    assert!(MAX_FACES >= 1_000_000);
}
