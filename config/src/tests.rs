//! # Tests for Config Constants
//!
//! Unit tests verifying the configuration constants and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_vertex_merge_epsilon_larger_than_epsilon() {
    assert!(
        VERTEX_MERGE_EPSILON >= EPSILON,
        "VERTEX_MERGE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_tjunction_epsilon_covers_plane_classification() {
    assert!(TJUNCTION_EPSILON > VERTEX_MERGE_EPSILON);
    assert!(TJUNCTION_EPSILON >= PLANE_EPSILON);
    assert!(TJUNCTION_EPSILON < BOTTOM_MERGE_VERTS_DISTANCE);
}

#[test]
fn test_plane_epsilon_below_weld_distance() {
    // Plane classification must never swallow a whole weld radius.
    assert!(PLANE_EPSILON < BOTTOM_MERGE_VERTS_DISTANCE);
}

// =============================================================================
// BOTTOM TESTS
// =============================================================================

#[test]
fn test_bottom_constants_match_tooling() {
    assert_eq!(BOTTOM_TOLERANCE, 0.05);
    assert_eq!(BOTTOM_MERGE_VERTS_DISTANCE, 0.01);
    assert_eq!(DISSOLVE_ANGLE_LIMIT_DEGREES, 1.0);
}

#[test]
fn test_trim_presets() {
    assert_eq!(BOTTOM_TRIM_VALUE_SHORT, 0.05);
    assert_eq!(BOTTOM_TRIM_VALUE_TALL, 0.1);
    assert!(BOTTOM_TRIM_VALUE_SHORT < BOTTOM_TRIM_VALUE_TALL);
}

#[test]
fn test_cutter_dwarfs_skirt() {
    assert!(CUTTER_CUBE_SIZE > 100.0 * BASE_BEVEL_DEPTH);
}

// =============================================================================
// SKIRT TESTS
// =============================================================================

#[test]
fn test_skirt_constants() {
    assert_eq!(BASE_BEVEL_DEPTH, 0.7);
    assert_eq!(SIMPLE_BEVEL_SHRINK_DISTANCE, 0.5);
}

#[test]
fn test_skirt_scale_factor_tapers_by_one_unit() {
    let width = 25.0;
    let scale = skirt_scale_factor(width).unwrap();
    assert!(approx_equal(width * scale, width - 1.0));
}

#[test]
fn test_skirt_scale_factor_rejects_narrow_rings() {
    assert_eq!(skirt_scale_factor(1.0), None);
    assert_eq!(skirt_scale_factor(0.5), None);
    assert_eq!(skirt_scale_factor(0.0), None);
    assert_eq!(skirt_scale_factor(-3.0), None);
    assert_eq!(skirt_scale_factor(f64::NAN), None);
}

// =============================================================================
// CHANNEL TESTS
// =============================================================================

#[test]
fn test_channel_bar_is_longer_than_any_base() {
    let length = CHANNEL_CUBE_SIZE * CHANNEL_STRETCH[1];
    assert!(length > 2.0 * CHANNEL_SPHERE_RADIUS);
}

#[test]
fn test_channel_cap_epsilon_smaller_than_skirt() {
    assert!(CHANNEL_CAP_EPSILON < BASE_BEVEL_DEPTH);
    assert!(CHANNEL_DIAGONAL_LIFT < BASE_BEVEL_DEPTH);
}

// =============================================================================
// APPROX TESTS
// =============================================================================

#[test]
fn test_approx_equal_within_epsilon() {
    let small_diff = EPSILON / 2.0;
    assert!(approx_equal(1.0, 1.0 + small_diff));
    assert!(approx_equal(1.0, 1.0 - small_diff));
}

#[test]
fn test_approx_equal_outside_epsilon() {
    let large_diff = EPSILON * 2.0;
    assert!(!approx_equal(1.0, 1.0 + large_diff));
    assert!(!approx_equal(1.0, 2.0));
}

#[test]
fn test_approx_zero() {
    assert!(approx_zero(0.0));
    assert!(approx_zero(EPSILON / 2.0));
    assert!(!approx_zero(EPSILON * 2.0));
    assert!(!approx_zero(-0.1));
}

// =============================================================================
// EXPORT TESTS
// =============================================================================

#[test]
fn test_stl_header_fits() {
    assert!(STL_HEADER.len() <= 80);
    assert_eq!(EXPORT_EXTENSION, "stl");
}
