//! # Boolean Operation Tests
//!
//! Volume and bounds checks for CSG boolean operations.

use super::*;
use approx::assert_abs_diff_eq;
use crate::primitives::{create_cube, create_cuboid, create_uv_sphere};
use glam::DVec3;

/// Creates a unit cube at origin for testing.
fn test_cube() -> Mesh {
    create_cube(DVec3::ONE, false).unwrap()
}

/// Creates a cube at a specific position.
fn cube_at(pos: DVec3, size: f64) -> Mesh {
    let mut mesh = create_cube(DVec3::splat(size), true).unwrap();
    mesh.translate(pos);
    mesh
}

/// Enclosed volume via the divergence theorem.
fn volume(mesh: &Mesh) -> f64 {
    mesh.triangulate()
        .iter()
        .map(|&[a, b, c]| {
            mesh.vertex(a)
                .dot(mesh.vertex(b).cross(mesh.vertex(c)))
        })
        .sum::<f64>()
        / 6.0
}

fn assert_volume(mesh: &Mesh, expected: f64) {
    assert_abs_diff_eq!(volume(mesh), expected, epsilon = 1e-6);
}

/// Overlap of `cube_at(ZERO, 2)` and this cube is 1 x 1.75 x 1.7, with no
/// shared face planes.
fn offset_cube() -> Mesh {
    cube_at(DVec3::new(1.0, 0.25, 0.3), 2.0)
}

const OVERLAP: f64 = 1.0 * 1.75 * 1.7;

// =============================================================================
// UNION TESTS
// =============================================================================

#[test]
fn test_union_empty_a() {
    let b = test_cube();
    let result = union(&Mesh::new(), &b).unwrap();
    assert_eq!(result, b);
}

#[test]
fn test_union_empty_b() {
    let a = test_cube();
    let result = union(&a, &Mesh::new()).unwrap();
    assert_eq!(result, a);
}

#[test]
fn test_union_non_overlapping() {
    let a = cube_at(DVec3::new(-5.0, 0.0, 0.0), 1.0);
    let b = cube_at(DVec3::new(5.0, 0.0, 0.0), 1.0);

    let result = union(&a, &b).unwrap();

    assert_eq!(result.vertex_count(), 16);
    assert_eq!(result.face_count(), 12);
    assert_volume(&result, 2.0);
}

#[test]
fn test_union_overlapping() {
    let result = union(&cube_at(DVec3::ZERO, 2.0), &offset_cube()).unwrap();

    assert_volume(&result, 16.0 - OVERLAP);
    assert!(result.is_closed());
    let (min, max) = result.bounding_box();
    assert!((min - DVec3::new(-1.0, -1.0, -1.0)).length() < 1e-9);
    assert!((max - DVec3::new(2.0, 1.25, 1.3)).length() < 1e-9);
}

// =============================================================================
// DIFFERENCE TESTS
// =============================================================================

#[test]
fn test_difference_empty_a() {
    let result = difference(&Mesh::new(), &test_cube()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_difference_empty_b() {
    let a = test_cube();
    let result = difference(&a, &Mesh::new()).unwrap();
    assert_eq!(result, a);
}

#[test]
fn test_difference_non_overlapping() {
    let a = cube_at(DVec3::new(-5.0, 0.0, 0.0), 1.0);
    let b = cube_at(DVec3::new(5.0, 0.0, 0.0), 1.0);

    let result = difference(&a, &b).unwrap();

    assert_eq!(result.vertex_count(), a.vertex_count());
    assert_volume(&result, 1.0);
}

#[test]
fn test_difference_overlapping() {
    let result = difference(&cube_at(DVec3::ZERO, 2.0), &offset_cube()).unwrap();
    assert_volume(&result, 8.0 - OVERLAP);
    assert!(result.is_closed());
}

#[test]
fn test_difference_hollow() {
    // Larger cube minus a smaller cube strictly inside it
    let result = difference(&cube_at(DVec3::ZERO, 4.0), &cube_at(DVec3::ZERO, 2.0)).unwrap();
    assert_volume(&result, 56.0);
    assert!(result.is_closed());
}

#[test]
fn test_difference_slices_bottom_slab() {
    let block = create_cube(DVec3::splat(10.0), false).unwrap();
    let cutter = create_cuboid(
        DVec3::new(-100.0, -100.0, -199.95),
        DVec3::new(100.0, 100.0, 0.05),
    )
    .unwrap();

    let result = difference(&block, &cutter).unwrap();

    let (min, max) = result.bounding_box();
    assert!((min.z - 0.05).abs() < 1e-9);
    assert!((max.z - 10.0).abs() < 1e-9);
    assert_volume(&result, 995.0);
    assert!(result.is_closed());
}

// =============================================================================
// INTERSECTION TESTS
// =============================================================================

#[test]
fn test_intersection_empty_inputs() {
    assert!(intersection(&Mesh::new(), &test_cube()).unwrap().is_empty());
    assert!(intersection(&test_cube(), &Mesh::new()).unwrap().is_empty());
}

#[test]
fn test_intersection_non_overlapping() {
    let a = cube_at(DVec3::new(-5.0, 0.0, 0.0), 1.0);
    let b = cube_at(DVec3::new(5.0, 0.0, 0.0), 1.0);

    let result = intersection(&a, &b).unwrap();

    assert_eq!(result.face_count(), 0);
}

#[test]
fn test_intersection_overlapping() {
    let result = intersection(&cube_at(DVec3::ZERO, 2.0), &offset_cube()).unwrap();

    assert_volume(&result, OVERLAP);
    assert!(result.is_closed());
    let (min, max) = result.bounding_box();
    assert!((min - DVec3::new(0.0, -0.75, -0.7)).length() < 1e-9);
    assert!((max - DVec3::ONE).length() < 1e-9);
}

#[test]
fn test_intersection_contained() {
    let result = intersection(&cube_at(DVec3::ZERO, 4.0), &cube_at(DVec3::ZERO, 2.0)).unwrap();
    assert_volume(&result, 8.0);
}

// =============================================================================
// CONVERSION TESTS
// =============================================================================

#[test]
fn test_boolean_chain() {
    // (A ∪ B) - C
    let a = cube_at(DVec3::ZERO, 2.0);
    let b = offset_cube();
    let c = cube_at(DVec3::new(0.1, 0.1, 5.0), 1.0);

    let ab = union(&a, &b).unwrap();
    let result = difference(&ab, &c).unwrap();

    // C sits above both cubes
    assert_volume(&result, 16.0 - OVERLAP);
    assert!(result.is_closed());
}

#[test]
fn test_difference_notched_block_is_closed() {
    // Bar crossing the bottom of the block, the way channels are cut
    let block = create_cube(DVec3::new(10.0, 10.0, 3.0), false).unwrap();
    let bar = create_cuboid(DVec3::new(-1.0, 4.0, -1.0), DVec3::new(11.0, 6.0, 1.0)).unwrap();

    let notched = difference(&block, &bar).unwrap();

    assert_volume(&notched, 300.0 - 20.0);
    assert!(notched.is_closed());

    // A second cut across the first splits the edges it already made
    let cross = create_cuboid(DVec3::new(4.5, -1.0, -1.0), DVec3::new(5.5, 11.0, 0.5)).unwrap();
    let result = difference(&notched, &cross).unwrap();

    assert_volume(&result, 280.0 - 0.5 * (10.0 - 2.0));
    assert!(result.is_closed());
}

#[test]
fn test_difference_sphere_from_block_is_closed() {
    let block = create_cube(DVec3::new(10.0, 10.0, 2.0), true).unwrap();
    let hub = create_uv_sphere(3.0, 16, 8).unwrap();

    let result = difference(&block, &hub).unwrap();

    assert!(result.is_closed());
    assert!(volume(&result) < 200.0);
    assert!(volume(&result) > 200.0 - 4.0 / 3.0 * std::f64::consts::PI * 27.0);
}

#[test]
fn test_mesh_to_polygons_keeps_convex_faces() {
    let polys = mesh_to_polygons(&test_cube());
    assert_eq!(polys.len(), 6);
    assert!(polys.iter().all(|p| p.vertices().len() == 4));
}

#[test]
fn test_mesh_to_polygons_splits_concave_faces() {
    let mut mesh = Mesh::new();
    for (x, y) in [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)] {
        mesh.add_vertex(DVec3::new(x, y, 0.0));
    }
    mesh.add_face(&[0, 1, 2, 3, 4, 5]);

    let polys = mesh_to_polygons(&mesh);
    assert_eq!(polys.len(), 4);
    assert!(polys.iter().all(|p| p.plane().normal == DVec3::Z));
}

#[test]
fn test_polygons_to_mesh_shares_vertices() {
    let mesh = test_cube();
    let result = polygons_to_mesh("union", mesh_to_polygons(&mesh)).unwrap();

    assert_eq!(result.vertex_count(), 8);
    assert!(result.is_closed());
}
