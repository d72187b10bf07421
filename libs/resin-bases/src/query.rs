//! # Geometry Queries
//!
//! Extrema and selection measurements over a mesh's vertex set.
//!
//! `bottom_z` works in world space while `top_z` works in object-local
//! space. Callers that mix the two bake rotation and scale first (see
//! [`ModelObject::apply_rotation_scale`](crate::ModelObject::apply_rotation_scale)).

use crate::object::Transform;
use glam::{DVec2, DVec3};
use resin_mesh::Mesh;

/// Lowest Z of the mesh after applying `transform` (world space).
///
/// Returns `None` for a mesh without vertices.
pub fn bottom_z(mesh: &Mesh, transform: &Transform) -> Option<f64> {
    let matrix = transform.matrix();
    mesh.vertices()
        .iter()
        .map(|&v| matrix.transform_point3(v).z)
        .min_by(f64::total_cmp)
}

/// Highest Z of the mesh in object-local space.
pub fn top_z(mesh: &Mesh) -> Option<f64> {
    mesh.vertices().iter().map(|v| v.z).max_by(f64::total_cmp)
}

/// Lowest Z of the mesh in object-local space.
pub fn local_bottom_z(mesh: &Mesh) -> Option<f64> {
    mesh.vertices().iter().map(|v| v.z).min_by(f64::total_cmp)
}

/// Local → world position.
pub fn global_co(transform: &Transform, co: DVec3) -> DVec3 {
    transform.matrix().transform_point3(co)
}

/// Vertices sitting exactly at local height `z`, in index order.
pub fn verts_at_z(mesh: &Mesh, z: f64) -> Vec<u32> {
    (0..mesh.vertex_count() as u32)
        .filter(|&v| mesh.vertex(v).z == z)
        .collect()
}

/// Edges whose both endpoints sit exactly at local height `z`.
pub fn edges_at_z(mesh: &Mesh, z: f64) -> Vec<[u32; 2]> {
    mesh.edges()
        .into_iter()
        .filter(|&[a, b]| mesh.vertex(a).z == z && mesh.vertex(b).z == z)
        .collect()
}

/// 2D bounds `(min, max)` of the selected vertices on the XY plane.
pub fn xy_bounds(mesh: &Mesh, selection: &[u32]) -> Option<(DVec2, DVec2)> {
    let mut points = selection.iter().map(|&v| mesh.vertex(v).truncate());
    let first = points.next()?;
    Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
}

/// Mean position of the selected vertices.
pub fn median(mesh: &Mesh, selection: &[u32]) -> Option<DVec3> {
    if selection.is_empty() {
        return None;
    }
    let sum: DVec3 = selection.iter().map(|&v| mesh.vertex(v)).sum();
    Some(sum / selection.len() as f64)
}
