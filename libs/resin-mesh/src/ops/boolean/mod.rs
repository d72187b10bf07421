//! # Booleans
//!
//! Solid union, difference and intersection over BSP trees, following the
//! csg.js scheme by Evan Wallace. Faces become convex polygons, both
//! operands are partitioned and clipped against each other, then the
//! surviving polygons are welded back into one mesh.
//!
//! ## Example
//!
//! ```rust
//! use resin_mesh::ops::boolean::difference;
//! use resin_mesh::primitives::{create_cube, create_cuboid};
//! use glam::DVec3;
//!
//! let a = create_cube(DVec3::splat(10.0), false).unwrap();
//! let b = create_cuboid(DVec3::new(5.0, -5.0, -5.0), DVec3::new(20.0, 15.0, 15.0)).unwrap();
//! let result = difference(&a, &b).unwrap();
//! let (_, max) = result.bounding_box();
//! assert!((max.x - 5.0).abs() < 1e-9);
//! ```

mod bsp;
mod plane;
mod polygon;
mod stitch;

#[cfg(test)]
mod tests;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{newell_normal, Mesh};
use crate::triangulate::triangulate_polygon;
use bsp::BspNode;
use config::constants::{TJUNCTION_EPSILON, VERTEX_MERGE_EPSILON};
use glam::DVec3;
use polygon::Polygon;
use stitch::VertexWelder;

/// Solid union `a ∪ b`.
///
/// Faces of either operand that end up inside the other are dropped; an
/// empty operand returns a copy of the other one.
pub fn union(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    combine(Op::Union, a, b)
}

/// Solid difference `a − b`.
pub fn difference(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    combine(Op::Difference, a, b)
}

/// Solid intersection `a ∩ b`.
pub fn intersection(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    combine(Op::Intersection, a, b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Union,
    Difference,
    Intersection,
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Union => "union",
            Op::Difference => "difference",
            Op::Intersection => "intersection",
        }
    }
}

fn combine(op: Op, a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    match (op, polys_a.is_empty(), polys_b.is_empty()) {
        (Op::Union, true, _) => return Ok(b.clone()),
        (Op::Union | Op::Difference, false, true) => return Ok(a.clone()),
        (Op::Difference, true, _) | (Op::Intersection, true, _) | (Op::Intersection, _, true) => {
            return Ok(Mesh::new())
        }
        _ => {}
    }

    let mut tree_a = BspNode::new(polys_a);
    let mut tree_b = BspNode::new(polys_b);

    match op {
        Op::Union => {
            tree_a.clip_to(&tree_b);
            tree_b.clip_to(&tree_a);
            // Drop b's faces coplanar with a's
            tree_b.invert();
            tree_b.clip_to(&tree_a);
            tree_b.invert();
        }
        Op::Difference => {
            // a − b == ¬(¬a ∪ b)
            tree_a.invert();
            tree_a.clip_to(&tree_b);
            tree_b.clip_to(&tree_a);
            tree_b.invert();
            tree_b.clip_to(&tree_a);
            tree_b.invert();
        }
        Op::Intersection => {
            // a ∩ b == ¬(¬a ∪ ¬b)
            tree_a.invert();
            tree_b.clip_to(&tree_a);
            tree_b.invert();
            tree_a.clip_to(&tree_b);
            tree_b.clip_to(&tree_a);
        }
    }

    let mut polygons = tree_a.all_polygons();
    polygons.extend(tree_b.all_polygons());
    if op != Op::Union {
        for poly in &mut polygons {
            poly.flip();
        }
    }

    polygons_to_mesh(op.name(), polygons)
}

// =============================================================================
// CONVERSION HELPERS
// =============================================================================

/// Convex faces pass through whole; concave ones are ear-clipped first.
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    let mut polygons = Vec::with_capacity(mesh.face_count());

    for face in mesh.faces() {
        let points: Vec<DVec3> = face.iter().map(|&v| mesh.vertex(v)).collect();

        if is_convex(&points) {
            polygons.extend(Polygon::from_vertices(points));
            continue;
        }

        for [a, b, c] in triangulate_polygon(&points) {
            polygons.extend(Polygon::from_vertices(vec![points[a], points[b], points[c]]));
        }
    }

    polygons
}

fn is_convex(points: &[DVec3]) -> bool {
    let n = points.len();
    if n == 3 {
        return true;
    }
    let normal = newell_normal(points).normalize_or_zero();
    (0..n).all(|i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let (ab, bc) = (b - a, c - b);
        // Collinear corners from edge splits count as convex
        ab.cross(bc).dot(normal) >= -TJUNCTION_EPSILON * ab.length().max(bc.length())
    })
}

/// Welds the surviving polygons into one closed mesh.
///
/// Positions within `VERTEX_MERGE_EPSILON` share a vertex, slivers thinner
/// than `TJUNCTION_EPSILON` are dropped, and every vertex lying on another
/// face's edge is inserted into that edge.
fn polygons_to_mesh(operation: &'static str, polygons: Vec<Polygon>) -> MeshResult<Mesh> {
    let mut mesh = Mesh::with_capacity(polygons.len() * 2, polygons.len());
    let mut welder = VertexWelder::new(VERTEX_MERGE_EPSILON);

    for poly in polygons {
        let mut face: Vec<u32> = Vec::with_capacity(poly.vertices().len());

        for &v in poly.vertices() {
            if !v.is_finite() {
                return Err(MeshError::boolean_failed(
                    operation,
                    format!("non-finite vertex {:?}", v),
                ));
            }

            let id = welder.find_or_add(&mut mesh, v);
            if face.last() != Some(&id) {
                face.push(id);
            }
        }

        while face.len() > 1 && face.first() == face.last() {
            face.pop();
        }
        if face.len() >= 3 {
            mesh.add_face(&face);
        }
    }

    stitch::remove_slivers(&mut mesh, TJUNCTION_EPSILON);
    stitch::split_t_junctions(&mut mesh, TJUNCTION_EPSILON);
    stitch::drop_unused_vertices(&mut mesh);

    Ok(mesh)
}
