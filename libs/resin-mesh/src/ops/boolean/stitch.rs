//! Stitching of boolean results.
//!
//! BSP clipping splits a polygon only where a node plane crosses it, so the
//! neighbour across an edge is often cut at a point the polygon never sees.
//! The passes here weld the loose polygons back into a closed mesh:
//!
//! 1. [`VertexWelder`] merges positions within the merge epsilon, looking
//!    at neighbouring grid cells so near-equal points never straddle a cell.
//! 2. [`remove_slivers`] drops faces collapsed to (nearly) a line.
//! 3. [`split_t_junctions`] inserts every vertex lying on a face edge into
//!    that edge. Both faces of an edge see the same vertices, so paired
//!    edges stay paired.

use crate::mesh::{face_edges, newell_normal, Mesh};
use glam::DVec3;
use std::collections::HashMap;

/// Merges positions closer than `distance` into one mesh vertex.
pub struct VertexWelder {
    distance: f64,
    grid: HashMap<[i64; 3], Vec<u32>>,
}

impl VertexWelder {
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            grid: HashMap::new(),
        }
    }

    /// Index of an existing vertex within the weld distance of `point`, or
    /// of a newly added one.
    pub fn find_or_add(&mut self, mesh: &mut Mesh, point: DVec3) -> u32 {
        let cell = self.cell(point);
        let limit = self.distance * self.distance;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = [cell[0] + dx, cell[1] + dy, cell[2] + dz];
                    let found = self.grid.get(&key).and_then(|ids| {
                        ids.iter()
                            .copied()
                            .find(|&id| mesh.vertex(id).distance_squared(point) <= limit)
                    });
                    if let Some(id) = found {
                        return id;
                    }
                }
            }
        }

        let id = mesh.add_vertex(point);
        self.grid.entry(cell).or_default().push(id);
        id
    }

    fn cell(&self, point: DVec3) -> [i64; 3] {
        let q = (point / self.distance).floor();
        [q.x as i64, q.y as i64, q.z as i64]
    }
}

/// Removes faces whose height across their longest edge is at most
/// `tolerance`. Returns the number removed.
///
/// The corners of a removed face lie within `tolerance` of its neighbours'
/// edges, so [`split_t_junctions`] closes the gap it leaves.
pub fn remove_slivers(mesh: &mut Mesh, tolerance: f64) -> usize {
    let faces = std::mem::take(mesh.faces_mut());
    let before = faces.len();
    let kept: Vec<Vec<u32>> = faces
        .into_iter()
        .filter(|face| !is_sliver(mesh, face, tolerance))
        .collect();
    let removed = before - kept.len();
    *mesh.faces_mut() = kept;
    removed
}

fn is_sliver(mesh: &Mesh, face: &[u32], tolerance: f64) -> bool {
    let points: Vec<DVec3> = face.iter().map(|&v| mesh.vertex(v)).collect();
    let longest = face_edges(face)
        .map(|(a, b)| mesh.vertex(a).distance(mesh.vertex(b)))
        .fold(0.0, f64::max);
    // |Newell normal| is twice the area
    newell_normal(&points).length() <= tolerance * longest
}

/// Splits every face edge at the vertices lying on it, within `tolerance`
/// of the segment and away from its ends. Returns the number of corners
/// inserted.
pub fn split_t_junctions(mesh: &mut Mesh, tolerance: f64) -> usize {
    let mut used = vec![false; mesh.vertex_count()];
    for face in mesh.faces() {
        for &v in face {
            used[v as usize] = true;
        }
    }

    // Used vertices sorted by x, so each edge only scans its own x range
    let mut by_x: Vec<u32> = (0..mesh.vertex_count() as u32)
        .filter(|&v| used[v as usize])
        .collect();
    by_x.sort_by(|&a, &b| mesh.vertex(a).x.total_cmp(&mesh.vertex(b).x));
    let xs: Vec<f64> = by_x.iter().map(|&v| mesh.vertex(v).x).collect();

    let faces = std::mem::take(mesh.faces_mut());
    let mut inserted = 0;
    let mut rebuilt = Vec::with_capacity(faces.len());

    for face in faces {
        let mut loop_out = Vec::with_capacity(face.len());
        for (a, b) in face_edges(&face) {
            loop_out.push(a);

            let (pa, pb) = (mesh.vertex(a), mesh.vertex(b));
            let low = pa.x.min(pb.x) - tolerance;
            let high = pa.x.max(pb.x) + tolerance;
            let start = xs.partition_point(|&x| x < low);

            let mut on_edge: Vec<(f64, u32)> = Vec::new();
            for (&v, &x) in by_x[start..].iter().zip(&xs[start..]) {
                if x > high {
                    break;
                }
                if face.contains(&v) {
                    continue;
                }
                if let Some(t) = edge_parameter(pa, pb, mesh.vertex(v), tolerance) {
                    on_edge.push((t, v));
                }
            }
            on_edge.sort_by(|l, r| l.0.total_cmp(&r.0));

            inserted += on_edge.len();
            loop_out.extend(on_edge.into_iter().map(|(_, v)| v));
        }
        rebuilt.push(loop_out);
    }

    *mesh.faces_mut() = rebuilt;
    inserted
}

/// Position of `p` along `a → b` in `(0, 1)` when it lies on the segment,
/// more than `tolerance` from either end.
fn edge_parameter(a: DVec3, b: DVec3, p: DVec3, tolerance: f64) -> Option<f64> {
    let dir = b - a;
    let length = dir.length();
    if length <= 2.0 * tolerance {
        return None;
    }

    let t = (p - a).dot(dir) / (length * length);
    if t * length <= tolerance || (1.0 - t) * length <= tolerance {
        return None;
    }
    (p.distance(a + dir * t) <= tolerance).then_some(t)
}

/// Drops vertices no face references.
pub fn drop_unused_vertices(mesh: &mut Mesh) {
    let mut used = vec![false; mesh.vertex_count()];
    for face in mesh.faces() {
        for &v in face {
            used[v as usize] = true;
        }
    }
    if used.contains(&false) {
        mesh.retain_vertices(&used);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit square split in two along x = 0.5 on top of an unsplit bottom.
    ///
    /// ```text
    ///  3 ── 5 ── 2
    ///  │ A  │ B  │
    ///  0 ── 4 ── 1      bottom face C: 0-1-2-3 reversed, never split
    /// ```
    fn t_junction_sheet() -> Mesh {
        let mut mesh = Mesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.5, 0.0), (0.5, 1.0)] {
            mesh.add_vertex(DVec3::new(x, y, 0.0));
        }
        mesh.add_face(&[0, 4, 5, 3]);
        mesh.add_face(&[4, 1, 2, 5]);
        mesh.add_face(&[0, 3, 2, 1]);
        mesh
    }

    #[test]
    fn test_welder_merges_across_cell_boundary() {
        let mut mesh = Mesh::new();
        let mut welder = VertexWelder::new(1e-8);
        let a = welder.find_or_add(&mut mesh, DVec3::new(1e-8 * 3.0 - 1e-12, 0.0, 0.0));
        let b = welder.find_or_add(&mut mesh, DVec3::new(1e-8 * 3.0 + 1e-12, 0.0, 0.0));
        let c = welder.find_or_add(&mut mesh, DVec3::new(1.0, 0.0, 0.0));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(mesh.vertex_count(), 2);
    }

    #[test]
    fn test_split_t_junctions_closes_sheet() {
        let mut mesh = t_junction_sheet();
        assert!(!mesh.is_closed());

        assert_eq!(split_t_junctions(&mut mesh, 1e-5), 2);

        assert_eq!(mesh.face(2), &[0, 3, 5, 2, 1, 4]);
        assert!(mesh.is_closed());
    }

    #[test]
    fn test_edge_parameter_excludes_ends_and_off_segment() {
        let (a, b) = (DVec3::ZERO, DVec3::X);
        assert_eq!(edge_parameter(a, b, DVec3::new(0.25, 0.0, 0.0), 1e-5), Some(0.25));
        assert_eq!(edge_parameter(a, b, DVec3::new(0.25, 1e-3, 0.0), 1e-5), None);
        assert_eq!(edge_parameter(a, b, DVec3::new(1e-9, 0.0, 0.0), 1e-5), None);
        assert_eq!(edge_parameter(a, b, DVec3::new(1.5, 0.0, 0.0), 1e-5), None);
    }

    #[test]
    fn test_sliver_removed_then_stitched() {
        let mut mesh = t_junction_sheet();
        // Zero-height triangle along the bottom edge
        mesh.add_face(&[0, 4, 1]);

        assert_eq!(remove_slivers(&mut mesh, 1e-5), 1);
        assert_eq!(mesh.face_count(), 3);
    }

    #[test]
    fn test_drop_unused_vertices() {
        let mut mesh = t_junction_sheet();
        mesh.add_vertex(DVec3::splat(9.0));
        drop_unused_vertices(&mut mesh);
        assert_eq!(mesh.vertex_count(), 6);
    }
}
