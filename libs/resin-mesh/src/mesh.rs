//! # Mesh Data Structure
//!
//! Polygon mesh with shared vertices. Faces are vertex-index loops of any
//! arity (at least three); edges are derived from the faces.

use crate::error::MeshError;
use crate::triangulate::triangulate_polygon;
use config::constants::VERTEX_MERGE_EPSILON;
use glam::{DMat4, DVec3};
use std::collections::HashSet;

/// A polygon mesh with vertices and face loops.
///
/// All geometry calculations use f64. Face loops wind counter-clockwise
/// when seen from outside the solid.
///
/// # Example
///
/// ```rust
/// use resin_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_face(&[0, 1, 2, 3]);
/// assert_eq!(mesh.triangle_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (object-local space)
    vertices: Vec<DVec3>,
    /// Face loops referencing `vertices`
    faces: Vec<Vec<u32>>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Creates a mesh from vertex positions and face loops.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidTopology`] when a face has fewer than
    /// three vertices or references a vertex that does not exist.
    pub fn from_parts(vertices: Vec<DVec3>, faces: Vec<Vec<u32>>) -> Result<Self, MeshError> {
        let vertex_count = vertices.len();
        for (index, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::invalid_topology(format!(
                    "face {index} has {} vertices",
                    face.len()
                )));
            }
            if let Some(bad) = face.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(MeshError::invalid_topology(format!(
                    "face {index} references vertex {bad} of {vertex_count}"
                )));
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the number of triangles the faces split into.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len().saturating_sub(2)).sum()
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a face loop and returns its index.
    pub fn add_face(&mut self, loop_indices: &[u32]) -> usize {
        self.faces.push(loop_indices.to_vec());
        self.faces.len() - 1
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) -> usize {
        self.add_face(&[v0, v1, v2])
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns the vertices for in-place position edits.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [DVec3] {
        &mut self.vertices
    }

    /// Returns a reference to the face loops.
    #[inline]
    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Moves the vertex at the given index.
    #[inline]
    pub fn set_vertex(&mut self, index: u32, position: DVec3) {
        self.vertices[index as usize] = position;
    }

    /// Returns the face loop at the given index.
    #[inline]
    pub fn face(&self, index: usize) -> &[u32] {
        &self.faces[index]
    }

    pub(crate) fn faces_mut(&mut self) -> &mut Vec<Vec<u32>> {
        &mut self.faces
    }

    /// Returns every undirected edge once, as `[low, high]` index pairs,
    /// in the order faces first reference them.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for face in &self.faces {
            for (a, b) in face_edges(face) {
                let key = if a < b { [a, b] } else { [b, a] };
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }
        edges
    }

    /// Returns the unit normal of a face, or zero for a degenerate face.
    pub fn face_normal(&self, index: usize) -> DVec3 {
        let points: Vec<DVec3> = self.faces[index]
            .iter()
            .map(|&v| self.vertices[v as usize])
            .collect();
        newell_normal(&points).normalize_or_zero()
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Returns the mean of all vertex positions (zero for an empty mesh).
    pub fn median_center(&self) -> DVec3 {
        if self.vertices.is_empty() {
            return DVec3::ZERO;
        }
        self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
    }

    /// Transforms all vertices by a 4x4 matrix.
    ///
    /// Mirroring matrices reverse every face loop so normals keep pointing
    /// outward.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }

        if matrix.determinant() < 0.0 {
            for face in &mut self.faces {
                face.reverse();
            }
        }
    }

    /// Returns a transformed copy of this mesh.
    pub fn transformed(&self, matrix: &DMat4) -> Mesh {
        let mut copy = self.clone();
        copy.transform(matrix);
        copy
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Merges another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);

        for face in &other.faces {
            self.faces.push(face.iter().map(|&v| v + offset).collect());
        }
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All face indices are valid
    /// - Faces have at least three distinct corners
    /// - No zero-area faces
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        for face in &self.faces {
            if face.len() < 3 {
                return false;
            }

            if face.iter().any(|&v| v >= vertex_count) {
                return false;
            }

            if face_edges(face).any(|(a, b)| a == b) {
                return false;
            }

            let points: Vec<DVec3> = face.iter().map(|&v| self.vertices[v as usize]).collect();
            if newell_normal(&points).length() < VERTEX_MERGE_EPSILON {
                return false;
            }
        }

        true
    }

    /// Returns true when every directed edge is matched by exactly one
    /// opposite edge, i.e. the surface is closed and consistently wound.
    pub fn is_closed(&self) -> bool {
        let mut directed = HashSet::new();
        for face in &self.faces {
            for edge in face_edges(face) {
                if !directed.insert(edge) {
                    return false;
                }
            }
        }
        directed.iter().all(|&(a, b)| directed.contains(&(b, a)))
    }

    /// Splits every face into triangles (ear clipping).
    pub fn triangulate(&self) -> Vec<[u32; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        for face in &self.faces {
            let points: Vec<DVec3> = face.iter().map(|&v| self.vertices[v as usize]).collect();
            for [a, b, c] in triangulate_polygon(&points) {
                triangles.push([face[a], face[b], face[c]]);
            }
        }
        triangles
    }

    /// Drops vertices whose `keep` flag is false and renumbers the faces.
    ///
    /// Faces that referenced a dropped vertex lose that corner; faces left
    /// with fewer than three corners are removed.
    pub(crate) fn retain_vertices(&mut self, keep: &[bool]) {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut next = 0u32;
        for (index, slot) in remap.iter_mut().enumerate() {
            if keep.get(index).copied().unwrap_or(true) {
                *slot = next;
                next += 1;
            }
        }

        let mut index = 0;
        self.vertices.retain(|_| {
            let kept = remap[index] != u32::MAX;
            index += 1;
            kept
        });

        for face in &mut self.faces {
            face.retain(|&v| remap[v as usize] != u32::MAX);
            for v in face.iter_mut() {
                *v = remap[*v as usize];
            }
        }
        self.faces.retain(|face| face.len() >= 3);
    }
}

/// Iterates the directed edges of a face loop, closing the loop.
pub fn face_edges(face: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    let n = face.len();
    (0..n).map(move |i| (face[i], face[(i + 1) % n]))
}

/// Newell's method: area-weighted (unnormalized) normal of a polygon loop.
pub fn newell_normal(points: &[DVec3]) -> DVec3 {
    let n = points.len();
    let mut normal = DVec3::ZERO;
    for i in 0..n {
        let current = points[i];
        let next = points[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_cube;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
        mesh.add_face(&[0, 1, 2, 3]);
        mesh
    }

    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_from_parts_rejects_bad_index() {
        let result = Mesh::from_parts(vec![DVec3::ZERO], vec![vec![0, 1, 2]]);
        assert!(matches!(result, Err(MeshError::InvalidTopology { .. })));
    }

    #[test]
    fn test_from_parts_rejects_short_face() {
        let result = Mesh::from_parts(vec![DVec3::ZERO, DVec3::X], vec![vec![0, 1]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quad_edges_and_normal() {
        let mesh = quad();
        assert_eq!(mesh.edges().len(), 4);
        assert_eq!(mesh.face_normal(0), DVec3::Z);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangulate().len(), 2);
    }

    #[test]
    fn test_mesh_bounding_box() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(DVec3::new(4.0, 5.0, 6.0));
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_median_center() {
        let mesh = quad();
        assert_eq!(mesh.median_center(), DVec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_cube_is_closed() {
        let cube = create_cube(DVec3::splat(2.0), true).unwrap();
        assert!(cube.is_closed());
        assert!(!quad().is_closed());
    }

    #[test]
    fn test_mirror_transform_keeps_outward_normals() {
        let mut mesh = quad();
        mesh.transform(&DMat4::from_scale(DVec3::new(1.0, 1.0, -1.0)));
        // A flat quad mirrored through its own plane now faces -Z.
        assert_eq!(mesh.face_normal(0), -DVec3::Z);
        assert_eq!(mesh.face(0), &[3, 2, 1, 0]);
    }

    #[test]
    fn test_validate_invalid_index() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_triangle(0, 1, 2);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_validate_zero_area() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::X);
        mesh.add_vertex(DVec3::X * 2.0);
        mesh.add_triangle(0, 1, 2);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_mesh_merge() {
        let mut mesh1 = quad();
        let mesh2 = quad();
        mesh1.merge(&mesh2);
        assert_eq!(mesh1.vertex_count(), 8);
        assert_eq!(mesh1.face(1), &[4, 5, 6, 7]);
    }

    #[test]
    fn test_retain_vertices_renumbers_faces() {
        let mut mesh = quad();
        mesh.add_vertex(DVec3::new(5.0, 5.0, 5.0));
        mesh.add_face(&[4, 0, 1]);
        mesh.retain_vertices(&[true, false, true, true, true]);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face(0), &[0, 1, 2]);
        // [4, 0, 1] lost vertex 1 and collapsed to two corners.
        assert_eq!(mesh.face_count(), 1);
    }
}
