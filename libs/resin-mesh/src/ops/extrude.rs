//! # Region Extrusion
//!
//! Extrudes a selected face region along a vector. The selected region
//! moves by the offset; quads bridge its boundary back to the untouched
//! part of the mesh, so a closed mesh stays closed.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{face_edges, Mesh};
use glam::DVec3;
use std::collections::HashSet;

/// Extrudes the region spanned by `selection` by `offset`.
///
/// The region is every face whose vertices are all selected. Region
/// boundary vertices and vertices shared with unselected faces are
/// duplicated; vertices used only by region faces are moved in place.
/// Selected edges outside any region face are extruded into quads.
///
/// # Returns
///
/// The vertex indices now sitting at the extruded position, in selection
/// order. These are the vertices a caller keeps working with (the new
/// "selected" set).
///
/// # Errors
///
/// Returns [`MeshError::InvalidTopology`] when `selection` references a
/// vertex that does not exist.
///
/// # Example
///
/// ```rust
/// use resin_mesh::ops::extrude::extrude_region;
/// use resin_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let mut cube = create_cube(DVec3::splat(10.0), false).unwrap();
/// let bottom = [0, 1, 2, 3];
/// let ring = extrude_region(&mut cube, &bottom, DVec3::new(0.0, 0.0, -1.0)).unwrap();
/// assert_eq!(ring.len(), 4);
/// assert_eq!(cube.vertex_count(), 12);
/// assert!(cube.is_closed());
/// ```
pub fn extrude_region(mesh: &mut Mesh, selection: &[u32], offset: DVec3) -> MeshResult<Vec<u32>> {
    let vertex_count = mesh.vertex_count();
    if let Some(&bad) = selection.iter().find(|&&v| v as usize >= vertex_count) {
        return Err(MeshError::invalid_topology(format!(
            "selection references vertex {bad} of {vertex_count}"
        )));
    }

    let mut selected = vec![false; vertex_count];
    for &v in selection {
        selected[v as usize] = true;
    }

    let region: Vec<bool> = mesh
        .faces()
        .iter()
        .map(|face| face.iter().all(|&v| selected[v as usize]))
        .collect();

    // Directed edges of region faces; a boundary edge has no reverse here
    let region_edges: HashSet<(u32, u32)> = mesh
        .faces()
        .iter()
        .zip(&region)
        .filter(|&(_, &in_region)| in_region)
        .flat_map(|(face, _)| face_edges(face))
        .collect();
    let boundary: Vec<(u32, u32)> = mesh
        .faces()
        .iter()
        .zip(&region)
        .filter(|&(_, &in_region)| in_region)
        .flat_map(|(face, _)| face_edges(face))
        .filter(|&(a, b)| !region_edges.contains(&(b, a)))
        .collect();

    let wire: Vec<[u32; 2]> = mesh
        .edges()
        .into_iter()
        .filter(|&[a, b]| selected[a as usize] && selected[b as usize])
        .filter(|&[a, b]| !region_edges.contains(&(a, b)) && !region_edges.contains(&(b, a)))
        .collect();

    // Vertices that must stay behind as the root of a side face
    let mut anchored = vec![false; vertex_count];
    for (face, &in_region) in mesh.faces().iter().zip(&region) {
        if !in_region {
            for &v in face {
                anchored[v as usize] = true;
            }
        }
    }
    for &(a, b) in &boundary {
        anchored[a as usize] = true;
        anchored[b as usize] = true;
    }

    let mut involved = vec![false; vertex_count];
    for (face, &in_region) in mesh.faces().iter().zip(&region) {
        if in_region {
            for &v in face {
                involved[v as usize] = true;
            }
        }
    }
    for &[a, b] in &wire {
        involved[a as usize] = true;
        involved[b as usize] = true;
        anchored[a as usize] = true;
        anchored[b as usize] = true;
    }

    let mut remap: Vec<u32> = (0..vertex_count as u32).collect();
    let mut moved = Vec::new();
    let mut seen = vec![false; vertex_count];

    for &v in selection {
        let i = v as usize;
        if !involved[i] || seen[i] {
            continue;
        }
        seen[i] = true;

        let target = mesh.vertex(v) + offset;
        if anchored[i] {
            remap[i] = mesh.add_vertex(target);
        } else {
            mesh.set_vertex(v, target);
        }
        moved.push(remap[i]);
    }

    for (face, &in_region) in mesh.faces_mut().iter_mut().zip(&region) {
        if in_region {
            for v in face.iter_mut() {
                *v = remap[*v as usize];
            }
        }
    }

    for (a, b) in boundary {
        let (a2, b2) = (remap[a as usize], remap[b as usize]);
        mesh.add_face(&[a, b, b2, a2]);
    }
    for [a, b] in wire {
        let (a2, b2) = (remap[a as usize], remap[b as usize]);
        mesh.add_face(&[b, a, a2, b2]);
    }

    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_cube;

    /// Flat 2x2 grid of quads in the XY plane facing +Z.
    fn grid() -> Mesh {
        let mut mesh = Mesh::new();
        for y in 0..3 {
            for x in 0..3 {
                mesh.add_vertex(DVec3::new(x as f64, y as f64, 0.0));
            }
        }
        for y in 0..2u32 {
            for x in 0..2u32 {
                let v = y * 3 + x;
                mesh.add_face(&[v, v + 1, v + 4, v + 3]);
            }
        }
        mesh
    }

    #[test]
    fn test_extrude_cube_bottom() {
        let mut cube = create_cube(DVec3::splat(10.0), false).unwrap();
        let ring = extrude_region(&mut cube, &[0, 1, 2, 3], DVec3::new(0.0, 0.0, -0.7)).unwrap();

        assert_eq!(ring, vec![8, 9, 10, 11]);
        assert_eq!(cube.face_count(), 10);
        assert!(cube.is_closed());
        assert!(cube.validate());

        for &v in &ring {
            assert_eq!(cube.vertex(v).z, -0.7);
        }
        // Originals stay where they were
        for v in 0..4 {
            assert_eq!(cube.vertex(v).z, 0.0);
        }
        // The moved bottom still faces down
        assert_eq!(cube.face_normal(0), -DVec3::Z);
        assert_eq!(cube.face(0), &[8, 11, 10, 9]);
    }

    #[test]
    fn test_extrude_side_faces_point_outward() {
        let mut cube = create_cube(DVec3::splat(2.0), true).unwrap();
        extrude_region(&mut cube, &[0, 1, 2, 3], DVec3::new(0.0, 0.0, -1.0)).unwrap();

        for index in 6..cube.face_count() {
            let center: DVec3 = cube
                .face(index)
                .iter()
                .map(|&v| cube.vertex(v))
                .sum::<DVec3>()
                / 4.0;
            let outward = DVec3::new(center.x, center.y, 0.0);
            assert!(cube.face_normal(index).dot(outward) > 0.0);
        }
    }

    #[test]
    fn test_extrude_interior_vertex_moves_in_place() {
        let mut mesh = grid();
        let all: Vec<u32> = (0..9).collect();
        let moved = extrude_region(&mut mesh, &all, DVec3::Z).unwrap();

        // Eight boundary vertices duplicate, the center one just moves
        assert_eq!(mesh.vertex_count(), 17);
        assert_eq!(moved.len(), 9);
        assert!(moved.contains(&4));
        assert_eq!(mesh.vertex(4), DVec3::new(1.0, 1.0, 1.0));
        assert_eq!(mesh.face_count(), 4 + 8);
    }

    #[test]
    fn test_extrude_wire_edge() {
        let mut mesh = grid();
        // Bottom row edge only: no face is fully selected
        let moved = extrude_region(&mut mesh, &[0, 1], DVec3::new(0.0, -1.0, 0.0)).unwrap();

        assert_eq!(moved.len(), 2);
        assert_eq!(mesh.vertex_count(), 11);
        assert_eq!(mesh.face_count(), 5);
        assert_eq!(mesh.face(4), &[1, 0, 9, 10]);
    }

    #[test]
    fn test_extrude_empty_selection_is_noop() {
        let mut cube = create_cube(DVec3::ONE, false).unwrap();
        let before = cube.clone();
        let moved = extrude_region(&mut cube, &[], DVec3::Z).unwrap();
        assert!(moved.is_empty());
        assert_eq!(cube, before);
    }

    #[test]
    fn test_extrude_rejects_bad_index() {
        let mut cube = create_cube(DVec3::ONE, false).unwrap();
        let result = extrude_region(&mut cube, &[0, 42], DVec3::Z);
        assert!(matches!(result, Err(MeshError::InvalidTopology { .. })));
    }
}
