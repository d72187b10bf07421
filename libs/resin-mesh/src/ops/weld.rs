//! # Vertex Welding
//!
//! Merges candidate vertices that lie within a distance of each other.
//! Uses a spatial hash with cells the size of the merge distance, so only
//! the 27 neighbouring cells are searched per vertex.

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use config::constants::EPSILON;
use glam::DVec3;
use std::collections::HashMap;

/// Welds the `candidates` vertices that are within `distance` of each other.
///
/// Each cluster collapses onto its lowest-indexed member; vertices outside
/// `candidates` are never moved or merged. Face loops are rewritten,
/// repeated corners are dropped and faces reduced below three corners are
/// removed.
///
/// # Returns
///
/// The number of vertices removed.
///
/// # Errors
///
/// Returns [`MeshError::InvalidTopology`] for an out-of-range candidate and
/// [`MeshError::DegenerateGeometry`] for a negative or non-finite distance.
///
/// # Example
///
/// ```rust
/// use resin_mesh::ops::weld::weld_by_distance;
/// use resin_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::ZERO);
/// mesh.add_vertex(DVec3::new(0.001, 0.0, 0.0));
/// assert_eq!(weld_by_distance(&mut mesh, &[0, 1], 0.01).unwrap(), 1);
/// assert_eq!(mesh.vertex_count(), 1);
/// ```
pub fn weld_by_distance(mesh: &mut Mesh, candidates: &[u32], distance: f64) -> MeshResult<usize> {
    if !(distance >= 0.0 && distance.is_finite()) {
        return Err(MeshError::degenerate(format!(
            "weld distance must be non-negative: {distance}"
        )));
    }

    let vertex_count = mesh.vertex_count();
    if let Some(&bad) = candidates.iter().find(|&&v| v as usize >= vertex_count) {
        return Err(MeshError::invalid_topology(format!(
            "weld candidate {bad} of {vertex_count}"
        )));
    }

    let mut ordered = candidates.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    let cell_size = distance.max(EPSILON);
    let limit = distance * distance;
    let mut grid: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    let mut remap: Vec<u32> = (0..vertex_count as u32).collect();
    let mut merged = 0;

    for v in ordered {
        let position = mesh.vertex(v);
        let cell = cell_of(position, cell_size);

        let target = neighbours(cell).find_map(|key| {
            grid.get(&key)?
                .iter()
                .copied()
                .find(|&kept| mesh.vertex(kept).distance_squared(position) <= limit)
        });

        match target {
            Some(kept) => {
                remap[v as usize] = kept;
                merged += 1;
            }
            None => grid.entry(cell).or_default().push(v),
        }
    }

    if merged == 0 {
        return Ok(0);
    }

    for face in mesh.faces_mut().iter_mut() {
        for v in face.iter_mut() {
            *v = remap[*v as usize];
        }
        face.dedup();
        while face.len() > 1 && face.first() == face.last() {
            face.pop();
        }
    }
    mesh.faces_mut().retain(|face| face.len() >= 3);

    let keep: Vec<bool> = remap
        .iter()
        .enumerate()
        .map(|(index, &target)| target as usize == index)
        .collect();
    mesh.retain_vertices(&keep);

    Ok(merged)
}

fn cell_of(position: DVec3, cell_size: f64) -> [i64; 3] {
    let cell = (position / cell_size).floor();
    [cell.x as i64, cell.y as i64, cell.z as i64]
}

fn neighbours(cell: [i64; 3]) -> impl Iterator<Item = [i64; 3]> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).map(move |dz| [cell[0] + dx, cell[1] + dy, cell[2] + dz])
        })
    })
}
