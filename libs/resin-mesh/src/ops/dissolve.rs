//! # Limited Dissolve
//!
//! Simplifies nearly-flat topology: neighbouring faces whose normals differ
//! by less than an angle merge into one n-gon, then vertices left in the
//! middle of a straight edge run are removed.
//!
//! Both passes are restricted to caller-supplied candidate edges and
//! vertices, so a flattened base can be cleaned up without touching the
//! rest of the model.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{face_edges, Mesh};
use glam::DVec3;
use std::collections::{HashMap, HashSet};

/// Counts of what a limited dissolve removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DissolveReport {
    /// Faces merged away
    pub faces_removed: usize,
    /// Vertices removed (straight-run and orphaned)
    pub verts_removed: usize,
}

/// Dissolves candidate edges between near-coplanar faces and candidate
/// vertices on straight edge runs.
///
/// # Arguments
///
/// * `angle_limit` - Maximum angle in radians between face normals (and
///   between the two edges of a dissolved vertex)
/// * `verts` - Vertices that may be removed
/// * `edges` - Undirected edges that may be dissolved
///
/// A group of faces only merges when its outline is a single simple loop;
/// groups that would produce holes keep their faces.
///
/// # Errors
///
/// Returns [`MeshError::InvalidTopology`] when a candidate references a
/// vertex that does not exist.
pub fn dissolve_limited(
    mesh: &mut Mesh,
    angle_limit: f64,
    verts: &[u32],
    edges: &[[u32; 2]],
) -> MeshResult<DissolveReport> {
    let vertex_count = mesh.vertex_count();
    let out_of_range = verts
        .iter()
        .chain(edges.iter().flatten())
        .find(|&&v| v as usize >= vertex_count);
    if let Some(&bad) = out_of_range {
        return Err(MeshError::invalid_topology(format!(
            "dissolve candidate {bad} of {vertex_count}"
        )));
    }

    let face_count_before = mesh.face_count();
    merge_faces(mesh, angle_limit, edges);
    let faces_removed = face_count_before - mesh.face_count();

    let verts_removed = dissolve_verts(mesh, angle_limit, verts);

    Ok(DissolveReport {
        faces_removed,
        verts_removed,
    })
}

fn edge_key(a: u32, b: u32) -> [u32; 2] {
    if a < b {
        [a, b]
    } else {
        [b, a]
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn merge_faces(mesh: &mut Mesh, angle_limit: f64, edges: &[[u32; 2]]) {
    let mut edge_faces: HashMap<[u32; 2], Vec<usize>> = HashMap::new();
    for (index, face) in mesh.faces().iter().enumerate() {
        for (a, b) in face_edges(face) {
            edge_faces.entry(edge_key(a, b)).or_default().push(index);
        }
    }

    let normals: Vec<_> = (0..mesh.face_count()).map(|i| mesh.face_normal(i)).collect();
    let mut parent: Vec<usize> = (0..mesh.face_count()).collect();
    let mut any = false;

    for &[a, b] in edges {
        let Some(shared) = edge_faces.get(&edge_key(a, b)) else {
            continue;
        };
        let [f, g] = shared[..] else {
            continue;
        };
        if f == g || normals[f] == DVec3::ZERO || normals[g] == DVec3::ZERO {
            continue;
        }
        if normals[f].angle_between(normals[g]) < angle_limit {
            let (rf, rg) = (find(&mut parent, f), find(&mut parent, g));
            if rf != rg {
                parent[rg.max(rf)] = rg.min(rf);
                any = true;
            }
        }
    }

    if !any {
        return;
    }

    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for index in 0..mesh.face_count() {
        let root = find(&mut parent, index);
        groups.entry(root).or_default().push(index);
    }

    let mut replacement: HashMap<usize, Vec<u32>> = HashMap::new();
    let mut removed: HashSet<usize> = HashSet::new();
    for (root, members) in &groups {
        if members.len() < 2 {
            continue;
        }
        if let Some(outline) = group_outline(mesh, members) {
            replacement.insert(*root, outline);
            removed.extend(members.iter().filter(|&&m| m != *root));
        }
    }

    let faces = std::mem::take(mesh.faces_mut());
    *mesh.faces_mut() = faces
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !removed.contains(index))
        .map(|(index, face)| replacement.remove(&index).unwrap_or(face))
        .collect();
}

/// Walks the outline of a face group. Returns None unless the outline is
/// one simple loop.
fn group_outline(mesh: &Mesh, members: &[usize]) -> Option<Vec<u32>> {
    let directed: HashSet<(u32, u32)> = members
        .iter()
        .flat_map(|&m| face_edges(mesh.face(m)))
        .collect();

    let mut next: HashMap<u32, u32> = HashMap::new();
    for &(a, b) in &directed {
        if directed.contains(&(b, a)) {
            continue;
        }
        if next.insert(a, b).is_some() {
            return None;
        }
    }

    let &start = next.keys().min()?;
    let mut outline = vec![start];
    let mut current = next[&start];
    while current != start {
        if outline.len() > next.len() {
            return None;
        }
        outline.push(current);
        current = *next.get(&current)?;
    }

    (outline.len() == next.len() && outline.len() >= 3).then_some(outline)
}

fn dissolve_verts(mesh: &mut Mesh, angle_limit: f64, verts: &[u32]) -> usize {
    let vertex_count = mesh.vertex_count();
    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for (index, face) in mesh.faces().iter().enumerate() {
        for &v in face {
            vertex_faces[v as usize].push(index);
        }
    }

    let mut remove = vec![false; vertex_count];

    for &v in verts {
        let i = v as usize;
        if remove[i] {
            continue;
        }

        // Left without faces by the merge pass
        if vertex_faces[i].is_empty() {
            remove[i] = true;
            continue;
        }

        let mut neighbours: Vec<u32> = Vec::with_capacity(4);
        for &f in &vertex_faces[i] {
            let face = mesh.face(f);
            let n = face.len();
            if let Some(pos) = face.iter().position(|&x| x == v) {
                for other in [face[(pos + n - 1) % n], face[(pos + 1) % n]] {
                    if !neighbours.contains(&other) {
                        neighbours.push(other);
                    }
                }
            }
        }
        let [prev, next] = neighbours[..] else {
            continue;
        };

        let here = mesh.vertex(v);
        let incoming = here - mesh.vertex(prev);
        let outgoing = mesh.vertex(next) - here;
        if incoming.length_squared() == 0.0 || outgoing.length_squared() == 0.0 {
            continue;
        }
        if incoming.angle_between(outgoing) >= angle_limit {
            continue;
        }
        if vertex_faces[i].iter().any(|&f| mesh.face(f).len() <= 3) {
            continue;
        }

        for &f in &vertex_faces[i] {
            mesh.faces_mut()[f].retain(|&x| x != v);
        }
        remove[i] = true;
    }

    let removed = remove.iter().filter(|&&r| r).count();
    if removed > 0 {
        let keep: Vec<bool> = remove.iter().map(|&r| !r).collect();
        mesh.retain_vertices(&keep);
    }
    removed
}
