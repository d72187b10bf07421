//! # Polygon Triangulation
//!
//! Ear clipping for planar face loops. The loop is projected onto the
//! coordinate plane most perpendicular to its normal; the projection keeps
//! the loop's winding so ears are detected with a signed area test.

use crate::mesh::newell_normal;
use config::constants::EPSILON;
use glam::{DVec2, DVec3};

/// Triangulates a planar polygon loop.
///
/// Returns triangles as index triples into `points`, wound the same way as
/// the input loop. Concave loops are supported; self-intersecting loops fall
/// back to a fan once no ear can be found.
///
/// # Example
///
/// ```rust
/// use resin_mesh::triangulate::triangulate_polygon;
/// use glam::DVec3;
///
/// let square = [
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(1.0, 1.0, 0.0),
///     DVec3::new(0.0, 1.0, 0.0),
/// ];
/// assert_eq!(triangulate_polygon(&square).len(), 2);
/// ```
pub fn triangulate_polygon(points: &[DVec3]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    if n == 3 {
        return vec![[0, 1, 2]];
    }

    let normal = newell_normal(points);
    if normal.length() < EPSILON {
        return fan(&(0..n).collect::<Vec<_>>());
    }

    let projected = project(points, normal);
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let count = remaining.len();
        let ear = (0..count).find(|&i| {
            let prev = remaining[(i + count - 1) % count];
            let curr = remaining[i];
            let next = remaining[(i + 1) % count];
            is_ear(&projected, &remaining, prev, curr, next)
        });

        match ear {
            Some(i) => {
                let prev = remaining[(i + count - 1) % count];
                let next = remaining[(i + 1) % count];
                triangles.push([prev, remaining[i], next]);
                remaining.remove(i);
            }
            None => {
                triangles.extend(fan(&remaining));
                return triangles;
            }
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}

/// Projects the loop to 2D, dropping the normal's dominant axis and keeping
/// counter-clockwise loops counter-clockwise.
fn project(points: &[DVec3], normal: DVec3) -> Vec<DVec2> {
    let abs = normal.abs();
    let (axis, sign) = if abs.z >= abs.x && abs.z >= abs.y {
        (2, normal.z.signum())
    } else if abs.x >= abs.y {
        (0, normal.x.signum())
    } else {
        (1, normal.y.signum())
    };

    points
        .iter()
        .map(|p| {
            let flat = match axis {
                0 => DVec2::new(p.y, p.z),
                1 => DVec2::new(p.z, p.x),
                _ => DVec2::new(p.x, p.y),
            };
            DVec2::new(flat.x * sign, flat.y)
        })
        .collect()
}

fn is_ear(projected: &[DVec2], remaining: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let a = projected[prev];
    let b = projected[curr];
    let c = projected[next];

    if (b - a).perp_dot(c - b) <= EPSILON {
        return false;
    }

    remaining.iter().all(|&other| {
        if other == prev || other == curr || other == next {
            return true;
        }
        let p = projected[other];
        if p == a || p == b || p == c {
            return true;
        }
        !point_in_triangle(p, a, b, c)
    })
}

fn point_in_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

fn fan(loop_indices: &[usize]) -> Vec<[usize; 3]> {
    (1..loop_indices.len().saturating_sub(1))
        .map(|i| [loop_indices[0], loop_indices[i], loop_indices[i + 1]])
        .collect()
}
