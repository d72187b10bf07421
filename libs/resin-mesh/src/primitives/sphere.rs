//! # Sphere Primitive
//!
//! Generates a UV sphere using latitude/longitude tessellation with a
//! vertex at each pole.

use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;
use std::f64::consts::PI;

/// Creates a UV sphere mesh centered at the origin.
///
/// # Arguments
///
/// * `radius` - The radius of the sphere
/// * `segments` - Number of meridians around the circumference
/// * `rings` - Number of latitude bands from pole to pole
///
/// # Returns
///
/// A closed mesh with `segments * (rings - 1) + 2` vertices: triangle fans
/// at the poles and quads in between.
///
/// # Example
///
/// ```rust
/// use resin_mesh::primitives::create_uv_sphere;
///
/// let mesh = create_uv_sphere(3.5, 50, 25).unwrap();
/// assert_eq!(mesh.vertex_count(), 50 * 24 + 2);
/// ```
pub fn create_uv_sphere(radius: f64, segments: u32, rings: u32) -> Result<Mesh, MeshError> {
    if !(radius > 0.0) {
        return Err(MeshError::degenerate(format!(
            "Sphere radius must be positive: {}",
            radius
        )));
    }

    if segments < 3 {
        return Err(MeshError::degenerate(format!(
            "Sphere segments must be at least 3: {}",
            segments
        )));
    }

    if rings < 2 {
        return Err(MeshError::degenerate(format!(
            "Sphere rings must be at least 2: {}",
            rings
        )));
    }

    let band_count = (rings - 1) as usize;
    let mut mesh = Mesh::with_capacity(
        segments as usize * band_count + 2,
        segments as usize * rings as usize,
    );

    let top = mesh.add_vertex(DVec3::new(0.0, 0.0, radius));

    // Latitude rings from top to bottom
    let mut bands: Vec<Vec<u32>> = Vec::with_capacity(band_count);
    for i in 1..rings {
        // Polar angle (0 = top, PI = bottom)
        let phi = PI * i as f64 / rings as f64;
        let ring_radius = radius * phi.sin();
        let z = radius * phi.cos();

        let ring = (0..segments)
            .map(|j| {
                let theta = 2.0 * PI * j as f64 / segments as f64;
                mesh.add_vertex(DVec3::new(
                    ring_radius * theta.cos(),
                    ring_radius * theta.sin(),
                    z,
                ))
            })
            .collect();
        bands.push(ring);
    }

    let bottom = mesh.add_vertex(DVec3::new(0.0, 0.0, -radius));
    let segments = segments as usize;

    // Top cap
    let first = &bands[0];
    for j in 0..segments {
        mesh.add_triangle(top, first[j], first[(j + 1) % segments]);
    }

    // Quads between adjacent rings
    for pair in bands.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        for j in 0..segments {
            let j_next = (j + 1) % segments;
            mesh.add_face(&[upper[j], lower[j], lower[j_next], upper[j_next]]);
        }
    }

    // Bottom cap
    let last = &bands[band_count - 1];
    for j in 0..segments {
        mesh.add_triangle(bottom, last[(j + 1) % segments], last[j]);
    }

    Ok(mesh)
}
