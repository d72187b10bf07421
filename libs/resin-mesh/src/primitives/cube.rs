//! Axis-aligned boxes: the cutting slabs and channel bars.

use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;

/// Bottom ring is corners 0..4, top ring 4..8, both counter-clockwise from
/// above starting at min x/y. Faces wind outward.
const BOX_FACES: [[u32; 4]; 6] = [
    [0, 3, 2, 1], // -z
    [4, 5, 6, 7], // +z
    [0, 1, 5, 4], // -y
    [2, 3, 7, 6], // +y
    [3, 0, 4, 7], // -x
    [1, 2, 6, 5], // +x
];

/// Box of `size`, either centered on the origin or with its minimum corner
/// there.
///
/// ```rust
/// use resin_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let block = create_cube(DVec3::new(2.2, 2.2, 2.2), true)?;
/// assert_eq!(block.face_count(), 6);
/// # Ok::<(), resin_mesh::MeshError>(())
/// ```
pub fn create_cube(size: DVec3, center: bool) -> Result<Mesh, MeshError> {
    if center {
        create_cuboid(-size / 2.0, size / 2.0)
    } else {
        create_cuboid(DVec3::ZERO, size)
    }
}

/// Box spanning `min` to `max`.
///
/// Corners are taken verbatim, so a face lands at an exact height.
pub fn create_cuboid(min: DVec3, max: DVec3) -> Result<Mesh, MeshError> {
    let extent = max - min;
    if !extent.cmpgt(DVec3::ZERO).all() {
        return Err(MeshError::degenerate(format!(
            "Box extent must be positive: {extent:?}"
        )));
    }

    let mut mesh = Mesh::with_capacity(8, BOX_FACES.len());
    for z in [min.z, max.z] {
        for (x, y) in [(min.x, min.y), (max.x, min.y), (max.x, max.y), (min.x, max.y)] {
            mesh.add_vertex(DVec3::new(x, y, z));
        }
    }
    for face in &BOX_FACES {
        mesh.add_face(face);
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let mesh = create_cube(DVec3::splat(10.0), false).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_cube_not_centered() {
        let mesh = create_cube(DVec3::splat(10.0), false).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::ZERO);
        assert_eq!(max, DVec3::splat(10.0));
    }

    #[test]
    fn test_cube_centered() {
        let mesh = create_cube(DVec3::splat(10.0), true).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::splat(-5.0));
        assert_eq!(max, DVec3::splat(5.0));
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let mesh = create_cube(DVec3::splat(2.0), true).unwrap();
        for index in 0..mesh.face_count() {
            let face_center: DVec3 = mesh
                .face(index)
                .iter()
                .map(|&v| mesh.vertex(v))
                .sum::<DVec3>()
                / 4.0;
            assert!(mesh.face_normal(index).dot(face_center) > 0.0);
        }
    }

    #[test]
    fn test_cuboid_exact_corners() {
        let mesh = create_cuboid(DVec3::new(-100.0, -100.0, -199.95), DVec3::new(100.0, 100.0, 0.05))
            .unwrap();
        let (_, max) = mesh.bounding_box();
        assert_eq!(max.z, 0.05);
    }

    #[test]
    fn test_cube_validates_and_closes() {
        let mesh = create_cube(DVec3::splat(10.0), false).unwrap();
        assert!(mesh.validate());
        assert!(mesh.is_closed());
    }

    #[test]
    fn test_cube_invalid_size() {
        assert!(create_cube(DVec3::new(0.0, 10.0, 10.0), false).is_err());
        assert!(create_cube(DVec3::new(-5.0, 10.0, 10.0), false).is_err());
        assert!(create_cube(DVec3::new(f64::NAN, 10.0, 10.0), false).is_err());
    }
}
