//! # Model Objects
//!
//! A scene object: a named mesh in object-local space plus the transform
//! that places it in the world.

use config::constants::EPSILON;
use glam::{DMat4, DQuat, DVec3};
use resin_mesh::Mesh;
use std::fmt;

/// Stable identifier of an object inside one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    /// Returns the raw id value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Object → world placement: scale, then rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The transform that leaves positions unchanged.
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    /// Creates a pure translation.
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Returns the object → world matrix.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Returns the world → object matrix, or `None` when a zero scale makes
    /// the transform non-invertible.
    pub fn inverse_matrix(&self) -> Option<DMat4> {
        let matrix = self.matrix();
        (matrix.determinant().abs() > EPSILON).then(|| matrix.inverse())
    }

    /// Returns true when only the translation is set.
    pub fn is_translation_only(&self) -> bool {
        self.rotation == DQuat::IDENTITY && self.scale == DVec3::ONE
    }
}

/// A named mesh placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelObject {
    pub id: ObjectId,
    pub name: String,
    /// Geometry in object-local space
    pub mesh: Mesh,
    pub transform: Transform,
}

impl ModelObject {
    /// Returns a copy of the mesh in world space.
    pub fn world_mesh(&self) -> Mesh {
        self.mesh.transformed(&self.transform.matrix())
    }

    /// World-space axis-aligned bounds, as `(min, max)`.
    pub fn world_bounding_box(&self) -> (DVec3, DVec3) {
        self.world_mesh().bounding_box()
    }

    /// Size of the local bounds times the object scale.
    ///
    /// Rotation is ignored, so a turned object keeps its own width rather
    /// than the width of its world-space box.
    pub fn dimensions(&self) -> DVec3 {
        let (min, max) = self.mesh.bounding_box();
        (max - min) * self.transform.scale.abs()
    }

    /// Bakes rotation and scale into the mesh, leaving only the translation.
    ///
    /// World positions are unchanged; local coordinates become real units.
    pub fn apply_rotation_scale(&mut self) {
        if self.transform.is_translation_only() {
            return;
        }
        let linear = DMat4::from_scale_rotation_translation(
            self.transform.scale,
            self.transform.rotation,
            DVec3::ZERO,
        );
        self.mesh.transform(&linear);
        self.transform.rotation = DQuat::IDENTITY;
        self.transform.scale = DVec3::ONE;
    }

    /// Moves the object origin to the median of its vertices without moving
    /// the geometry in the world.
    pub fn set_origin_to_geometry(&mut self) {
        if self.mesh.is_empty() {
            return;
        }
        let center = self.mesh.median_center();
        self.transform.translation = self.transform.matrix().transform_point3(center);
        self.mesh.translate(-center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use resin_mesh::primitives::create_cube;

    fn cube_object(transform: Transform) -> ModelObject {
        ModelObject {
            id: ObjectId(1),
            name: "cube".to_string(),
            mesh: create_cube(DVec3::splat(10.0), false).unwrap(),
            transform,
        }
    }

    #[test]
    fn test_origin_to_geometry_keeps_world_position() {
        let mut object = cube_object(Transform::from_translation(DVec3::new(1.0, 2.0, 3.0)));
        let before = object.world_bounding_box();

        object.set_origin_to_geometry();

        assert_eq!(object.transform.translation, DVec3::new(6.0, 7.0, 8.0));
        assert_eq!(object.mesh.median_center(), DVec3::ZERO);
        let after = object.world_bounding_box();
        assert_abs_diff_eq!(after.0, before.0, epsilon = 1e-12);
        assert_abs_diff_eq!(after.1, before.1, epsilon = 1e-12);
    }

    #[test]
    fn test_origin_to_geometry_with_scale() {
        let mut object = cube_object(Transform {
            scale: DVec3::splat(2.0),
            ..Transform::IDENTITY
        });
        object.set_origin_to_geometry();

        assert_abs_diff_eq!(object.transform.translation, DVec3::splat(10.0), epsilon = 1e-12);
        let (min, max) = object.world_bounding_box();
        assert_abs_diff_eq!(min, DVec3::ZERO, epsilon = 1e-12);
        assert_abs_diff_eq!(max, DVec3::splat(20.0), epsilon = 1e-12);
    }

    #[test]
    fn test_apply_rotation_scale() {
        let mut object = cube_object(Transform {
            translation: DVec3::new(0.0, 0.0, 5.0),
            rotation: DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
            scale: DVec3::new(1.0, 1.0, 0.5),
        });
        let before = object.world_bounding_box();

        object.apply_rotation_scale();

        assert!(object.transform.is_translation_only());
        assert_eq!(object.transform.translation, DVec3::new(0.0, 0.0, 5.0));
        let (_, local_max) = object.mesh.bounding_box();
        assert_abs_diff_eq!(local_max.z, 5.0, epsilon = 1e-12);
        let after = object.world_bounding_box();
        assert_abs_diff_eq!(after.0, before.0, epsilon = 1e-9);
        assert_abs_diff_eq!(after.1, before.1, epsilon = 1e-9);
        assert!(object.mesh.is_closed());
    }

    #[test]
    fn test_dimensions_follow_local_bounds() {
        let object = cube_object(Transform {
            rotation: DQuat::from_rotation_z(std::f64::consts::FRAC_PI_4),
            scale: DVec3::new(0.5, 2.0, 1.0),
            ..Transform::IDENTITY
        });

        assert_abs_diff_eq!(object.dimensions(), DVec3::new(5.0, 20.0, 10.0), epsilon = 1e-12);
        let (min, max) = object.world_bounding_box();
        assert!(max.x - min.x > 5.0);
    }

    #[test]
    fn test_inverse_matrix_rejects_zero_scale() {
        let flat = Transform {
            scale: DVec3::new(1.0, 0.0, 1.0),
            ..Transform::IDENTITY
        };
        assert!(flat.inverse_matrix().is_none());

        let moved = Transform::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let inverse = moved.inverse_matrix().unwrap();
        assert_eq!(inverse.transform_point3(DVec3::new(1.0, 2.0, 3.0)), DVec3::ZERO);
    }
}
