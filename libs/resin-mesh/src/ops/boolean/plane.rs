//! Oriented plane with epsilon-based point classification.

use config::constants::PLANE_EPSILON;
use glam::DVec3;

/// Where a point or polygon lies relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Front,
    Back,
    /// Within `PLANE_EPSILON` of the plane
    Coplanar,
    /// Polygons only: points on both sides
    Spanning,
}

impl Classification {
    /// Merges the sides of two parts of the same polygon.
    pub fn combine(self, other: Classification) -> Classification {
        use Classification::*;
        match (self, other) {
            (Coplanar, side) | (side, Coplanar) => side,
            (Front, Front) => Front,
            (Back, Back) => Back,
            _ => Spanning,
        }
    }
}

/// Plane `normal · p = w` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub w: f64,
}

impl Plane {
    #[cfg(test)]
    pub fn new(normal: DVec3, w: f64) -> Self {
        Self { normal, w }
    }

    /// Normalizes `normal`; `None` when it has no direction.
    pub fn from_normal_and_point(normal: DVec3, point: DVec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        Some(Self {
            normal,
            w: normal.dot(point),
        })
    }

    /// Plane through three counter-clockwise points.
    #[cfg(test)]
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        Self::from_normal_and_point((b - a).cross(c - a), a)
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn classify_point(&self, point: DVec3) -> Classification {
        let dist = self.signed_distance(point);
        if dist > PLANE_EPSILON {
            Classification::Front
        } else if dist < -PLANE_EPSILON {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }

    /// Positive in front of the plane.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }
}
