//! Convex polygon carried through the BSP tree.

use super::plane::{Classification, Plane};
use crate::mesh::newell_normal;
use glam::DVec3;

/// Convex, counter-clockwise polygon with its supporting plane.
///
/// Split halves keep the parent's plane so rounding never tilts them.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<DVec3>,
    plane: Plane,
}

impl Polygon {
    /// `None` for fewer than three points or a zero-area loop.
    pub fn from_vertices(vertices: Vec<DVec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_normal_and_point(newell_normal(&vertices), vertices[0])?;
        Some(Self { vertices, plane })
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Reverses winding and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Side of `plane` the whole polygon is on.
    pub fn classify(&self, plane: &Plane) -> Classification {
        self.vertices
            .iter()
            .map(|&v| plane.classify_point(v))
            .fold(Classification::Coplanar, Classification::combine)
    }

    /// Sorts `self` into one of the four buckets, cutting it in two when it
    /// straddles `plane`. Coplanar polygons go to `coplanar_front` when they
    /// face the same way as `plane`.
    pub fn split(
        self,
        plane: &Plane,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        match self.classify(plane) {
            Classification::Coplanar if self.plane.normal.dot(plane.normal) > 0.0 => {
                coplanar_front.push(self)
            }
            Classification::Coplanar => coplanar_back.push(self),
            Classification::Front => front.push(self),
            Classification::Back => back.push(self),
            Classification::Spanning => {
                let (front_loop, back_loop) = self.cut(plane);
                if front_loop.len() >= 3 {
                    front.push(Polygon {
                        vertices: front_loop,
                        plane: self.plane,
                    });
                }
                if back_loop.len() >= 3 {
                    back.push(Polygon {
                        vertices: back_loop,
                        plane: self.plane,
                    });
                }
            }
        }
    }

    /// Front and back vertex loops of a polygon spanning `plane`.
    fn cut(&self, plane: &Plane) -> (Vec<DVec3>, Vec<DVec3>) {
        let n = self.vertices.len();
        let mut front_loop = Vec::with_capacity(n + 1);
        let mut back_loop = Vec::with_capacity(n + 1);

        for (i, &a) in self.vertices.iter().enumerate() {
            let b = self.vertices[(i + 1) % n];
            let side_a = plane.classify_point(a);
            let side_b = plane.classify_point(b);

            if side_a != Classification::Back {
                front_loop.push(a);
            }
            if side_a != Classification::Front {
                back_loop.push(a);
            }

            if side_a.combine(side_b) == Classification::Spanning {
                let da = plane.signed_distance(a);
                let db = plane.signed_distance(b);
                let hit = a.lerp(b, da / (da - db));
                front_loop.push(hit);
                back_loop.push(hit);
            }
        }

        (front_loop, back_loop)
    }
}
