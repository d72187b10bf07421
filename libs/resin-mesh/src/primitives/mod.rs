//! # Primitives
//!
//! Mesh generation for the auxiliary solids used as boolean operands.

pub mod cube;
pub mod sphere;

pub use cube::{create_cube, create_cuboid};
pub use sphere::create_uv_sphere;
