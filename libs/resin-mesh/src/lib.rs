//! # Resin Mesh
//!
//! Polygon mesh and solid-modeling kernel for the resin base tools.
//!
//! ## Architecture
//!
//! ```text
//! STL file → stl::read_stl → Mesh → ops (boolean / extrude / weld / dissolve) → stl::write_stl
//! ```
//!
//! ## Algorithms
//!
//! Pure Rust, no native dependencies:
//! - **Boolean Operations**: BSP trees (csg.js algorithm)
//! - **Triangulation**: Ear clipping
//! - **Welding**: Spatial hash over candidate vertices
//! - **Limited Dissolve**: Union-find over near-coplanar faces
//! - **Primitives**: Cuboid and UV sphere
//!
//! ## Usage
//!
//! ```rust
//! use resin_mesh::{ops, primitives, Mesh};
//! use glam::DVec3;
//!
//! let block = primitives::create_cube(DVec3::splat(10.0), false)?;
//! let ball = primitives::create_uv_sphere(3.5, 16, 8)?;
//! let carved: Mesh = ops::difference(&block, &ball)?;
//! assert!(carved.face_count() > 6);
//! # Ok::<(), resin_mesh::MeshError>(())
//! ```

pub mod error;
pub mod mesh;
pub mod ops;
pub mod primitives;
pub mod stl;
pub mod triangulate;

pub use error::{MeshError, MeshResult};
pub use mesh::Mesh;
pub use ops::boolean::{difference, intersection, union};
