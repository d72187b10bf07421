//! # Mesh Operations
//!
//! Boolean operations (CSG) and the topology edits used to build and clean
//! up bases: region extrusion, distance welding and limited dissolve.

pub mod boolean;
pub mod dissolve;
pub mod extrude;
pub mod weld;

pub use boolean::{difference, intersection, union};
pub use dissolve::{dissolve_limited, DissolveReport};
pub use extrude::extrude_region;
pub use weld::weld_by_distance;
