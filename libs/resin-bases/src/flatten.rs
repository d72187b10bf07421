//! # Bottom Flattening
//!
//! Turns the ragged underside of a scanned or sculpted model into one flat
//! plane: vertices just above the lowest point are snapped onto it, the
//! snapped ring is welded, and the now-coplanar bottom faces are merged.

use crate::error::{ToolError, ToolResult};
use crate::kernel::SolidKernel;
use crate::object::ModelObject;
use crate::query::{bottom_z, edges_at_z, local_bottom_z, verts_at_z};
use config::constants::{BOTTOM_MERGE_VERTS_DISTANCE, BOTTOM_TOLERANCE, DISSOLVE_ANGLE_LIMIT_DEGREES};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which vertices are welded after snapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomWeld {
    /// Weld the vertices lying on the flattened bottom.
    #[default]
    SnappedBottom,
    /// Do not weld.
    Skip,
}

/// Run-time knobs for [`flatten_bottom`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenOptions {
    pub weld: BottomWeld,
}

/// What a flatten pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenReport {
    /// Vertices snapped down onto the floor
    pub modified: usize,
    /// Vertices removed by welding
    pub welded: usize,
    /// Faces merged away by the limited dissolve
    pub dissolved_faces: usize,
}

/// Flattens the bottom of `object` in place.
///
/// Rotation and scale are baked into the mesh first so the tolerances work
/// in real units. The floor is the lowest world Z expressed in local space.
/// With `remove_depth` the floor is raised by that much and everything
/// below it is clamped up onto it.
///
/// Every vertex below `floor + BOTTOM_TOLERANCE` then lands exactly on the
/// floor, the bottom is welded per `options`, and the bottom edges get a
/// 1° limited dissolve.
///
/// # Errors
///
/// [`ToolError::DegenerateGeometry`] for a mesh without vertices, and
/// [`ToolError::Kernel`] when welding or dissolving fails.
pub fn flatten_bottom(
    kernel: &dyn SolidKernel,
    object: &mut ModelObject,
    remove_depth: Option<f64>,
    options: FlattenOptions,
) -> ToolResult<FlattenReport> {
    let world_bottom = bottom_z(&object.mesh, &object.transform)
        .ok_or_else(|| ToolError::degenerate(format!("'{}' has no vertices", object.name)))?;

    object.apply_rotation_scale();

    // Only a translation is left, so the lowest local vertex is the world bottom
    let mut floor = local_bottom_z(&object.mesh).unwrap_or(world_bottom);
    debug!(object = %object.name, world_bottom, floor, "Flattening bottom");

    let mut report = FlattenReport::default();
    let mesh = &mut object.mesh;

    if let Some(depth) = remove_depth {
        floor += depth;
        for v in mesh.vertices_mut() {
            if v.z < floor {
                v.z = floor;
            }
        }
    }

    for v in mesh.vertices_mut() {
        if v.z < floor + BOTTOM_TOLERANCE && v.z != floor {
            v.z = floor;
            report.modified += 1;
        }
    }

    if options.weld == BottomWeld::SnappedBottom {
        let candidates = verts_at_z(mesh, floor);
        report.welded = kernel.weld_by_distance(mesh, &candidates, BOTTOM_MERGE_VERTS_DISTANCE)?;
    }

    let verts = verts_at_z(mesh, floor);
    let edges = edges_at_z(mesh, floor);
    let dissolved = kernel.dissolve_limited(
        mesh,
        DISSOLVE_ANGLE_LIMIT_DEGREES.to_radians(),
        &verts,
        &edges,
    )?;
    report.dissolved_faces = dissolved.faces_removed;

    info!(
        object = %object.name,
        modified = report.modified,
        welded = report.welded,
        dissolved_faces = report.dissolved_faces,
        "Bottom flattened"
    );

    Ok(report)
}
