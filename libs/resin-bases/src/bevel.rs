//! # Bevel Skirt
//!
//! Builds a tapered skirt under a copy of the model: the copy's bottom is
//! flattened, the bottom ring is extruded down by the skirt depth, and the
//! extruded ring is scaled in so the skirt slopes inward.
//!
//! ```text
//!   ┌──────────┐  model
//!   │          │
//!   └──────────┘  flattened bottom
//!    \________/   skirt, BASE_BEVEL_DEPTH tall, SIMPLE_BEVEL_SHRINK_DISTANCE in
//! ```

use crate::error::{ToolError, ToolResult};
use crate::flatten::{flatten_bottom, FlattenOptions};
use crate::kernel::SolidKernel;
use crate::object::ObjectId;
use crate::query::{global_co, local_bottom_z, median, top_z, verts_at_z, xy_bounds};
use crate::scene::Scene;
use config::constants::{skirt_scale_factor, BASE_BEVEL_DEPTH, BEVEL_NAME_SUFFIX, EPSILON};
use glam::DVec3;
use tracing::{debug, info};

/// Adds a bevel skirt to a duplicate of `source` and returns the duplicate.
///
/// The duplicate gets its origin at the geometry center, the name
/// `"<name> [simple_base_bevel]"`, and is placed its own width along -X
/// from the source. It becomes the only selected, active object.
///
/// Without `additive` the bottom is first raised by the skirt depth so the
/// finished model keeps its height; with `additive` the skirt is added
/// below the existing bottom. The scene cursor ends at the world-space
/// center of the skirt's bottom ring.
///
/// # Errors
///
/// [`ToolError::Precondition`] for an unknown source,
/// [`ToolError::DegenerateGeometry`] for an empty mesh, a model with no
/// height left above the raised bottom, or a bottom ring too narrow to
/// taper (1 unit or less), and [`ToolError::Kernel`] when the extrusion
/// fails. On a degenerate error the duplicate is removed and the previous
/// selection restored; kernel failures leave the duplicate in place.
pub fn basic_bevel(
    scene: &mut dyn Scene,
    kernel: &dyn SolidKernel,
    source: ObjectId,
    additive: bool,
    options: FlattenOptions,
) -> ToolResult<ObjectId> {
    let source_name = scene.get(source)?.name.clone();
    let selection = scene.selected();
    let active = scene.active();

    let id = scene
        .duplicate_object(source)
        .ok_or_else(|| ToolError::unknown_object(source))?;
    scene.rename_object(id, &format!("{source_name} [{BEVEL_NAME_SUFFIX}]"));
    scene.select_only(id);

    match build_skirt(scene, kernel, id, additive, options) {
        Err(err @ ToolError::DegenerateGeometry { .. }) => {
            debug!(source = %source_name, "Discarding bevel duplicate");
            scene.remove_object(id);
            scene.set_selection(&selection);
            scene.set_active(active);
            Err(err)
        }
        result => result.map(|()| id),
    }
}

fn build_skirt(
    scene: &mut dyn Scene,
    kernel: &dyn SolidKernel,
    id: ObjectId,
    additive: bool,
    options: FlattenOptions,
) -> ToolResult<()> {
    let object = scene.get_mut(id)?;
    object.set_origin_to_geometry();
    let width = object.dimensions().x;
    object.transform.translation.x -= width;

    let remove_depth = (!additive).then_some(BASE_BEVEL_DEPTH);
    flatten_bottom(kernel, object, remove_depth, options)?;

    let floor = local_bottom_z(&object.mesh)
        .ok_or_else(|| ToolError::degenerate(format!("'{}' has no vertices", object.name)))?;
    let top = top_z(&object.mesh).unwrap_or(floor);
    if top <= floor + EPSILON {
        return Err(ToolError::degenerate(format!(
            "'{}' has no height above its bottom",
            object.name
        )));
    }
    let ring = verts_at_z(&object.mesh, floor);
    if ring.is_empty() {
        return Err(ToolError::degenerate(format!("'{}' has no bottom ring", object.name)));
    }

    let ring = kernel.extrude_region(
        &mut object.mesh,
        &ring,
        DVec3::new(0.0, 0.0, -BASE_BEVEL_DEPTH),
    )?;

    let (min, max) = xy_bounds(&object.mesh, &ring)
        .ok_or_else(|| ToolError::degenerate("extrusion produced no ring"))?;
    let ring_width = (max.x - min.x).abs();
    let scale = skirt_scale_factor(ring_width).ok_or_else(|| {
        ToolError::degenerate(format!(
            "bottom of '{}' is {ring_width:.3} wide, too narrow for a skirt",
            object.name
        ))
    })?;
    debug!(ring = ring.len(), ring_width, scale, "Tapering skirt");

    let pivot = median(&object.mesh, &ring)
        .ok_or_else(|| ToolError::degenerate("extrusion produced no ring"))?;
    for &v in &ring {
        let p = object.mesh.vertex(v);
        let scaled = pivot + (p - pivot) * DVec3::new(scale, scale, 1.0);
        object.mesh.set_vertex(v, scaled);
    }

    let cursor = global_co(&object.transform, pivot);
    let name = object.name.clone();
    scene.set_cursor(cursor);

    info!(object = %name, additive, "Simple base bevel added");
    Ok(())
}
