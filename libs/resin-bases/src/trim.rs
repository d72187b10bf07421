//! # Bottom Trimming
//!
//! Slices a thin slab off the bottom of a model with a boolean difference
//! against a large cuboid whose top face sits exactly at the cut height.

use crate::error::{ToolError, ToolResult};
use crate::kernel::SolidKernel;
use crate::object::{ObjectId, Transform};
use crate::query::bottom_z;
use crate::scene::Scene;
use config::constants::{
    BOTTOM_TRIM_VALUE_SHORT, BOTTOM_TRIM_VALUE_TALL, CUTTER_CUBE_SIZE, TEMP_OBJECT_PREFIX,
};
use glam::{DMat4, DVec3};
use resin_mesh::primitives::create_cuboid;
use resin_mesh::Mesh;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How much material a trim removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPreset {
    /// "Trim bottom (small)"
    Short,
    /// "Trim bottom (large)"
    Tall,
}

impl TrimPreset {
    /// Slab thickness removed from the bottom.
    pub fn depth(self) -> f64 {
        match self {
            TrimPreset::Short => BOTTOM_TRIM_VALUE_SHORT,
            TrimPreset::Tall => BOTTOM_TRIM_VALUE_TALL,
        }
    }
}

/// Cuts `preset.depth()` off the bottom of the object.
///
/// The object origin is moved to its geometry center and the scene cursor
/// snapped to it. The auxiliary cutter is removed again whether or not the
/// cut succeeds; the object ends up as the only selected, active object.
///
/// # Errors
///
/// [`ToolError::Precondition`] for an unknown object,
/// [`ToolError::DegenerateGeometry`] for an empty or zero-scaled object and
/// [`ToolError::Kernel`] when the boolean fails.
pub fn trim_bottom(
    scene: &mut dyn Scene,
    kernel: &dyn SolidKernel,
    id: ObjectId,
    preset: TrimPreset,
) -> ToolResult<()> {
    let remove = preset.depth();

    let object = scene.get_mut(id)?;
    let bottom = bottom_z(&object.mesh, &object.transform)
        .ok_or_else(|| ToolError::degenerate(format!("'{}' has no vertices", object.name)))?;

    object.set_origin_to_geometry();
    let origin = object.transform.translation;
    let to_local = object
        .transform
        .inverse_matrix()
        .ok_or_else(|| ToolError::degenerate(format!("'{}' has a zero scale", object.name)))?;
    debug!(object = %object.name, bottom, remove, "Trimming bottom");

    scene.set_cursor(origin);
    let cutter = cutter_below(origin, bottom + remove)?;
    let cutter_id = scene.add_object(
        &format!("{TEMP_OBJECT_PREFIX}cutcube"),
        cutter,
        Transform::IDENTITY,
    );

    let result = cut(scene, kernel, id, cutter_id, &to_local);

    scene.remove_object(cutter_id);
    scene.select_only(id);

    if result.is_ok() {
        info!(depth = remove, "Bottom trimmed");
    }
    result
}

/// World-space cutter cuboid centered on `origin` in X/Y with its top face
/// at exactly `top`.
pub(crate) fn cutter_below(origin: DVec3, top: f64) -> ToolResult<Mesh> {
    let half = CUTTER_CUBE_SIZE / 2.0;
    let min = DVec3::new(origin.x - half, origin.y - half, top - CUTTER_CUBE_SIZE);
    let max = DVec3::new(origin.x + half, origin.y + half, top);
    Ok(create_cuboid(min, max)?)
}

fn cut(
    scene: &mut dyn Scene,
    kernel: &dyn SolidKernel,
    target: ObjectId,
    cutter: ObjectId,
    to_local: &DMat4,
) -> ToolResult<()> {
    let cutter_local = scene.get(cutter)?.world_mesh().transformed(to_local);
    let object = scene.get_mut(target)?;
    object.mesh = kernel.difference(&object.mesh, &cutter_local)?;
    Ok(())
}
