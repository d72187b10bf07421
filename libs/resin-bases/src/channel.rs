//! # Channel Cutouts
//!
//! Carves decorative channels into a bevel skirt. The cutting tool is a
//! sphere hub unioned with long wedge-shaped bars radiating through it,
//! capped flat just below the top of the skirt:
//!
//! ```text
//!          top view                 side view (one bar)
//!
//!             ║                      ────────── cap (removed above)
//!          ═══●═══                     /    \    wedge bar
//!             ║                    ───(  ●   )── hub sphere
//! ```
//!
//! Small bases get two perpendicular bars, large bases two more on the
//! diagonals. The tool is subtracted from the skirt, then every auxiliary
//! primitive is removed from the scene.

use crate::error::{ToolError, ToolResult};
use crate::kernel::{BooleanStep, SolidKernel};
use crate::object::{ObjectId, Transform};
use crate::query::{median, top_z};
use crate::scene::Scene;
use config::constants::{
    BASE_BEVEL_DEPTH, CHANNEL_CAP_EPSILON, CHANNEL_CUBE_LIFT, CHANNEL_CUBE_SIZE,
    CHANNEL_DIAGONAL_LIFT, CHANNEL_SPHERE_DROP, CHANNEL_SPHERE_RADIUS, CHANNEL_SPHERE_RINGS,
    CHANNEL_SPHERE_SEGMENTS, CHANNEL_STRETCH, CHANNEL_TAPER, CUTTER_CUBE_SIZE, TEMP_OBJECT_PREFIX,
};
use glam::{DQuat, DVec3};
use resin_mesh::primitives::{create_cube, create_cuboid, create_uv_sphere};
use resin_mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use tracing::{debug, info};

/// Base size class, which decides how many channels are cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSize {
    /// 1 inch bases: two perpendicular channels
    Small,
    /// 2 inch and larger bases: two more on the diagonals
    Large,
}

impl ChannelSize {
    /// Number of channel bars in the cutting tool.
    pub fn channel_count(self) -> usize {
        match self {
            ChannelSize::Small => 2,
            ChannelSize::Large => 4,
        }
    }
}

/// Result of a channel cutout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelReport {
    /// Channel bars unioned into the tool
    pub channels: usize,
}

/// Cuts channels into `target` around the scene cursor.
///
/// Expects the cursor at the bottom center of the skirt, where
/// [`basic_bevel`](crate::bevel::basic_bevel) leaves it. The tool is
/// composed in world space and brought into the target's local space
/// before the cut.
///
/// # Errors
///
/// [`ToolError::Precondition`] for an unknown target,
/// [`ToolError::DegenerateGeometry`] for a zero-scaled target and
/// [`ToolError::Kernel`] when a boolean fails. Auxiliary primitives are
/// removed on every path.
pub fn channel_cutout(
    scene: &mut dyn Scene,
    kernel: &dyn SolidKernel,
    target: ObjectId,
    size: ChannelSize,
) -> ToolResult<ChannelReport> {
    scene.get(target)?;
    let cursor = scene.cursor();
    debug!(?cursor, ?size, "Building channel tool");

    let mut temps = Vec::new();
    let result = match add_tool_parts(scene, cursor, size, &mut temps) {
        Ok(parts) => cut(scene, kernel, target, &parts),
        Err(err) => Err(err),
    };

    for id in temps {
        scene.remove_object(id);
    }
    scene.select_only(target);

    let report = result?;
    info!(channels = report.channels, "Channel cutout applied");
    Ok(report)
}

/// Auxiliary objects making up the cutting tool.
struct ToolParts {
    hub: ObjectId,
    bars: Vec<ObjectId>,
    cap: ObjectId,
}

fn add_tool_parts(
    scene: &mut dyn Scene,
    cursor: DVec3,
    size: ChannelSize,
    temps: &mut Vec<ObjectId>,
) -> ToolResult<ToolParts> {
    let sphere = create_uv_sphere(
        CHANNEL_SPHERE_RADIUS,
        CHANNEL_SPHERE_SEGMENTS,
        CHANNEL_SPHERE_RINGS,
    )?;
    let hub_at = Transform::from_translation(cursor - DVec3::new(0.0, 0.0, CHANNEL_SPHERE_DROP));
    let hub = add_temp(scene, temps, "center", sphere, hub_at);

    let bar = channel_bar()?;
    let bar_center = cursor + DVec3::new(0.0, 0.0, CHANNEL_CUBE_LIFT);
    let mut placements = vec![(bar_center, 0.0), (bar_center, FRAC_PI_2)];
    if size == ChannelSize::Large {
        let lifted = bar_center + DVec3::new(0.0, 0.0, CHANNEL_DIAGONAL_LIFT);
        placements.push((lifted, FRAC_PI_2 + FRAC_PI_4));
        placements.push((lifted, FRAC_PI_2 + FRAC_PI_4 + FRAC_PI_2));
    }

    let mut bars = Vec::with_capacity(placements.len());
    for (index, (center, angle)) in placements.into_iter().enumerate() {
        let transform = Transform {
            translation: center,
            rotation: DQuat::from_rotation_z(angle),
            scale: DVec3::ONE,
        };
        let name = format!("cube{}", index + 1);
        bars.push(add_temp(scene, temps, &name, bar.clone(), transform));
    }

    let half = CUTTER_CUBE_SIZE / 2.0;
    let cap_bottom = cursor.z + BASE_BEVEL_DEPTH - CHANNEL_CAP_EPSILON;
    let cap_mesh = create_cuboid(
        DVec3::new(cursor.x - half, cursor.y - half, cap_bottom),
        DVec3::new(cursor.x + half, cursor.y + half, cap_bottom + CUTTER_CUBE_SIZE),
    )?;
    let cap = add_temp(scene, temps, "cutcube", cap_mesh, Transform::IDENTITY);

    Ok(ToolParts { hub, bars, cap })
}

fn add_temp(
    scene: &mut dyn Scene,
    temps: &mut Vec<ObjectId>,
    name: &str,
    mesh: Mesh,
    transform: Transform,
) -> ObjectId {
    let id = scene.add_object(&format!("{TEMP_OBJECT_PREFIX}{name}"), mesh, transform);
    temps.push(id);
    id
}

/// One channel bar centered on the origin: the channel cube stretched into
/// a long flat bar whose top face is squeezed on X into a wedge.
pub(crate) fn channel_bar() -> ToolResult<Mesh> {
    let mut bar = create_cube(DVec3::splat(CHANNEL_CUBE_SIZE), true)?;
    let stretch = DVec3::from_array(CHANNEL_STRETCH);
    for v in bar.vertices_mut() {
        *v *= stretch;
    }

    let top = top_z(&bar).ok_or_else(|| ToolError::degenerate("empty channel bar"))?;
    let top_face: Vec<u32> = (0..bar.vertex_count() as u32)
        .filter(|&v| bar.vertex(v).z == top)
        .collect();
    let pivot = median(&bar, &top_face).ok_or_else(|| ToolError::degenerate("flat channel bar"))?;
    for &v in &top_face {
        let mut p = bar.vertex(v);
        p.x = pivot.x + (p.x - pivot.x) * CHANNEL_TAPER;
        bar.set_vertex(v, p);
    }

    // Keep the geometry centered on the object origin
    let center = bar.median_center();
    bar.translate(-center);
    Ok(bar)
}

fn cut(
    scene: &mut dyn Scene,
    kernel: &dyn SolidKernel,
    target: ObjectId,
    parts: &ToolParts,
) -> ToolResult<ChannelReport> {
    let hub = scene.get(parts.hub)?.world_mesh();
    let cap = scene.get(parts.cap)?.world_mesh();
    let bars = parts
        .bars
        .iter()
        .map(|&id| scene.get(id).map(|o| o.world_mesh()))
        .collect::<ToolResult<Vec<Mesh>>>()?;

    let mut steps: Vec<BooleanStep<'_>> = bars.iter().map(BooleanStep::union).collect();
    steps.push(BooleanStep::difference(&cap));
    let tool = kernel.compose(&hub, &steps)?;

    let object = scene.get_mut(target)?;
    let to_local = object
        .transform
        .inverse_matrix()
        .ok_or_else(|| ToolError::degenerate(format!("'{}' has a zero scale", object.name)))?;
    let tool_local = tool.transformed(&to_local);
    object.mesh = kernel.difference(&object.mesh, &tool_local)?;

    Ok(ChannelReport {
        channels: bars.len(),
    })
}
