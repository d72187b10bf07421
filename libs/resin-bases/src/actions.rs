//! # Actions
//!
//! The fixed menu of base tools. Each [`Action`] validates the scene
//! state, runs its engine and produces the message shown to the user.

use crate::bevel::basic_bevel;
use crate::channel::{channel_cutout, ChannelSize};
use crate::error::{ToolError, ToolResult};
use crate::export::{export_to_folder, repeat_export, MeshExporter, SessionConfig};
use crate::flatten::{flatten_bottom, FlattenOptions};
use crate::kernel::SolidKernel;
use crate::object::ObjectId;
use crate::scene::Scene;
use crate::trim::{trim_bottom, TrimPreset};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// A user-triggered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Snap the near-bottom vertices of the selected object onto its floor.
    FixBottom,
    /// Bevel skirt on a copy, keeping the model height.
    SimpleBevel,
    /// Bevel skirt on a copy, added below the model.
    SimpleBevelAdditive,
    /// Bevel skirt on a copy, then channel cutouts.
    ChanneledBevel { size: ChannelSize, additive: bool },
    /// Slice a thin slab off the bottom of the selected object.
    TrimBottom(TrimPreset),
    /// Export the selection into `destination` (a directory or an `.stl` path).
    ExportTo {
        destination: PathBuf,
        sub_folder: Option<String>,
    },
    /// Export the selection into the last destination again.
    RepeatExport,
}

impl Action {
    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::FixBottom => "Fix bottom",
            Action::SimpleBevel => "Simple Bevel",
            Action::SimpleBevelAdditive => "Simple Bevel (Additive)",
            Action::ChanneledBevel {
                size: ChannelSize::Small,
                additive: false,
            } => "Channeled Bevel (1 inch)",
            Action::ChanneledBevel {
                size: ChannelSize::Small,
                additive: true,
            } => "Channeled Bevel (1 inch, Additive)",
            Action::ChanneledBevel {
                size: ChannelSize::Large,
                additive: false,
            } => "Channeled Bevel (2+ inch)",
            Action::ChanneledBevel {
                size: ChannelSize::Large,
                additive: true,
            } => "Channeled Bevel (2+ inch, Additive)",
            Action::TrimBottom(TrimPreset::Short) => "Trim bottom (small)",
            Action::TrimBottom(TrimPreset::Tall) => "Trim bottom (large)",
            Action::ExportTo { .. } => "STL Export",
            Action::RepeatExport => "Repeat Export",
        }
    }

    /// Returns true for the actions that operate on exactly one object.
    pub fn needs_single_object(&self) -> bool {
        !matches!(self, Action::ExportTo { .. } | Action::RepeatExport)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything an action runs against.
pub struct ToolContext<'a> {
    pub scene: &'a mut dyn Scene,
    pub kernel: &'a dyn SolidKernel,
    pub exporter: &'a dyn MeshExporter,
    pub session: &'a mut SessionConfig,
    pub flatten: FlattenOptions,
}

impl<'a> ToolContext<'a> {
    /// Bundles the collaborators with default flatten options.
    pub fn new(
        scene: &'a mut dyn Scene,
        kernel: &'a dyn SolidKernel,
        exporter: &'a dyn MeshExporter,
        session: &'a mut SessionConfig,
    ) -> Self {
        Self {
            scene,
            kernel,
            exporter,
            session,
            flatten: FlattenOptions::default(),
        }
    }
}

/// Outcome of a completed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// Message for the user
    pub message: String,
    /// Object created or modified, for single-object actions
    pub object: Option<ObjectId>,
}

impl fmt::Display for ActionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Runs one action.
///
/// Single-object actions require exactly one selected object and fail with
/// [`ToolError::Precondition`] before touching anything otherwise.
pub fn run_action(ctx: &mut ToolContext<'_>, action: &Action) -> ToolResult<ActionReport> {
    let target = if action.needs_single_object() {
        Some(single_selected(&*ctx.scene)?)
    } else {
        None
    };

    match (action, target) {
        (Action::FixBottom, Some(id)) => {
            let object = ctx.scene.get_mut(id)?;
            let report = flatten_bottom(ctx.kernel, object, None, ctx.flatten)?;
            Ok(ActionReport {
                message: format!("Bottom fixed, updated {} verts", report.modified),
                object: Some(id),
            })
        }
        (Action::SimpleBevel | Action::SimpleBevelAdditive, Some(id)) => {
            let additive = *action == Action::SimpleBevelAdditive;
            let bevel = basic_bevel(ctx.scene, ctx.kernel, id, additive, ctx.flatten)?;
            let name = &ctx.scene.get(bevel)?.name;
            Ok(ActionReport {
                message: format!("Simple base bevel added, new model added as {name}"),
                object: Some(bevel),
            })
        }
        (Action::ChanneledBevel { size, additive }, Some(id)) => {
            let bevel = basic_bevel(ctx.scene, ctx.kernel, id, *additive, ctx.flatten)?;
            channel_cutout(ctx.scene, ctx.kernel, bevel, *size)?;
            let class = match size {
                ChannelSize::Small => "Small",
                ChannelSize::Large => "Large",
            };
            let name = &ctx.scene.get(bevel)?.name;
            Ok(ActionReport {
                message: format!(
                    "{class} channel cutout base bevel added, new model added as {name}"
                ),
                object: Some(bevel),
            })
        }
        (Action::TrimBottom(preset), Some(id)) => {
            trim_bottom(ctx.scene, ctx.kernel, id, *preset)?;
            Ok(ActionReport {
                message: "Bottom trimmed".to_string(),
                object: Some(id),
            })
        }
        (
            Action::ExportTo {
                destination,
                sub_folder,
            },
            _,
        ) => {
            let count = export_to_folder(
                ctx.scene,
                ctx.exporter,
                ctx.session,
                destination,
                sub_folder.as_deref(),
            )?;
            Ok(exported(count))
        }
        (Action::RepeatExport, _) => {
            let count = repeat_export(ctx.scene, ctx.exporter, ctx.session)?;
            Ok(exported(count))
        }
        (_, None) => Err(ToolError::precondition(format!(
            "{} needs a selected object",
            action.label()
        ))),
    }
}

fn exported(count: usize) -> ActionReport {
    ActionReport {
        message: format!("{count} files exported!"),
        object: None,
    }
}

fn single_selected(scene: &dyn Scene) -> ToolResult<ObjectId> {
    match scene.selected()[..] {
        [id] => Ok(id),
        _ => {
            warn!("No object selected");
            Err(ToolError::precondition("No object selected"))
        }
    }
}
