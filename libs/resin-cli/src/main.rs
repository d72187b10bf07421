//! Resin base tools command line.
//!
//! Loads STL files into a scene, runs one base tool on each of them and
//! exports the results.
//!
//! # Commands
//!
//! - `resin-bases fix-bottom -i model.stl -o out/` - Flatten the bottom
//! - `resin-bases simple-bevel [--additive] -i model.stl` - Add a bevel skirt
//! - `resin-bases channeled-bevel --size large -i model.stl` - Skirt with channels
//! - `resin-bases trim-bottom --preset tall -i model.stl` - Slice off the bottom
//! - `resin-bases export -i a.stl -i b.stl -o out/` - Plain batch export
//! - `resin-bases repeat-export -i a.stl` - Export to the last directory
//!
//! Without `-o`, results go to the directory remembered in the session file.
//! Set `RUST_LOG=resin_bases=debug` for geometry details.

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use resin_bases::{
    run_action, Action, BottomWeld, BspKernel, ChannelSize, FlattenOptions, MemoryScene, ObjectId,
    Scene, SessionConfig, StlExporter, ToolContext, Transform, TrimPreset,
};
use resin_mesh::stl::read_stl_file;
use std::path::{Path, PathBuf};
use tracing::info;

/// Session file used when `--session` is not given.
const DEFAULT_SESSION_FILE: &str = ".resin-bases.json";

/// Resin base tools
///
/// Flatten, bevel, channel and trim miniature bases for resin printing.
#[derive(Parser, Debug)]
#[command(name = "resin-bases")]
#[command(about = "Prepare miniature bases for resin printing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// STL file to load; repeat for several (objects are named after the file)
    #[arg(short, long = "input", global = true)]
    inputs: Vec<PathBuf>,

    /// Export directory, or an .stl path inside it
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Folder created under the export directory
    #[arg(long, global = true)]
    sub_folder: Option<String>,

    /// Session file remembering the last export directory
    #[arg(long, global = true, default_value = DEFAULT_SESSION_FILE)]
    session: PathBuf,

    /// Do not weld the flattened bottom
    #[arg(long, global = true)]
    no_weld: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Snap near-bottom vertices onto the lowest plane
    FixBottom,

    /// Add a tapered skirt under a copy of each model
    SimpleBevel {
        /// Add the skirt below the model instead of keeping its height
        #[arg(long)]
        additive: bool,
    },

    /// Add a skirt with channel cutouts under a copy of each model
    ChanneledBevel {
        /// Base size class
        #[arg(long, value_enum, default_value_t = SizeArg::Small)]
        size: SizeArg,

        /// Add the skirt below the model instead of keeping its height
        #[arg(long)]
        additive: bool,
    },

    /// Slice a thin slab off the bottom of each model
    TrimBottom {
        /// How much to remove
        #[arg(long, value_enum, default_value_t = PresetArg::Short)]
        preset: PresetArg,
    },

    /// Export the inputs unchanged
    Export,

    /// Export the inputs to the last export directory
    RepeatExport,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SizeArg {
    /// 1 inch bases, two channels
    Small,
    /// 2 inch and larger bases, four channels
    Large,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PresetArg {
    /// Remove 0.05
    Short,
    /// Remove 0.1
    Tall,
}

impl Commands {
    /// Tool action run on each input, or `None` for the export commands.
    fn tool_action(self) -> Option<Action> {
        let action = match self {
            Commands::FixBottom => Action::FixBottom,
            Commands::SimpleBevel { additive: false } => Action::SimpleBevel,
            Commands::SimpleBevel { additive: true } => Action::SimpleBevelAdditive,
            Commands::ChanneledBevel { size, additive } => Action::ChanneledBevel {
                size: match size {
                    SizeArg::Small => ChannelSize::Small,
                    SizeArg::Large => ChannelSize::Large,
                },
                additive,
            },
            Commands::TrimBottom { preset } => Action::TrimBottom(match preset {
                PresetArg::Short => TrimPreset::Short,
                PresetArg::Tall => TrimPreset::Tall,
            }),
            Commands::Export | Commands::RepeatExport => return None,
        };
        Some(action)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resin_bases=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    for line in run(&cli)? {
        println!("{line}");
    }
    Ok(())
}

/// Runs the command and returns the report lines.
fn run(cli: &Cli) -> Result<Vec<String>> {
    ensure!(
        !cli.inputs.is_empty(),
        "no input files, pass at least one with -i"
    );

    let mut session = SessionConfig::load(&cli.session)?;
    let mut scene = MemoryScene::new();
    let inputs = load_inputs(&mut scene, &cli.inputs)?;

    let export = match (cli.command, &cli.output) {
        (Commands::RepeatExport, _) | (_, None) => Action::RepeatExport,
        (_, Some(dir)) => Action::ExportTo {
            destination: dir.clone(),
            sub_folder: cli.sub_folder.clone(),
        },
    };
    if cli.command == Commands::Export && cli.output.is_none() {
        bail!("export needs a destination, pass one with -o");
    }

    let mut ctx = ToolContext::new(&mut scene, &BspKernel, &StlExporter, &mut session);
    ctx.flatten = FlattenOptions {
        weld: if cli.no_weld {
            BottomWeld::Skip
        } else {
            BottomWeld::SnappedBottom
        },
    };

    let mut lines = Vec::new();
    let mut results = inputs.clone();

    if let Some(action) = cli.command.tool_action() {
        results.clear();
        for &id in &inputs {
            let name = ctx.scene.get(id)?.name.clone();
            ctx.scene.select_only(id);
            let report = run_action(&mut ctx, &action)
                .with_context(|| format!("{action} failed on '{name}'"))?;
            info!(input = %name, "{report}");
            results.push(report.object.unwrap_or(id));
            lines.push(report.message);
        }
    }

    ctx.scene.set_selection(&results);
    let report = run_action(&mut ctx, &export).context("exporting results (pass -o DIR)")?;
    lines.push(report.message);

    session
        .save(&cli.session)
        .with_context(|| format!("saving session to {}", cli.session.display()))?;
    Ok(lines)
}

/// Loads each STL file as one object named after its file stem.
fn load_inputs(scene: &mut MemoryScene, paths: &[PathBuf]) -> Result<Vec<ObjectId>> {
    paths
        .iter()
        .map(|path| {
            let mesh =
                read_stl_file(path).with_context(|| format!("reading {}", path.display()))?;
            Ok(scene.add_object(&object_name(path), mesh, Transform::IDENTITY))
        })
        .collect()
}

fn object_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}
