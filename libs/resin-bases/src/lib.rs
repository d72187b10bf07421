//! # Resin Bases
//!
//! Post-processing tools that prepare miniature bases for resin printing.
//!
//! ## Architecture
//!
//! ```text
//! Action → run_action → bevel (query + flatten) → channel
//!                     → flatten | trim | export
//! ```
//!
//! The engines never own a scene graph, a modeling kernel or a file format.
//! They reach those through three traits:
//!
//! - [`Scene`]: objects, selection, active object and the 3D cursor
//! - [`SolidKernel`]: booleans and topology edits
//! - [`MeshExporter`]: writes one object to disk
//!
//! [`MemoryScene`], [`BspKernel`] and [`StlExporter`] are the shipped
//! implementations.
//!
//! ## Usage
//!
//! ```rust
//! use resin_bases::{run_action, Action, BspKernel, MemoryScene, Scene, SessionConfig, StlExporter, ToolContext, Transform};
//! use resin_mesh::primitives::create_cube;
//! use glam::DVec3;
//!
//! let mut scene = MemoryScene::new();
//! let cube = create_cube(DVec3::splat(10.0), false)?;
//! let id = scene.add_object("base", cube, Transform::IDENTITY);
//! scene.set_selection(&[id]);
//!
//! let mut session = SessionConfig::default();
//! let mut ctx = ToolContext::new(&mut scene, &BspKernel, &StlExporter, &mut session);
//! let report = run_action(&mut ctx, &Action::SimpleBevel)?;
//! assert!(report.message.ends_with("base [simple_base_bevel]"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod bevel;
pub mod channel;
pub mod error;
pub mod export;
pub mod flatten;
pub mod kernel;
pub mod object;
pub mod query;
pub mod scene;
pub mod trim;

pub use actions::{run_action, Action, ActionReport, ToolContext};
pub use channel::{ChannelReport, ChannelSize};
pub use error::{ToolError, ToolResult};
pub use export::{MeshExporter, SessionConfig, StlExporter};
pub use flatten::{BottomWeld, FlattenOptions, FlattenReport};
pub use kernel::{BooleanOp, BooleanStep, BspKernel, SolidKernel};
pub use object::{ModelObject, ObjectId, Transform};
pub use scene::{MemoryScene, Scene};
pub use trim::TrimPreset;
