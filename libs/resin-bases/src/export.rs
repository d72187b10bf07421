//! # Batch Export
//!
//! Writes every selected object to its own file under one destination
//! directory, and remembers that directory for the next export.

use crate::error::{ToolError, ToolResult};
use crate::object::{ModelObject, ObjectId};
use crate::scene::Scene;
use config::constants::EXPORT_EXTENSION;
use resin_mesh::stl::write_stl_file;
use resin_mesh::{MeshError, MeshResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// State remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Last export directory. `None` means the current directory has not
    /// been replaced by an explicit choice yet.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl SessionConfig {
    /// Loads a session from a JSON file. A missing file yields the default
    /// session.
    pub fn load(path: impl AsRef<Path>) -> ToolResult<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(session_error(path, serde_json::Error::io(err))),
        };
        serde_json::from_str(&text).map_err(|err| session_error(path, err))
    }

    /// Writes the session as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ToolResult<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|err| session_error(path, err))?;
        fs::write(path, text).map_err(|err| session_error(path, serde_json::Error::io(err)))
    }
}

fn session_error(path: &Path, source: serde_json::Error) -> ToolError {
    ToolError::Session {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes one object to a file.
pub trait MeshExporter {
    /// File extension without the dot.
    fn extension(&self) -> &str {
        EXPORT_EXTENSION
    }

    /// Writes `object` to `path`, replacing an existing file.
    fn export(&self, object: &ModelObject, path: &Path) -> MeshResult<()>;
}

/// Binary STL exporter. Geometry is written in world space.
#[derive(Debug, Clone, Copy, Default)]
pub struct StlExporter;

impl MeshExporter for StlExporter {
    fn export(&self, object: &ModelObject, path: &Path) -> MeshResult<()> {
        write_stl_file(path, &object.world_mesh())
    }
}

/// Resolves the directory an export writes into.
///
/// A destination naming an `.stl` file is replaced by its parent directory;
/// `sub_folder` is then appended.
pub fn resolve_destination(destination: &Path, sub_folder: Option<&str>) -> PathBuf {
    let is_file = destination
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXPORT_EXTENSION));

    let mut dir = if is_file {
        match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    } else {
        destination.to_path_buf()
    };

    if let Some(sub) = sub_folder.filter(|s| !s.is_empty()) {
        dir.push(sub);
    }
    dir
}

/// Exports each selected object to `<dir>/<name>.<ext>`.
///
/// The directory is created when missing and remembered in `session`.
/// Each object is exported while it is the only selected, active object;
/// the original selection and active object are restored afterwards, also
/// when an export fails.
///
/// # Returns
///
/// The number of files written.
///
/// # Errors
///
/// [`ToolError::Export`] naming the directory or file that failed.
pub fn export_to_folder(
    scene: &mut dyn Scene,
    exporter: &dyn MeshExporter,
    session: &mut SessionConfig,
    destination: &Path,
    sub_folder: Option<&str>,
) -> ToolResult<usize> {
    let dir = resolve_destination(destination, sub_folder);
    fs::create_dir_all(&dir).map_err(|err| ToolError::Export {
        path: dir.clone(),
        source: MeshError::Io(err),
    })?;
    session.export_dir = Some(dir.clone());
    debug!(dir = %dir.display(), "Export destination");

    let selection = scene.selected();
    let active = scene.active();

    let result = export_each(scene, exporter, &dir, &selection);

    scene.set_selection(&selection);
    scene.set_active(active);

    let count = result?;
    info!(count, dir = %dir.display(), "Exported objects");
    Ok(count)
}

fn export_each(
    scene: &mut dyn Scene,
    exporter: &dyn MeshExporter,
    dir: &Path,
    selection: &[ObjectId],
) -> ToolResult<usize> {
    for &id in selection {
        scene.select_only(id);
        let object = scene.get(id)?;
        let path = dir.join(format!("{}.{}", object.name, exporter.extension()));
        exporter
            .export(object, &path)
            .map_err(|source| ToolError::Export { path, source })?;
    }
    Ok(selection.len())
}

/// Repeats the last export into the remembered directory.
///
/// # Errors
///
/// [`ToolError::Precondition`] when nothing has been exported yet, plus
/// the errors of [`export_to_folder`].
pub fn repeat_export(
    scene: &mut dyn Scene,
    exporter: &dyn MeshExporter,
    session: &mut SessionConfig,
) -> ToolResult<usize> {
    let dir = session
        .export_dir
        .clone()
        .ok_or_else(|| ToolError::precondition("No previous export destination"))?;
    export_to_folder(scene, exporter, session, &dir, None)
}
