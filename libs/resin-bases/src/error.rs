//! # Tool Errors
//!
//! Error types for the base tools. Mesh kernel failures are wrapped, not
//! flattened, so callers can still match on the underlying [`MeshError`].

use crate::object::ObjectId;
use resin_mesh::MeshError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the base tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The action cannot run in the current state. Nothing was mutated.
    #[error("{message}")]
    Precondition { message: String },

    /// The geometry cannot support the operation (empty mesh, skirt too narrow)
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// Creating the export directory or writing a file failed
    #[error("Export to {} failed: {source}", path.display())]
    Export {
        /// Directory or file being written
        path: PathBuf,
        #[source]
        source: MeshError,
    },

    /// Reading or writing the session file failed
    #[error("Session file {} could not be used: {source}", path.display())]
    Session {
        /// Session file path
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The solid kernel rejected an operation
    #[error(transparent)]
    Kernel(#[from] MeshError),
}

impl ToolError {
    /// Creates a precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates the error for an object id the scene does not know.
    pub fn unknown_object(id: ObjectId) -> Self {
        Self::precondition(format!("Object {id} is not in the scene"))
    }
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
