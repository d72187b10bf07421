//! # Mesh Errors
//!
//! Error types for mesh construction, topology edits and file I/O.

use thiserror::Error;

/// Errors that can occur while building or editing meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Invalid mesh topology
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },

    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// Boolean operation failed
    #[error("Boolean operation '{operation}' failed: {message}")]
    BooleanFailed {
        /// Name of the boolean operation (union, difference, intersection)
        operation: &'static str,
        /// Error message
        message: String,
    },

    /// Unsupported operation
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// Mesh validation failed
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// STL content could not be parsed
    #[error("Invalid STL: {message}")]
    InvalidStl { message: String },
}

impl MeshError {
    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates a boolean operation failed error.
    pub fn boolean_failed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::BooleanFailed {
            operation,
            message: message.into(),
        }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Creates an STL parse error.
    pub fn invalid_stl(message: impl Into<String>) -> Self {
        Self::InvalidStl {
            message: message.into(),
        }
    }
}

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
