//! Error types for geometry operations.

use crate::shapes::ObjectId;
use std::fmt;
use thiserror::Error;

/// Which mutation path currently holds an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Pointer-driven rigid translation.
    Drag,
    /// Numeric property editing with a working copy.
    Preview,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditKind::Drag => f.write_str("drag"),
            EditKind::Preview => f.write_str("preview"),
        }
    }
}

/// Geometry core errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Object not found: {0}")]
    NotFound(ObjectId),
    #[error("Object {id} is already under an active {holder}")]
    ConcurrentEdit { id: ObjectId, holder: EditKind },
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Inconsistent geometry: {0}")]
    InconsistentGeometry(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
