//! Error types for the mind map.
//!
//! Tree operations never fail: missing ids are silent no-ops. Errors only
//! arise at the boundary, when the map is mounted or when records and
//! configuration come in from the outside.

use thiserror::Error;

/// Errors surfaced by the mind map boundary
#[derive(Debug, Error)]
pub enum MindMapError {
    /// The mind map was initialised without an element to render into
    #[error("Mind map mount element is missing")]
    MissingMount,

    /// `load` received text that is not a record array
    #[error("Malformed idea records: {0}")]
    MalformedRecords(#[from] serde_json::Error),

    /// The configuration object could not be read
    #[error("Invalid mind map configuration: {0}")]
    InvalidConfig(String),

    /// A JavaScript record array could not be read
    #[error("Invalid idea records: {0}")]
    InvalidRecords(String),
}

/// Result alias for mind map boundary operations
pub type Result<T> = std::result::Result<T, MindMapError>;
