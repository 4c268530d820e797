//! Error types for the variable picker

use thiserror::Error;

/// Result type alias using PickerError
pub type Result<T> = std::result::Result<T, PickerError>;

/// Errors that can occur while loading picker inputs
///
/// The resolution queries themselves never fail: missing data degrades to
/// an empty item list. Errors only surface at the edges, when parsing
/// snapshots, config, or user-supplied paths.
#[derive(Debug, Error)]
pub enum PickerError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A drill path string could not be parsed
    #[error("Invalid drill path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A node id is not present in the current graph snapshot
    #[error("Unknown node: {0}")]
    UnknownNode(String),
}

impl PickerError {
    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
