//! Error types for export operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a sink. The exported result is never modified.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Output file could not be written.
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Result could not be serialized.
    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl ExportError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
