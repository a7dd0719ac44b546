//! Error types for survey operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code recorded when an I/O failure carries no OS error number.
pub const UNKNOWN_ERROR_CODE: i32 = -1;

/// Errors that stop a survey operation.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// A directory's children could not be enumerated.
    #[error("Cannot list directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be read.
    #[error("Cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for a survey config.
    #[error("Cannot parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The worker pool could not be started.
    #[error("Cannot start worker pool: {message}")]
    WorkerPool { message: String },
}

impl SurveyError {
    /// Create a listing error with path context.
    pub fn list_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ListDir {
            path: path.into(),
            source,
        }
    }

    /// Numeric code for recording this error against a path.
    pub fn code(&self) -> i32 {
        match self {
            Self::ListDir { source, .. } | Self::ConfigRead { source, .. } => io_code(source),
            _ => UNKNOWN_ERROR_CODE,
        }
    }
}

/// A path that failed to stat, read or list, with its error code.
///
/// Created at the point of failure and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanError {
    /// Normalized path of the failing object.
    pub path: String,
    /// OS error number, or [`UNKNOWN_ERROR_CODE`].
    pub error: i32,
}

impl ScanError {
    /// Create a new scan error record.
    pub fn new(path: impl Into<String>, error: i32) -> Self {
        Self {
            path: path.into(),
            error,
        }
    }

    /// Record an I/O failure against a path.
    pub fn from_io(path: impl Into<String>, source: &std::io::Error) -> Self {
        Self::new(path, io_code(source))
    }
}

fn io_code(source: &std::io::Error) -> i32 {
    match source.raw_os_error() {
        Some(code) if code != 0 => code,
        _ => UNKNOWN_ERROR_CODE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_from_os_error() {
        let err = ScanError::from_io("/test/path", &std::io::Error::from_raw_os_error(13));
        assert_eq!(err.path, "/test/path");
        assert_eq!(err.error, 13);
    }

    #[test]
    fn test_scan_error_without_os_code() {
        let err = ScanError::from_io(
            "/test/path",
            &std::io::Error::new(std::io::ErrorKind::Other, "synthetic"),
        );
        assert_eq!(err.error, UNKNOWN_ERROR_CODE);
    }

    #[test]
    fn test_list_dir_code() {
        let err = SurveyError::list_dir("/nope", std::io::Error::from_raw_os_error(2));
        assert_eq!(err.code(), 2);
        assert!(err.to_string().contains("/nope"));
    }
}
