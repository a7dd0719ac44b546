//! Core types for survey.
//!
//! This crate provides the data model shared by the scanner and the
//! exporters: the fixed-field [`Entry`] record, the [`ScanError`] record,
//! the [`ScanResult`] aggregate and the run configuration.

mod config;
mod entry;
mod error;
mod result;

pub use config::{SurveyConfig, SurveyConfigBuilder};
pub use entry::{Entry, EntryKind, EntryStat, PathParts, iso8601, normalize_path};
pub use error::{ScanError, SurveyError, UNKNOWN_ERROR_CODE};
pub use result::{ScanResult, ScanSummary};
