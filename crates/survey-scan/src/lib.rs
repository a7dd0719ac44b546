//! Filesystem survey engine.
//!
//! This crate walks a directory tree and produces a flat
//! [`ScanResult`](survey_core::ScanResult):
//!
//! - **Classification** of every child as file, directory or link
//! - **Partial hashing** of the first `hash_size` bytes of each file
//! - **Best-effort traversal**: per-entry failures become recorded errors
//! - **Optional parallelism** across sibling subtrees via rayon
//!
//! # Example
//!
//! ```rust,no_run
//! use survey_scan::{SurveyConfig, Walker};
//!
//! let config = SurveyConfig::new("/path/to/scan");
//! let result = Walker::new().walk(&config).unwrap();
//!
//! println!("{}", result.summary());
//! ```

mod classify;
mod hasher;
mod progress;
mod walker;

pub use classify::{Classification, LINK_SUFFIX, classify, is_excluded, kind_of};
pub use hasher::{digest, hash_prefix};
pub use progress::ScanProgress;
pub use walker::Walker;

// Re-export core types for convenience
pub use survey_core::{
    Entry, EntryKind, ScanError, ScanResult, ScanSummary, SurveyConfig, SurveyError,
};
