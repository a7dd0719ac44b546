//! Output sinks for survey results.
//!
//! - **Document export** - the result as a `{ list, errors }` JSON file
//! - **Row projection** - one flat row per entry and per error
//! - **SQLite store** - in-memory database with `files`/`errors` tables
//!   and a snapshot-to-file operation
//!
//! Every sink only borrows the [`ScanResult`](survey_core::ScanResult), so
//! a failed export leaves the model intact for another attempt.
//!
//! ```rust,no_run
//! use survey_export::{RowSink, SqliteStore, export_rows, write_document};
//! # let result = survey_core::ScanResult::new();
//!
//! write_document(&result, "survey.json").unwrap();
//!
//! let mut store = SqliteStore::open_in_memory().unwrap();
//! export_rows(&result, &mut store).unwrap();
//! store.snapshot_to("survey.sq3".as_ref()).unwrap();
//! ```

mod document;
mod error;
mod rows;
mod sqlite;

pub use document::{to_document_string, write_document};
pub use error::ExportError;
pub use rows::{ENTRY_COLUMNS, ERROR_COLUMNS, EntryRow, ErrorRow, RowProjection, RowSink, export_rows};
pub use sqlite::SqliteStore;
