//! Row-oriented projection of a scan result.

use std::path::Path;

use survey_core::{Entry, ScanError, ScanResult};

use crate::error::ExportError;

/// Column order of the `files` table, after the auto-assigned `id`.
pub const ENTRY_COLUMNS: [&str; 18] = [
    "root",
    "dir",
    "base",
    "ext",
    "name",
    "file",
    "size",
    "atime",
    "mtime",
    "ctime",
    "isDir",
    "isFile",
    "isLink",
    "isDuplicate",
    "hash",
    "flag",
    "exclude",
    "error",
];

/// Column order of the `errors` table, after the auto-assigned `id`.
pub const ERROR_COLUMNS: [&str; 2] = ["error", "path"];

/// One `files` row. Booleans are stored as 0/1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub root: String,
    pub dir: String,
    pub base: String,
    pub ext: String,
    pub name: String,
    pub file: String,
    pub size: i64,
    pub atime: String,
    pub mtime: String,
    pub ctime: String,
    pub is_dir: i64,
    pub is_file: i64,
    pub is_link: i64,
    pub is_duplicate: i64,
    pub hash: String,
    pub flag: String,
    pub exclude: i64,
    pub error: i64,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        Self {
            root: entry.parts.root.to_string(),
            dir: entry.parts.dir.clone(),
            base: entry.parts.base.to_string(),
            ext: entry.parts.ext.to_string(),
            name: entry.parts.name.to_string(),
            file: entry.file.clone(),
            // SQLite integers are signed; sizes beyond i64 saturate.
            size: i64::try_from(entry.size).unwrap_or(i64::MAX),
            atime: entry.atime.clone(),
            mtime: entry.mtime.clone(),
            ctime: entry.ctime.clone(),
            is_dir: entry.is_dir.into(),
            is_file: entry.is_file.into(),
            is_link: entry.is_link.into(),
            is_duplicate: entry.is_duplicate.into(),
            hash: entry.hash.clone(),
            flag: entry.flag.clone(),
            exclude: entry.exclude.into(),
            error: entry.error.into(),
        }
    }
}

/// One `errors` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRow {
    pub error: i64,
    pub path: String,
}

impl From<&ScanError> for ErrorRow {
    fn from(error: &ScanError) -> Self {
        Self {
            error: error.error.into(),
            path: error.path.clone(),
        }
    }
}

/// All rows of one result, in result order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowProjection {
    pub entries: Vec<EntryRow>,
    pub errors: Vec<ErrorRow>,
}

impl From<&ScanResult> for RowProjection {
    fn from(result: &ScanResult) -> Self {
        Self {
            entries: result.list.iter().map(EntryRow::from).collect(),
            errors: result.errors.iter().map(ErrorRow::from).collect(),
        }
    }
}

/// A relational store: accepts rows, persists them, can snapshot to a file.
pub trait RowSink {
    /// Persist a batch of rows. Either all rows are stored or none.
    fn accept(&mut self, rows: &RowProjection) -> Result<(), ExportError>;

    /// Durably write the store's current content to `path`.
    fn snapshot_to(&self, path: &Path) -> Result<(), ExportError>;
}

/// Project a result to rows and hand them to a sink.
pub fn export_rows<S: RowSink + ?Sized>(
    result: &ScanResult,
    sink: &mut S,
) -> Result<RowProjection, ExportError> {
    let rows = RowProjection::from(result);
    sink.accept(&rows)?;
    Ok(rows)
}
