//! SQLite row sink.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, backup::Backup, params};
use tracing::{debug, info};

use crate::error::ExportError;
use crate::rows::{RowProjection, RowSink};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY, root TEXT, dir TEXT, base TEXT, ext TEXT, name TEXT, file TEXT,
    size INTEGER, atime TEXT, mtime TEXT, ctime TEXT, isDir INTEGER, isFile INTEGER, isLink INTEGER,
    isDuplicate INTEGER, hash TEXT, flag TEXT, exclude INTEGER, error INTEGER
);
CREATE TABLE IF NOT EXISTS errors (id INTEGER PRIMARY KEY, error INTEGER, path TEXT);
";

const INSERT_FILE: &str =
    "INSERT INTO files VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)";

const INSERT_ERROR: &str = "INSERT INTO errors VALUES (NULL, ?1, ?2)";

/// Pages copied per backup step when snapshotting.
const BACKUP_PAGES_PER_STEP: std::ffi::c_int = 100;

/// SQLite-backed store with `files` and `errors` tables.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a fresh in-memory store.
    pub fn open_in_memory() -> Result<Self, ExportError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a store backed by a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        Self::with_connection(Connection::open(path)?)
    }

    fn with_connection(conn: Connection) -> Result<Self, ExportError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of rows in `files`.
    pub fn file_count(&self) -> Result<u64, ExportError> {
        self.count("SELECT COUNT(*) FROM files")
    }

    /// Number of rows in `errors`.
    pub fn error_count(&self) -> Result<u64, ExportError> {
        self.count("SELECT COUNT(*) FROM errors")
    }

    fn count(&self, sql: &str) -> Result<u64, ExportError> {
        let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}

impl RowSink for SqliteStore {
    fn accept(&mut self, rows: &RowProjection) -> Result<(), ExportError> {
        let tx = self.conn.transaction()?;
        {
            let mut insert = tx.prepare_cached(INSERT_FILE)?;
            for r in &rows.entries {
                insert.execute(params![
                    r.root,
                    r.dir,
                    r.base,
                    r.ext,
                    r.name,
                    r.file,
                    r.size,
                    r.atime,
                    r.mtime,
                    r.ctime,
                    r.is_dir,
                    r.is_file,
                    r.is_link,
                    r.is_duplicate,
                    r.hash,
                    r.flag,
                    r.exclude,
                    r.error,
                ])?;
            }

            let mut insert = tx.prepare_cached(INSERT_ERROR)?;
            for r in &rows.errors {
                insert.execute(params![r.error, r.path])?;
            }
        }
        tx.commit()?;

        debug!(
            files = rows.entries.len(),
            errors = rows.errors.len(),
            "rows stored"
        );
        Ok(())
    }

    fn snapshot_to(&self, path: &Path) -> Result<(), ExportError> {
        let mut dst = Connection::open(path)?;
        let backup = Backup::new(&self.conn, &mut dst)?;
        backup.run_to_completion(BACKUP_PAGES_PER_STEP, Duration::from_millis(10), None)?;

        info!(path = %path.display(), "database snapshot written");
        Ok(())
    }
}
