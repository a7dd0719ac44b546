//! Recursive survey walker.
//!
//! Every directory call builds its own [`ScanResult`] and hands it back to
//! its parent, which appends it after the directory's own entry. Nothing
//! is accumulated in shared state, so sibling subtrees can be walked on a
//! rayon pool without locks.

use std::fs::{self, FileType};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use survey_core::{
    Entry, EntryKind, EntryStat, PathParts, ScanError, ScanResult, SurveyConfig, SurveyError,
    normalize_path,
};

use crate::classify::{Classification, classify, is_excluded, kind_of};
use crate::hasher::hash_prefix;
use crate::progress::{ProgressTracker, ScanProgress};

/// Survey walker.
pub struct Walker {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl Walker {
    /// Create a new walker.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Survey the configured root.
    pub fn walk(&self, config: &SurveyConfig) -> Result<ScanResult, SurveyError> {
        self.walk_dir(&config.root, config)
    }

    /// Survey `dir` with the rules of `config`.
    ///
    /// Fails only if `dir` itself cannot be listed; everything below it is
    /// best-effort and failures land in [`ScanResult::errors`].
    pub fn walk_dir(&self, dir: &Path, config: &SurveyConfig) -> Result<ScanResult, SurveyError> {
        config.validate()?;

        let tracker = ProgressTracker::new(self.progress_tx.clone());
        let ctx = WalkContext {
            config,
            tracker: &tracker,
            parallel: config.threads != 1,
        };

        info!(root = %dir.display(), threads = config.threads, "survey started");

        let result = if ctx.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .build()
                .map_err(|e| SurveyError::WorkerPool {
                    message: e.to_string(),
                })?;
            pool.install(|| walk_subtree(dir, &ctx))?
        } else {
            walk_subtree(dir, &ctx)?
        };

        tracker.finish();
        let last = tracker.snapshot(true);
        info!(
            entries = result.list.len(),
            errors = result.errors.len(),
            elapsed_ms = last.elapsed.as_millis() as u64,
            entries_per_sec = last.entries_per_second(),
            "survey finished"
        );

        Ok(result)
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only state shared by every call of one walk.
struct WalkContext<'a> {
    config: &'a SurveyConfig,
    tracker: &'a ProgressTracker,
    parallel: bool,
}

/// A listed child, before stat.
struct Child {
    path: PathBuf,
    /// File type reported by the directory listing, used when lstat fails.
    hint: Option<FileType>,
}

/// List one directory and visit its children.
fn walk_subtree(dir: &Path, ctx: &WalkContext<'_>) -> Result<ScanResult, SurveyError> {
    let dir_name = normalize_path(dir);
    debug!(dir = %dir_name, "listing directory");

    let listing = fs::read_dir(dir).map_err(|e| SurveyError::list_dir(dir, e))?;

    let mut result = ScanResult::new();
    let mut children = Vec::new();
    for item in listing {
        match item {
            Ok(entry) => children.push(Child {
                path: entry.path(),
                hint: entry.file_type().ok(),
            }),
            Err(err) => {
                warn!(dir = %dir_name, error = %err, "cannot read directory entry");
                ctx.tracker.record_error();
                result.push_error(ScanError::from_io(dir_name.as_str(), &err));
            }
        }
    }

    // collect() keeps listing order in both modes
    let visited: Vec<ScanResult> = if ctx.parallel {
        children.into_par_iter().map(|c| visit(c, ctx)).collect()
    } else {
        children.into_iter().map(|c| visit(c, ctx)).collect()
    };

    for child in visited {
        result.merge(child);
    }

    Ok(result)
}

/// Build the entry for one child and, for a directory, its subtree.
fn visit(child: Child, ctx: &WalkContext<'_>) -> ScanResult {
    let config = ctx.config;
    let file = normalize_path(&child.path);
    let parts = PathParts::parse(&file);
    let mut result = ScanResult::new();

    let metadata = match fs::symlink_metadata(&child.path) {
        Ok(metadata) => metadata,
        Err(err) => {
            let kind = child
                .hint
                .map(|ft| kind_of(ft, &file))
                .unwrap_or(EntryKind::File);
            let exclude = is_excluded(kind, &file, &parts.ext, config);
            let error = ScanError::from_io(file.as_str(), &err);
            warn!(
                path = %file,
                kind = kind.label(),
                code = error.error,
                error = %err,
                "cannot stat entry"
            );

            ctx.tracker.record_entry(kind, &file);
            ctx.tracker.record_error();
            result.push_entry(Entry::placeholder(file, kind, exclude, error.error));
            result.push_error(error);
            return result;
        }
    };

    let Classification { kind, exclude } = classify(&file, &parts.ext, &metadata, config);
    let mut entry = Entry::new(file.clone(), kind, EntryStat::from_metadata(&metadata), exclude);

    // Only regular files are opened; fifos and devices could block or stream.
    if kind == EntryKind::File && !exclude && metadata.is_file() {
        match hash_prefix(&child.path, config.hash_len(metadata.len())) {
            Ok(Some(hash)) => entry = entry.with_hash(hash),
            Ok(None) => {}
            Err(err) => {
                warn!(path = %file, error = %err, "cannot hash file");
                ctx.tracker.record_error();
                result.push_error(ScanError::from_io(file.as_str(), &err));
            }
        }
    }

    ctx.tracker.record_entry(kind, &file);
    result.push_entry(entry);

    if config.recursive && kind == EntryKind::Directory && !exclude {
        match walk_subtree(&child.path, ctx) {
            Ok(subtree) => result.merge(subtree),
            Err(err) => {
                warn!(path = %file, error = %err, "cannot list subdirectory");
                ctx.tracker.record_error();
                result.push_error(ScanError::new(file, err.code()));
            }
        }
    }

    result
}
