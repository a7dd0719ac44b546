//! Scan progress reporting.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use survey_core::EntryKind;
use tokio::sync::broadcast;

/// Entries between two progress snapshots.
const EMIT_EVERY: u64 = 1000;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Directories recorded so far.
    pub directories: u64,
    /// Files recorded so far.
    pub files: u64,
    /// Links recorded so far.
    pub links: u64,
    /// Recoverable errors recorded so far.
    pub errors: u64,
    /// Most recently recorded path.
    pub current_path: PathBuf,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
    /// Whether this is the final snapshot of the scan.
    pub finished: bool,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            directories: 0,
            files: 0,
            links: 0,
            errors: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    /// Get total entries recorded.
    pub fn total_entries(&self) -> u64 {
        self.directories + self.files + self.links
    }

    /// Calculate scan rate in entries per second.
    pub fn entries_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.total_entries() as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared progress counters for one scan.
///
/// Counters are atomic so sibling subtree walks may record concurrently;
/// they never carry scan results.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    directories: AtomicU64,
    files: AtomicU64,
    links: AtomicU64,
    errors: AtomicU64,
    /// Entries of every kind, the emission clock.
    total: AtomicU64,
    current_path: Mutex<PathBuf>,
    tx: broadcast::Sender<ScanProgress>,
}

impl ProgressTracker {
    pub fn new(tx: broadcast::Sender<ScanProgress>) -> Self {
        Self {
            start_time: Instant::now(),
            directories: AtomicU64::new(0),
            files: AtomicU64::new(0),
            links: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            total: AtomicU64::new(0),
            current_path: Mutex::new(PathBuf::new()),
            tx,
        }
    }

    /// Record one entry and emit a snapshot every [`EMIT_EVERY`] entries.
    ///
    /// Returns the entry's ordinal in the scan; each value is handed out once
    /// even when subtrees record concurrently.
    pub fn record_entry(&self, kind: EntryKind, path: &str) -> u64 {
        let counter = match kind {
            EntryKind::Directory => &self.directories,
            EntryKind::File => &self.files,
            EntryKind::Link => &self.links,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut current) = self.current_path.lock() {
            *current = PathBuf::from(path);
        }

        let ordinal = self.total.fetch_add(1, Ordering::Relaxed) + 1;
        if ordinal % EMIT_EVERY == 0 {
            self.emit(false);
        }
        ordinal
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Send the final snapshot.
    pub fn finish(&self) {
        self.emit(true);
    }

    fn emit(&self, finished: bool) {
        // No receivers is not an error.
        let _ = self.tx.send(self.snapshot(finished));
    }

    pub fn snapshot(&self, finished: bool) -> ScanProgress {
        ScanProgress {
            directories: self.directories.load(Ordering::Relaxed),
            files: self.files.load(Ordering::Relaxed),
            links: self.links.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            current_path: self
                .current_path
                .lock()
                .map(|p| p.clone())
                .unwrap_or_default(),
            elapsed: self.start_time.elapsed(),
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts() {
        let (tx, _rx) = broadcast::channel(4);
        let tracker = ProgressTracker::new(tx);
        tracker.record_entry(EntryKind::Directory, "a");
        tracker.record_entry(EntryKind::File, "a/b");
        tracker.record_entry(EntryKind::Link, "a/c");
        tracker.record_error();

        let snap = tracker.snapshot(false);
        assert_eq!(snap.directories, 1);
        assert_eq!(snap.files, 1);
        assert_eq!(snap.links, 1);
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.total_entries(), 3);
        assert_eq!(snap.current_path, PathBuf::from("a/c"));
    }

    #[test]
    fn test_finish_emits_final_snapshot() {
        let (tx, mut rx) = broadcast::channel(4);
        let tracker = ProgressTracker::new(tx);
        tracker.record_entry(EntryKind::File, "x");
        tracker.finish();

        let snap = rx.try_recv().unwrap();
        assert!(snap.finished);
        assert_eq!(snap.files, 1);
    }

    #[test]
    fn test_periodic_emission() {
        let (tx, mut rx) = broadcast::channel(4);
        let tracker = ProgressTracker::new(tx);
        for i in 0..EMIT_EVERY {
            tracker.record_entry(EntryKind::File, &format!("f{i}"));
        }

        let snap = rx.try_recv().unwrap();
        assert!(!snap.finished);
        assert_eq!(snap.files, EMIT_EVERY);
    }

    #[test]
    fn test_concurrent_entries_get_distinct_ordinals() {
        let (tx, mut rx) = broadcast::channel(16);
        let tracker = ProgressTracker::new(tx);

        let mut ordinals: Vec<u64> = std::thread::scope(|s| {
            let kinds = [
                EntryKind::Directory,
                EntryKind::File,
                EntryKind::Link,
                EntryKind::File,
            ];
            let handles: Vec<_> = kinds
                .into_iter()
                .map(|kind| {
                    let tracker = &tracker;
                    s.spawn(move || {
                        (0..EMIT_EVERY)
                            .map(|i| tracker.record_entry(kind, &format!("p{i}")))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        ordinals.sort_unstable();

        assert_eq!(ordinals, (1..=4 * EMIT_EVERY).collect::<Vec<_>>());

        let mut emitted = 0;
        while rx.try_recv().is_ok() {
            emitted += 1;
        }
        assert_eq!(emitted, 4);
    }

    #[test]
    fn test_entries_per_second() {
        let mut progress = ScanProgress::new();
        assert_eq!(progress.entries_per_second(), 0.0);

        progress.files = 30;
        progress.directories = 10;
        progress.elapsed = Duration::from_secs(2);
        assert_eq!(progress.entries_per_second(), 20.0);
    }
}
