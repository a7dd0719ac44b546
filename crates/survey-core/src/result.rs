//! Scan result aggregate and summary statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryKind};
use crate::error::ScanError;

/// Entries and errors discovered under one traversal root.
///
/// Each subtree walk builds its own result; parents absorb child results
/// by value with [`ScanResult::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Discovered entries, in listing order with subtrees flattened in place.
    pub list: Vec<Entry>,
    /// Recoverable failures.
    pub errors: Vec<ScanError>,
}

impl ScanResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push_entry(&mut self, entry: Entry) {
        self.list.push(entry);
    }

    /// Append an error.
    pub fn push_error(&mut self, error: ScanError) {
        self.errors.push(error);
    }

    /// Absorb a child result, appending its entries and errors.
    pub fn merge(&mut self, child: ScanResult) {
        self.list.extend(child.list);
        self.errors.extend(child.errors);
    }

    /// Check if nothing was found and nothing failed.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty() && self.errors.is_empty()
    }

    /// Iterate over entries of one kind.
    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &Entry> {
        self.list.iter().filter(move |e| e.kind() == kind)
    }

    /// Find an entry by its normalized path.
    pub fn find(&self, file: &str) -> Option<&Entry> {
        self.list.iter().find(|e| e.file == file)
    }

    /// Compute summary counts.
    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary {
            errors: self.errors.len() as u64,
            ..ScanSummary::default()
        };
        for entry in &self.list {
            match entry.kind() {
                EntryKind::Directory => summary.directories += 1,
                EntryKind::File => {
                    summary.files += 1;
                    summary.total_size += entry.size;
                }
                EntryKind::Link => summary.links += 1,
            }
            if entry.exclude {
                summary.excluded += 1;
            }
            if !entry.hash.is_empty() {
                summary.hashed += 1;
            }
        }
        summary
    }
}

/// Counts derived from a [`ScanResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub directories: u64,
    pub files: u64,
    pub links: u64,
    pub errors: u64,
    /// Entries marked excluded, of any kind.
    pub excluded: u64,
    /// Entries carrying a partial hash.
    pub hashed: u64,
    /// Sum of file sizes in bytes.
    pub total_size: u64,
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found: {} directories, {} files, {} links, {} errors",
            self.directories, self.files, self.links, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryStat;

    fn entry(file: &str, kind: EntryKind, size: u64) -> Entry {
        let stat = EntryStat {
            size,
            ..EntryStat::unavailable()
        };
        Entry::new(file, kind, stat, false)
    }

    #[test]
    fn test_merge_flattens_in_order() {
        let mut parent = ScanResult::new();
        parent.push_entry(entry("a", EntryKind::Directory, 0));

        let mut child = ScanResult::new();
        child.push_entry(entry("a/b.txt", EntryKind::File, 3));
        child.push_error(ScanError::new("a/locked", 13));

        parent.merge(child);
        parent.push_entry(entry("c.txt", EntryKind::File, 1));

        let files: Vec<_> = parent.list.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(files, ["a", "a/b.txt", "c.txt"]);
        assert_eq!(parent.errors, vec![ScanError::new("a/locked", 13)]);
    }

    #[test]
    fn test_summary_counts() {
        let mut result = ScanResult::new();
        result.push_entry(entry("d", EntryKind::Directory, 4096));
        result.push_entry(entry("d/x", EntryKind::File, 10).with_hash("h"));
        result.push_entry(entry("d/y", EntryKind::File, 5));
        result.push_entry(entry("d/l", EntryKind::Link, 7));
        result.push_error(ScanError::new("d/z", 2));

        let summary = result.summary();
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.links, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.hashed, 1);
        assert_eq!(summary.total_size, 15);
        assert_eq!(
            summary.to_string(),
            "Found: 1 directories, 2 files, 1 links, 1 errors"
        );
    }

    #[test]
    fn test_find_and_filter() {
        let mut result = ScanResult::new();
        assert!(result.is_empty());
        result.push_entry(entry("d", EntryKind::Directory, 0));
        result.push_entry(entry("d/x", EntryKind::File, 1));

        assert!(result.find("d/x").is_some());
        assert!(result.find("d/q").is_none());
        assert_eq!(result.entries_of(EntryKind::File).count(), 1);
    }
}
