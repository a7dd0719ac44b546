//! Filesystem entry records.

use std::path::{Component, Path};
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Type of a surveyed filesystem object.
///
/// A symbolic link is always [`EntryKind::Link`] regardless of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Directory.
    Directory,
    /// Regular file (and any other non-directory, non-link object).
    File,
    /// Symbolic link or shortcut.
    Link,
}

impl EntryKind {
    /// Short lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Directory => "directory",
            EntryKind::File => "file",
            EntryKind::Link => "link",
        }
    }
}

/// Components of a normalized path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParts {
    /// `/` for an absolute path, empty otherwise.
    pub root: CompactString,
    /// Parent directory.
    pub dir: String,
    /// Final component, including extension.
    pub base: CompactString,
    /// Extension with its leading dot, or empty.
    pub ext: CompactString,
    /// Final component without extension.
    pub name: CompactString,
}

impl PathParts {
    /// Split a `/`-separated path into its components.
    pub fn parse(path: &str) -> Self {
        let root = if path.starts_with('/') { "/" } else { "" };
        let trimmed = match path.trim_end_matches('/') {
            "" => path,
            t => t,
        };

        let (dir, base) = match trimmed.rfind('/') {
            Some(0) if trimmed.len() > 1 => ("/", &trimmed[1..]),
            Some(0) => ("/", ""),
            Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
            None => ("", trimmed),
        };

        // A leading dot marks a hidden file, not an extension.
        let (name, ext) = match base.rfind('.') {
            Some(idx) if idx > 0 => (&base[..idx], &base[idx..]),
            _ => (base, ""),
        };

        Self {
            root: root.into(),
            dir: dir.to_string(),
            base: base.into(),
            ext: ext.into(),
            name: name.into(),
        }
    }
}

/// Raw metadata captured for an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStat {
    pub size: u64,
    pub atime: String,
    pub mtime: String,
    pub ctime: String,
}

impl EntryStat {
    /// Capture size and timestamps from lstat-style metadata.
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        Self {
            size: metadata.len(),
            atime: iso8601(metadata.accessed().ok()),
            mtime: iso8601(metadata.modified().ok()),
            ctime: change_time(metadata),
        }
    }

    /// Stat for an object whose metadata could not be read.
    pub fn unavailable() -> Self {
        let epoch = iso8601(None);
        Self {
            size: 0,
            atime: epoch.clone(),
            mtime: epoch.clone(),
            ctime: epoch,
        }
    }
}

/// Inode status-change time.
#[cfg(unix)]
fn change_time(metadata: &std::fs::Metadata) -> String {
    use std::os::unix::fs::MetadataExt;

    DateTime::<Utc>::from_timestamp(metadata.ctime(), metadata.ctime_nsec() as u32)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Creation time where there is no status-change time.
#[cfg(not(unix))]
fn change_time(metadata: &std::fs::Metadata) -> String {
    iso8601(metadata.created().ok())
}

/// Render a timestamp as ISO-8601 UTC with millisecond precision.
///
/// `None` renders as the Unix epoch.
pub fn iso8601(time: Option<SystemTime>) -> String {
    time.map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a path with `/` separators and without `.` components.
pub fn normalize_path(path: &Path) -> String {
    fn push_segment(out: &mut String, segment: &str) {
        if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(segment);
    }

    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => out.push('/'),
            Component::CurDir => {}
            Component::ParentDir => push_segment(&mut out, ".."),
            Component::Normal(segment) => push_segment(&mut out, &segment.to_string_lossy()),
        }
    }

    if out.is_empty() {
        out.push('.');
    }
    out.replace('\\', "/")
}

/// One filesystem object discovered during a scan.
///
/// Exactly one of `is_dir`, `is_file`, `is_link` is true; constructors take
/// an [`EntryKind`] so the flags cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(flatten)]
    pub parts: PathParts,
    /// Normalized path.
    pub file: String,
    pub size: u64,
    pub atime: String,
    pub mtime: String,
    pub ctime: String,
    pub is_dir: bool,
    pub is_file: bool,
    pub is_link: bool,
    /// Reserved for a cross-entry comparison pass; never set by the scanner.
    pub is_duplicate: bool,
    /// Base64 digest of the leading bytes, empty if not computed.
    pub hash: String,
    /// Reserved extension field, always empty.
    pub flag: String,
    pub exclude: bool,
    /// OS error code of a partial metadata failure, 0 otherwise.
    pub error: i32,
}

impl Entry {
    /// Create an entry from captured metadata.
    pub fn new(file: impl Into<String>, kind: EntryKind, stat: EntryStat, exclude: bool) -> Self {
        let file = file.into();
        Self {
            parts: PathParts::parse(&file),
            file,
            size: stat.size,
            atime: stat.atime,
            mtime: stat.mtime,
            ctime: stat.ctime,
            is_dir: kind == EntryKind::Directory,
            is_file: kind == EntryKind::File,
            is_link: kind == EntryKind::Link,
            is_duplicate: false,
            hash: String::new(),
            flag: String::new(),
            exclude,
            error: 0,
        }
    }

    /// Create an entry for an object whose metadata could not be read.
    pub fn placeholder(file: impl Into<String>, kind: EntryKind, exclude: bool, error: i32) -> Self {
        Self {
            error,
            ..Self::new(file, kind, EntryStat::unavailable(), exclude)
        }
    }

    /// Attach a partial hash.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Type of this entry.
    pub fn kind(&self) -> EntryKind {
        if self.is_dir {
            EntryKind::Directory
        } else if self.is_link {
            EntryKind::Link
        } else {
            EntryKind::File
        }
    }

    /// Whether a hash is expected for this entry.
    pub fn is_hashable(&self) -> bool {
        self.is_file && !self.exclude && self.size > 0
    }

    /// Flag this entry as a duplicate of another.
    pub fn mark_duplicate(&mut self) {
        self.is_duplicate = true;
    }
}
