//! Entry type and exclusion classification.

use std::fs::{FileType, Metadata};

use survey_core::{EntryKind, SurveyConfig};

/// Name suffix of platform shortcut files, treated exactly like symlinks.
pub const LINK_SUFFIX: &str = ".lnk";

/// Type and exclusion decision for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: EntryKind,
    pub exclude: bool,
}

/// Determine the entry type from lstat file type and normalized path.
///
/// Anything that is neither a link nor a directory counts as a file.
pub fn kind_of(file_type: FileType, file: &str) -> EntryKind {
    if file_type.is_symlink() || file.ends_with(LINK_SUFFIX) {
        EntryKind::Link
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

/// Apply the exclusion rules to one entry.
///
/// Extension rules apply to every kind; folder substrings only to directories.
pub fn is_excluded(kind: EntryKind, file: &str, ext: &str, config: &SurveyConfig) -> bool {
    config.is_excluded_extension(ext)
        || (kind == EntryKind::Directory && config.is_excluded_folder(file))
}

/// Classify an entry from its lstat metadata.
pub fn classify(file: &str, ext: &str, metadata: &Metadata, config: &SurveyConfig) -> Classification {
    let kind = kind_of(metadata.file_type(), file);
    Classification {
        kind,
        exclude: is_excluded(kind, file, ext, config),
    }
}
