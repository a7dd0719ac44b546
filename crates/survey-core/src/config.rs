//! Survey configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::SurveyError;

/// Configuration for one survey run. Read-only for the duration of the run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default, rename_all = "camelCase")]
pub struct SurveyConfig {
    /// Traversal root.
    #[builder(default = "PathBuf::from(\"./\")")]
    pub root: PathBuf,

    /// Number of leading bytes read from each file for the partial hash.
    #[builder(default = "256")]
    pub hash_size: u64,

    /// Extensions (with leading dot) whose entries are marked excluded.
    #[builder(default = "default_excluded_extensions()")]
    pub excluded_extensions: Vec<String>,

    /// Substrings of a directory path that mark it excluded.
    #[builder(default = "default_excluded_folders()")]
    pub excluded_folders: Vec<String>,

    /// JSON document output (None or empty = skip). A config file that
    /// omits the key skips the output.
    #[builder(default)]
    #[serde(default)]
    pub json_file: Option<PathBuf>,

    /// SQLite database output (None or empty = skip).
    #[builder(default)]
    #[serde(default)]
    pub db_file: Option<PathBuf>,

    /// Worker threads for sibling subtree walks (1 = sequential, 0 = auto-detect).
    #[builder(default = "1")]
    pub threads: usize,

    /// Recurse into non-excluded subdirectories.
    #[builder(default = "true")]
    pub recursive: bool,
}

fn default_excluded_extensions() -> Vec<String> {
    [".lnk", ".tmp", ".bak", ".log"].map(String::from).to_vec()
}

fn default_excluded_folders() -> Vec<String> {
    ["node_modules", "windows"].map(String::from).to_vec()
}

impl SurveyConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        }
        if self.hash_size == Some(0) {
            return Err("Hash size must be positive".to_string());
        }
        Ok(())
    }
}

impl SurveyConfig {
    /// Create a new survey config builder.
    pub fn builder() -> SurveyConfigBuilder {
        SurveyConfigBuilder::default()
    }

    /// Create a default config rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load a config from a JSON file.
    ///
    /// Missing keys take their defaults, except `jsonFile` and `dbFile`: an
    /// omitted output is skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SurveyError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| SurveyError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the builder enforces on a config built any other way.
    pub fn validate(&self) -> Result<(), SurveyError> {
        if self.root.as_os_str().is_empty() {
            return Err(SurveyError::InvalidConfig {
                message: "root path cannot be empty".to_string(),
            });
        }
        if self.hash_size == 0 {
            return Err(SurveyError::InvalidConfig {
                message: "hashSize must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Check an extension (including its leading dot) against the exclusion list.
    pub fn is_excluded_extension(&self, ext: &str) -> bool {
        !ext.is_empty() && self.excluded_extensions.iter().any(|x| x == ext)
    }

    /// Check a normalized directory path against the excluded folder substrings.
    pub fn is_excluded_folder(&self, path: &str) -> bool {
        self.excluded_folders
            .iter()
            .any(|x| !x.is_empty() && path.contains(x.as_str()))
    }

    /// Number of bytes to hash for a file of `size` bytes.
    pub fn hash_len(&self, size: u64) -> u64 {
        size.min(self.hash_size)
    }

    /// JSON output target, if enabled.
    pub fn json_target(&self) -> Option<&Path> {
        enabled_target(self.json_file.as_deref())
    }

    /// SQLite output target, if enabled.
    pub fn db_target(&self) -> Option<&Path> {
        enabled_target(self.db_file.as_deref())
    }
}

fn enabled_target(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./"),
            hash_size: 256,
            excluded_extensions: default_excluded_extensions(),
            excluded_folders: default_excluded_folders(),
            json_file: Some(PathBuf::from("survey.json")),
            db_file: Some(PathBuf::from("survey.sq3")),
            threads: 1,
            recursive: true,
        }
    }
}
