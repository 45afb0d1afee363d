use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Creation and modification times of a candidate, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
}

/// A path discovered under a root that may be renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameCandidate {
    pub path: PathBuf,
    pub timestamps: Timestamps,
    pub is_dir: bool,
}

impl RenameCandidate {
    pub fn new(path: impl Into<PathBuf>, timestamps: Timestamps, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            timestamps,
            is_dir,
        }
    }

    /// Current file name, lossily converted to UTF-8.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name of the directory that contains the candidate.
    pub fn parent_name(&self) -> String {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path of a sibling entry called `name`.
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.path.with_file_name(name)
    }
}
