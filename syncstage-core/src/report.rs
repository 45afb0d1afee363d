use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenameKind {
    File,
    Dir,
}

/// One accepted rename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
    pub kind: RenameKind,
}

impl PlannedRename {
    pub fn new_name(&self) -> String {
        self.to
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A candidate or plan entry that could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Counters for a run, merged across roots.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunStats {
    /// Candidates or plan entries looked at
    pub scanned: usize,
    /// Renames accepted (performed when applying)
    pub renamed: usize,
    /// Skipped by the idempotency guard
    pub already_named: usize,
    /// Computed name equal to the current one
    pub unchanged: usize,
    /// Plan entries whose source no longer exists
    pub missing: usize,
    pub failed: usize,
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, other: Self) {
        self.scanned += other.scanned;
        self.renamed += other.renamed;
        self.already_named += other.already_named;
        self.unchanged += other.unchanged;
        self.missing += other.missing;
        self.failed += other.failed;
    }
}
