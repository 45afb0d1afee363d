//! Persisted rename plans.
//!
//! A plan is a CSV file with the header `old_path,new_name`. Columns may come
//! in any order and extra columns are ignored.

use crate::error::RenameError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const OLD_PATH_COLUMN: &str = "old_path";
pub const NEW_NAME_COLUMN: &str = "new_name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    #[serde(rename = "old_path")]
    pub original_path: PathBuf,
    pub new_name: String,
}

impl PlanEntry {
    pub fn new(original_path: impl Into<PathBuf>, new_name: impl Into<String>) -> Self {
        Self {
            original_path: original_path.into(),
            new_name: new_name.into(),
        }
    }

    /// Where the entry's file ends up, ignoring collisions.
    pub fn target(&self) -> PathBuf {
        self.original_path.with_file_name(&self.new_name)
    }
}

fn format_error(path: &Path, reason: impl ToString) -> RenameError {
    RenameError::PlanFormat {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read a plan file, failing on a missing column or malformed row.
pub fn read_plan(path: &Path) -> Result<Vec<PlanEntry>, RenameError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| format_error(path, e))?;

    let headers = reader.headers().map_err(|e| format_error(path, e))?.clone();
    for column in [OLD_PATH_COLUMN, NEW_NAME_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(format_error(path, format!("missing column '{column}'")));
        }
    }

    reader
        .deserialize()
        .enumerate()
        .map(|(idx, row)| {
            row.map_err(|e| format_error(path, format!("row {}: {}", idx + 1, e)))
        })
        .collect()
}

/// Write `entries` to `path`, creating parent directories.
///
/// The header is written even for an empty plan.
pub fn write_plan(path: &Path, entries: &[PlanEntry]) -> Result<(), RenameError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format_error(path, e))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format_error(path, e))?;
    writer
        .write_record([OLD_PATH_COLUMN, NEW_NAME_COLUMN])
        .map_err(|e| format_error(path, e))?;
    for entry in entries {
        writer
            .serialize(entry)
            .map_err(|e| format_error(path, e))?;
    }
    writer.flush().map_err(|e| format_error(path, e))?;
    Ok(())
}
