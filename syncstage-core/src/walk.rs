//! Enumeration of rename candidates under a root.

use crate::candidate::{RenameCandidate, Timestamps};
use crate::config::CONFIG_DIR;
use crate::error::RenameError;
use chrono::{DateTime, Local};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Patterns skipped when the configuration does not provide its own list.
pub const DEFAULT_IGNORE: &[&str] = &[
    ".DS_Store",
    "._*",
    "Thumbs.db",
    "desktop.ini",
    "~$*",
    "*.tmp",
    ".Trash/**",
    "**/.git/**",
    ".syncstage/**",
];

/// Compiled ignore globs.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    globs: GlobSet,
}

impl IgnoreSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RenameError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(false)
                .build()
                .map_err(|source| RenameError::IgnorePattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            builder.add(glob);
        }
        let globs = builder.build().map_err(|source| RenameError::IgnorePattern {
            pattern: patterns
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(" "),
            source,
        })?;
        Ok(Self { globs })
    }

    pub fn defaults() -> Result<Self, RenameError> {
        Self::new(DEFAULT_IGNORE)
    }

    /// Whether a root-relative POSIX path (or its bare name) is ignored.
    pub fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        let name = relative.rsplit('/').next().unwrap_or(relative);
        self.globs.is_match(relative)
            || self.globs.is_match(name)
            || (is_dir && self.globs.is_match(format!("{relative}/**")))
    }
}

fn relative_posix(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Collect the candidates under `root` in a stable order.
///
/// Files come first in sorted walk order. With `include_dirs`, directories
/// follow, each after everything beneath it. The root's `.syncstage`
/// directory is never entered.
pub fn enumerate(root: &Path, ignore: &IgnoreSet, include_dirs: bool) -> Vec<RenameCandidate> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 1 && entry.file_name() == CONFIG_DIR {
                return false;
            }
            entry.depth() == 0
                || !ignore.is_ignored(
                    &relative_posix(root, entry.path()),
                    entry.file_type().is_dir(),
                )
        });

    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                continue;
            },
        };
        if entry.depth() == 0 || entry.path_is_symlink() {
            continue;
        }
        let is_dir = entry.file_type().is_dir();
        if is_dir && !include_dirs {
            continue;
        }
        match candidate_from_entry(&entry, is_dir) {
            Some(candidate) if is_dir => dirs.push(candidate),
            Some(candidate) => files.push(candidate),
            None => {},
        }
    }

    // Reverse pre-order puts every directory after its descendants.
    files.extend(dirs.into_iter().rev());
    files
}

fn candidate_from_entry(entry: &DirEntry, is_dir: bool) -> Option<RenameCandidate> {
    match entry.metadata() {
        Ok(metadata) => Some(RenameCandidate::new(
            entry.path(),
            timestamps(&metadata),
            is_dir,
        )),
        Err(e) => {
            tracing::debug!("no metadata for {}: {}", entry.path().display(), e);
            None
        },
    }
}

/// Modification time, and birth time where the platform has one.
pub fn timestamps(metadata: &Metadata) -> Timestamps {
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let created = metadata
        .created()
        .ok()
        .unwrap_or_else(|| change_time(metadata).map_or(modified, |ctime| ctime.min(modified)));
    Timestamps {
        created: DateTime::<Local>::from(created),
        modified: DateTime::<Local>::from(modified),
    }
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).ok()?;
    SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn change_time(_metadata: &Metadata) -> Option<SystemTime> {
    None
}
