use crate::collision::{free_sibling_name, DryRunNamespace, LiveNamespace, Namespace};
use crate::error::RenameError;
use crate::lock::LockFile;
use crate::name::is_usable_name;
use crate::output::ReplayResult;
use crate::plan::{read_plan, PlanEntry};
use crate::report::{PlannedRename, RenameFailure, RenameKind, RunStats};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

enum Outcome {
    Renamed(PlannedRename),
    Unchanged,
    Missing,
    Failed(RenameError),
}

fn replay_entry(
    entry: &PlanEntry,
    pad: usize,
    apply: bool,
    namespace: &mut dyn Namespace,
) -> Outcome {
    let source = &entry.original_path;
    let Ok(metadata) = fs::symlink_metadata(source) else {
        return Outcome::Missing;
    };
    if !is_usable_name(&entry.new_name) {
        return Outcome::Failed(RenameError::InvalidName {
            name: entry.new_name.clone(),
        });
    }
    let current = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if current == entry.new_name {
        return Outcome::Unchanged;
    }

    let name = match free_sibling_name(source, &entry.new_name, pad, namespace) {
        Ok(name) if name == current => return Outcome::Unchanged,
        Ok(name) => name,
        Err(e) => return Outcome::Failed(e),
    };
    let target = source.with_file_name(&name);
    if apply {
        if let Err(e) = fs::rename(source, &target) {
            return Outcome::Failed(RenameError::Filesystem {
                from: source.clone(),
                to: target,
                source: e,
            });
        }
    }
    namespace.record(source, &target);

    Outcome::Renamed(PlannedRename {
        from: source.clone(),
        to: target,
        kind: if metadata.is_dir() {
            RenameKind::Dir
        } else {
            RenameKind::File
        },
    })
}

/// Replay a saved plan without re-running the naming pipeline.
///
/// A malformed plan aborts before anything is renamed. Each entry is then
/// applied literally: missing sources are reported, occupied targets get a
/// counter suffix. When applying, the lock lives next to the plan file.
pub fn replay_operation(
    plan_path: &Path,
    pad: usize,
    apply: bool,
    interrupted: &AtomicBool,
) -> Result<ReplayResult> {
    let entries = read_plan(plan_path)?;
    tracing::info!(
        "replaying {} entries from {}",
        entries.len(),
        plan_path.display()
    );

    let _lock = if apply {
        let lock_root = plan_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Some(LockFile::acquire_for_root(lock_root).context("Failed to acquire lock for replay")?)
    } else {
        None
    };

    let mut namespace: Box<dyn Namespace> = if apply {
        Box::new(LiveNamespace)
    } else {
        Box::new(DryRunNamespace::new())
    };

    let mut stats = RunStats::default();
    let mut renames = Vec::new();
    let mut failures = Vec::new();
    let mut was_interrupted = false;

    for entry in &entries {
        if interrupted.load(Ordering::SeqCst) {
            was_interrupted = true;
            break;
        }
        stats.scanned += 1;
        match replay_entry(entry, pad, apply, namespace.as_mut()) {
            Outcome::Renamed(rename) => {
                stats.renamed += 1;
                renames.push(rename);
            },
            Outcome::Unchanged => stats.unchanged += 1,
            Outcome::Missing => {
                tracing::warn!("missing: {}", entry.original_path.display());
                stats.missing += 1;
                failures.push(RenameFailure {
                    path: entry.original_path.clone(),
                    error: "source not found".to_string(),
                });
            },
            Outcome::Failed(e) => {
                tracing::warn!("skipping {}: {}", entry.original_path.display(), e);
                stats.failed += 1;
                failures.push(RenameFailure {
                    path: entry.original_path.clone(),
                    error: e.to_string(),
                });
            },
        }
    }

    Ok(ReplayResult {
        plan: plan_path.to_path_buf(),
        dry_run: !apply,
        renames,
        failures,
        stats,
        interrupted: was_interrupted,
    })
}
