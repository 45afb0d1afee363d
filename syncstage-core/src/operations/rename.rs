use crate::candidate::RenameCandidate;
use crate::collision::{resolve_collision, DryRunNamespace, LiveNamespace, Namespace};
use crate::config::RenameConfig;
use crate::error::RenameError;
use crate::idempotency::IdempotencyPolicy;
use crate::lock::LockFile;
use crate::output::RenameResult;
use crate::pipeline::NamePipeline;
use crate::plan::{write_plan, PlanEntry};
use crate::report::{PlannedRename, RenameFailure, RenameKind, RunStats};
use crate::translate::{build_translator, Translation};
use crate::walk::{enumerate, IgnoreSet};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Everything a rename run needs besides the roots.
pub struct RenameSession {
    pipeline: NamePipeline,
    policy: IdempotencyPolicy,
    apply: bool,
    namespace: Box<dyn Namespace>,
    renames: Vec<PlannedRename>,
    failures: Vec<RenameFailure>,
}

impl RenameSession {
    /// Build the naming pipeline from merged options.
    ///
    /// Invalid substitution patterns are structural errors. A translation
    /// provider that cannot be set up only disables translation.
    pub fn new(options: &RenameConfig, apply: bool) -> Result<Self, RenameError> {
        let pipeline = NamePipeline::new(options.template(), options.naming_options())
            .with_substitutions(options.substitutions()?)
            .with_translation(build_translation(options));
        let namespace: Box<dyn Namespace> = if apply {
            Box::new(LiveNamespace)
        } else {
            Box::new(DryRunNamespace::new())
        };
        Ok(Self {
            pipeline,
            policy: options.idempotency(),
            apply,
            namespace,
            renames: Vec::new(),
            failures: Vec::new(),
        })
    }

    fn fail(&mut self, stats: &mut RunStats, path: &Path, error: &RenameError) {
        stats.failed += 1;
        self.failures.push(RenameFailure {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    /// Run the pipeline for one candidate and record the outcome in `stats`.
    pub fn process(&mut self, candidate: &RenameCandidate, stats: &mut RunStats) {
        stats.scanned += 1;
        let current = candidate.file_name();

        let computed = match self.pipeline.compute(candidate, None) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("skipping {}: {}", candidate.path.display(), e);
                self.fail(stats, &candidate.path, &e);
                return;
            },
        };

        if let Some(reason) = self.policy.check(&current, &computed) {
            tracing::debug!(
                "{} already named ({:?}), computed '{}'",
                candidate.path.display(),
                reason,
                computed
            );
            stats.already_named += 1;
            return;
        }

        let name = if computed == current {
            computed
        } else {
            match resolve_collision(&self.pipeline, candidate, &computed, self.namespace.as_ref())
            {
                Ok(name) => name,
                Err(e) => {
                    if matches!(e, RenameError::CollisionOverflow { .. }) {
                        tracing::error!("{}", e);
                    } else {
                        tracing::warn!("skipping {}: {}", candidate.path.display(), e);
                    }
                    self.fail(stats, &candidate.path, &e);
                    return;
                },
            }
        };
        if name == current {
            stats.unchanged += 1;
            return;
        }

        let target = candidate.sibling(&name);
        if self.apply {
            if let Err(source) = fs::rename(&candidate.path, &target) {
                let e = RenameError::Filesystem {
                    from: candidate.path.clone(),
                    to: target,
                    source,
                };
                tracing::warn!("{}", e);
                self.fail(stats, &candidate.path, &e);
                return;
            }
        }
        self.namespace.record(&candidate.path, &target);

        tracing::debug!("rename: {}  ->  {}", current, name);
        stats.renamed += 1;
        self.renames.push(PlannedRename {
            from: candidate.path.clone(),
            to: target,
            kind: if candidate.is_dir {
                RenameKind::Dir
            } else {
                RenameKind::File
            },
        });
    }

    pub fn renames(&self) -> &[PlannedRename] {
        &self.renames
    }

    /// Plan entries for every accepted rename so far.
    pub fn plan_entries(&self) -> Vec<PlanEntry> {
        self.renames
            .iter()
            .map(|r| PlanEntry::new(&r.from, r.new_name()))
            .collect()
    }
}

fn build_translation(options: &RenameConfig) -> Translation {
    let Some(mode) = options.translate.clone() else {
        return Translation::disabled();
    };
    match build_translator(options.translate_provider, options.translate_cache.as_deref()) {
        Ok(translator) => Translation::new(translator, mode),
        Err(e) => {
            tracing::warn!("translation disabled: {}", e);
            Translation::disabled()
        },
    }
}

/// Rename operation - returns structured data
///
/// Walks each root in order. When `apply` is false nothing is renamed, but
/// the returned renames are exactly what an applying run would do.
pub fn rename_operation(
    roots: &[PathBuf],
    ignore: &IgnoreSet,
    options: &RenameConfig,
    apply: bool,
    interrupted: &AtomicBool,
) -> Result<RenameResult> {
    if roots.is_empty() {
        return Err(RenameError::NoRoots.into());
    }

    let mut session = RenameSession::new(options, apply)?;
    let mut stats = RunStats::default();
    let mut was_interrupted = false;

    'roots: for root in roots {
        if !root.is_dir() {
            tracing::warn!("root {} is not a directory, skipping", root.display());
            session.failures.push(RenameFailure {
                path: root.clone(),
                error: "not a directory".to_string(),
            });
            stats.failed += 1;
            continue;
        }

        let _lock = if apply {
            Some(
                LockFile::acquire_for_root(root)
                    .with_context(|| format!("Failed to lock {}", root.display()))?,
            )
        } else {
            None
        };

        tracing::info!("processing root {}", root.display());
        let mut root_stats = RunStats::default();
        for candidate in enumerate(root, ignore, options.include_dirs) {
            if interrupted.load(Ordering::SeqCst) {
                was_interrupted = true;
                stats += root_stats;
                break 'roots;
            }
            session.process(&candidate, &mut root_stats);
        }
        tracing::info!(
            "{}: {} renamed, {} already named, {} failed",
            root.display(),
            root_stats.renamed,
            root_stats.already_named,
            root_stats.failed
        );
        stats += root_stats;
    }

    if let Some(plan_out) = &options.plan_out {
        write_plan(plan_out, &session.plan_entries())
            .with_context(|| format!("Failed to write plan {}", plan_out.display()))?;
        tracing::info!("plan written to {}", plan_out.display());
    }

    Ok(RenameResult {
        roots: roots.to_vec(),
        dry_run: !apply,
        renames: session.renames,
        failures: session.failures,
        stats,
        plan_out: options.plan_out.clone(),
        interrupted: was_interrupted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Timestamps;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn candidate(path: PathBuf) -> RenameCandidate {
        let t = Local.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
        RenameCandidate::new(
            path,
            Timestamps {
                created: t,
                modified: t,
            },
            false,
        )
    }

    struct Occupied;

    impl Namespace for Occupied {
        fn is_taken(&self, _target: &Path, _source: &Path) -> bool {
            true
        }
    }

    #[test]
    fn test_collision_overflow_fails_only_that_candidate() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a_b.txt");
        let second = dir.path().join("c_d.txt");
        fs::write(&first, "a").unwrap();
        fs::write(&second, "c").unwrap();

        let options = RenameConfig {
            template: "{stem}{ext}".to_string(),
            ..RenameConfig::default()
        };
        let mut session = RenameSession::new(&options, true).unwrap();
        session.namespace = Box::new(Occupied);
        let mut stats = RunStats::default();
        session.process(&candidate(first.clone()), &mut stats);
        session.process(&candidate(second.clone()), &mut stats);

        assert_eq!(stats.scanned, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.renamed, 0);
        assert!(session.renames().is_empty());
        assert!(session.failures[0].error.contains("10000"));
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_session_dry_run_leaves_files() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("scan_01.pdf");
        fs::write(&src, "x").unwrap();

        let mut session = RenameSession::new(&RenameConfig::default(), false).unwrap();
        let mut stats = RunStats::default();
        session.process(&candidate(src.clone()), &mut stats);

        assert!(src.exists());
        assert_eq!(stats.renamed, 1);
        assert_eq!(session.renames()[0].new_name(), "2024-03-05 Scan 01.pdf");
    }

    #[test]
    fn test_session_skips_bad_template() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "x").unwrap();

        let options = RenameConfig {
            template: "{created:%Q} {stem}{ext}".to_string(),
            ..RenameConfig::default()
        };
        let mut session = RenameSession::new(&options, true).unwrap();
        let mut stats = RunStats::default();
        session.process(&candidate(src.clone()), &mut stats);

        assert!(src.exists());
        assert_eq!(stats.failed, 1);
        assert!(session.renames().is_empty());
    }

    #[test]
    fn test_dry_run_claims_prevent_duplicate_targets() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("report.txt");
        let b = dir.path().join("report_.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        // Both stems normalize to "Report"
        let options = RenameConfig {
            template: "{stem}{ext}".to_string(),
            ..RenameConfig::default()
        };
        let mut session = RenameSession::new(&options, false).unwrap();
        let mut stats = RunStats::default();
        session.process(&candidate(b), &mut stats);
        session.process(&candidate(a), &mut stats);

        let names: Vec<_> = session.renames().iter().map(PlannedRename::new_name).collect();
        assert_eq!(names, vec!["Report.txt", "Report 02.txt"]);
    }

    #[test]
    fn test_invalid_substitution_is_structural() {
        let options = RenameConfig {
            re: vec![("(".to_string(), "x".to_string())],
            ..RenameConfig::default()
        };
        let err = RenameSession::new(&options, false).err().unwrap();
        assert!(err.is_structural());
    }

    #[test]
    fn test_no_roots_is_an_error() {
        let flag = AtomicBool::new(false);
        let ignore = IgnoreSet::defaults().unwrap();
        assert!(rename_operation(&[], &ignore, &RenameConfig::default(), false, &flag).is_err());
    }

    #[test]
    fn test_interrupt_stops_before_first_candidate() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let flag = AtomicBool::new(true);
        let ignore = IgnoreSet::defaults().unwrap();

        let result = rename_operation(
            &[dir.path().to_path_buf()],
            &ignore,
            &RenameConfig::default(),
            true,
            &flag,
        )
        .unwrap();
        assert!(result.interrupted);
        assert!(result.renames.is_empty());
        assert!(dir.path().join("a.txt").exists());
    }
}
