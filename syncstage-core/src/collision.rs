use crate::candidate::RenameCandidate;
use crate::error::RenameError;
use crate::name::with_counter_suffix;
use crate::pipeline::NamePipeline;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Highest counter tried before a candidate is given up on.
pub const MAX_COLLISION_COUNTER: u32 = 10_000;

/// Answers whether a target path is occupied by something other than `source`.
pub trait Namespace {
    fn is_taken(&self, target: &Path, source: &Path) -> bool;

    /// Note that `from` was renamed to `to`.
    fn record(&mut self, _from: &Path, _to: &Path) {}
}

/// The filesystem as it currently is.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveNamespace;

impl Namespace for LiveNamespace {
    fn is_taken(&self, target: &Path, source: &Path) -> bool {
        if target == source || fs::symlink_metadata(target).is_err() {
            return false;
        }
        !same_entry(target, source)
    }
}

/// The filesystem plus renames that a dry run would have performed.
///
/// Keeps dry-run plans identical to what an applying run would produce.
#[derive(Debug, Default)]
pub struct DryRunNamespace {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl DryRunNamespace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Namespace for DryRunNamespace {
    fn is_taken(&self, target: &Path, source: &Path) -> bool {
        if target == source {
            return false;
        }
        if self.claimed.contains(target) {
            return true;
        }
        if self.vacated.contains(target) {
            return false;
        }
        LiveNamespace.is_taken(target, source)
    }

    fn record(&mut self, from: &Path, to: &Path) {
        self.claimed.remove(from);
        self.vacated.insert(from.to_path_buf());
        self.vacated.remove(to);
        self.claimed.insert(to.to_path_buf());
    }
}

#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Find a free name for `candidate`, starting from the computed `name`.
///
/// Templates with `{counter}` are re-rendered with the counter bound to 2, 3,
/// and so on. Other templates get ` <counter>` appended to the stem of `name`.
pub fn resolve_collision(
    pipeline: &NamePipeline,
    candidate: &RenameCandidate,
    name: &str,
    namespace: &dyn Namespace,
) -> Result<String, RenameError> {
    if !namespace.is_taken(&candidate.sibling(name), &candidate.path) {
        return Ok(name.to_string());
    }

    let pad = pipeline.options().pad;
    for counter in 2..=MAX_COLLISION_COUNTER {
        let attempt = if pipeline.template().has_counter() {
            pipeline.compute(candidate, Some(counter))?
        } else {
            with_counter_suffix(name, counter, pad)
        };
        if !namespace.is_taken(&candidate.sibling(&attempt), &candidate.path) {
            tracing::debug!(
                "{} collides, using '{}'",
                candidate.path.display(),
                attempt
            );
            return Ok(attempt);
        }
    }

    Err(RenameError::CollisionOverflow {
        path: candidate.path.clone(),
        limit: MAX_COLLISION_COUNTER,
    })
}

/// Append counters to `name` until the sibling of `source` is free.
///
/// Used by plan replay, where no template is available.
pub fn free_sibling_name(
    source: &Path,
    name: &str,
    pad: usize,
    namespace: &dyn Namespace,
) -> Result<String, RenameError> {
    let target = source.with_file_name(name);
    if !namespace.is_taken(&target, source) {
        return Ok(name.to_string());
    }
    (2..=MAX_COLLISION_COUNTER)
        .map(|counter| with_counter_suffix(name, counter, pad))
        .find(|attempt| !namespace.is_taken(&source.with_file_name(attempt), source))
        .ok_or_else(|| RenameError::CollisionOverflow {
            path: source.to_path_buf(),
            limit: MAX_COLLISION_COUNTER,
        })
}
