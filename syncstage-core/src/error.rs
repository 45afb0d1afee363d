use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while computing or applying a single rename.
///
/// Plan, pattern, ignore and root errors stop the operation. Everything else is
/// scoped to one candidate: the run reports it and moves on to the next path.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("invalid date format '{format}' in template")]
    Template { format: String },

    #[error("translation failed: {0}")]
    Translation(#[from] crate::translate::TranslationError),

    #[error("rename {from} -> {to} failed: {source}")]
    Filesystem {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free name for {path} after {limit} attempts")]
    CollisionOverflow { path: PathBuf, limit: u32 },

    #[error("name '{name}' is not a usable file name")]
    InvalidName { name: String },

    #[error("plan file {path} is invalid: {reason}")]
    PlanFormat { path: PathBuf, reason: String },

    #[error("invalid substitution pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no roots configured; pass --root or set `roots` in the config file")]
    NoRoots,

    #[error("invalid ignore pattern '{pattern}': {source}")]
    IgnorePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl RenameError {
    /// Whether the error should stop the whole operation rather than one candidate.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::PlanFormat { .. }
                | Self::Pattern { .. }
                | Self::IgnorePattern { .. }
                | Self::NoRoots
        )
    }
}
