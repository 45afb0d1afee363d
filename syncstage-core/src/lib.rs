#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod candidate;
pub mod collision;
pub mod config;
pub mod error;
pub mod idempotency;
pub mod lock;
pub mod name;
pub mod normalize;
pub mod operations;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod preview;
pub mod report;
pub mod sanitize;
pub mod substitute;
pub mod template;
pub mod translate;
pub mod walk;

pub use candidate::{RenameCandidate, Timestamps};
pub use collision::{resolve_collision, DryRunNamespace, LiveNamespace, Namespace};
pub use config::{Config, RenameConfig};
pub use error::RenameError;
pub use idempotency::{AlreadyNamed, IdempotencyPolicy, PrefixSetting};
pub use lock::LockFile;
pub use name::split_name_ext;
pub use normalize::{normalize_stem, CaseMode, ExtCase, NormalizeOptions};
pub use operations::{rename_operation, replay_operation};
pub use output::{OutputFormat, OutputFormatter, RenameResult, ReplayResult, VersionResult};
pub use pipeline::{NamePipeline, NamingOptions};
pub use plan::{read_plan, write_plan, PlanEntry};
pub use preview::{render_renames, write_preview, Preview};
pub use report::{PlannedRename, RenameFailure, RenameKind, RunStats};
pub use sanitize::{sanitize_filename, SanitizeMode};
pub use substitute::Substitutions;
pub use template::Template;
pub use translate::{Provider, TranslateMode, Translation, Translator};
pub use walk::{enumerate, IgnoreSet};
