use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use syncstage_core::TranslateMode;

use super::types::{CaseArg, ExtCaseArg, OutputFormat, PreviewArg, ProviderArg, SanitizeModeArg};

/// Rename files in synced folders from naming templates
#[derive(Parser, Debug)]
#[command(name = "syncstage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of .syncstage/config.toml
    #[arg(long, global = true, value_name = "PATH", env = "SYNCSTAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Folder to process; repeat for several roots (overrides `roots` in the config)
    #[arg(long = "root", global = true, value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Perform the renames (the default is a dry run)
    #[arg(long, global = true)]
    pub apply: bool,

    /// More log output on stderr: -v for info, -vv for debug
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Summary)]
    pub output: OutputFormat,

    /// Suppress the preview and summary
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rename files (and optionally directories) from a naming template
    Rename(RenameArgs),

    /// Show version information
    Version,
}

/// Options of the rename command; unset options fall back to the config file
#[derive(Args, Debug, Clone, Default)]
pub struct RenameArgs {
    /// Naming template, e.g. "{created:%Y-%m-%d} {stem}{ext}"
    #[arg(long)]
    pub template: Option<String>,

    /// Zero-pad width for collision counters
    #[arg(long, value_name = "N")]
    pub pad: Option<usize>,

    /// Rename directories as well as files
    #[arg(long)]
    pub include_dirs: bool,

    /// Keep characters that are unsafe in file names
    #[arg(long)]
    pub no_sanitize: bool,

    /// Append the original extension when the template has no {ext}
    #[arg(long)]
    pub keep_ext: bool,

    /// Casing of the stem
    #[arg(long, value_enum)]
    pub case: Option<CaseArg>,

    /// Casing of the extension
    #[arg(long, value_enum)]
    pub ext_case: Option<ExtCaseArg>,

    /// Keep quotes, question marks and similar symbols
    #[arg(long)]
    pub keep_symbols: bool,

    /// Keep underscores instead of turning them into spaces
    #[arg(long)]
    pub keep_underscores: bool,

    /// Turn dashes into spaces
    #[arg(long)]
    pub convert_dashes: bool,

    /// How unsafe characters are handled
    #[arg(long, value_enum)]
    pub sanitize_mode: Option<SanitizeModeArg>,

    /// Skip files that already carry their target name or prefix
    #[arg(long, overrides_with = "no_skip_if_already")]
    pub skip_if_already: bool,

    /// Rename even files that already look renamed
    #[arg(long, overrides_with = "skip_if_already")]
    pub no_skip_if_already: bool,

    /// Prefix rule for already-renamed files: true (date preset), false, or a regex
    #[arg(long, value_name = "PREFIX")]
    pub idempotent_prefix: Option<String>,

    /// Translate stems, e.g. th-en
    #[arg(long, value_name = "MODE")]
    pub translate: Option<TranslateMode>,

    /// Translation provider
    #[arg(long, value_enum)]
    pub translate_provider: Option<ProviderArg>,

    /// JSON file caching translations between runs
    #[arg(long, value_name = "PATH")]
    pub translate_cache: Option<PathBuf>,

    /// Literal substitution applied to the new name (repeatable)
    #[arg(long, num_args = 2, value_names = ["OLD", "NEW"], action = ArgAction::Append)]
    pub sub: Vec<String>,

    /// Regex substitution applied after literal ones (repeatable)
    #[arg(long = "re", num_args = 2, value_names = ["PATTERN", "REPLACEMENT"], action = ArgAction::Append)]
    pub re: Vec<String>,

    /// Write the planned renames to a CSV file
    #[arg(long, value_name = "PATH")]
    pub plan_out: Option<PathBuf>,

    /// Replay a CSV plan instead of computing names
    #[arg(long, value_name = "PATH", conflicts_with = "plan_out")]
    pub plan_in: Option<PathBuf>,

    /// Preview format
    #[arg(long, value_enum, default_value_t = PreviewArg::List)]
    pub preview: PreviewArg,
}
