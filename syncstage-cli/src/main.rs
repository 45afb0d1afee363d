use anyhow::Result;
use clap::Parser;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use syncstage_core::{Config, OutputFormatter, RenameError, VersionResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod rename;

use cli::{Cli, Commands, OutputFormat};

/// Environment variable holding a tracing filter that overrides `-v`.
const LOG_ENV: &str = "SYNCSTAGE_LOG";

fn main() {
    // Set up signal handler for graceful shutdown (both SIGINT and SIGTERM)
    let interrupted = Arc::new(AtomicBool::new(false));

    let interrupted_clone = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nReceived SIGINT. Finishing the current item...");
        interrupted_clone.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Error: failed to set SIGINT handler: {e}");
        process::exit(3);
    }

    let interrupted_clone = Arc::clone(&interrupted);
    // SAFETY: the handler only stores to an atomic and writes to stderr.
    let registered = unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGTERM, move || {
            eprintln!("\nReceived SIGTERM. Finishing the current item...");
            interrupted_clone.store(true, Ordering::SeqCst);
        })
    };
    if let Err(e) = registered {
        eprintln!("Error: failed to set SIGTERM handler: {e}");
        process::exit(3);
    }

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        },
    };
    tracing::debug!("loaded config with {} configured roots", config.roots.len());
    let use_color = if cli.no_color {
        Some(false)
    } else {
        config.use_color
    };

    let result = match &cli.command {
        Commands::Rename(args) => rename::handle_rename(
            args,
            &config,
            cli.roots.clone(),
            cli.apply,
            use_color,
            cli.output,
            cli.quiet,
            &interrupted,
        ),
        Commands::Version => handle_version(cli.output),
    };

    // Drop guards have run by now, so the lock is already released
    if interrupted.load(Ordering::SeqCst) {
        eprintln!("Operation interrupted");
        process::exit(130);
    }

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code(&e));
        },
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// 2 for unusable input (bad plan, bad pattern, no roots), 3 for anything else.
fn exit_code(error: &anyhow::Error) -> i32 {
    let structural = error
        .downcast_ref::<RenameError>()
        .is_some_and(RenameError::is_structural);
    if structural {
        2
    } else {
        3
    }
}

fn setup_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .with(filter)
        .init();
}

fn handle_version(output: OutputFormat) -> Result<()> {
    let version_result = VersionResult {
        name: "syncstage".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("{}", version_result.format(output.into()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rename_with_pairs() {
        let cli = Cli::try_parse_from([
            "syncstage",
            "rename",
            "--root",
            "/a",
            "--root",
            "/b",
            "--sub",
            "IMG",
            "Photo",
            "--re",
            r"\s+",
            " ",
            "--apply",
        ])
        .unwrap();

        assert_eq!(cli.roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(cli.apply);
        let Commands::Rename(args) = cli.command else {
            panic!("expected rename");
        };
        assert_eq!(args.sub, vec!["IMG", "Photo"]);
        assert_eq!(args.re, vec![r"\s+", " "]);
    }

    #[test]
    fn test_translate_mode_is_validated() {
        let ok = Cli::try_parse_from(["syncstage", "rename", "--translate", "th-en"]);
        assert!(ok.is_ok());
        let bad = Cli::try_parse_from(["syncstage", "rename", "--translate", "thai"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_plan_in_conflicts_with_plan_out() {
        let result = Cli::try_parse_from([
            "syncstage",
            "rename",
            "--plan-in",
            "a.csv",
            "--plan-out",
            "b.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_exit_codes() {
        let structural: anyhow::Error = RenameError::NoRoots.into();
        assert_eq!(exit_code(&structural), 2);

        let other = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code(&other), 3);
    }
}
