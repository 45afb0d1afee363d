use anyhow::Result;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use syncstage_core::{
    rename_operation, replay_operation, write_preview, Config, OutputFormatter, PrefixSetting,
    RenameConfig,
};

use crate::cli::{OutputFormat, RenameArgs};

fn pairs(values: &[String]) -> Vec<(String, String)> {
    values
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

/// Layer command-line options over the configured ones. Flags only ever
/// switch a setting on; `--no-skip-if-already` is the one way to turn the
/// guard off.
pub fn merge_options(args: &RenameArgs, mut options: RenameConfig) -> RenameConfig {
    if let Some(template) = &args.template {
        options.template.clone_from(template);
    }
    if let Some(pad) = args.pad {
        options.pad = pad;
    }
    options.include_dirs |= args.include_dirs;
    options.no_sanitize |= args.no_sanitize;
    options.keep_ext |= args.keep_ext;
    options.keep_symbols |= args.keep_symbols;
    options.keep_underscores |= args.keep_underscores;
    options.convert_dashes |= args.convert_dashes;
    if let Some(case) = args.case {
        options.case = case.into();
    }
    if let Some(ext_case) = args.ext_case {
        options.ext_case = ext_case.into();
    }
    if let Some(mode) = args.sanitize_mode {
        options.sanitize_mode = mode.into();
    }
    if args.no_skip_if_already {
        options.skip_if_already = false;
    } else if args.skip_if_already {
        options.skip_if_already = true;
    }
    if let Some(prefix) = &args.idempotent_prefix {
        options.idempotent_prefix = PrefixSetting::from_arg(prefix);
    }
    if let Some(mode) = &args.translate {
        options.translate = Some(mode.clone());
    }
    if let Some(provider) = args.translate_provider {
        options.translate_provider = provider.into();
    }
    if args.translate_cache.is_some() {
        options.translate_cache.clone_from(&args.translate_cache);
    }
    if !args.sub.is_empty() {
        options.sub = pairs(&args.sub);
    }
    if !args.re.is_empty() {
        options.re = pairs(&args.re);
    }
    if args.plan_out.is_some() {
        options.plan_out.clone_from(&args.plan_out);
    }
    if args.plan_in.is_some() {
        options.plan_in.clone_from(&args.plan_in);
    }
    options
}

#[allow(clippy::too_many_arguments)]
pub fn handle_rename(
    args: &RenameArgs,
    config: &Config,
    roots: Vec<PathBuf>,
    apply: bool,
    use_color: Option<bool>,
    output: OutputFormat,
    quiet: bool,
    interrupted: &AtomicBool,
) -> Result<()> {
    let options = merge_options(args, config.rename.clone());
    let show_preview = output == OutputFormat::Summary && !quiet;

    let (renames, formatted) = if let Some(plan_in) = &options.plan_in {
        let result = replay_operation(plan_in, options.pad, apply, interrupted)?;
        let formatted = result.format(output.into());
        (result.renames, formatted)
    } else {
        let roots = if roots.is_empty() {
            config.roots.clone()
        } else {
            roots
        };
        let ignore = config.ignore_set()?;
        let result = rename_operation(&roots, &ignore, &options, apply, interrupted)?;
        let formatted = result.format(output.into());
        (result.renames, formatted)
    };

    if show_preview {
        write_preview(&renames, args.preview.into(), use_color)?;
    }
    if !quiet || output == OutputFormat::Json {
        println!("{}", formatted.trim_end());
    }

    Ok(())
}
