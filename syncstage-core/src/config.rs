use crate::error::RenameError;
use crate::idempotency::{IdempotencyPolicy, PrefixSetting};
use crate::normalize::{CaseMode, ExtCase, NormalizeOptions};
use crate::pipeline::NamingOptions;
use crate::sanitize::SanitizeMode;
use crate::substitute::Substitutions;
use crate::template::{Template, DEFAULT_TEMPLATE};
use crate::translate::{Provider, TranslateMode};
use crate::walk::{IgnoreSet, DEFAULT_IGNORE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".syncstage";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Folders processed when no `--root` is given
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Ignore globs; replaces the built-in list when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_color: Option<bool>,

    #[serde(default)]
    pub rename: RenameConfig,
}

/// Options of the rename command, after defaults and config are applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenameConfig {
    pub template: String,
    pub pad: usize,
    pub include_dirs: bool,
    pub no_sanitize: bool,
    pub keep_ext: bool,
    pub case: CaseMode,
    pub ext_case: ExtCase,
    pub keep_symbols: bool,
    pub keep_underscores: bool,
    pub convert_dashes: bool,
    pub sanitize_mode: SanitizeMode,
    pub skip_if_already: bool,
    pub idempotent_prefix: PrefixSetting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<TranslateMode>,
    pub translate_provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_cache: Option<PathBuf>,
    /// Literal `[old, new]` pairs
    pub sub: Vec<(String, String)>,
    /// Regex `[pattern, replacement]` pairs
    pub re: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_out: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_in: Option<PathBuf>,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            pad: 2,
            include_dirs: false,
            no_sanitize: false,
            keep_ext: false,
            case: CaseMode::Smart,
            ext_case: ExtCase::Keep,
            keep_symbols: false,
            keep_underscores: false,
            convert_dashes: false,
            sanitize_mode: SanitizeMode::Drop,
            skip_if_already: true,
            idempotent_prefix: PrefixSetting::default(),
            translate: None,
            translate_provider: Provider::Googletrans,
            translate_cache: None,
            sub: Vec::new(),
            re: Vec::new(),
            plan_out: None,
            plan_in: None,
        }
    }
}

impl RenameConfig {
    pub fn template(&self) -> Template {
        Template::parse(&self.template)
    }

    pub fn naming_options(&self) -> NamingOptions {
        NamingOptions {
            normalize: NormalizeOptions {
                case_mode: self.case,
                drop_symbols: !self.keep_symbols,
                convert_underscores: !self.keep_underscores,
                convert_dashes: self.convert_dashes,
            },
            ext_case: self.ext_case,
            sanitize: !self.no_sanitize,
            sanitize_mode: self.sanitize_mode,
            keep_ext: self.keep_ext,
            pad: self.pad,
        }
    }

    pub fn idempotency(&self) -> IdempotencyPolicy {
        IdempotencyPolicy::new(self.skip_if_already, &self.idempotent_prefix)
    }

    pub fn substitutions(&self) -> Result<Substitutions, RenameError> {
        Substitutions::new(self.sub.clone(), &self.re)
    }
}

impl Config {
    /// Path of the config file looked up in `dir`.
    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load config from .syncstage/config.toml if it exists
    pub fn load() -> Result<Self> {
        if let Ok(cwd) = std::env::current_dir() {
            let config_path = Self::default_path(&cwd);
            if config_path.exists() {
                return Self::load_from_path(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The configured ignore globs, or the built-in list.
    pub fn ignore_set(&self) -> Result<IgnoreSet, RenameError> {
        match &self.ignore {
            Some(patterns) => IgnoreSet::new(patterns.as_slice()),
            None => IgnoreSet::new(DEFAULT_IGNORE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.roots.is_empty());
        assert_eq!(config.ignore, None);
        assert_eq!(config.rename.template, DEFAULT_TEMPLATE);
        assert_eq!(config.rename.pad, 2);
        assert!(config.rename.skip_if_already);
        assert_eq!(config.rename.case, CaseMode::Smart);
        assert_eq!(config.rename.idempotent_prefix, PrefixSetting::Flag(false));
    }

    #[test]
    fn test_load_save_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Config::default_path(temp_dir.path());

        let mut config = Config::default();
        config.roots = vec![PathBuf::from("/data/OneDrive")];
        config.rename.case = CaseMode::Lower;
        config.rename.translate = Some("th-en".parse().unwrap());
        config.rename.sub = vec![("Scan".to_string(), "Doc".to_string())];
        config.rename.idempotent_prefix = PrefixSetting::Pattern(r"^IMG\d+".to_string());

        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config() {
        let toml_content = r#"
roots = ["/data"]
ignore = ["*.bak"]

[rename]
template = "{modified:%Y%m%d}_{stem}{ext}"
idempotent_prefix = true
ext_case = "lower"
sub = [["Scan", "Doc"]]
re = [['(\d+)x', 'No $1']]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.roots, vec![PathBuf::from("/data")]);
        assert_eq!(config.ignore, Some(vec!["*.bak".to_string()]));
        assert_eq!(config.rename.idempotent_prefix, PrefixSetting::Flag(true));
        assert_eq!(config.rename.ext_case, ExtCase::Lower);
        assert_eq!(config.rename.re[0].1, "No $1");
        // Other fields keep their defaults
        assert_eq!(config.rename.pad, 2);
        assert!(config.rename.skip_if_already);
        assert!(config.rename.substitutions().is_ok());
    }

    #[test]
    fn test_prefix_accepts_regex_string() {
        let config: Config = toml::from_str("[rename]\nidempotent_prefix = '^\\d{6}'\n").unwrap();
        assert_eq!(
            config.rename.idempotent_prefix,
            PrefixSetting::Pattern(r"^\d{6}".to_string())
        );
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[rename]\ntranslate = \"thai\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load_from_path(&temp_dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_naming_options_from_flags() {
        let rename = RenameConfig {
            keep_symbols: true,
            no_sanitize: true,
            pad: 3,
            ..RenameConfig::default()
        };
        let options = rename.naming_options();
        assert!(!options.normalize.drop_symbols);
        assert!(options.normalize.convert_underscores);
        assert!(!options.sanitize);
        assert_eq!(options.pad, 3);
    }
}
