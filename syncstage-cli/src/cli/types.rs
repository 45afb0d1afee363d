use clap::ValueEnum;
use syncstage_core::{CaseMode, ExtCase, Preview, Provider, SanitizeMode};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CaseArg {
    Keep,
    Lower,
    Upper,
    Title,
    /// Title case that keeps acronyms and lowercases minor words
    Smart,
}

impl From<CaseArg> for CaseMode {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::Keep => Self::Keep,
            CaseArg::Lower => Self::Lower,
            CaseArg::Upper => Self::Upper,
            CaseArg::Title => Self::Title,
            CaseArg::Smart => Self::Smart,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ExtCaseArg {
    Keep,
    Lower,
    Upper,
}

impl From<ExtCaseArg> for ExtCase {
    fn from(arg: ExtCaseArg) -> Self {
        match arg {
            ExtCaseArg::Keep => Self::Keep,
            ExtCaseArg::Lower => Self::Lower,
            ExtCaseArg::Upper => Self::Upper,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SanitizeModeArg {
    /// Delete unsafe characters
    Drop,
    /// Replace each unsafe character with `_`
    Underscore,
}

impl From<SanitizeModeArg> for SanitizeMode {
    fn from(arg: SanitizeModeArg) -> Self {
        match arg {
            SanitizeModeArg::Drop => Self::Drop,
            SanitizeModeArg::Underscore => Self::Underscore,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ProviderArg {
    Googletrans,
    Gcloud,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Googletrans => Self::Googletrans,
            ProviderArg::Gcloud => Self::Gcloud,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum PreviewArg {
    Table,
    #[default]
    List,
    None,
}

impl From<PreviewArg> for Preview {
    fn from(arg: PreviewArg) -> Self {
        match arg {
            PreviewArg::Table => Self::Table,
            PreviewArg::List => Self::List,
            PreviewArg::None => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

impl From<OutputFormat> for syncstage_core::OutputFormat {
    fn from(arg: OutputFormat) -> Self {
        match arg {
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}
