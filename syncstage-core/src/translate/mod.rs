//! Optional translation of file stems.
//!
//! The naming pipeline only sees the [`Translator`] trait. Providers talk to a
//! remote service; [`RetryingTranslator`] and [`CachedTranslator`] wrap any
//! translator with bounded retries and a persistent JSON cache.

pub mod cache;
pub mod google;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::thread;
use std::time::Duration;
use thiserror::Error;

pub use cache::{cache_key, CachedTranslator, TranslationCache};

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation provider '{provider}' is unavailable: {reason}")]
    Unavailable { provider: String, reason: String },

    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected translation response: {0}")]
    InvalidResponse(String),

    #[error("invalid translation mode '{0}', expected <from>-<to> such as th-en")]
    InvalidMode(String),
}

/// Converts text from one language to another.
pub trait Translator {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError>;
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        (**self).translate(text, from, to)
    }
}

/// Returns its input unchanged; used when translation is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTranslator;

impl Translator for NoopTranslator {
    fn translate(&self, text: &str, _from: &str, _to: &str) -> Result<String, TranslationError> {
        Ok(text.to_string())
    }
}

/// Source and target language, written `th-en` on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TranslateMode {
    pub from: String,
    pub to: String,
}

impl FromStr for TranslateMode {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((from, to)) if !from.is_empty() && !to.is_empty() => {
                Ok(Self {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            },
            _ => Err(TranslationError::InvalidMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for TranslateMode {
    type Error = TranslationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TranslateMode> for String {
    fn from(mode: TranslateMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for TranslateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Googletrans,
    Gcloud,
}

impl Provider {
    pub fn id(self) -> &'static str {
        match self {
            Self::Googletrans => "googletrans",
            Self::Gcloud => "gcloud",
        }
    }
}

/// Retries a translator a fixed number of times with linearly growing delays.
pub struct RetryingTranslator<T> {
    inner: T,
    attempts: u32,
    delay: Duration,
}

impl<T: Translator> RetryingTranslator<T> {
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

    pub fn new(inner: T) -> Self {
        Self::with_policy(inner, Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }

    pub fn with_policy(inner: T, attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl<T: Translator> Translator for RetryingTranslator<T> {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        let mut attempt = 1;
        loop {
            match self.inner.translate(text, from, to) {
                Ok(out) => return Ok(out),
                Err(e) if attempt >= self.attempts => return Err(e),
                Err(e) => {
                    tracing::debug!("translation attempt {} failed: {}", attempt, e);
                    thread::sleep(self.delay * attempt);
                    attempt += 1;
                },
            }
        }
    }
}

/// A translator bound to a language pair, as used by the naming pipeline.
pub struct Translation {
    translator: Box<dyn Translator>,
    mode: Option<TranslateMode>,
}

impl Translation {
    pub fn new(translator: Box<dyn Translator>, mode: TranslateMode) -> Self {
        Self {
            translator,
            mode: Some(mode),
        }
    }

    pub fn disabled() -> Self {
        Self {
            translator: Box::new(NoopTranslator),
            mode: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mode.is_some()
    }

    pub fn translate(&self, text: &str) -> Result<String, TranslationError> {
        match &self.mode {
            Some(mode) => self.translator.translate(text, &mode.from, &mode.to),
            None => Ok(text.to_string()),
        }
    }
}

impl Default for Translation {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Build the cached, retrying translator for `provider`.
pub fn build_translator(
    provider: Provider,
    cache_path: Option<&Path>,
) -> Result<Box<dyn Translator>, TranslationError> {
    let translator: Box<dyn Translator> = match provider {
        Provider::Googletrans => Box::new(CachedTranslator::new(
            provider.id(),
            RetryingTranslator::new(google::GoogleTransTranslator::new()?),
            cache_path,
        )),
        Provider::Gcloud => Box::new(CachedTranslator::new(
            provider.id(),
            RetryingTranslator::new(google::GCloudTranslator::from_env()?),
            cache_path,
        )),
    };
    Ok(translator)
}
