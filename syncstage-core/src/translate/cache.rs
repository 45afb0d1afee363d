use super::{TranslationError, Translator};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which a translation is cached: `provider:from->to:text`.
pub fn cache_key(provider: &str, from: &str, to: &str, text: &str) -> String {
    format!("{provider}:{from}->{to}:{text}")
}

/// Persistent translation cache stored as a JSON object.
#[derive(Debug, Default)]
pub struct TranslationCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl TranslationCache {
    /// Load the cache. Missing or unreadable files yield an empty cache.
    pub fn load(path: Option<&Path>) -> Self {
        let entries = path
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| match serde_json::from_str(&content) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    tracing::warn!("ignoring corrupt translation cache: {}", e);
                    None
                },
            })
            .unwrap_or_default();
        Self {
            path: path.map(Path::to_path_buf),
            entries,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache back to disk. Failures are logged, never returned.
    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let result = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| {
                let content = serde_json::to_string_pretty(&self.entries)
                    .map_err(std::io::Error::other)?;
                fs::write(path, content)
            });
        if let Err(e) = result {
            tracing::warn!("failed to save translation cache {}: {}", path.display(), e);
        }
    }
}

/// Serves translations from a [`TranslationCache`] before calling `inner`.
pub struct CachedTranslator<T> {
    provider: String,
    inner: T,
    cache: RefCell<TranslationCache>,
}

impl<T: Translator> CachedTranslator<T> {
    pub fn new(provider: &str, inner: T, cache_path: Option<&Path>) -> Self {
        Self {
            provider: provider.to_string(),
            inner,
            cache: RefCell::new(TranslationCache::load(cache_path)),
        }
    }
}

impl<T: Translator> Translator for CachedTranslator<T> {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let key = cache_key(&self.provider, from, to, text);
        if let Some(hit) = self.cache.borrow().get(&key) {
            return Ok(hit.to_string());
        }

        let translated = self.inner.translate(text, from, to)?;
        let mut cache = self.cache.borrow_mut();
        cache.insert(key, translated.clone());
        cache.save();
        Ok(translated)
    }
}
