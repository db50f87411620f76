/*!
 * Translation caching functionality.
 *
 * Re-running a batch after a partial failure re-sends the fields that already
 * succeeded. The cache answers those from memory so a retry only costs remote
 * calls for the slots that actually failed.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::localization::LanguageCode;

/// Default upper bound on cached entries
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Cache key combining source text, source language, and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source_text: String,
    source_language: LanguageCode,
    target_language: LanguageCode,
}

impl CacheKey {
    fn new(
        source_text: &str,
        source_language: &LanguageCode,
        target_language: &LanguageCode,
    ) -> Self {
        Self {
            source_text: source_text.to_string(),
            source_language: source_language.clone(),
            target_language: target_language.clone(),
        }
    }
}

/// Translation cache for storing and retrieving translations
#[derive(Debug, Clone)]
pub struct TranslationCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,

    /// Cache hit counter
    hits: Arc<AtomicUsize>,

    /// Cache miss counter
    misses: Arc<AtomicUsize>,

    /// Whether caching is enabled
    enabled: bool,

    /// Entry count at which an arbitrary entry is evicted before inserting
    max_entries: usize,
}

impl TranslationCache {
    /// Create a new translation cache
    pub fn new(enabled: bool) -> Self {
        Self::with_max_entries(enabled, DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache holding at most `max_entries` translations
    pub fn with_max_entries(enabled: bool, max_entries: usize) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            enabled,
            max_entries: max_entries.max(1),
        }
    }

    /// Get a translation from the cache
    pub fn get(
        &self,
        source_text: &str,
        source_language: &LanguageCode,
        target_language: &LanguageCode,
    ) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        match self.cache.read().get(&key) {
            Some(translation) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Cache hit for '{}' ({} -> {})",
                    truncate_text(source_text, 30),
                    source_language,
                    target_language
                );
                Some(translation.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a translation in the cache
    pub fn store(
        &self,
        source_text: &str,
        source_language: &LanguageCode,
        target_language: &LanguageCode,
        translation: &str,
    ) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        let mut cache = self.cache.write();
        if cache.len() >= self.max_entries && !cache.contains_key(&key) {
            let evicted = cache.keys().next().cloned();
            if let Some(evicted) = evicted {
                cache.remove(&evicted);
                debug!("Translation cache full ({} entries), evicted one", self.max_entries);
            }
        }
        cache.insert(key, translation.to_string());
    }

    /// Drop a stored translation, e.g. one whose markup could not be restored
    pub fn remove(
        &self,
        source_text: &str,
        source_language: &LanguageCode,
        target_language: &LanguageCode,
    ) {
        let key = CacheKey::new(source_text, source_language, target_language);
        self.cache.write().remove(&key);
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.cache.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        debug!("Translation cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
