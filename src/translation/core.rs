/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct and its implementation,
 * which turns one source string into one target string through a remote
 * translator. Rich-text fields go through markup protection first.
 */

use anyhow::Result;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::localization::LanguageCode;
use crate::providers::Translator;
use crate::providers::anthropic::Anthropic;
use crate::providers::http::RetryPolicy;
use crate::providers::ollama::Ollama;

use super::cache::TranslationCache;
use super::formatting::MarkupPreserver;

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Maximum number of concurrent requests in one batch
    pub max_concurrent_requests: usize,

    /// Upper bound for one task, provider retries included
    pub task_timeout: Duration,

    /// Whether identical source text is answered from the cache
    pub cache_enabled: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 8,
            task_timeout: Duration::from_secs(30),
            cache_enabled: true,
        }
    }
}

impl TranslationOptions {
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            max_concurrent_requests: config.optimal_concurrent_requests().max(1),
            task_timeout: Duration::from_secs(config.common.task_timeout_secs),
            cache_enabled: config.common.cache_enabled,
        }
    }
}

/// Main translation service for localized content
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Remote translator
    translator: Arc<dyn Translator>,

    /// Translation options
    pub options: TranslationOptions,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Create a service around an existing translator
    pub fn new(translator: Arc<dyn Translator>, options: TranslationOptions) -> Self {
        Self {
            cache: TranslationCache::new(options.cache_enabled),
            translator,
            options,
        }
    }

    /// Create a new translation service with the given configuration
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let retry = RetryPolicy::new(config.common.retry_count, config.common.retry_backoff_ms);
        let translator: Arc<dyn Translator> = match config.provider {
            ConfigTranslationProvider::Ollama => Arc::new(Ollama::new_with_config(
                &config.get_endpoint(),
                config.get_model(),
                &config.common.system_prompt,
                config.common.temperature,
                config.get_timeout_secs(),
                retry,
            )?),
            ConfigTranslationProvider::Anthropic => Arc::new(Anthropic::new_with_config(
                config.get_api_key(),
                config.get_endpoint(),
                config.get_model(),
                &config.common.system_prompt,
                config.common.temperature,
                config.get_timeout_secs(),
                retry,
            )),
        };

        debug!(
            "Using {} translator with model {}",
            config.provider.display_name(),
            config.get_model()
        );

        Ok(Self::new(translator, TranslationOptions::from_config(config)))
    }

    pub fn provider_name(&self) -> &str {
        self.translator.name()
    }

    /// Translate plain text.
    ///
    /// Whitespace-only input yields an empty string without a remote call.
    pub async fn translate_text(
        &self,
        text: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        if let Some(cached) = self.cache.get(text, source, target) {
            return Ok(cached);
        }

        let translated = self.translator.translate(text, target, source).await?;
        self.cache.store(text, source, target, &translated);
        Ok(translated)
    }

    /// Translate rich text while keeping its tag sequence intact.
    ///
    /// Tags become `__TAG_n__` placeholders for the single remote call and are
    /// restored afterwards. Markup that is only tags and whitespace comes back
    /// unchanged.
    pub async fn translate_markup(
        &self,
        markup: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, TranslationError> {
        let protected = MarkupPreserver::protect(markup);
        if protected.tag_count() == 0 {
            return self.translate_text(markup, target, source).await;
        }

        if protected.is_text_blank() {
            return Ok(markup.to_string());
        }

        // Cached under the placeholder text, so the count check runs on every hit
        let translated = self.translate_text(&protected.text, target, source).await?;
        match protected.restore(&translated) {
            Ok(restored) => Ok(restored),
            Err(e) => {
                self.cache.remove(&protected.text, source, target);
                Err(e)
            }
        }
    }
}
