/*!
 * Mock translator for testing.
 *
 * This module provides a scriptable translator that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds, tagging text with the target language
 * - `MockTranslator::failing()` - Always fails with an API error
 * - `fail_for` / `respond_with` - Per-language failures and fixed answers
 * - `with_delay` / `delay_for` - Slow responses, for timeout and cancellation tests
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::localization::LanguageCode;

use super::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[target] text`
    Working,
    /// Always fails with an error
    Failing,
    /// Succeeds but drops the first markup placeholder
    DropPlaceholders,
    /// Returns the input unchanged
    Echo,
}

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub text: String,
    pub target: LanguageCode,
    pub source: LanguageCode,
}

/// Mock translator for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Languages that always fail, with the error to return
    failing_languages: HashMap<LanguageCode, ProviderError>,
    /// Fixed answers per target language
    fixed_responses: HashMap<LanguageCode, String>,
    /// Simulated latency
    delay: Option<Duration>,
    /// Simulated latency for single target languages, overriding `delay`
    language_delays: HashMap<LanguageCode, Duration>,
    /// Request counter, shared between clones
    call_count: Arc<AtomicUsize>,
    /// Recorded calls, shared between clones
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failing_languages: HashMap::new(),
            fixed_responses: HashMap::new(),
            delay: None,
            language_delays: HashMap::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Make every call targeting `language` fail with `error`
    pub fn fail_for(mut self, language: &str, error: ProviderError) -> Self {
        if let Ok(code) = LanguageCode::new(language) {
            self.failing_languages.insert(code, error);
        }
        self
    }

    /// Answer every call targeting `language` with `response`
    pub fn respond_with(mut self, language: &str, response: &str) -> Self {
        if let Ok(code) = LanguageCode::new(language) {
            self.fixed_responses.insert(code, response.to_string());
        }
        self
    }

    /// Delay every response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay only the responses targeting `language`
    pub fn delay_for(mut self, language: &str, delay: Duration) -> Self {
        if let Ok(code) = LanguageCode::new(language) {
            self.language_delays.insert(code, delay);
        }
        self
    }

    /// Number of translate calls received so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Calls received so far, in arrival order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(MockCall {
            text: text.to_string(),
            target: target.clone(),
            source: source.clone(),
        });

        if let Some(delay) = self.language_delays.get(target).copied().or(self.delay) {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failing_languages.get(target) {
            return Err(error.clone());
        }

        if let Some(response) = self.fixed_responses.get(target) {
            return Ok(response.clone());
        }

        match self.behavior {
            MockBehavior::Working => Ok(format!("[{}] {}", target, text)),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),
            MockBehavior::DropPlaceholders => Ok(text.replacen("__TAG_0__", "", 1)),
            MockBehavior::Echo => Ok(text.to_string()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
