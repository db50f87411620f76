/*!
 * Remote translators.
 *
 * This module contains the `Translator` seam and its client implementations:
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: Scriptable in-process translator for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::localization::LanguageCode;

/// Instruction appended to every LLM prompt so markup placeholders survive
pub const PLACEHOLDER_INSTRUCTION: &str = "Tokens of the form __TAG_0__, __TAG_1__ and so on are markup placeholders: copy each one unchanged and keep them in the same order. Reply with the translated text only.";

/// Common trait for all remote translators
///
/// This trait defines the single remote call the localization engine depends
/// on, allowing clients to be used interchangeably by the translation service.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` from `source` into `target`
    ///
    /// # Arguments
    /// * `text` - Plain text, possibly containing `__TAG_n__` placeholders
    /// * `target` - Language to translate into
    /// * `source` - Language the text is written in
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, ProviderError>;

    /// Short provider name used in logs
    fn name(&self) -> &str;
}

/// Fill the `{source_language}` and `{target_language}` placeholders of a system prompt
pub fn render_system_prompt(
    template: &str,
    source: &LanguageCode,
    target: &LanguageCode,
) -> String {
    let prompt = template
        .replace("{source_language}", &source.display_name())
        .replace("{target_language}", &target.display_name());
    format!("{} {}", prompt, PLACEHOLDER_INSTRUCTION)
}

pub mod anthropic;
pub mod http;
pub mod mock;
pub mod ollama;
