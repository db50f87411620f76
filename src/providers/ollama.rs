use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;
use crate::localization::LanguageCode;

use super::http::{self, RetryPolicy};
use super::{Translator, render_system_prompt};

/// Ollama client translating through a local LLM
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model name to use for generation
    model: String,
    /// System prompt template with language placeholders
    system_prompt: String,
    /// Temperature for generation
    temperature: f32,
    /// Retry behaviour for failed requests
    retry: RetryPolicy,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    /// Generated text
    pub response: String,
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: false,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

/// Normalize an endpoint such as `localhost:11434` into a base URL
pub fn parse_base_url(endpoint: &str) -> Result<String, ProviderError> {
    if endpoint.trim().is_empty() {
        return Err(ProviderError::ConnectionError("Endpoint cannot be empty".to_string()));
    }

    let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };

    let url = Url::parse(&with_scheme).map_err(|e| {
        ProviderError::ConnectionError(format!("Invalid endpoint '{}': {}", endpoint, e))
    })?;

    Ok(url.as_str().trim_end_matches('/').to_string())
}

impl Ollama {
    /// Create a new Ollama client with configuration
    pub fn new_with_config(
        endpoint: &str,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: parse_base_url(endpoint)?,
            client: http::build_client(timeout_secs),
            model: model.into(),
            system_prompt: system_prompt.into(),
            temperature,
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text from the Ollama API with retry logic
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        http::send_json("Ollama", self.retry, || self.client.post(&url).json(&request)).await
    }
}

#[async_trait]
impl Translator for Ollama {
    async fn translate(
        &self,
        text: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, ProviderError> {
        let request = GenerationRequest::new(&self.model, text)
            .system(render_system_prompt(&self.system_prompt, source, target))
            .temperature(self.temperature);

        let response = self.generate(request).await?;
        debug!(
            "Ollama translated {} -> {} ({:?} prompt / {:?} completion tokens)",
            source, target, response.prompt_eval_count, response.eval_count
        );

        Ok(response.response.trim().to_string())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
