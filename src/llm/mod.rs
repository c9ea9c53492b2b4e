//! Provider-polymorphic client for the two supported local LLM backends.
//!
//! Availability checks and model listing swallow every failure (an
//! unreachable provider is simply "unavailable" / "no models"); generation
//! propagates a typed error because the caller needs the reason.

pub mod api;
pub mod prompt;

pub use prompt::{MAX_CONTENT_CHARS, TRUNCATION_MARKER, clickbait_prompt};

use crate::settings::{Provider, Settings};
use api::{
    KoboldGenerateRequest, KoboldGenerateResponse, OllamaGenerateRequest, OllamaGenerateResponse,
    OllamaTagsResponse,
};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("provider api error {status}")]
    Api { status: reqwest::StatusCode },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

impl LlmError {
    fn from_reqwest_error(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Api { status },
            None => Self::Transport(err.to_string()),
        }
    }
}

/// A connector bound to one provider configuration. Cheap to construct; the
/// link analyzer builds a fresh one per request from the current settings.
pub struct LlmConnector {
    settings: Settings,
    client: Client,
}

impl LlmConnector {
    pub fn new(settings: Settings) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            // Local generation on modest hardware can be slow.
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build LLM HTTP client");
        Self { settings, client }
    }

    fn base_url(&self) -> &str {
        match self.settings.provider {
            Provider::Ollama => &self.settings.ollama.base_url,
            Provider::Koboldai => &self.settings.koboldai.base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url().trim_end_matches('/'), path)
    }

    /// Whether the configured provider answers its health/info endpoint.
    /// Transport errors are reported as "unavailable", never propagated.
    pub async fn check_availability(&self) -> bool {
        let url = match self.settings.provider {
            Provider::Ollama => self.endpoint("/api/health"),
            Provider::Koboldai => self.endpoint("/api/v1/info"),
        };

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(%url, error = %err, "provider availability check failed");
                false
            }
        }
    }

    /// Installed model names. Only Ollama exposes a listing; failures of any
    /// kind collapse to an empty list.
    pub async fn list_models(&self) -> Vec<String> {
        if self.settings.provider != Provider::Ollama {
            return Vec::new();
        }

        let url = self.endpoint("/api/tags");
        let result = async {
            let response = self.client.get(&url).send().await?.error_for_status()?;
            response.json::<OllamaTagsResponse>().await
        }
        .await;

        match result {
            Ok(tags) => tags.models.into_iter().map(|m| m.name).collect(),
            Err(err) => {
                warn!(%url, error = %err, "model listing failed");
                Vec::new()
            }
        }
    }

    /// Send a prompt and return the raw completion text.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        match self.settings.provider {
            Provider::Ollama => self.generate_ollama(prompt).await,
            Provider::Koboldai => self.generate_kobold(prompt).await,
        }
    }

    async fn generate_ollama(&self, prompt: &str) -> Result<String, LlmError> {
        let cfg = &self.settings.ollama;
        let request = OllamaGenerateRequest {
            model: &cfg.model,
            prompt,
            temperature: cfg.parameters.temperature,
            max_tokens: cfg.parameters.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(LlmError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api { status });
        }

        let body: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(e.to_string()))?;
        Ok(body.response)
    }

    async fn generate_kobold(&self, prompt: &str) -> Result<String, LlmError> {
        let cfg = &self.settings.koboldai;
        let request = KoboldGenerateRequest {
            prompt,
            temperature: cfg.parameters.temperature,
            max_length: cfg.parameters.max_length,
            max_context_length: cfg.parameters.max_context_length,
        };

        let response = self
            .client
            .post(self.endpoint("/api/v1/generate"))
            .json(&request)
            .send()
            .await
            .map_err(LlmError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api { status });
        }

        let body: KoboldGenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(e.to_string()))?;
        body.results
            .into_iter()
            .next()
            .map(|r| r.text)
            .ok_or_else(|| LlmError::UnexpectedResponse("empty results array".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn endpoint_join_tolerates_trailing_slash() {
        let mut settings = Settings::default();
        settings.ollama.base_url = "http://localhost:11434/".to_string();
        let connector = LlmConnector::new(settings);
        assert_eq!(
            connector.endpoint("/api/generate"),
            "http://localhost:11434/api/generate"
        );
    }

    #[tokio::test]
    async fn unreachable_provider_is_unavailable_not_an_error() {
        let mut settings = Settings::default();
        // Reserved port with nothing listening.
        settings.ollama.base_url = "http://127.0.0.1:1".to_string();
        let connector = LlmConnector::new(settings);
        assert!(!connector.check_availability().await);
        assert!(connector.list_models().await.is_empty());
    }

    #[tokio::test]
    async fn kobold_has_no_model_listing() {
        let mut settings = Settings::default();
        settings.provider = Provider::Koboldai;
        let connector = LlmConnector::new(settings);
        assert!(connector.list_models().await.is_empty());
    }
}
