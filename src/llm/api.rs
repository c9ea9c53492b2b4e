//! Wire types for the two supported provider APIs.

use serde::{Deserialize, Serialize};

/// Ollama `/api/generate` request. Generation parameters ride at the top
/// level next to the prompt.
#[derive(Debug, Serialize)]
pub struct OllamaGenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Ollama `/api/generate` response.
#[derive(Debug, Deserialize)]
pub struct OllamaGenerateResponse {
    pub response: String,
}

/// Ollama `/api/tags` response.
#[derive(Debug, Deserialize)]
pub struct OllamaTagsResponse {
    pub models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
pub struct OllamaModel {
    pub name: String,
}

/// KoboldAI `/api/v1/generate` request.
#[derive(Debug, Serialize)]
pub struct KoboldGenerateRequest<'a> {
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_length: u32,
    pub max_context_length: u32,
}

/// KoboldAI `/api/v1/generate` response.
#[derive(Debug, Deserialize)]
pub struct KoboldGenerateResponse {
    pub results: Vec<KoboldResult>,
}

#[derive(Debug, Deserialize)]
pub struct KoboldResult {
    pub text: String,
}
