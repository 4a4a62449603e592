//! Local LLM transport client (Ollama-compatible `/api/generate`), used by
//! the name extractor to turn folder names into structured Chinese/English
//! title guesses. Thin transport only; prompt construction and batching
//! live in `core::name_extractor`.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Behavior the name extractor depends on, so tests can substitute a fake
/// model without a running Ollama instance.
#[async_trait]
pub trait NameModelClient: Send + Sync {
    async fn generate_json(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:7b".to_string(),
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    seed: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: String,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
}

pub struct OllamaClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("http client configuration is valid");
        Self { config, http }
    }

    /// `GET /api/tags`, used by preflight to check the service is reachable
    /// and the configured model is pulled.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);
        Ok(self.http.get(&url).send().await.map(|r| r.status().is_success()).unwrap_or(false))
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.config.base_url);
        let resp: TagsResponse = self.http.get(&url).send().await?.json().await?;
        Ok(resp.models)
    }
}

#[async_trait]
impl NameModelClient for OllamaClient {
    async fn generate_json(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url);
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format: "json".to_string(),
            // Deterministic: same folder name always extracts the same way.
            options: GenerateOptions { temperature: 0.0, seed: 42 },
        };
        let resp: GenerateResponse = self.http.post(&url).json(&request).send().await?.json().await?;
        Ok(resp.response)
    }
}
