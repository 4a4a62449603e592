//! Local LLM preflight check.

use super::CheckResult;
use crate::services::llm::{LlmConfig, OllamaClient};

pub async fn check(config: &LlmConfig) -> CheckResult {
    let client = OllamaClient::new(config.clone());

    match client.health_check().await {
        Ok(true) => match client.list_models().await {
            Ok(models) => {
                let model_names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
                if models.is_empty() {
                    CheckResult::fail("LLM", "running but no models", "Pull a model: ollama pull qwen2.5:7b")
                } else if model_names.iter().any(|n| *n == config.model) {
                    CheckResult::ok("LLM", &format!("running ({})", config.model))
                } else {
                    CheckResult::fail(
                        "LLM",
                        &format!("running, but {} is not pulled (have: {})", config.model, model_names.join(", ")),
                        &format!("Pull it: ollama pull {}", config.model),
                    )
                }
            }
            Err(_) => CheckResult::ok("LLM", "running"),
        },
        Ok(false) | Err(_) => CheckResult::fail("LLM", "not running", "Start Ollama: ollama serve"),
    }
}
