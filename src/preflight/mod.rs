//! Preflight checks: verify the LLM and TMDB collaborators are reachable
//! and configured before a `plan` run spends time scanning a large
//! library only to fail on the first catalog lookup.

mod ollama;
mod tmdb;

use crate::models::config::Config;
use crate::Result;
use colored::Colorize;

#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn ok(name: &str, message: &str) -> Self {
        Self { name: name.to_string(), success: true, message: message.to_string(), hint: None }
    }

    pub fn fail(name: &str, message: &str, hint: &str) -> Self {
        Self { name: name.to_string(), success: false, message: message.to_string(), hint: Some(hint.to_string()) }
    }
}

pub async fn run_preflight_checks(config: &Config) -> Result<Vec<CheckResult>> {
    let llm_config = crate::services::llm::LlmConfig {
        base_url: config.llm.base_url.clone(),
        model: config.llm.model.clone(),
        ..Default::default()
    };

    Ok(vec![
        ollama::check(&llm_config).await,
        tmdb::check(config.tmdb.api_key.as_deref()).await,
    ])
}

pub fn print_results(results: &[CheckResult]) {
    for result in results {
        if result.success {
            println!("{} {}: {}", "[OK]".green(), result.name.bold(), result.message);
        } else {
            println!("{} {}: {}", "[FAIL]".red(), result.name.bold(), result.message);
            if let Some(ref hint) = result.hint {
                println!("  {} {}", "->".yellow(), hint);
            }
        }
    }
}

pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.success)
}
