//! Configuration model, §1.2 of SPEC_FULL.md / §6 of spec.md.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub tmdb: TmdbConfig,
    pub proxy: Option<ProxyConfig>,
    /// Ordered category rules, §4.6. A TOML array of tables so declaration
    /// order - which the classifier's first-match-wins semantics depend on
    /// - survives (unlike a table/map, whose key order TOML does not
    /// guarantee).
    #[serde(default)]
    pub category: Vec<CategoryRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub batch_size: usize,
    pub rate_limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub languages: Vec<String>,
    pub rate_limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub genre_ids: Option<String>,
    pub origin_country: Option<String>,
    pub original_language: Option<String>,
    pub release_year: Option<String>,
}

impl CategoryRule {
    /// A rule with no conditions at all is a fallback (§4.6).
    pub fn is_fallback(&self) -> bool {
        self.genre_ids.is_none()
            && self.origin_country.is_none()
            && self.original_language.is_none()
            && self.release_year.is_none()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            tmdb: TmdbConfig::default(),
            proxy: None,
            category: Vec::new(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("LLM_API_KEY").ok(),
            base_url: std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "qwen2.5:7b".to_string()),
            batch_size: 50,
            rate_limit: 2.0,
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("TMDB_API_KEY").ok(),
            languages: vec!["zh-CN".to_string(), "en-US".to_string()],
            rate_limit: 4.0,
        }
    }
}

/// Default on-disk config location, `$XDG_CONFIG_HOME/tv-organizer/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tv-organizer")
        .join("config.toml")
}

/// Load configuration from `path`, or the default location if `path` is
/// `None`. A missing file yields defaults; a present-but-unparsable file
/// is a fatal config error (§7: "missing config" aborts the whole job).
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let resolved = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !resolved.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&resolved)?;
    toml::from_str(&content).map_err(|e| crate::Error::ConfigInvalid(e.to_string()))
}
