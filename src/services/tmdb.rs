//! TMDB API transport client: thin HTTP wrapper, no matching/confidence logic.
//! That lives in `core::resolver`, behind the `CatalogClient` trait this
//! module implements.

use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Spaces out every outbound call to at least `1 / rate_per_second`
/// (§4.4 "Rate limiting": search, details, alt-titles, translations, and
/// season details calls all share this one spacing).
struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    fn new(rate_per_second: f64) -> Self {
        let min_interval = if rate_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / rate_per_second)
        } else {
            Duration::ZERO
        };
        Self { min_interval, last_call: Mutex::new(None) }
    }

    async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let sleep_for = {
            let mut last = self.last_call.lock().unwrap();
            let now = Instant::now();
            let sleep_for = match *last {
                Some(prev) => self.min_interval.saturating_sub(now.duration_since(prev)),
                None => Duration::ZERO,
            };
            *last = Some(now + sleep_for);
            sleep_for
        };
        if !sleep_for.is_zero() {
            tokio::time::sleep(sleep_for).await;
        }
    }
}

/// Behavior the resolver depends on, so tests can substitute a fake
/// catalog without network access.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search_tv(&self, query: &str, year: Option<u16>, language: &str, page: u32)
        -> Result<TvSearchPage>;
    async fn get_tv_details(&self, tv_id: u64, language: &str) -> Result<TvDetails>;
    async fn get_season_details(&self, tv_id: u64, season_number: u32, language: &str)
        -> Result<SeasonDetails>;
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub use_bearer: bool,
    pub rate_limit: f64,
}

impl TmdbConfig {
    pub fn new(api_key: String) -> Self {
        let use_bearer = api_key.starts_with("eyJ");
        Self { api_key, use_bearer, rate_limit: 4.0 }
    }

    pub fn with_rate_limit(mut self, rate_limit: f64) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct TvSearchPage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<TvSearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvSearchItem {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub first_air_date: Option<String>,
    pub original_language: Option<String>,
    pub origin_country: Option<Vec<String>>,
    pub genre_ids: Option<Vec<u32>>,
    pub popularity: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub original_language: String,
    pub first_air_date: Option<String>,
    pub origin_country: Vec<String>,
    pub genres: Vec<TvGenre>,
    pub seasons: Vec<TvSeasonSummary>,
    pub alternative_titles: Option<AlternativeTitlesEnvelope>,
    pub translations: Option<TranslationsEnvelope>,
}

#[derive(Debug, Deserialize)]
pub struct TvGenre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TvSeasonSummary {
    pub season_number: u32,
    pub episode_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct AlternativeTitlesEnvelope {
    pub results: Vec<AlternativeTitleItem>,
}

#[derive(Debug, Deserialize)]
pub struct AlternativeTitleItem {
    pub title: String,
    pub iso_3166_1: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslationsEnvelope {
    pub translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
pub struct TranslationItem {
    pub iso_3166_1: String,
    pub data: TranslationData,
}

#[derive(Debug, Deserialize)]
pub struct TranslationData {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SeasonDetails {
    pub season_number: u32,
    pub air_date: Option<String>,
    pub episodes: Vec<EpisodeSummary>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeSummary {
    pub episode_number: u32,
    pub name: String,
    pub air_date: Option<String>,
}

pub struct TmdbClient {
    config: TmdbConfig,
    http: reqwest::Client,
    limiter: RateLimiter,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Self {
        let limiter = RateLimiter::new(config.rate_limit);
        Self { config, http: reqwest::Client::new(), limiter }
    }

    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let req = self.http.get(url);
        if self.config.use_bearer {
            req.header("Authorization", format!("Bearer {}", self.config.api_key))
        } else {
            req
        }
    }

    fn build_url(&self, path: &str, language: &str, extra: &str) -> String {
        if self.config.use_bearer {
            format!("{TMDB_BASE_URL}/{path}?language={language}{extra}")
        } else {
            format!(
                "{TMDB_BASE_URL}/{path}?api_key={}&language={language}{extra}",
                self.config.api_key
            )
        }
    }

    /// `GET /authentication`, used by preflight to validate the configured key.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = if self.config.use_bearer {
            format!("{TMDB_BASE_URL}/authentication")
        } else {
            format!("{TMDB_BASE_URL}/authentication?api_key={}", self.config.api_key)
        };
        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn search_tv(
        &self,
        query: &str,
        year: Option<u16>,
        language: &str,
        page: u32,
    ) -> Result<TvSearchPage> {
        self.limiter.wait().await;
        let year_param = year
            .map(|y| format!("&first_air_date_year={y}"))
            .unwrap_or_default();
        let url = self.build_url(
            "search/tv",
            language,
            &format!("&query={}{year_param}&page={page}", urlencoding::encode(query)),
        );
        let resp = self.build_request(&url).send().await?;
        Ok(resp.json().await?)
    }

    async fn get_tv_details(&self, tv_id: u64, language: &str) -> Result<TvDetails> {
        self.limiter.wait().await;
        let url = self.build_url(
            &format!("tv/{tv_id}"),
            language,
            "&append_to_response=alternative_titles,translations",
        );
        let resp = self.build_request(&url).send().await?;
        Ok(resp.json().await?)
    }

    async fn get_season_details(
        &self,
        tv_id: u64,
        season_number: u32,
        language: &str,
    ) -> Result<SeasonDetails> {
        self.limiter.wait().await;
        let url = self.build_url(&format!("tv/{tv_id}/season/{season_number}"), language, "");
        let resp = self.build_request(&url).send().await?;
        Ok(resp.json().await?)
    }
}
