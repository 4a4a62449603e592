//! Catalog (TMDB-like) metadata shapes, §3 and §4.4.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeTitle {
    pub title: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub name: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEpisode {
    pub episode_number: u32,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSeason {
    pub season_number: u32,
    pub episodes: Vec<CatalogEpisode>,
}

/// Resolved metadata for one show. Invariant: when `confidence == High`,
/// `seasons` is populated; otherwise it may be empty (see §4.4, "only
/// proceed [to fetch seasons] if confidence is high").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub id: u64,
    pub name: String,
    pub original_name: String,
    pub year: Option<u16>,
    pub alternative_titles: Vec<AlternativeTitle>,
    pub translations: Vec<Translation>,
    pub seasons: Vec<CatalogSeason>,
    pub confidence: Confidence,
    pub search_language: Option<String>,
    pub genre_ids: Vec<u32>,
    pub origin_country: Vec<String>,
    pub original_language: String,
}

impl CatalogMetadata {
    /// Every name a candidate is known by: canonical, original, every
    /// alternative title and every translation name.
    pub fn all_names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str(), self.original_name.as_str()];
        names.extend(self.alternative_titles.iter().map(|t| t.title.as_str()));
        names.extend(self.translations.iter().map(|t| t.name.as_str()));
        names
    }

    pub fn season(&self, number: u32) -> Option<&CatalogSeason> {
        self.seasons.iter().find(|s| s.season_number == number)
    }
}
