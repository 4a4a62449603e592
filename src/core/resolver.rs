//! Catalog Resolver, §4.4: turns an `ExtractedName` plus folder context
//! into a graded `CatalogMetadata`, querying the configured catalog
//! (TMDB) through the `CatalogClient` seam. Grounded on the original
//! project's `tmdb.py` (`get_tv_show`, `_check_match_confidence`,
//! `_evaluate_candidate_confidence`, `_process_candidates_with_fallback`).

use crate::models::catalog::{
    AlternativeTitle, CatalogMetadata, CatalogSeason, Confidence, Translation,
};
use crate::models::extracted_name::ExtractedName;
use crate::models::media::FolderType;
use crate::services::tmdb::{CatalogClient, TvSearchItem};
use crate::utils::chinese::{contains_chinese, titles_equivalent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const PAGE_SIZE: u32 = 20;
const YEAR_TOLERANCE: i32 = 1;

/// Process-lifetime cache of resolved shows, keyed by the query name used
/// to search (§4.4 "Caching"). Handed in explicitly, mirroring the
/// scanner's `FolderStructureCache` (§9 redesign note).
pub type CatalogCache = Arc<Mutex<HashMap<String, Option<CatalogMetadata>>>>;

pub fn new_cache() -> CatalogCache {
    Arc::new(Mutex::new(HashMap::new()))
}

/// Extra folder-derived context the resolver needs beyond the extracted
/// name itself: whether this is the season-is-release-year exception
/// case (§4.4, §8 edge case).
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext {
    pub folder_type: FolderType,
    pub detected_season: u32,
}

impl ResolveContext {
    /// A `DirectFiles` folder whose detected season is greater than 1 is
    /// ambiguous: the "season number" may actually be a release year
    /// baked into the folder name (e.g. a reboot or an anthology "season"
    /// that TMDB indexes by year). The resolver skips year-filtering the
    /// initial search in this case and instead validates against the
    /// season's own air date after the fact.
    pub fn season_is_release_year_exception(&self) -> bool {
        self.folder_type == FolderType::DirectFiles && self.detected_season > 1
    }
}

/// Resolve `name` against the catalog, returning `None` when nothing
/// acceptable was found (caller then records the show as unprocessed).
pub async fn resolve(
    client: &dyn CatalogClient,
    cache: &CatalogCache,
    name: &ExtractedName,
    folder_name: &str,
    ctx: ResolveContext,
    languages: &[String],
) -> Option<CatalogMetadata> {
    let cache_key = name.query_name().unwrap_or(&name.folder_name).to_string();
    {
        let locked = cache.lock().unwrap();
        if let Some(cached) = locked.get(&cache_key) {
            return cached.clone();
        }
    }

    let result = resolve_uncached(client, name, folder_name, ctx, languages).await;
    cache.lock().unwrap().insert(cache_key, result.clone());
    result
}

async fn resolve_uncached(
    client: &dyn CatalogClient,
    name: &ExtractedName,
    folder_name: &str,
    ctx: ResolveContext,
    languages: &[String],
) -> Option<CatalogMetadata> {
    // Strategy 1: a catalog id already known (e.g. recovered from an
    // already-organized folder name) is authoritative; skip search entirely.
    if let Some(id) = name.catalog_id {
        if let Some(meta) = fetch_by_id(client, id, languages, Confidence::High).await {
            return Some(meta);
        }
    }

    let year_filter = if ctx.season_is_release_year_exception() {
        None
    } else {
        name.year
    };

    // Strategy 2: Chinese name with year, Strategy 3: English name with
    // year, Strategy 4: either name with no year filter at all. Earlier
    // strategies that produce a non-Low candidate win outright.
    let mut attempts: Vec<(Option<&str>, Option<u16>)> = Vec::new();
    if let Some(cn) = name.cn_name.as_deref() {
        attempts.push((Some(cn), year_filter));
    }
    if let Some(en) = name.en_name.as_deref() {
        attempts.push((Some(en), year_filter));
    }
    if year_filter.is_some() {
        if let Some(cn) = name.cn_name.as_deref() {
            attempts.push((Some(cn), None));
        }
        if let Some(en) = name.en_name.as_deref() {
            attempts.push((Some(en), None));
        }
    }

    let mut best: Option<CatalogMetadata> = None;
    for (query, year) in attempts {
        let Some(query) = query else { continue };
        if let Some(candidate) =
            search_best_candidate(client, query, year, folder_name, languages).await
        {
            let upgrade = best
                .as_ref()
                .map(|b| candidate.confidence > b.confidence)
                .unwrap_or(true);
            if upgrade {
                best = Some(candidate);
            }
            if best.as_ref().map(|b| b.confidence == Confidence::High).unwrap_or(false) {
                break;
            }
        }
    }

    let mut resolved = best?;

    if ctx.season_is_release_year_exception() {
        resolved = validate_season_year(client, resolved, ctx.detected_season, name.year).await;
    }

    if resolved.confidence == Confidence::High {
        resolved.seasons = fetch_seasons(client, resolved.id, languages).await;
    }

    Some(resolved)
}

async fn fetch_by_id(
    client: &dyn CatalogClient,
    id: u64,
    languages: &[String],
    confidence: Confidence,
) -> Option<CatalogMetadata> {
    let language = languages.first().map(String::as_str).unwrap_or("en-US");
    let details = client.get_tv_details(id, language).await.ok()?;
    Some(metadata_from_details(details, confidence, None))
}

/// Search one query across pages, evaluating each candidate's confidence,
/// and re-fetch page 2+ only if page 1's best candidate is not already
/// `High` and the unfiltered page 1 genuinely had more results to offer
/// (§4.4 "Pagination-aware fan-out").
async fn search_best_candidate(
    client: &dyn CatalogClient,
    query: &str,
    year: Option<u16>,
    folder_name: &str,
    languages: &[String],
) -> Option<CatalogMetadata> {
    let mut best: Option<CatalogMetadata> = None;

    for language in languages {
        let page1 = match client.search_tv(query, year, language, 1).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(query = %query, language = %language, error = %e, "catalog search failed, trying next language");
                continue;
            }
        };
        if page1.results.is_empty() {
            continue;
        }

        let mut candidates: Vec<(TvSearchItem, Confidence)> = page1
            .results
            .iter()
            .cloned()
            .map(|item| {
                let conf = evaluate_candidate_confidence(&item, query, year, folder_name);
                (item, conf)
            })
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        let page1_best_high = candidates.first().map(|(_, c)| *c == Confidence::High).unwrap_or(false);

        if !page1_best_high && page1.total_results >= PAGE_SIZE && page1.total_pages > 1 {
            for page in 2..=page1.total_pages.min(5) {
                if let Ok(next) = client.search_tv(query, year, language, page).await {
                    candidates.extend(next.results.into_iter().map(|item| {
                        let conf = evaluate_candidate_confidence(&item, query, year, folder_name);
                        (item, conf)
                    }));
                }
            }
            candidates.sort_by(|a, b| b.1.cmp(&a.1));
        }

        prefer_chinese_name_ties(&mut candidates, query);

        // The cheap name/year grade above only sees the search item, which
        // TMDB doesn't populate with alternative titles or translations -
        // a candidate whose *English* search result name doesn't match but
        // whose Chinese alternative title does would be wrongly stuck at
        // Low. Re-grade the leading candidates against their full details
        // before settling on one (§4.4 "fetch full details, then
        // evaluate"), bounded to a handful of candidates so this doesn't
        // turn into one details fetch per search result.
        const DETAIL_REGRADE_WINDOW: usize = 5;
        let mut best_this_language: Option<CatalogMetadata> = None;
        for (item, cheap_confidence) in candidates.into_iter().take(DETAIL_REGRADE_WINDOW) {
            if cheap_confidence == Confidence::Low && best.is_some() && best_this_language.is_some() {
                continue;
            }
            let Ok(details) = client.get_tv_details(item.id, language).await else {
                continue;
            };
            let detail_confidence = evaluate_details_confidence(&details, query, year, folder_name);
            let confidence = if detail_confidence > cheap_confidence { detail_confidence } else { cheap_confidence };
            let candidate = metadata_from_details(details, confidence, Some(language.clone()));

            let upgrade = best_this_language
                .as_ref()
                .map(|b: &CatalogMetadata| candidate.confidence > b.confidence)
                .unwrap_or(true);
            if upgrade {
                best_this_language = Some(candidate);
            }
            if best_this_language.as_ref().map(|b| b.confidence == Confidence::High).unwrap_or(false) {
                break;
            }
        }

        if let Some(candidate) = best_this_language {
            let upgrade = best.as_ref().map(|b| candidate.confidence > b.confidence).unwrap_or(true);
            if upgrade {
                best = Some(candidate);
            }
            if best.as_ref().map(|b| b.confidence == Confidence::High).unwrap_or(false) {
                break;
            }
        }
    }

    best
}

/// Among candidates tied on confidence, prefer the one whose name is
/// itself Chinese when the query was Chinese (§4.4 "Chinese-name
/// preference") by moving it to the front of its confidence tier.
fn prefer_chinese_name_ties(candidates: &mut [(TvSearchItem, Confidence)], query: &str) {
    if !contains_chinese(query) || candidates.len() < 2 {
        return;
    }
    let top_confidence = candidates[0].1;
    let tie_len = candidates.iter().take_while(|(_, c)| *c == top_confidence).count();
    if tie_len < 2 {
        return;
    }
    candidates[..tie_len].sort_by_key(|(item, _)| !contains_chinese(&item.name));
}

/// Grade a single search result against the query (§4.4
/// `_evaluate_candidate_confidence`):
/// - High: name or original_name equals query (normalized) and, when a
///   year filter was supplied, the air year matches within tolerance.
/// - Medium: name contains/is contained by query, or year matches exactly
///   with a name that's at least a partial match.
/// - Low: anything else that was returned at all.
fn evaluate_candidate_confidence(
    item: &TvSearchItem,
    query: &str,
    year: Option<u16>,
    folder_name: &str,
) -> Confidence {
    let exact_name = titles_equivalent(&item.name, query) || titles_equivalent(&item.original_name, query);
    let partial_name = item.name.to_lowercase().contains(&query.to_lowercase())
        || query.to_lowercase().contains(&item.name.to_lowercase())
        || crate::utils::chinese::name_matches_folder(&item.name, folder_name)
        || crate::utils::chinese::name_matches_folder(&item.original_name, folder_name);

    let air_year = item
        .first_air_date
        .as_deref()
        .and_then(|d| d.get(0..4))
        .and_then(|y| y.parse::<i32>().ok());
    let year_matches = match (year, air_year) {
        (Some(expected), Some(actual)) => (expected as i32 - actual).abs() <= YEAR_TOLERANCE,
        (None, _) => true,
        (Some(_), None) => false,
    };

    if exact_name && year_matches {
        Confidence::High
    } else if (exact_name || partial_name) && year_matches {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Re-grade a candidate against its fetched details instead of just the
/// search item: alternative titles and translations widen the name set a
/// query can match against, so a candidate the cheap grade above missed
/// (e.g. only its Chinese alternative title matches a Chinese query) can
/// still earn `High`/`Medium` here (§4.4 "fetch full details, then
/// evaluate").
fn evaluate_details_confidence(
    details: &crate::services::tmdb::TvDetails,
    query: &str,
    year: Option<u16>,
    folder_name: &str,
) -> Confidence {
    let mut names = vec![details.name.clone(), details.original_name.clone()];
    if let Some(env) = &details.alternative_titles {
        names.extend(env.results.iter().map(|t| t.title.clone()));
    }
    if let Some(env) = &details.translations {
        names.extend(
            env.translations
                .iter()
                .map(|t| t.data.name.clone())
                .filter(|n| !n.is_empty()),
        );
    }

    let exact_name = names.iter().any(|n| titles_equivalent(n, query));
    let partial_name = names.iter().any(|n| {
        n.to_lowercase().contains(&query.to_lowercase())
            || query.to_lowercase().contains(&n.to_lowercase())
            || crate::utils::chinese::name_matches_folder(n, folder_name)
    });

    let air_year = details
        .first_air_date
        .as_deref()
        .and_then(|d| d.get(0..4))
        .and_then(|y| y.parse::<i32>().ok());
    let year_matches = match (year, air_year) {
        (Some(expected), Some(actual)) => (expected as i32 - actual).abs() <= YEAR_TOLERANCE,
        (None, _) => true,
        (Some(_), None) => false,
    };

    if exact_name && year_matches {
        Confidence::High
    } else if (exact_name || partial_name) && year_matches {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn metadata_from_details(
    details: crate::services::tmdb::TvDetails,
    confidence: Confidence,
    search_language: Option<String>,
) -> CatalogMetadata {
    let year = details
        .first_air_date
        .as_deref()
        .and_then(|d| d.get(0..4))
        .and_then(|y| y.parse::<u16>().ok());

    let alternative_titles = details
        .alternative_titles
        .map(|env| {
            env.results
                .into_iter()
                .map(|t| AlternativeTitle { title: t.title, country_code: t.iso_3166_1 })
                .collect()
        })
        .unwrap_or_default();

    let translations = details
        .translations
        .map(|env| {
            env.translations
                .into_iter()
                .filter(|t| !t.data.name.is_empty())
                .map(|t| Translation { name: t.data.name, country_code: t.iso_3166_1 })
                .collect()
        })
        .unwrap_or_default();

    CatalogMetadata {
        id: details.id,
        name: details.name,
        original_name: details.original_name,
        year,
        alternative_titles,
        translations,
        seasons: Vec::new(),
        confidence,
        search_language,
        genre_ids: details.genres.iter().map(|g| g.id).collect(),
        origin_country: details.origin_country,
        original_language: details.original_language,
    }
}

/// Fetch season/episode listings for every season the show has, used only
/// once a show clears `High` confidence (§4.4 "only proceed if confidence
/// is high").
async fn fetch_seasons(
    client: &dyn CatalogClient,
    tv_id: u64,
    languages: &[String],
) -> Vec<CatalogSeason> {
    let language = languages.first().map(String::as_str).unwrap_or("en-US");
    let Ok(details) = client.get_tv_details(tv_id, language).await else {
        return Vec::new();
    };

    let mut seasons = Vec::new();
    for summary in details.seasons {
        if summary.season_number == 0 {
            continue; // Specials, not modeled as a season the planner assigns files into.
        }
        if let Ok(season_details) =
            client.get_season_details(tv_id, summary.season_number, language).await
        {
            seasons.push(CatalogSeason {
                season_number: season_details.season_number,
                episodes: season_details
                    .episodes
                    .into_iter()
                    .map(|e| crate::models::catalog::CatalogEpisode {
                        episode_number: e.episode_number,
                        title: e.name,
                    })
                    .collect(),
            });
        }
    }
    seasons
}

/// The season-is-release-year exception's second half: once a show is
/// matched, confirm the *specific season*'s air date lines up with the
/// year baked into the folder name, downgrading confidence to `Low` if
/// neither the show year nor the season year match within tolerance
/// (§4.4 edge case, §8).
async fn validate_season_year(
    client: &dyn CatalogClient,
    mut metadata: CatalogMetadata,
    detected_season: u32,
    folder_year: Option<u16>,
) -> CatalogMetadata {
    let Some(folder_year) = folder_year else {
        return metadata;
    };

    let show_year_matches = metadata
        .year
        .map(|y| (y as i32 - folder_year as i32).abs() <= YEAR_TOLERANCE)
        .unwrap_or(false);
    if show_year_matches {
        return metadata;
    }

    let language = metadata.search_language.clone().unwrap_or_else(|| "en-US".to_string());
    let season_year_matches = client
        .get_season_details(metadata.id, detected_season, &language)
        .await
        .ok()
        .and_then(|s| s.air_date)
        .and_then(|d| d.get(0..4).and_then(|y| y.parse::<i32>().ok()))
        .map(|actual| (actual - folder_year as i32).abs() <= YEAR_TOLERANCE)
        .unwrap_or(false);

    if !season_year_matches {
        metadata.confidence = Confidence::Low;
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tmdb::{EpisodeSummary, SeasonDetails, TvDetails, TvGenre, TvSearchPage, TvSeasonSummary};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct FakeCatalog {
        pages: StdMutex<HashMap<String, TvSearchPage>>,
        details: StdMutex<HashMap<u64, TvDetails>>,
        seasons: StdMutex<HashMap<(u64, u32), SeasonDetails>>,
    }

    #[async_trait]
    impl CatalogClient for FakeCatalog {
        async fn search_tv(&self, query: &str, _year: Option<u16>, _language: &str, page: u32) -> crate::Result<TvSearchPage> {
            let key = format!("{query}:{page}");
            Ok(self.pages.lock().unwrap().get(&key).cloned_page())
        }
        async fn get_tv_details(&self, tv_id: u64, _language: &str) -> crate::Result<TvDetails> {
            self.details
                .lock()
                .unwrap()
                .get(&tv_id)
                .map(clone_details)
                .ok_or_else(|| crate::Error::other("not found"))
        }
        async fn get_season_details(&self, tv_id: u64, season_number: u32, _language: &str) -> crate::Result<SeasonDetails> {
            self.seasons
                .lock()
                .unwrap()
                .get(&(tv_id, season_number))
                .map(clone_season)
                .ok_or_else(|| crate::Error::other("not found"))
        }
    }

    trait ClonedPageExt {
        fn cloned_page(self) -> TvSearchPage;
    }
    impl ClonedPageExt for Option<&TvSearchPage> {
        fn cloned_page(self) -> TvSearchPage {
            match self {
                Some(p) => TvSearchPage {
                    page: p.page,
                    total_pages: p.total_pages,
                    total_results: p.total_results,
                    results: p.results.clone(),
                },
                None => TvSearchPage { page: 1, total_pages: 1, total_results: 0, results: Vec::new() },
            }
        }
    }

    fn clone_details(d: &TvDetails) -> TvDetails {
        TvDetails {
            id: d.id,
            name: d.name.clone(),
            original_name: d.original_name.clone(),
            original_language: d.original_language.clone(),
            first_air_date: d.first_air_date.clone(),
            origin_country: d.origin_country.clone(),
            genres: d.genres.iter().map(|g| TvGenre { id: g.id, name: g.name.clone() }).collect(),
            seasons: d
                .seasons
                .iter()
                .map(|s| TvSeasonSummary { season_number: s.season_number, episode_count: s.episode_count })
                .collect(),
            alternative_titles: None,
            translations: None,
        }
    }

    fn clone_season(s: &SeasonDetails) -> SeasonDetails {
        SeasonDetails {
            season_number: s.season_number,
            air_date: s.air_date.clone(),
            episodes: s
                .episodes
                .iter()
                .map(|e| EpisodeSummary {
                    episode_number: e.episode_number,
                    name: e.name.clone(),
                    air_date: e.air_date.clone(),
                })
                .collect(),
        }
    }

    fn search_item(id: u64, name: &str, original_name: &str, year: &str) -> TvSearchItem {
        TvSearchItem {
            id,
            name: name.to_string(),
            original_name: original_name.to_string(),
            first_air_date: Some(format!("{year}-01-01")),
            original_language: Some("en".to_string()),
            origin_country: Some(vec!["US".to_string()]),
            genre_ids: Some(vec![18]),
            popularity: Some(10.0),
        }
    }

    #[tokio::test]
    async fn test_exact_match_with_year_is_high_confidence() {
        let mut pages = HashMap::new();
        pages.insert(
            "Breaking Bad:1".to_string(),
            TvSearchPage {
                page: 1,
                total_pages: 1,
                total_results: 1,
                results: vec![search_item(1396, "Breaking Bad", "Breaking Bad", "2008")],
            },
        );
        let mut details = HashMap::new();
        details.insert(
            1396,
            TvDetails {
                id: 1396,
                name: "Breaking Bad".to_string(),
                original_name: "Breaking Bad".to_string(),
                original_language: "en".to_string(),
                first_air_date: Some("2008-01-20".to_string()),
                origin_country: vec!["US".to_string()],
                genres: vec![TvGenre { id: 18, name: "Drama".to_string() }],
                seasons: vec![TvSeasonSummary { season_number: 1, episode_count: 7 }],
                alternative_titles: None,
                translations: None,
            },
        );
        let mut seasons = HashMap::new();
        seasons.insert(
            (1396, 1),
            SeasonDetails {
                season_number: 1,
                air_date: Some("2008-01-20".to_string()),
                episodes: vec![EpisodeSummary { episode_number: 1, name: "Pilot".to_string(), air_date: None }],
            },
        );

        let client = FakeCatalog {
            pages: StdMutex::new(pages),
            details: StdMutex::new(details),
            seasons: StdMutex::new(seasons),
        };

        let name = ExtractedName {
            folder_name: "Breaking.Bad.2008.S01".to_string(),
            cn_name: None,
            en_name: Some("Breaking Bad".to_string()),
            year: Some(2008),
            catalog_id: None,
        };
        let cache = new_cache();
        let ctx = ResolveContext { folder_type: FolderType::SeasonSubfolders, detected_season: 1 };
        let languages = vec!["en-US".to_string()];

        let resolved = resolve(&client, &cache, &name, "Breaking.Bad.2008.S01", ctx, &languages)
            .await
            .expect("should resolve");

        assert_eq!(resolved.confidence, Confidence::High);
        assert_eq!(resolved.id, 1396);
        assert_eq!(resolved.seasons.len(), 1);
    }

    #[tokio::test]
    async fn test_no_results_resolves_to_none() {
        let client = FakeCatalog {
            pages: StdMutex::new(HashMap::new()),
            details: StdMutex::new(HashMap::new()),
            seasons: StdMutex::new(HashMap::new()),
        };
        let name = ExtractedName {
            folder_name: "Nonexistent.Show".to_string(),
            cn_name: None,
            en_name: Some("Nonexistent Show".to_string()),
            year: None,
            catalog_id: None,
        };
        let cache = new_cache();
        let ctx = ResolveContext { folder_type: FolderType::DirectFiles, detected_season: 1 };
        let languages = vec!["en-US".to_string()];

        let resolved = resolve(&client, &cache, &name, "Nonexistent.Show", ctx, &languages).await;
        assert!(resolved.is_none());
    }

    #[test]
    fn test_season_is_release_year_exception_detection() {
        let ctx = ResolveContext { folder_type: FolderType::DirectFiles, detected_season: 3 };
        assert!(ctx.season_is_release_year_exception());

        let ctx2 = ResolveContext { folder_type: FolderType::SeasonSubfolders, detected_season: 3 };
        assert!(!ctx2.season_is_release_year_exception());

        let ctx3 = ResolveContext { folder_type: FolderType::DirectFiles, detected_season: 1 };
        assert!(!ctx3.season_is_release_year_exception());
    }
}
