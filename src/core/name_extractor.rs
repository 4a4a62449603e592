//! Name Extractor, §4.3: turns raw folder names into structured
//! `ExtractedName`s via the configured local LLM, batched and
//! rate-limited. Grounded on the original project's `llm.py` batching
//! and JSON-tolerant response parsing.

use crate::models::extracted_name::{normalize_optional_string, ExtractedName};
use crate::services::llm::NameModelClient;
use std::time::Duration;

const PROMPT_PREAMBLE: &str = r#"You are a media librarian. For each folder name below, extract:
- "folder": the input folder name, copied back verbatim
- "cn_name": the Chinese title, or null
- "en_name": the English/romanized title, or null
- "year": the four-digit release year as a number, or null
- "catalog_id": a TMDB id if one is baked into the folder name (e.g. "{tmdb-1396}"), or null

Respond with a JSON array, one object per input folder name, in the same
order as the input. Do not include any text other than the JSON array.

Folders:
"#;

#[derive(Debug, serde::Deserialize)]
struct RawExtraction {
    /// Some models echo the folder name back (sometimes enriched with a
    /// " | First file: ..." suffix) instead of preserving position
    /// faithfully; when present this is what the result gets keyed on
    /// (§4.3 "Normalization after all chunks").
    folder: Option<String>,
    #[serde(alias = "zh_name")]
    cn_name: Option<String>,
    en_name: Option<String>,
    year: Option<serde_json::Value>,
    #[serde(alias = "tmdb_id")]
    catalog_id: Option<serde_json::Value>,
}

/// Batching and rate-limit policy the extractor runs under (§6 `[llm]`
/// config keys).
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub batch_size: usize,
    /// Minimum seconds between dispatching batches.
    pub min_interval: Duration,
}

impl ExtractorConfig {
    pub fn from_rate_limit(batch_size: usize, rate_limit_per_sec: f64) -> Self {
        let min_interval = if rate_limit_per_sec > 0.0 {
            Duration::from_secs_f64(1.0 / rate_limit_per_sec)
        } else {
            Duration::ZERO
        };
        Self { batch_size, min_interval }
    }
}

/// Extract names for every folder, preserving input order, falling back
/// to an all-`None` `ExtractedName` for any folder the model's response
/// couldn't be matched to (§4.3 "Failure semantics": extraction failure
/// is not fatal, it just yields an empty name that the resolver won't be
/// able to look up).
pub async fn extract_names(
    client: &dyn NameModelClient,
    config: &ExtractorConfig,
    folder_names: &[String],
) -> Vec<ExtractedName> {
    let mut results = Vec::with_capacity(folder_names.len());

    for chunk in folder_names.chunks(config.batch_size.max(1)) {
        let batch_results = extract_batch(client, chunk).await;
        results.extend(batch_results);
        if !config.min_interval.is_zero() {
            tokio::time::sleep(config.min_interval).await;
        }
    }

    results
}

async fn extract_batch(client: &dyn NameModelClient, folder_names: &[String]) -> Vec<ExtractedName> {
    let prompt = build_prompt(folder_names);

    let raw = match client.generate_json(&prompt).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(chunk_size = folder_names.len(), error = %e, "name extractor chunk failed, returning null results");
            return folder_names.iter().map(ExtractedName::empty).collect();
        }
    };

    match parse_response(&raw) {
        Some(parsed) => reconcile(folder_names, parsed),
        None => {
            tracing::debug!(response = %raw, "malformed name extractor response, returning null results");
            folder_names.iter().map(ExtractedName::empty).collect()
        }
    }
}

fn build_prompt(folder_names: &[String]) -> String {
    let mut prompt = String::from(PROMPT_PREAMBLE);
    for (i, name) in folder_names.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, name));
    }
    prompt
}

/// Match the model's (possibly out-of-order, duplicated, or short) result
/// list back to `folder_names`, preserving input order and correspondence
/// (§4.3 "Normalization after all chunks"). When the counts line up we
/// trust positional order - the common case, and robust to a model that
/// simply forgot to echo `folder`. Otherwise we key by the echoed folder
/// name (stripping any " | ..." the model appended for its own context)
/// and fill a null `ExtractedName` for every input that's still missing.
fn reconcile(folder_names: &[String], parsed: Vec<RawExtraction>) -> Vec<ExtractedName> {
    if parsed.len() == folder_names.len() {
        return folder_names
            .iter()
            .zip(parsed)
            .map(|(folder, extraction)| merge(folder, extraction))
            .collect();
    }

    let mut by_name: std::collections::HashMap<String, RawExtraction> = std::collections::HashMap::new();
    for extraction in parsed {
        if let Some(key) = extraction.folder.as_deref() {
            let key = key.split(" | ").next().unwrap_or(key).trim().to_string();
            by_name.insert(key, extraction);
        }
    }

    folder_names
        .iter()
        .map(|folder| match by_name.remove(folder) {
            Some(extraction) => merge(folder, extraction),
            None => ExtractedName::empty(folder),
        })
        .collect()
}

fn merge(folder_name: &str, extraction: RawExtraction) -> ExtractedName {
    let year = extraction.year.and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
            .map(|y| y as u16)
    });
    let catalog_id = extraction.catalog_id.and_then(|v| {
        v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
    });

    ExtractedName {
        folder_name: folder_name.to_string(),
        cn_name: normalize_optional_string(extraction.cn_name),
        en_name: normalize_optional_string(extraction.en_name),
        year,
        catalog_id,
    }
}

/// Parse the model's response, which is supposed to be a bare JSON array
/// but in practice is sometimes wrapped in prose or a markdown fence.
/// Returns `None` (triggering the all-empty fallback) if nothing
/// resembling a JSON array can be found at all.
fn parse_response(raw: &str) -> Option<Vec<RawExtraction>> {
    let array_text = extract_json_array(raw)?;
    serde_json::from_str(&array_text).ok()
}

/// Slice out the first balanced `[...]` span in `raw`.
fn extract_json_array(raw: &str) -> Option<String> {
    let start = raw.find('[')?;
    let bytes = raw.as_bytes();
    let mut depth = 0i32;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(raw[start..start + offset + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeModel {
        response: Mutex<String>,
    }

    #[async_trait]
    impl NameModelClient for FakeModel {
        async fn generate_json(&self, _prompt: &str) -> crate::Result<String> {
            Ok(self.response.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_extract_names_happy_path() {
        let model = FakeModel {
            response: Mutex::new(
                r#"[{"cn_name": "绝命毒师", "en_name": "Breaking Bad", "year": 2008}]"#.to_string(),
            ),
        };
        let config = ExtractorConfig::from_rate_limit(50, 0.0);
        let names = extract_names(&model, &config, &["Breaking.Bad.2008".to_string()]).await;

        assert_eq!(names.len(), 1);
        assert_eq!(names[0].cn_name.as_deref(), Some("绝命毒师"));
        assert_eq!(names[0].en_name.as_deref(), Some("Breaking Bad"));
        assert_eq!(names[0].year, Some(2008));
    }

    #[tokio::test]
    async fn test_extract_names_tolerates_prose_wrapping() {
        let model = FakeModel {
            response: Mutex::new(
                "Sure, here is the result:\n```json\n[{\"cn_name\": null, \"en_name\": \"Show\", \"year\": null}]\n```".to_string(),
            ),
        };
        let config = ExtractorConfig::from_rate_limit(50, 0.0);
        let names = extract_names(&model, &config, &["Show.Folder".to_string()]).await;

        assert_eq!(names[0].en_name.as_deref(), Some("Show"));
        assert_eq!(names[0].cn_name, None);
    }

    #[tokio::test]
    async fn test_extract_names_malformed_response_falls_back_to_empty() {
        let model = FakeModel { response: Mutex::new("not json at all".to_string()) };
        let config = ExtractorConfig::from_rate_limit(50, 0.0);
        let names = extract_names(&model, &config, &["A".to_string(), "B".to_string()]).await;

        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.cn_name.is_none() && n.en_name.is_none()));
    }

    #[tokio::test]
    async fn test_extract_names_short_array_without_echo_yields_nulls() {
        // A response shorter than the input with no "folder" key to key
        // off of can't be safely matched back to a specific input, so
        // every input gets a null result rather than guessing by position.
        let model = FakeModel {
            response: Mutex::new(r#"[{"cn_name": null, "en_name": "Only One", "year": null}]"#.to_string()),
        };
        let config = ExtractorConfig::from_rate_limit(50, 0.0);
        let names = extract_names(&model, &config, &["First".to_string(), "Second".to_string()]).await;

        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.en_name.is_none()));
    }

    #[tokio::test]
    async fn test_extract_names_short_array_with_echo_matches_by_name() {
        let model = FakeModel {
            response: Mutex::new(
                r#"[{"folder": "Second", "cn_name": null, "en_name": "Only One", "year": null}]"#.to_string(),
            ),
        };
        let config = ExtractorConfig::from_rate_limit(50, 0.0);
        let names = extract_names(&model, &config, &["First".to_string(), "Second".to_string()]).await;

        assert_eq!(names.len(), 2);
        assert!(names[0].en_name.is_none());
        assert_eq!(names[1].en_name.as_deref(), Some("Only One"));
    }

    #[tokio::test]
    async fn test_extract_names_enriched_echo_splits_on_pipe() {
        let model = FakeModel {
            response: Mutex::new(
                r#"[{"folder": "Show.Folder | First file: ep1.mkv", "cn_name": null, "en_name": "Show", "year": null}, {"folder": "Other", "en_name": "Other", "year": null}]"#.to_string(),
            ),
        };
        let config = ExtractorConfig::from_rate_limit(50, 0.0);
        let names = extract_names(&model, &config, &["Show.Folder".to_string(), "Other".to_string()]).await;

        assert_eq!(names[0].en_name.as_deref(), Some("Show"));
        assert_eq!(names[1].en_name.as_deref(), Some("Other"));
    }

    #[tokio::test]
    async fn test_extract_names_zh_name_alias_and_catalog_id() {
        let model = FakeModel {
            response: Mutex::new(
                r#"[{"zh_name": "绝命毒师", "en_name": "Breaking Bad", "year": "2008", "catalog_id": "1396"}]"#
                    .to_string(),
            ),
        };
        let config = ExtractorConfig::from_rate_limit(50, 0.0);
        let names = extract_names(&model, &config, &["Breaking.Bad".to_string()]).await;

        assert_eq!(names[0].cn_name.as_deref(), Some("绝命毒师"));
        assert_eq!(names[0].year, Some(2008));
        assert_eq!(names[0].catalog_id, Some(1396));
    }

    #[test]
    fn test_extract_json_array_from_fenced_block() {
        let raw = "```json\n[1, 2, 3]\n```";
        assert_eq!(extract_json_array(raw).unwrap(), "[1, 2, 3]");
    }
}
