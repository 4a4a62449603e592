//! Category Classifier, §4.6: assigns a show to the first matching
//! `CategoryRule` in config, falling back to a rule with no conditions
//! (or `"Other"` if none is configured). Grounded on the original
//! project's `category.py` (`CategoryHelper::_get_category`,
//! `_parse_condition_value`).

use crate::models::catalog::CatalogMetadata;
use crate::models::config::CategoryRule;

const DEFAULT_FALLBACK: &str = "Other";

/// Condition grammar (per field): an optional leading `!` negates the
/// whole condition; the remainder is a comma-separated list of tokens,
/// each either a bare value or, for numeric fields, an inclusive
/// `start-end` range. A condition matches if the actual value(s)
/// intersect any token (post-negation).
struct Condition<'a> {
    negated: bool,
    tokens: Vec<&'a str>,
}

impl<'a> Condition<'a> {
    fn parse(raw: &'a str) -> Self {
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let tokens = body.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
        Self { negated, tokens }
    }

    fn matches_numeric(&self, actual: &[u32]) -> bool {
        let any_token_matches = self.tokens.iter().any(|token| {
            if let Some((start, end)) = token.split_once('-') {
                let (Ok(start), Ok(end)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>()) else {
                    return false;
                };
                actual.iter().any(|&v| v >= start && v <= end)
            } else if let Ok(n) = token.parse::<u32>() {
                actual.contains(&n)
            } else {
                false
            }
        });
        any_token_matches != self.negated
    }

    fn matches_string(&self, actual: &[&str]) -> bool {
        let any_token_matches = self
            .tokens
            .iter()
            .any(|token| actual.iter().any(|a| a.eq_ignore_ascii_case(token)));
        any_token_matches != self.negated
    }
}

/// Classify `metadata` against `rules`, returning the first matching
/// rule's name. `None` when no `[category]` rules are configured at all
/// (the destination layout then omits the category level entirely, per
/// §6's `[<category>/]` bracket notation); `"Other"` when rules exist but
/// none of them - conditioned or fallback - matched this show.
pub fn classify(metadata: &CatalogMetadata, rules: &[CategoryRule]) -> Option<String> {
    if rules.is_empty() {
        return None;
    }
    for rule in rules {
        if rule.is_fallback() {
            return Some(rule.name.clone());
        }
        if rule_matches(rule, metadata) {
            return Some(rule.name.clone());
        }
    }
    Some(DEFAULT_FALLBACK.to_string())
}

fn rule_matches(rule: &CategoryRule, metadata: &CatalogMetadata) -> bool {
    if let Some(raw) = &rule.genre_ids {
        if !Condition::parse(raw).matches_numeric(&metadata.genre_ids) {
            return false;
        }
    }
    if let Some(raw) = &rule.origin_country {
        let countries: Vec<&str> = metadata.origin_country.iter().map(String::as_str).collect();
        if !Condition::parse(raw).matches_string(&countries) {
            return false;
        }
    }
    if let Some(raw) = &rule.original_language {
        if !Condition::parse(raw).matches_string(&[metadata.original_language.as_str()]) {
            return false;
        }
    }
    if let Some(raw) = &rule.release_year {
        let Some(year) = metadata.year else { return false };
        if !Condition::parse(raw).matches_numeric(&[year as u32]) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Confidence;

    fn sample_metadata() -> CatalogMetadata {
        CatalogMetadata {
            id: 1,
            name: "Show".to_string(),
            original_name: "Show".to_string(),
            year: Some(2015),
            alternative_titles: Vec::new(),
            translations: Vec::new(),
            seasons: Vec::new(),
            confidence: Confidence::High,
            search_language: None,
            genre_ids: vec![18, 10759],
            origin_country: vec!["KR".to_string()],
            original_language: "ko".to_string(),
        }
    }

    fn rule(name: &str) -> CategoryRule {
        CategoryRule {
            name: name.to_string(),
            genre_ids: None,
            origin_country: None,
            original_language: None,
            release_year: None,
        }
    }

    #[test]
    fn test_matches_on_origin_country() {
        let rules = vec![
            CategoryRule { origin_country: Some("KR,JP".to_string()), ..rule("Asian Dramas") },
            rule("Other"),
        ];
        assert_eq!(classify(&sample_metadata(), &rules).as_deref(), Some("Asian Dramas"));
    }

    #[test]
    fn test_negated_condition() {
        let rules = vec![
            CategoryRule { origin_country: Some("!US".to_string()), ..rule("Non-US") },
            rule("Other"),
        ];
        assert_eq!(classify(&sample_metadata(), &rules).as_deref(), Some("Non-US"));
    }

    #[test]
    fn test_release_year_range() {
        let rules = vec![
            CategoryRule { release_year: Some("2010-2019".to_string()), ..rule("2010s") },
            rule("Other"),
        ];
        assert_eq!(classify(&sample_metadata(), &rules).as_deref(), Some("2010s"));
    }

    #[test]
    fn test_first_match_wins_declaration_order() {
        let rules = vec![
            CategoryRule { genre_ids: Some("18".to_string()), ..rule("Drama") },
            CategoryRule { origin_country: Some("KR".to_string()), ..rule("Korean") },
        ];
        assert_eq!(classify(&sample_metadata(), &rules).as_deref(), Some("Drama"));
    }

    #[test]
    fn test_no_match_and_no_fallback_rule_yields_other() {
        let rules = vec![CategoryRule { origin_country: Some("US".to_string()), ..rule("American") }];
        assert_eq!(classify(&sample_metadata(), &rules).as_deref(), Some("Other"));
    }

    #[test]
    fn test_no_rules_configured_yields_none() {
        assert_eq!(classify(&sample_metadata(), &[]), None);
    }

    #[test]
    fn test_unconditional_rule_is_fallback() {
        let rules = vec![
            rule("Everything"),
            CategoryRule { origin_country: Some("KR".to_string()), ..rule("Korean") },
        ];
        assert_eq!(classify(&sample_metadata(), &rules).as_deref(), Some("Everything"));
    }
}
