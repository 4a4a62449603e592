//! TMDB API preflight check.

use super::CheckResult;
use crate::services::tmdb::{TmdbClient, TmdbConfig};

pub async fn check(api_key: Option<&str>) -> CheckResult {
    let Some(api_key) = api_key else {
        return CheckResult::fail(
            "TMDB API",
            "API key not configured",
            "Set tmdb.api_key in the config file or TMDB_API_KEY in the environment",
        );
    };

    let client = TmdbClient::new(TmdbConfig::new(api_key.to_string()));
    match client.verify_api_key().await {
        Ok(true) => CheckResult::ok("TMDB API", "connected"),
        Ok(false) => CheckResult::fail("TMDB API", "invalid API key", "Check your tmdb.api_key setting"),
        Err(_) => CheckResult::fail("TMDB API", "connection failed", "Check your network connection"),
    }
}
