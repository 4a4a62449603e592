//! `plan` command implementation: scan, extract, resolve, classify, and
//! write out `plan.json`, without touching the filesystem.

use crate::core::planner::Planner;
use crate::models::config::Config;
use crate::models::plan::save_plan;
use crate::services::llm::OllamaClient;
use crate::services::tmdb::{TmdbClient, TmdbConfig};
use crate::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

pub async fn run(source: &Path, target: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    println!("{}", "Planning TV show organization...".bold().cyan());
    println!("  {} {}", "Source:".bold(), source.display());
    println!("  {} {}", "Target:".bold(), target.display());
    println!();

    let api_key = config
        .tmdb
        .api_key
        .clone()
        .ok_or(crate::Error::CatalogApiKeyMissing)?;
    let catalog = TmdbClient::new(TmdbConfig::new(api_key).with_rate_limit(config.tmdb.rate_limit));
    let name_model = OllamaClient::new(crate::services::llm::LlmConfig {
        base_url: config.llm.base_url.clone(),
        model: config.llm.model.clone(),
        ..Default::default()
    });

    let planner = Planner::new(config, &name_model, &catalog);
    let plan = planner.generate_plan(source, target).await?;

    println!("{}", "Plan summary".bold().green());
    println!("  {} {}", "Shows resolved:".bold(), plan.shows.len());
    println!("  {} {}", "Shows unresolved:".bold(), plan.unprocessed.len());
    println!("  {} {}", "Total operations:".bold(), plan.total_operations());
    println!();

    let output_path = output.map(Path::to_path_buf).unwrap_or_else(|| source.join("plan.json"));
    save_plan(&plan, &output_path)?;
    println!("{} {}", "Plan saved to:".bold().green(), output_path.display());

    if !plan.unprocessed.is_empty() {
        println!();
        println!("{}", "Unresolved folders:".bold().yellow());
        for show in &plan.unprocessed {
            println!("  {} - {}", show.name.red(), show.reason);
        }
    }

    println!();
    println!("Next: {}", format!("tv-organizer execute {}", output_path.display()).cyan());

    Ok(())
}

pub fn default_output_path(source: &Path) -> PathBuf {
    source.join("plan.json")
}
