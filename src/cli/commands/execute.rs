//! `execute` command implementation: load a plan.json and move files.

use crate::core::executor::{execute_plan as run_executor, ExecutorConfig};
use crate::models::plan::load_plan;
use crate::Result;
use colored::Colorize;
use std::path::Path;

pub async fn run(plan_file: &Path, dry_run: bool) -> Result<()> {
    if !plan_file.exists() {
        return Err(crate::Error::PathNotFound(plan_file.display().to_string()));
    }

    println!("{}", "Loading plan...".bold().cyan());
    let plan = load_plan(plan_file)?;

    println!("  {} {}", "Source:".bold(), plan.source_path.display());
    println!("  {} {}", "Target:".bold(), plan.target_path.display());
    println!("  {} {}", "Shows:".bold(), plan.shows.len());
    println!("  {} {}", "Operations:".bold(), plan.total_operations());
    println!();

    if dry_run {
        println!("{}", "Dry run: no files will be moved.".bold().yellow());
    }

    let config = ExecutorConfig {
        dry_run,
        ..Default::default()
    };

    let summary = run_executor(&plan, &config).await?;

    println!();
    println!("{}", "Execution summary".bold().green());
    println!("  {} {}", "Moved:".bold(), summary.moved);
    println!("  {} {}", "Skipped (already exists):".bold(), summary.skipped_existing);
    println!("  {} {}", "Failed:".bold(), summary.failed);
    println!("  {} {}", "Folders removed:".bold(), summary.folders_removed);

    if !summary.errors.is_empty() {
        println!();
        println!("{}", "Errors:".bold().red());
        for err in &summary.errors {
            println!("  {}", err.red());
        }
    }

    Ok(())
}
