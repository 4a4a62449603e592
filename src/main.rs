//! tv-organizer CLI
//!
//! A command-line tool for organizing a TV show library using a local
//! LLM name extractor and TMDB.

use clap::Parser;
use colored::Colorize;
use tv_organizer::cli::{
    args::{Cli, Commands},
    commands::{execute, plan},
};
use tv_organizer::models::config::load_config;
use tv_organizer::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    if !cli.skip_preflight {
        run_preflight_checks(&config).await?;
    }

    match cli.command {
        Commands::Plan { source, target, output } => {
            plan::run(&source, &target, output.as_deref(), &config).await?;
        }
        Commands::Execute { plan_file, dry_run } => {
            execute::run(&plan_file, dry_run).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("tv_organizer=debug")
    } else {
        EnvFilter::new("tv_organizer=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and abort if any fail.
async fn run_preflight_checks(config: &tv_organizer::models::config::Config) -> anyhow::Result<()> {
    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await?;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
