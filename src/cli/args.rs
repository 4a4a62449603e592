//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tv-organizer - Organize a TV show library using an LLM name extractor and TMDB
#[derive(Parser, Debug)]
#[command(name = "tv-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    /// Path to config.toml (default: $XDG_CONFIG_HOME/tv-organizer/config.toml)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a library and write out a plan.json without moving anything
    Plan {
        /// Source directory containing TV show folders
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Target directory organized output will land under
        #[arg(short, long, value_name = "TARGET")]
        target: PathBuf,

        /// Output path for plan.json (default: <source>/plan.json)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Execute a previously generated plan.json
    Execute {
        /// Path to the plan.json file
        #[arg(value_name = "PLAN_FILE")]
        plan_file: PathBuf,

        /// Show what would be moved without touching the filesystem
        #[arg(long)]
        dry_run: bool,
    },
}
