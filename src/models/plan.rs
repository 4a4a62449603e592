//! Plan data model: the planner's `(source_path, destination_path)`
//! operation list per show, with the selection flags §6 and §9 describe.

use super::job::UnprocessedShow;
use super::media::FolderType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedEpisode {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub season_number: u32,
    pub episode_number: u32,
    pub end_episode_number: Option<u32>,
    /// Deselected episodes drop during commit-phase filtering (§6
    /// "Selection semantics").
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedSeason {
    pub season_number: u32,
    pub episodes: Vec<PlannedEpisode>,
    /// Open Question (§9, resolved): season-level flag wins over
    /// individually re-selected episodes.
    pub selected: bool,
    /// The season's real source subfolder (e.g. `S02`, `第二季`), when the
    /// show is laid out as `SEASON_SUBFOLDERS`. `None` for `DIRECT_FILES`,
    /// where the show's own folder is the only source and there is no
    /// separate per-season subfolder to clean up.
    pub source_folder: Option<PathBuf>,
}

impl PlannedSeason {
    /// A season with no remaining selected episodes drops during
    /// commit-phase filtering, and so does a season explicitly deselected
    /// regardless of its episodes' own flags (season flag wins).
    pub fn effectively_selected(&self) -> bool {
        self.selected && self.episodes.iter().any(|e| e.selected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedShow {
    pub display_name: String,
    pub folder_type: FolderType,
    pub original_folder: PathBuf,
    pub destination_folder: PathBuf,
    pub category: Option<String>,
    pub confidence: Option<crate::models::catalog::Confidence>,
    pub catalog_id: Option<u64>,
    pub seasons: Vec<PlannedSeason>,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub shows: Vec<PlannedShow>,
    pub unprocessed: Vec<UnprocessedShow>,
}

impl Plan {
    pub fn total_operations(&self) -> usize {
        self.shows
            .iter()
            .flat_map(|s| s.seasons.iter())
            .map(|s| s.episodes.len())
            .sum()
    }
}

pub fn save_plan(plan: &Plan, path: &std::path::Path) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_plan(path: &std::path::Path) -> crate::Result<Plan> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| crate::Error::InvalidPlanFile(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| crate::Error::InvalidPlanFile(e.to_string()))
}
