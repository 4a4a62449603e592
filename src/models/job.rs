//! Inert data shape for the external `Job` collaborator (§3, §6). No HTTP
//! surface or key/value store is implemented - per SPEC_FULL.md §3 those
//! remain explicit Non-goals. This struct only gives the `plan`/`execute`
//! CLI commands something concrete to serialize and print.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Terminal states forbid further transitions (§4.5 "State machine").
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnprocessedShow {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedShow {
    pub name: String,
    pub season_count: usize,
    pub episode_count: usize,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub stats: HashMap<String, u64>,
    pub processed_shows: Vec<ProcessedShow>,
    pub unprocessed_shows: Vec<UnprocessedShow>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl Job {
    pub fn new(id: String, input_dir: PathBuf, output_dir: PathBuf, now: DateTime<Utc>) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            input_dir,
            output_dir,
            stats: HashMap::new(),
            processed_shows: Vec::new(),
            unprocessed_shows: Vec::new(),
            created_at: now,
            updated_at: now,
            error: None,
        }
    }

    /// Transition to `next`, refusing to leave a terminal state.
    pub fn transition(&mut self, next: JobStatus, now: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = next;
        self.updated_at = now;
        true
    }
}
