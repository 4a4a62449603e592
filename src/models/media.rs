//! Core media data model: §3 of the specification.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Video containers the scanner treats as media. Subtitles travel the same
/// pipeline so they land alongside the renamed video.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "ts", "m2ts",
];

pub const SUBTITLE_EXTENSIONS: &[&str] = &[
    "srt", "ass", "ssa", "vtt", "sub", "idx", "sup", "pgs",
];

/// Whether `path`'s extension is one of the fixed video/subtitle sets,
/// case-insensitive.
pub fn is_media_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str()) || SUBTITLE_EXTENSIONS.contains(&ext.as_str())
}

pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// How a show's immediate folder is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderType {
    DirectFiles,
    SeasonSubfolders,
}

impl std::fmt::Display for FolderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FolderType::DirectFiles => write!(f, "direct_files"),
            FolderType::SeasonSubfolders => write!(f, "season_subfolders"),
        }
    }
}

/// A single media file resolved to a season/episode position. Created by
/// the planner; immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub source_path: PathBuf,
    pub show_name: String,
    /// 0 denotes "Specials".
    pub season_number: u32,
    pub episode_number: u32,
    /// Strictly greater than `episode_number`, same season, for
    /// multi-episode files.
    pub end_episode_number: Option<u32>,
    /// Includes the leading dot.
    pub extension: String,
    pub catalog_title: Option<String>,
}

impl Episode {
    pub fn new(
        source_path: PathBuf,
        show_name: String,
        season_number: u32,
        episode_number: u32,
        end_episode_number: Option<u32>,
    ) -> Self {
        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        Self {
            source_path,
            show_name,
            season_number,
            episode_number,
            end_episode_number,
            extension,
            catalog_title: None,
        }
    }

    pub fn is_multi_episode(&self) -> bool {
        self.end_episode_number.is_some()
    }

    /// Default display title used when no catalog title has been resolved.
    pub fn default_title(&self) -> String {
        match self.end_episode_number {
            Some(end) => format!("Episode {:02}-{:02}", self.episode_number, end),
            None => format!("Episode {:02}", self.episode_number),
        }
    }
}

/// Ordered collection of episodes for one season of one show. Two seasons
/// with the same show and number never coexist in a TVShow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub show_name: String,
    pub season_number: u32,
    pub episodes: Vec<Episode>,
    pub original_folder: PathBuf,
}

/// One show discovered under the input root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TVShow {
    pub display_name: String,
    pub folder_type: FolderType,
    pub original_folder: PathBuf,
    pub seasons: Vec<Season>,
    pub metadata: Option<crate::models::catalog::CatalogMetadata>,
    pub category: Option<String>,
}

impl TVShow {
    pub fn total_episodes(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}

/// Lazily-populated, process-lifetime cache entry describing one folder's
/// immediate contents and classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderStructure {
    pub path: PathBuf,
    pub folder_type: FolderType,
    pub media_files: Vec<PathBuf>,
    pub subdirs: Vec<PathBuf>,
    /// First media file discovered, possibly by recursing into
    /// subdirectories; used to give the name extractor extra context.
    pub first_media_file: Option<PathBuf>,
}

impl FolderStructure {
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            folder_type: FolderType::DirectFiles,
            media_files: Vec::new(),
            subdirs: Vec::new(),
            first_media_file: None,
        }
    }
}
