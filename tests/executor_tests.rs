//! Integration tests for the move executor against a real temp-directory
//! filesystem: season-folder cleanup after a full season moves out, and
//! dry-run leaving the source tree untouched.

use chrono::Utc;
use std::fs;
use tempfile::tempdir;
use tv_organizer::core::executor::{execute_plan, ExecutorConfig};
use tv_organizer::models::catalog::Confidence;
use tv_organizer::models::media::FolderType;
use tv_organizer::models::plan::{Plan, PlannedEpisode, PlannedSeason, PlannedShow};

fn season_subfolder_show(original_folder: std::path::PathBuf, destination_folder: std::path::PathBuf) -> PlannedShow {
    let season_dir = original_folder.join("Season 1");
    fs::create_dir_all(&season_dir).unwrap();
    let source = season_dir.join("ep1.mkv");
    fs::write(&source, b"x").unwrap();

    PlannedShow {
        display_name: "Show".to_string(),
        folder_type: FolderType::SeasonSubfolders,
        original_folder,
        destination_folder: destination_folder.clone(),
        category: None,
        confidence: Some(Confidence::High),
        catalog_id: Some(1),
        seasons: vec![PlannedSeason {
            season_number: 1,
            selected: true,
            source_folder: Some(season_dir),
            episodes: vec![PlannedEpisode {
                source,
                destination: destination_folder.join("Season 1").join("Show - S01E01.mkv"),
                season_number: 1,
                episode_number: 1,
                end_episode_number: None,
                selected: true,
            }],
        }],
        selected: true,
    }
}

#[tokio::test]
async fn test_execute_plan_removes_emptied_season_and_show_folders() {
    let root = tempdir().unwrap();
    let original = root.path().join("source").join("Show");
    let destination = root.path().join("dest").join("Show");

    let show = season_subfolder_show(original.clone(), destination.clone());

    let plan = Plan {
        version: 1,
        created_at: Utc::now(),
        source_path: root.path().join("source"),
        target_path: root.path().join("dest"),
        shows: vec![show],
        unprocessed: Vec::new(),
    };

    let summary = execute_plan(&plan, &ExecutorConfig::default()).await.unwrap();

    assert_eq!(summary.moved, 1);
    assert_eq!(summary.failed, 0);
    assert!(destination.join("Season 1").join("Show - S01E01.mkv").exists());
    assert!(!original.exists(), "emptied show folder should be removed");
}

#[tokio::test]
async fn test_execute_plan_dry_run_leaves_source_tree_untouched() {
    let root = tempdir().unwrap();
    let original = root.path().join("source").join("Show");
    let destination = root.path().join("dest").join("Show");

    let show = season_subfolder_show(original.clone(), destination.clone());
    let source_file = show.seasons[0].episodes[0].source.clone();

    let plan = Plan {
        version: 1,
        created_at: Utc::now(),
        source_path: root.path().join("source"),
        target_path: root.path().join("dest"),
        shows: vec![show],
        unprocessed: Vec::new(),
    };

    let config = ExecutorConfig { dry_run: true, ..ExecutorConfig::default() };
    let summary = execute_plan(&plan, &config).await.unwrap();

    assert_eq!(summary.moved, 1);
    assert!(source_file.exists(), "dry run must not touch the source file");
    assert!(!destination.exists(), "dry run must not create the destination");
}

#[tokio::test]
async fn test_execute_plan_skips_deselected_episodes() {
    let root = tempdir().unwrap();
    let original = root.path().join("source").join("Show");
    let destination = root.path().join("dest").join("Show");

    let mut show = season_subfolder_show(original.clone(), destination.clone());
    show.seasons[0].episodes[0].selected = false;

    let plan = Plan {
        version: 1,
        created_at: Utc::now(),
        source_path: root.path().join("source"),
        target_path: root.path().join("dest"),
        shows: vec![show],
        unprocessed: Vec::new(),
    };

    let summary = execute_plan(&plan, &ExecutorConfig::default()).await.unwrap();
    assert_eq!(summary.moved, 0);
}
