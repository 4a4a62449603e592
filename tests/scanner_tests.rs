//! Integration tests for the folder scanner.
//!
//! Tests cover:
//! - Root scanning and cache population
//! - DIRECT_FILES vs SEASON_SUBFOLDERS classification
//! - Sample and extras filtering
//! - Error handling for a missing or non-directory root

use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tv_organizer::core::scanner::{build_folder_structure, new_cache, scan_root};
use tv_organizer::models::media::FolderType;

#[test]
fn test_scan_root_populates_cache_for_every_show() {
    let root = tempdir().unwrap();
    fs::create_dir_all(root.path().join("Breaking.Bad.2008")).unwrap();
    fs::write(root.path().join("Breaking.Bad.2008").join("S01E01.mkv"), b"x").unwrap();
    fs::create_dir_all(root.path().join("Another.Show")).unwrap();

    let cache = new_cache();
    let shows = scan_root(root.path(), &cache).unwrap();

    assert_eq!(shows.len(), 2);
    let locked = cache.lock().unwrap();
    assert_eq!(locked.len(), 2);
}

#[test]
fn test_scan_root_missing_path_errors() {
    let cache = new_cache();
    let result = scan_root(Path::new("/nonexistent/tv-organizer-test-path"), &cache);
    assert!(result.is_err());
}

#[test]
fn test_scan_root_rejects_a_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    fs::write(&file, b"x").unwrap();

    let cache = new_cache();
    assert!(scan_root(&file, &cache).is_err());
}

#[test]
fn test_season_subfolders_with_extras_and_samples_filtered() {
    let dir = tempdir().unwrap();
    let show = dir.path().join("Show");
    let season = show.join("Season 01");
    fs::create_dir_all(&season).unwrap();
    fs::write(season.join("Show.S01E01.mkv"), b"x").unwrap();
    fs::write(season.join("Show.S01E01.sample.mkv"), b"x").unwrap();

    let extras = show.join("Extras");
    fs::create_dir_all(&extras).unwrap();
    fs::write(extras.join("behind-the-scenes.mkv"), b"x").unwrap();

    let structure = build_folder_structure(&show);
    assert_eq!(structure.folder_type, FolderType::SeasonSubfolders);
    assert!(structure.media_files.is_empty());

    let season_structure = build_folder_structure(&season);
    assert_eq!(season_structure.media_files.len(), 1);
}

#[test]
fn test_direct_files_first_media_file_recurses_into_subfolders() {
    let dir = tempdir().unwrap();
    let show = dir.path().join("Show");
    let nested = show.join("misc").join("deeper");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("clip.mkv"), b"x").unwrap();

    let structure = build_folder_structure(&show);
    assert!(structure.media_files.is_empty());
    assert!(structure.first_media_file.is_some());
}
