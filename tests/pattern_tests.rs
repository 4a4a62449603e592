//! Integration tests for the pattern engine's public surface: season/episode
//! extraction from real-shaped filenames, and the folder-naming helpers used
//! by the planner's destination layout.

use tv_organizer::core::pattern::{
    extract_episode_info, extract_season_number, season_folder_name, show_folder_name, SeasonMode,
};

#[test]
fn test_extract_season_number_from_folder_name_variants() {
    assert_eq!(extract_season_number("Season 2", 1, SeasonMode::Folder), 2);
    assert_eq!(extract_season_number("S03", 1, SeasonMode::Folder), 3);
    assert_eq!(extract_season_number("第三季", 1, SeasonMode::Folder), 3);
    assert_eq!(extract_season_number("第十季", 1, SeasonMode::Folder), 10);
    assert_eq!(extract_season_number("Random Folder", 1, SeasonMode::Folder), 1);
}

#[test]
fn test_extract_episode_info_from_filename() {
    let info = extract_episode_info("Breaking.Bad.S01E05.1080p.mkv", 1);
    assert_eq!(info.season, 1);
    assert_eq!(info.episode, 5);
    assert_eq!(info.end_episode, None);
}

#[test]
fn test_extract_episode_info_multi_episode_range() {
    let info = extract_episode_info("Show.S02E01-E03.mkv", 1);
    assert_eq!(info.season, 2);
    assert_eq!(info.episode, 1);
    assert_eq!(info.end_episode, Some(3));
}

#[test]
fn test_extract_episode_info_falls_back_to_position() {
    let info = extract_episode_info("random_clip.mkv", 7);
    assert_eq!(info.episode, 7);
}

#[test]
fn test_season_folder_name_format() {
    assert_eq!(season_folder_name(1), "Season 1");
    assert_eq!(season_folder_name(12), "Season 12");
}

#[test]
fn test_show_folder_name_builds_full_destination_component() {
    assert_eq!(
        show_folder_name("Breaking Bad", Some(2008), Some(1396)),
        "Breaking Bad (2008) {tmdb-1396}"
    );
    assert_eq!(show_folder_name("Breaking Bad", None, None), "Breaking Bad");
}
