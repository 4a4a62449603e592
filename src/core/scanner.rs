//! Folder Scanner, §4.1.
//!
//! Enumerates immediate subdirectories of the input root, classifies each
//! as `DIRECT_FILES` or `SEASON_SUBFOLDERS`, and populates a
//! `FolderStructure` cache entry (recursively) for each one.

use crate::models::media::{is_media_file, FolderStructure, FolderType};
use crate::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

/// Process-lifetime, mutex-protected cache of `FolderStructure` entries
/// keyed by absolute folder path (§3 "FolderStructure (cache entry)",
/// §5 "Shared state"). Handed in explicitly rather than held as a global,
/// per the redesign note in §9.
pub type FolderStructureCache = Arc<Mutex<HashMap<PathBuf, FolderStructure>>>;

pub fn new_cache() -> FolderStructureCache {
    Arc::new(Mutex::new(HashMap::new()))
}

/// Whether a filename looks like a sample/preview clip that should not be
/// treated as a real episode.
fn is_sample_filename(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.contains("sample") && !lower.contains("sampler")
}

/// Whether a path traverses an "Extras"-style directory (behind the
/// scenes, featurettes, deleted scenes) that should be skipped during
/// scanning.
fn is_in_extras_directory(path: &Path) -> bool {
    const EXTRAS_NAMES: &[&str] = &[
        "extras",
        "extra",
        "featurettes",
        "featurette",
        "behind the scenes",
        "behindthescenes",
        "deleted scenes",
        "deletedscenes",
        "making of",
        "makingof",
        "bonus",
        "bonuses",
        "special features",
        "specialfeatures",
    ];

    for component in path.components() {
        if let std::path::Component::Normal(name) = component {
            let name_str = name.to_string_lossy().to_lowercase();
            if EXTRAS_NAMES.iter().any(|&n| name_str == n) {
                return true;
            }
            if name_str.contains(".extras")
                || name_str.contains("-extras")
                || name_str.contains("_extras")
                || name_str.contains(".featurette")
                || name_str.contains("-featurette")
            {
                return true;
            }
        }
    }
    false
}

/// Enumerate the sorted list of media files directly inside `dir` (not
/// recursing), skipping samples and extras directories.
pub fn immediate_media_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_file() && is_media_file(&path) {
            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !is_sample_filename(filename) {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Enumerate the sorted list of immediate subdirectories of `dir`.
fn immediate_subdirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return dirs;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    dirs
}

/// Recurse depth-first into sorted subdirectories until a media file is
/// found, for extractor context (§4.1 "First-file discovery").
fn find_first_media_file_recursive(dir: &Path) -> Option<PathBuf> {
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_media_file(path) && !is_in_extras_directory(path) {
            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !is_sample_filename(filename) {
                return Some(path.to_path_buf());
            }
        }
    }
    None
}

/// Build the `FolderStructure` for a single show folder. A folder that
/// fails to enumerate (permission error, vanished between listing and
/// stat) produces an empty structure rather than aborting the scan
/// (§4.1 "Failure semantics").
pub fn build_folder_structure(dir: &Path) -> FolderStructure {
    let media_files = immediate_media_files(dir);
    let subdirs = immediate_subdirs(dir);

    let folder_type = if !media_files.is_empty() {
        FolderType::DirectFiles
    } else {
        let any_subdir_has_media = subdirs.iter().any(|sub| !immediate_media_files(sub).is_empty());
        if any_subdir_has_media {
            FolderType::SeasonSubfolders
        } else {
            FolderType::DirectFiles
        }
    };

    let first_media_file = if !media_files.is_empty() {
        Some(media_files[0].clone())
    } else {
        find_first_media_file_recursive(dir)
    };

    FolderStructure {
        path: dir.to_path_buf(),
        folder_type,
        media_files,
        subdirs,
        first_media_file,
    }
}

/// Scan the immediate children of `root`, returning the sorted list of
/// show folders and populating `cache` with each one's structure.
pub fn scan_root(root: &Path, cache: &FolderStructureCache) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(crate::Error::InputRootMissing(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(crate::Error::NotADirectory(root.display().to_string()));
    }

    let mut show_dirs = immediate_subdirs(root);
    show_dirs.sort();

    let mut locked = cache.lock().unwrap();
    for dir in &show_dirs {
        let structure = build_folder_structure(dir);
        locked.insert(dir.clone(), structure);
    }

    Ok(show_dirs)
}

/// Fetch a previously-cached structure, computing and inserting it on miss.
pub fn folder_structure(dir: &Path, cache: &FolderStructureCache) -> FolderStructure {
    {
        let locked = cache.lock().unwrap();
        if let Some(existing) = locked.get(dir) {
            return existing.clone();
        }
    }
    let structure = build_folder_structure(dir);
    cache.lock().unwrap().insert(dir.to_path_buf(), structure.clone());
    structure
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_sample_filename() {
        assert!(is_sample_filename("sample.mkv"));
        assert!(is_sample_filename("movie-sample.mkv"));
        assert!(!is_sample_filename("movie.mkv"));
        assert!(!is_sample_filename("sampler.mkv"));
    }

    #[test]
    fn test_direct_files_classification() {
        let dir = tempdir().unwrap();
        let show_dir = dir.path().join("Breaking.Bad");
        std::fs::create_dir_all(&show_dir).unwrap();
        std::fs::write(show_dir.join("Breaking.Bad.S01E01.mp4"), b"x").unwrap();

        let structure = build_folder_structure(&show_dir);
        assert_eq!(structure.folder_type, FolderType::DirectFiles);
        assert_eq!(structure.media_files.len(), 1);
    }

    #[test]
    fn test_season_subfolders_classification() {
        let dir = tempdir().unwrap();
        let show_dir = dir.path().join("Show");
        let season_dir = show_dir.join("Season 1");
        std::fs::create_dir_all(&season_dir).unwrap();
        std::fs::write(season_dir.join("S01E01.mkv"), b"x").unwrap();

        let structure = build_folder_structure(&show_dir);
        assert_eq!(structure.folder_type, FolderType::SeasonSubfolders);
        assert!(structure.media_files.is_empty());
    }

    #[test]
    fn test_degenerate_empty_folder_is_direct_files() {
        let dir = tempdir().unwrap();
        let show_dir = dir.path().join("Empty");
        std::fs::create_dir_all(&show_dir).unwrap();

        let structure = build_folder_structure(&show_dir);
        assert_eq!(structure.folder_type, FolderType::DirectFiles);
    }

    #[test]
    fn test_scan_root_missing() {
        let cache = new_cache();
        let result = scan_root(Path::new("/nonexistent/path/xyz"), &cache);
        assert!(result.is_err());
    }
}
