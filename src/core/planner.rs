//! Planner: wires the pipeline stages together into a `Plan`. For each
//! show folder under the input root: extract a name, resolve it against
//! the catalog, classify its category, then lay out every episode's
//! destination path (§4 end-to-end, §5 "Planner").

use crate::core::scanner::{self, immediate_media_files, CatalogCache, FolderStructureCache};
use crate::core::{classifier, name_extractor, pattern, resolver};
use crate::models::catalog::CatalogMetadata;
use crate::models::config::Config;
use crate::models::extracted_name::ExtractedName;
use crate::models::job::UnprocessedShow;
use crate::models::media::FolderType;
use crate::models::plan::{Plan, PlannedEpisode, PlannedSeason, PlannedShow};
use crate::services::llm::NameModelClient;
use crate::services::tmdb::CatalogClient;
use crate::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};

pub struct Planner<'a> {
    pub config: &'a Config,
    pub name_model: &'a dyn NameModelClient,
    pub catalog: &'a dyn CatalogClient,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a Config, name_model: &'a dyn NameModelClient, catalog: &'a dyn CatalogClient) -> Self {
        Self { config, name_model, catalog }
    }

    pub async fn generate_plan(&self, source: &Path, target: &Path) -> Result<Plan> {
        let scanner_cache: FolderStructureCache = scanner::new_cache();
        let catalog_cache: CatalogCache = resolver::new_cache();

        let show_dirs = scanner::scan_root(source, &scanner_cache)?;

        let folder_names: Vec<String> = show_dirs
            .iter()
            .map(|d| d.file_name().unwrap_or_default().to_string_lossy().into_owned())
            .collect();

        let extractor_config = name_extractor::ExtractorConfig::from_rate_limit(
            self.config.llm.batch_size,
            self.config.llm.rate_limit,
        );
        let extracted_names =
            name_extractor::extract_names(self.name_model, &extractor_config, &folder_names).await;

        let mut shows = Vec::new();
        let mut unprocessed = Vec::new();

        for (dir, name) in show_dirs.iter().zip(extracted_names) {
            let structure = scanner::folder_structure(dir, &scanner_cache);
            let folder_name = dir.file_name().unwrap_or_default().to_string_lossy().into_owned();

            match self
                .plan_one_show(dir, &structure.folder_type, &name, &folder_name, target, &catalog_cache)
                .await
            {
                Ok(show) => shows.push(show),
                Err(reason) => {
                    tracing::warn!(folder = %folder_name, reason = %reason, "show skipped, recorded as unprocessed");
                    unprocessed.push(UnprocessedShow { name: folder_name, reason });
                }
            }
        }

        Ok(Plan {
            version: 1,
            created_at: Utc::now(),
            source_path: source.to_path_buf(),
            target_path: target.to_path_buf(),
            shows,
            unprocessed,
        })
    }

    async fn plan_one_show(
        &self,
        dir: &Path,
        folder_type: &FolderType,
        name: &ExtractedName,
        folder_name: &str,
        target: &Path,
        catalog_cache: &CatalogCache,
    ) -> std::result::Result<PlannedShow, String> {
        let detected_season = pattern::extract_season_number(folder_name, 1, pattern::SeasonMode::Folder);

        let ctx = resolver::ResolveContext { folder_type: *folder_type, detected_season };
        let metadata = resolver::resolve(
            self.catalog,
            catalog_cache,
            name,
            folder_name,
            ctx,
            &self.config.tmdb.languages,
        )
        .await
        .ok_or_else(|| "no TMDB match".to_string())?;

        // Glossary: "only high matches are organized" - anything else is
        // recorded unprocessed rather than planned (§7 "Low confidence
        // match" disposition).
        if metadata.confidence != crate::models::catalog::Confidence::High {
            return Err("low confidence match".to_string());
        }

        let category = classifier::classify(&metadata, &self.config.category);
        let display_name = metadata.name.clone();
        let show_folder = pattern::show_folder_name(&display_name, metadata.year, Some(metadata.id));
        let mut destination_folder = target.to_path_buf();
        if let Some(cat) = &category {
            destination_folder = destination_folder.join(sanitize_path_component(cat));
        }
        destination_folder = destination_folder.join(sanitize_path_component(&show_folder));

        let seasons = match folder_type {
            FolderType::DirectFiles => {
                vec![self.plan_season_from_files(dir, detected_season, &display_name, &metadata, &destination_folder)]
            }
            FolderType::SeasonSubfolders => {
                self.plan_seasons_from_subfolders(dir, &display_name, &metadata, &destination_folder)
            }
        };

        Ok(PlannedShow {
            display_name,
            folder_type: *folder_type,
            original_folder: dir.to_path_buf(),
            destination_folder,
            category,
            confidence: Some(metadata.confidence.clone()),
            catalog_id: Some(metadata.id),
            seasons,
            selected: true,
        })
    }

    fn plan_season_from_files(
        &self,
        dir: &Path,
        season_number: u32,
        display_name: &str,
        metadata: &CatalogMetadata,
        destination_folder: &Path,
    ) -> PlannedSeason {
        let files = immediate_media_files(dir);
        let episodes = files
            .iter()
            .enumerate()
            .map(|(idx, file)| {
                self.plan_episode(file, season_number, false, (idx + 1) as u32, display_name, metadata, destination_folder)
            })
            .collect();

        PlannedSeason { season_number, episodes, selected: true, source_folder: None }
    }

    fn plan_seasons_from_subfolders(
        &self,
        dir: &Path,
        display_name: &str,
        metadata: &CatalogMetadata,
        destination_folder: &Path,
    ) -> Vec<PlannedSeason> {
        let mut subdirs: Vec<PathBuf> = std::fs::read_dir(dir)
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).filter(|p| p.is_dir()).collect())
            .unwrap_or_default();
        subdirs.sort();

        subdirs
            .iter()
            .enumerate()
            .map(|(idx, subdir)| {
                let subdir_name = subdir.file_name().unwrap_or_default().to_string_lossy().into_owned();
                let season_number = pattern::extract_season_number(
                    &subdir_name,
                    (idx + 1) as u32,
                    pattern::SeasonMode::Folder,
                );
                let files = immediate_media_files(subdir);
                let episodes = files
                    .iter()
                    .enumerate()
                    .map(|(file_idx, file)| {
                        self.plan_episode(
                            file,
                            season_number,
                            true,
                            (file_idx + 1) as u32,
                            display_name,
                            metadata,
                            destination_folder,
                        )
                    })
                    .collect();
                PlannedSeason { season_number, episodes, selected: true, source_folder: Some(subdir.clone()) }
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_episode(
        &self,
        file: &Path,
        season_number: u32,
        season_is_authoritative: bool,
        position: u32,
        display_name: &str,
        metadata: &CatalogMetadata,
        destination_folder: &Path,
    ) -> PlannedEpisode {
        let filename = file.file_name().unwrap_or_default().to_string_lossy().into_owned();
        let info = pattern::extract_episode_info(&filename, position);
        // A season subfolder's own name is authoritative; for DIRECT_FILES
        // the per-filename season marker wins over the folder-level guess
        // when the file actually names one.
        let resolved_season = if season_is_authoritative { season_number } else { info.season };

        let mut episode = crate::models::media::Episode::new(
            file.to_path_buf(),
            display_name.to_string(),
            resolved_season,
            info.episode,
            info.end_episode,
        );
        episode.catalog_title = metadata.season(resolved_season).and_then(|s| {
            let start_title = s
                .episodes
                .iter()
                .find(|e| e.episode_number == info.episode)
                .map(|e| e.title.clone())?;
            match info.end_episode {
                // Multi-episode files join only the first and last episode
                // titles with "-" (§4.5 step 2), not every title in between.
                Some(end) => {
                    let end_title = s.episodes.iter().find(|e| e.episode_number == end).map(|e| e.title.clone());
                    match end_title {
                        Some(end_title) if end_title != start_title => {
                            Some(format!("{start_title}-{end_title}"))
                        }
                        _ => Some(start_title),
                    }
                }
                None => Some(start_title),
            }
        });

        let generated_name = pattern::generate_filename(&episode, None);
        let destination = destination_folder
            .join(pattern::season_folder_name(resolved_season))
            .join(generated_name);

        PlannedEpisode {
            source: episode.source_path,
            destination,
            season_number: resolved_season,
            episode_number: episode.episode_number,
            end_episode_number: episode.end_episode_number,
            selected: true,
        }
    }
}

/// Replace any illegal or ambiguous path component characters before
/// joining into the destination tree.
fn sanitize_path_component(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '<' | '>' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            ':' => '：',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_component_strips_illegal_chars() {
        assert_eq!(sanitize_path_component("A/B:C"), "A_B：C");
    }
}
