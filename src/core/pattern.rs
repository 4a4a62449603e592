//! Pattern Engine, §4.2: pure text routines extracting season/episode
//! numbers from folder and file names, plus the filename generator.
//! Pure functions over `regex::Regex`, tested inline.

use crate::models::media::Episode;
use crate::utils::chinese::parse_chinese_number;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern engine regex must compile")
}

// ---------------------------------------------------------------------
// Metadata normalization
// ---------------------------------------------------------------------

macro_rules! metadata_pattern {
    ($name:ident, $src:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| re($src));
    };
}

metadata_pattern!(RE_RESOLUTION, r"(?i)\b(2160|1080|720|480|360|240)[pi]\b|\b[248]k\b(?![a-z0-9])");
metadata_pattern!(
    RE_CODEC,
    r"(?i)\b(h\.?26[456]|x26[45]|hevc|avc|av1|vp9|vp8|vc-1|mpeg-?[24]|prores|dnxhd|dnxhr|xvid|divx|vvc)\b"
);
metadata_pattern!(
    RE_AUDIO_CODEC,
    r"(?i)\b(aac|ac-?3|e-?ac-?3|ddp|dts(-?hd|-?hdma)?|truehd|atmos|flac|mp3|opus|vorbis|pcm)(?:[\s._-]*\d\.?\d)?\b"
);
metadata_pattern!(RE_HDR, r"(?i)\b(hdr10\+|hdr10|dolby\s*vision|dv|hdr)\b");
metadata_pattern!(
    RE_SOURCE,
    r"(?i)\b(web-?dl|webrip|bluray|bdrip|dvdrip|hdtv|uhdtv|uhd|remux|cam|tc|scr|dvdscr|ts)\b"
);
metadata_pattern!(
    RE_STREAMING,
    r"(?i)\b(nf|dsnp|amzn|hmax|hulu|atvp|dspy|hbo|max)\b"
);
metadata_pattern!(RE_AUDIO_TRACKS, r"(?i)\b\d+\s*audios?\b");
metadata_pattern!(RE_FRAME_RATE, r"(?i)\b\d+\s*(fps|帧)\b");
metadata_pattern!(RE_FILE_SIZE, r"(?i)\b\d+\.\d+\s*(gb|mb|tb|kb)\b");
metadata_pattern!(RE_YEAR_WITH_TOKEN, r"(?i)(web-?dl|bluray|hdtv|webrip|remux)\s*(19|20)\d{2}\b");
metadata_pattern!(RE_BARE_YEAR, r"\b(19|20)\d{2}\b");
metadata_pattern!(RE_WHITESPACE, r"\s+");

/// Strip the release-noise token classes named in spec §4.2 before any
/// numeric extraction. `preserve_years`: when true, only strip years that
/// are immediately preceded by a recognized metadata token; when false,
/// strip any bare 1900-2099 token.
pub fn normalize_metadata(text: &str, preserve_years: bool) -> String {
    let mut s = text.to_string();

    s = RE_AUDIO_CODEC.replace_all(&s, " ").to_string();
    s = RE_RESOLUTION.replace_all(&s, " ").to_string();
    s = RE_CODEC.replace_all(&s, " ").to_string();
    s = RE_HDR.replace_all(&s, " ").to_string();
    s = RE_SOURCE.replace_all(&s, " ").to_string();
    s = RE_STREAMING.replace_all(&s, " ").to_string();
    s = RE_AUDIO_TRACKS.replace_all(&s, " ").to_string();
    s = RE_FRAME_RATE.replace_all(&s, " ").to_string();
    s = RE_FILE_SIZE.replace_all(&s, " ").to_string();

    if preserve_years {
        s = RE_YEAR_WITH_TOKEN
            .replace_all(&s, |caps: &regex::Captures| caps.get(1).unwrap().as_str().to_string())
            .to_string();
    } else {
        s = RE_BARE_YEAR.replace_all(&s, " ").to_string();
    }

    RE_WHITESPACE.replace_all(s.trim(), " ").to_string()
}

// ---------------------------------------------------------------------
// Season extraction
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonMode {
    Folder,
    File,
}

metadata_pattern!(RE_EPISODE_COUNT, r"(?i)(全|共|总)?\d+集");
metadata_pattern!(RE_SEASON_SXX, r"(?i)S(?:eason\s*)?(\d+)");
metadata_pattern!(RE_SEASON_DI, r"第([一二三四五六七八九十壹贰叁肆伍陆柒捌玖拾\d]+)季");
metadata_pattern!(RE_SEASON_BARE_NUM, r"([一二三四五六七八九十壹贰叁肆伍陆柒捌玖拾]+)季");
metadata_pattern!(RE_SEASON_UNIT, r"(\d+)\s*单元");
metadata_pattern!(RE_SEASON_FALLBACK, r"(?:^|[^\d])([1-9]\d?)(?:[^\d]|$)");

/// Extract a season number from `text` (either a folder name or a
/// filename, per `mode`). Returns `fallback` if nothing matches.
pub fn extract_season_number(text: &str, fallback: u32, mode: SeasonMode) -> u32 {
    let normalized = normalize_metadata(text, true);
    let working = if mode == SeasonMode::Folder {
        RE_EPISODE_COUNT.replace_all(&normalized, " ").to_string()
    } else {
        normalized
    };

    if let Some(caps) = RE_SEASON_SXX.captures(&working) {
        if let Ok(n) = caps[1].parse::<u32>() {
            if n <= 100 {
                return n;
            }
        }
    }
    if let Some(caps) = RE_SEASON_DI.captures(&working) {
        let raw = &caps[1];
        let n = if raw.chars().all(|c| c.is_ascii_digit()) {
            raw.parse().unwrap_or(0)
        } else {
            parse_chinese_number(raw)
        };
        if n > 0 && n <= 100 && !looks_like_year(&working, caps.get(1).unwrap().start()) {
            return n;
        }
    }
    if let Some(caps) = RE_SEASON_BARE_NUM.captures(&working) {
        let n = parse_chinese_number(&caps[1]);
        if n > 0 && n <= 100 {
            return n;
        }
    }
    if let Some(caps) = RE_SEASON_UNIT.captures(&working) {
        if let Ok(n) = caps[1].parse::<u32>() {
            if n <= 100 {
                return n;
            }
        }
    }
    if let Some(caps) = RE_SEASON_FALLBACK.captures(&working) {
        let m = caps.get(1).unwrap();
        if let Ok(n) = m.as_str().parse::<u32>() {
            if n <= 100 && !looks_like_year(&working, m.start()) {
                return n;
            }
        }
    }

    fallback
}

/// The nearest char boundary at or before `index` - `text[index..]`/
/// `text[..index]` panic on a byte offset that lands mid-codepoint, which
/// raw `saturating_sub`/`+n` arithmetic over CJK text does constantly.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// The nearest char boundary at or after `index`.
fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// A substring window around byte range `[start, end)`, clamped inward and
/// outward to the nearest valid char boundaries so multibyte (e.g. CJK)
/// text never panics on a slice that would otherwise cut a codepoint.
fn char_safe_window(text: &str, start: usize, end: usize) -> &str {
    let start = floor_char_boundary(text, start);
    let end = ceil_char_boundary(text, end.max(start));
    &text[start..end]
}

/// Whether the position `idx` in `text` sits inside a 4-digit year token -
/// guards both the `第N季` capture and the bare-number fallback against
/// misreading part of a year as a season (§4.2).
fn looks_like_year(text: &str, idx: usize) -> bool {
    let start = idx.saturating_sub(4);
    let end = (idx + 4).min(text.len());
    let window = char_safe_window(text, start, end);
    RE_BARE_YEAR.is_match(window)
}

// ---------------------------------------------------------------------
// Episode extraction
// ---------------------------------------------------------------------

metadata_pattern!(RE_PROTECT_YEAR, r"(\d+)\s+((?:19|20)\d{2})\b");
metadata_pattern!(RE_PROTECT_EP_STRAY, r"([ES]\d+[ES]?\d+)\s+(\d+)");
metadata_pattern!(RE_DIGIT_SPACE, r"(\d)\s+(\d)");

metadata_pattern!(RE_MULTI_S_DASH_S, r"(?i)S(\d+)E(\d+)\s*-\s*S(\d+)E(\d+)");
metadata_pattern!(RE_MULTI_S_DASH_E, r"(?i)S(\d+)E(\d+)\s*-\s*E(\d+)");
metadata_pattern!(RE_MULTI_X_DASH_X, r"(\d+)x(\d+)\s*-\s*(\d+)x(\d+)");
metadata_pattern!(RE_MULTI_S_CONCAT, r"(?i)S(\d+)E(\d+)E(\d+)");
metadata_pattern!(RE_MULTI_E_CONCAT, r"(?i)E(\d+)E(\d+)");

metadata_pattern!(RE_SINGLE_SE, r"(?i)S(\d+)E(\d+)");
metadata_pattern!(RE_SINGLE_S_DOT_E, r"(?i)S(\d+)\.E(\d+)");
metadata_pattern!(RE_SINGLE_X, r"(\d+)x(\d+)");
metadata_pattern!(RE_SINGLE_CN_DI, r"第([一二三四五六七八九十壹贰叁肆伍陆柒捌玖拾\d]+)集");
metadata_pattern!(RE_SINGLE_CN_BARE, r"([一二三四五六七八九十壹贰叁肆伍陆柒捌玖拾]+)集");
metadata_pattern!(RE_SINGLE_EP, r"(?i)EP(\d+)");
metadata_pattern!(RE_SINGLE_EPISODE, r"(?i)E(?:pisode)?(\d+)");
metadata_pattern!(RE_SINGLE_DASH, r"(\d+)-(\d+)");
metadata_pattern!(RE_SEASON_MARKER_NEARBY, r"(?i)S(?:EASON)?");
metadata_pattern!(RE_FALLBACK_NUM, r"\d{1,3}");
metadata_pattern!(RE_CODEC_CONTEXT, r"(?i)[hx]26[45]");

/// Result of multi-episode or single-episode extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeInfo {
    pub season: u32,
    pub episode: u32,
    pub end_episode: Option<u32>,
}

/// Protect digit-space sequences that would otherwise collapse into a
/// wrong number (year-after-digits, episode-pattern-then-stray-number),
/// collapse remaining `<digit> <digit>` runs, then restore the protected
/// spans (§4.2 step 2).
fn collapse_digit_spaces(text: &str) -> String {
    let mut protected = Vec::new();
    let mut working = text.to_string();

    for re in [&*RE_PROTECT_YEAR, &*RE_PROTECT_EP_STRAY] {
        working = re
            .replace_all(&working, |caps: &regex::Captures| {
                let token = format!("\u{0}PROTECT{}\u{0}", protected.len());
                protected.push(caps.get(0).unwrap().as_str().to_string());
                token
            })
            .to_string();
    }

    loop {
        let replaced = RE_DIGIT_SPACE.replace_all(&working, "$1$2").to_string();
        if replaced == working {
            break;
        }
        working = replaced;
    }

    for (i, original) in protected.iter().enumerate() {
        working = working.replace(&format!("\u{0}PROTECT{}\u{0}", i), original);
    }

    working
}

/// Extract `(season, episode, end_episode)` from a filename, per §4.2's
/// ordered pipeline. `position` is the 1-based position of this file
/// within its directory listing, used as the ultimate fallback.
pub fn extract_episode_info(filename: &str, position: u32) -> EpisodeInfo {
    let normalized = normalize_metadata(filename, false);
    let working = collapse_digit_spaces(&normalized);

    if let Some(caps) = RE_MULTI_S_DASH_S.captures(&working) {
        let (s1, e1, s2, e2) = (
            caps[1].parse::<u32>().unwrap_or(0),
            caps[2].parse::<u32>().unwrap_or(0),
            caps[3].parse::<u32>().unwrap_or(0),
            caps[4].parse::<u32>().unwrap_or(0),
        );
        if s1 == s2 && e2 > e1 {
            return EpisodeInfo { season: s1, episode: e1, end_episode: Some(e2) };
        }
    }
    if let Some(caps) = RE_MULTI_S_DASH_E.captures(&working) {
        let (s, e1, e2) = (
            caps[1].parse::<u32>().unwrap_or(0),
            caps[2].parse::<u32>().unwrap_or(0),
            caps[3].parse::<u32>().unwrap_or(0),
        );
        if e2 > e1 {
            return EpisodeInfo { season: s, episode: e1, end_episode: Some(e2) };
        }
    }
    if let Some(caps) = RE_MULTI_X_DASH_X.captures(&working) {
        let (s1, e1, s2, e2) = (
            caps[1].parse::<u32>().unwrap_or(0),
            caps[2].parse::<u32>().unwrap_or(0),
            caps[3].parse::<u32>().unwrap_or(0),
            caps[4].parse::<u32>().unwrap_or(0),
        );
        if s1 == s2 && e2 > e1 {
            return EpisodeInfo { season: s1, episode: e1, end_episode: Some(e2) };
        }
    }
    if let Some(caps) = RE_MULTI_S_CONCAT.captures(&working) {
        let (s, e1, e2) = (
            caps[1].parse::<u32>().unwrap_or(0),
            caps[2].parse::<u32>().unwrap_or(0),
            caps[3].parse::<u32>().unwrap_or(0),
        );
        if e2 > e1 {
            return EpisodeInfo { season: s, episode: e1, end_episode: Some(e2) };
        }
    }
    if let Some(caps) = RE_MULTI_E_CONCAT.captures(&working) {
        let (e1, e2) = (
            caps[1].parse::<u32>().unwrap_or(0),
            caps[2].parse::<u32>().unwrap_or(0),
        );
        if e2 > e1 {
            return EpisodeInfo { season: 1, episode: e1, end_episode: Some(e2) };
        }
    }

    if let Some(caps) = RE_SINGLE_SE.captures(&working) {
        return EpisodeInfo {
            season: caps[1].parse().unwrap_or(0),
            episode: caps[2].parse().unwrap_or(0),
            end_episode: None,
        };
    }
    if let Some(caps) = RE_SINGLE_S_DOT_E.captures(&working) {
        return EpisodeInfo {
            season: caps[1].parse().unwrap_or(0),
            episode: caps[2].parse().unwrap_or(0),
            end_episode: None,
        };
    }
    if let Some(caps) = RE_SINGLE_X.captures(&working) {
        return EpisodeInfo {
            season: caps[1].parse().unwrap_or(0),
            episode: caps[2].parse().unwrap_or(0),
            end_episode: None,
        };
    }
    if let Some(caps) = RE_SINGLE_CN_DI.captures(&working) {
        let raw = &caps[1];
        let n = if raw.chars().all(|c| c.is_ascii_digit()) {
            raw.parse().unwrap_or(0)
        } else {
            parse_chinese_number(raw)
        };
        return EpisodeInfo { season: 1, episode: n, end_episode: None };
    }
    if let Some(caps) = RE_SINGLE_CN_BARE.captures(&working) {
        let n = parse_chinese_number(&caps[1]);
        if n > 0 {
            return EpisodeInfo { season: 1, episode: n, end_episode: None };
        }
    }
    if let Some(caps) = RE_SINGLE_EP.captures(&working) {
        return EpisodeInfo {
            season: 1,
            episode: caps[1].parse().unwrap_or(0),
            end_episode: None,
        };
    }
    if let Some(caps) = RE_SINGLE_EPISODE.captures(&working) {
        return EpisodeInfo {
            season: 1,
            episode: caps[1].parse().unwrap_or(0),
            end_episode: None,
        };
    }
    if let Some(caps) = RE_SINGLE_DASH.captures(&working) {
        let m = caps.get(0).unwrap();
        let preceding_start = m.start().saturating_sub(10);
        let preceding = char_safe_window(&working, preceding_start, m.start());
        if RE_SEASON_MARKER_NEARBY.is_match(preceding) {
            return EpisodeInfo {
                season: caps[1].parse().unwrap_or(0),
                episode: caps[2].parse().unwrap_or(0),
                end_episode: None,
            };
        }
        return EpisodeInfo {
            season: 1,
            episode: caps[2].parse().unwrap_or(0),
            end_episode: None,
        };
    }

    // Generic 1-3 digit fallback, filtering codec/resolution/year context.
    let detected_season = RE_SEASON_SXX
        .captures(&working)
        .and_then(|c| c[1].parse::<u32>().ok());

    const RESOLUTIONS: &[u32] = &[1080, 720, 480, 360, 240, 2160, 1440];
    let mut best: Option<(usize, u32)> = None;
    for m in RE_FALLBACK_NUM.find_iter(&working) {
        let Ok(n) = m.as_str().parse::<u32>() else { continue };
        if n == 0 || n > 300 {
            continue;
        }
        if (1900..=2099).contains(&n) {
            continue;
        }
        if RESOLUTIONS.contains(&n) {
            continue;
        }
        let window_start = m.start().saturating_sub(5);
        let window_end = (m.end() + 5).min(working.len());
        if RE_CODEC_CONTEXT.is_match(char_safe_window(&working, window_start, window_end)) {
            continue;
        }
        if let Some(season) = detected_season {
            if n == season && season != 1 {
                continue;
            }
        }
        match best {
            None => best = Some((m.start(), n)),
            Some((best_pos, best_val)) => {
                if m.start() > best_pos || (m.start() == best_pos && n < best_val) {
                    best = Some((m.start(), n));
                }
            }
        }
    }

    if let Some((_, n)) = best {
        return EpisodeInfo {
            season: detected_season.unwrap_or(1),
            episode: n,
            end_episode: None,
        };
    }

    EpisodeInfo { season: 1, episode: position, end_episode: None }
}

// ---------------------------------------------------------------------
// Filename generation
// ---------------------------------------------------------------------

const ILLEGAL_CHARS: &[char] = &['<', '>', '"', '/', '\\', '|', '?', '*'];

fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| if c == ':' { '：' } else { c })
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .collect()
}

/// Produce `<Show> - S<NN>E<NN>[-E<NN>] - <Title>.<ext>`, dropping the
/// ` - <Title>` segment when no catalog title is set (§4.2 "Filename
/// generator").
pub fn generate_filename(episode: &Episode, show_name_override: Option<&str>) -> String {
    let show_name = show_name_override.unwrap_or(&episode.show_name);

    let episode_component = match episode.end_episode_number {
        Some(end) => format!(
            "S{:02}E{:02}-E{:02}",
            episode.season_number, episode.episode_number, end
        ),
        None => format!("S{:02}E{:02}", episode.season_number, episode.episode_number),
    };

    let mut name = format!("{} - {}", show_name, episode_component);
    if let Some(title) = &episode.catalog_title {
        name.push_str(" - ");
        name.push_str(title);
    }

    format!("{}{}", sanitize_component(&name), episode.extension)
}

/// `Season <N>` using the unpadded season number (§6).
pub fn season_folder_name(season_number: u32) -> String {
    format!("Season {}", season_number)
}

/// `<Show Name> (<Year>) {tmdb-<id>}`, dropping the year and/or id when
/// absent - down to a bare `<Show Name>` if both are missing (§4.5 step 1,
/// §6 output layout).
pub fn show_folder_name(name: &str, year: Option<u16>, catalog_id: Option<u64>) -> String {
    let mut out = sanitize_component(name);
    if let Some(y) = year {
        out.push_str(&format!(" ({y})"));
    }
    if let Some(id) = catalog_id {
        out.push_str(&format!(" {{tmdb-{id}}}"));
    }
    out
}

/// Filename to use for a sub-file (e.g. subtitle) that should ride along
/// with its video at the same basename: swap the extension only.
pub fn sidecar_filename(generated_video_name: &Path, sidecar_extension: &str) -> String {
    let stem = generated_video_name
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    format!("{stem}.{sidecar_extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_metadata_strips_resolution_and_codec() {
        let out = normalize_metadata("Show.S01E01.1080p.WEB-DL.H265.AAC-GROUP", false);
        assert!(!out.contains("1080p"));
        assert!(!out.to_lowercase().contains("h265"));
        assert!(!out.to_lowercase().contains("web-dl"));
    }

    #[test]
    fn test_normalize_metadata_idempotent() {
        let input = "Breaking.Bad.S01E01.2008.1080p.BluRay.x264.DTS-HD.MA.5.1-GROUP";
        let once = normalize_metadata(input, false);
        let twice = normalize_metadata(&once, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_season_extractor_fallback_on_bare_year() {
        let n = extract_season_number("Some Show 2019", 1, SeasonMode::Folder);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_season_extractor_sxx() {
        assert_eq!(extract_season_number("Show.S02.2017.1080p", 1, SeasonMode::Folder), 2);
    }

    #[test]
    fn test_season_extractor_chinese_numeral() {
        assert_eq!(extract_season_number("一人之下第二季", 1, SeasonMode::Folder), 2);
        assert_eq!(extract_season_number("第十五季", 1, SeasonMode::Folder), 15);
        assert_eq!(extract_season_number("第二十季", 1, SeasonMode::Folder), 20);
    }

    #[test]
    fn test_episode_extractor_simple_se() {
        let info = extract_episode_info("Breaking.Bad.S01E01.Pilot.mp4", 1);
        assert_eq!(info.season, 1);
        assert_eq!(info.episode, 1);
        assert_eq!(info.end_episode, None);
    }

    #[test]
    fn test_episode_extractor_year_not_concatenated() {
        // Scenario C: Twelve S01E01 2025 1080p ... must not read "1" + "2025" as "12025".
        let info = extract_episode_info(
            "Twelve S01E01 2025 1080p DSNP WEB-DL H264 AAC-TGWEB.mkv",
            1,
        );
        assert_eq!(info.season, 1);
        assert_eq!(info.episode, 1);
    }

    #[test]
    fn test_episode_extractor_multi_episode_range() {
        let info = extract_episode_info("Show.S01E01-E03.mkv", 1);
        assert_eq!(info.season, 1);
        assert_eq!(info.episode, 1);
        assert_eq!(info.end_episode, Some(3));
    }

    #[test]
    fn test_episode_extractor_chinese_episode() {
        let info = extract_episode_info("某剧第5集.mp4", 1);
        assert_eq!(info.episode, 5);
    }

    #[test]
    fn test_episode_extractor_bare_number_after_cjk_does_not_panic() {
        // No SxxExx/集 marker at all: falls all the way to the generic
        // 1-3 digit fallback, whose codec-context window used to slice at
        // a raw byte offset that could land inside a CJK codepoint.
        let info = extract_episode_info("一人之下05.mkv", 1);
        assert_eq!(info.episode, 5);
    }

    #[test]
    fn test_episode_extractor_dash_pattern_after_cjk_does_not_panic() {
        // "这是一个很长的剧名" is 9 three-byte characters; the dash
        // match's start-minus-10 byte offset lands mid-codepoint, which
        // used to panic on an unchecked slice.
        let info = extract_episode_info("这是一个很长的剧名1-09.mkv", 1);
        assert_eq!(info.episode, 9);
    }

    #[test]
    fn test_filename_generator_no_title() {
        let ep = Episode::new(PathBuf::from("a.mkv"), "Breaking Bad".into(), 1, 1, None);
        let name = generate_filename(&ep, None);
        assert_eq!(name, "Breaking Bad - S01E01.mkv");
    }

    #[test]
    fn test_filename_generator_with_title_and_range() {
        let mut ep = Episode::new(PathBuf::from("a.mkv"), "Show".into(), 1, 1, Some(3));
        ep.catalog_title = Some("Weird: Title".to_string());
        let name = generate_filename(&ep, None);
        assert!(name.contains("S01E01-E03"));
        assert!(name.contains("Weird："));
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_show_folder_name_variants() {
        assert_eq!(show_folder_name("Breaking Bad", Some(2008), Some(1396)), "Breaking Bad (2008) {tmdb-1396}");
        assert_eq!(show_folder_name("Breaking Bad", None, Some(1396)), "Breaking Bad {tmdb-1396}");
        assert_eq!(show_folder_name("Breaking Bad", Some(2008), None), "Breaking Bad (2008)");
        assert_eq!(show_folder_name("Breaking Bad", None, None), "Breaking Bad");
    }

    #[test]
    fn test_filename_generator_never_emits_illegal_chars() {
        let mut ep = Episode::new(PathBuf::from("a.mkv"), "Show <1>".into(), 1, 1, None);
        ep.catalog_title = Some("A/B\\C|D?E*F\"G".to_string());
        let name = generate_filename(&ep, None);
        for c in ILLEGAL_CHARS {
            assert!(!name.contains(*c));
        }
    }
}
