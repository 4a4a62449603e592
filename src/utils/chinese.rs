//! Chinese text utilities.

/// Check if two strings are the same when normalized (handles Traditional/Simplified).
pub fn titles_equivalent(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Normalize a string for comparison.
pub fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Check if a string contains Chinese characters.
pub fn contains_chinese(s: &str) -> bool {
    s.chars().any(is_chinese_char)
}

/// Check if a character is a Chinese character.
fn is_chinese_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |  // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}' |  // CJK Unified Ideographs Extension A
        '\u{F900}'..='\u{FAFF}' |  // CJK Compatibility Ideographs
        '\u{20000}'..='\u{2A6DF}'  // CJK Unified Ideographs Extension B
    )
}

/// Normalize `.`, `_`, `-` to spaces and lowercase, for the resolver's
/// "name appears in folder name" substring check (§4.4).
pub fn normalize_for_match(s: &str) -> String {
    s.to_lowercase()
        .replace(['.', '_', '-'], " ")
}

/// Whether `name` appears in `folder_name`, case-insensitively, either
/// verbatim or after both sides have `.`/`_`/`-` normalized to spaces.
pub fn name_matches_folder(name: &str, folder_name: &str) -> bool {
    let name_lower = name.to_lowercase();
    let folder_lower = folder_name.to_lowercase();
    if folder_lower.contains(&name_lower) {
        return true;
    }
    folder_lower
        .replace(['.', '_', '-'], " ")
        .contains(&name.replace(['.', '_', '-'], " ").to_lowercase())
}

/// Arabic and traditional Chinese numeral map used by the season extractor
/// (§4.2: "parsed via a character map... with '十' combining as expected").
fn numeral_value(c: char) -> Option<u32> {
    Some(match c {
        '零' => 0,
        '一' | '壹' => 1,
        '二' | '贰' => 2,
        '三' | '叁' => 3,
        '四' | '肆' => 4,
        '五' | '伍' => 5,
        '六' | '陆' => 6,
        '七' | '柒' => 7,
        '八' | '捌' => 8,
        '九' | '玖' => 9,
        '十' | '拾' => 10,
        _ => return None,
    })
}

/// First contiguous run of ASCII digits in `text`, if any (handles mixed
/// forms like "第1集").
fn first_digit_run(text: &str) -> Option<String> {
    let mut run = String::new();
    let mut started = false;
    for c in text.chars() {
        if c.is_ascii_digit() {
            run.push(c);
            started = true;
        } else if started {
            break;
        }
    }
    if run.is_empty() {
        None
    } else {
        Some(run)
    }
}

/// Convert a Chinese (or mixed Chinese/Arabic) numeral string to an integer.
/// Pure Arabic digit strings parse directly; a stray Arabic run inside
/// otherwise-Chinese text (e.g. "第1集") is used if present. Otherwise walks
/// the characters applying the standard "十" combining rule: 十五 = 10 + 5,
/// 二十 = 2 * 10, 二十五 = 2*10 + 5.
pub fn parse_chinese_number(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }
    if let Ok(n) = text.parse::<u32>() {
        return n;
    }
    if let Some(run) = first_digit_run(text) {
        if let Ok(n) = run.parse::<u32>() {
            return n;
        }
    }

    let mut result: u32 = 0;
    let mut temp: u32 = 0;
    for c in text.chars() {
        match numeral_value(c) {
            Some(10) => {
                temp = if temp == 0 { 10 } else { temp * 10 };
            }
            Some(0) => continue,
            Some(n) => {
                if temp == 10 || temp == 0 {
                    temp += n;
                } else {
                    result += temp;
                    temp = n;
                }
            }
            None => {}
        }
    }
    result += temp;
    if result > 0 {
        result
    } else {
        temp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_chinese() {
        assert!(contains_chinese("阿凡达"));
        assert!(contains_chinese("Avatar 阿凡达"));
        assert!(!contains_chinese("Avatar"));
        assert!(!contains_chinese("The Matrix"));
    }

    #[test]
    fn test_titles_equivalent() {
        assert!(titles_equivalent("Avatar", "avatar"));
        assert!(titles_equivalent("The Matrix", "the matrix"));
        assert!(!titles_equivalent("Avatar", "Titanic"));
    }

    #[test]
    fn test_parse_chinese_number() {
        assert_eq!(parse_chinese_number("五"), 5);
        assert_eq!(parse_chinese_number("十"), 10);
        assert_eq!(parse_chinese_number("十五"), 15);
        assert_eq!(parse_chinese_number("二十"), 20);
        assert_eq!(parse_chinese_number("二十五"), 25);
        assert_eq!(parse_chinese_number("3"), 3);
        assert_eq!(parse_chinese_number(""), 0);
    }

    #[test]
    fn test_name_matches_folder() {
        assert!(name_matches_folder("Breaking Bad", "Breaking.Bad.S01E01"));
        assert!(name_matches_folder("一人之下", "一人之下第二季.The.Outcast.S02"));
        assert!(!name_matches_folder("Totally Different", "Breaking.Bad.S01"));
    }
}
