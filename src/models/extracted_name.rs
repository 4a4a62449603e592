//! Output shape of the Name Extractor, §3/§4.3.

use serde::{Deserialize, Serialize};

/// One folder's extracted identity. All fields except `folder_name` are
/// nullable; empty or whitespace-only strings normalize to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedName {
    pub folder_name: String,
    pub cn_name: Option<String>,
    pub en_name: Option<String>,
    pub year: Option<u16>,
    pub catalog_id: Option<u64>,
}

impl ExtractedName {
    pub fn empty(folder_name: impl Into<String>) -> Self {
        Self {
            folder_name: folder_name.into(),
            cn_name: None,
            en_name: None,
            year: None,
            catalog_id: None,
        }
    }

    /// First available of cn_name, en_name - the search query seed used by
    /// the resolver (§4.4 step 2).
    pub fn query_name(&self) -> Option<&str> {
        self.cn_name.as_deref().or(self.en_name.as_deref())
    }
}

/// Normalize a value straight off the wire: empty/whitespace strings become
/// `None`.
pub fn normalize_optional_string(s: Option<String>) -> Option<String> {
    s.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
