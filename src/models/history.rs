use super::{design::DesignRequest, image::GeneratedImage, GenerationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub prompt: String,
    pub images: Vec<GeneratedImage>,
    pub created_at: DateTime<Utc>,
    pub request: DesignRequest,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<GenerationResult> for HistoryEntry {
    fn from(result: GenerationResult) -> Self {
        Self {
            id: result.id,
            prompt: result.prompt,
            images: result.images,
            created_at: result.created_at,
            request: result.request,
            is_favorite: false,
            memo: None,
            tags: Vec::new(),
        }
    }
}

impl HistoryEntry {
    /// Case-insensitive match against style, theme, description, memo and tags.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |text: &str| text.to_lowercase().contains(&needle);

        contains(&self.request.style)
            || contains(&self.request.theme)
            || self.request.description.as_deref().map_or(false, contains)
            || self.memo.as_deref().map_or(false, contains)
            || self.tags.iter().any(|tag| contains(tag))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryUpdate {
    pub memo: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    pub style: Option<String>,
    pub theme: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
}

impl HistoryFilter {
    pub fn accepts(&self, entry: &HistoryEntry) -> bool {
        if self.favorites_only && !entry.is_favorite {
            return false;
        }
        if let Some(style) = &self.style {
            if &entry.request.style != style {
                return false;
            }
        }
        if let Some(theme) = &self.theme {
            if &entry.request.theme != theme {
                return false;
            }
        }
        true
    }
}
