use super::design::DesignRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub alt: String,
    pub size: String,
    pub quality: String,
}

impl GeneratedImage {
    /// `slot` keeps ids distinct within one generation run, `position` is the
    /// 1-based place of the image in the final result.
    pub fn new(
        generated_at: DateTime<Utc>,
        slot: usize,
        position: usize,
        url: impl Into<String>,
        size: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("img_{}_{}", generated_at.timestamp_millis(), slot),
            url: url.into(),
            alt: format!("Tattoo design {}", position),
            size: size.into(),
            quality: quality.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub id: String,
    pub prompt: String,
    pub images: Vec<GeneratedImage>,
    pub created_at: DateTime<Utc>,
    pub request: DesignRequest,
}

impl GenerationResult {
    pub fn new(prompt: String, images: Vec<GeneratedImage>, request: DesignRequest) -> Self {
        let created_at = Utc::now();
        Self {
            id: format!(
                "req_{}_{}",
                created_at.timestamp_millis(),
                &Uuid::new_v4().simple().to_string()[..8]
            ),
            prompt,
            images,
            created_at,
            request,
        }
    }
}
