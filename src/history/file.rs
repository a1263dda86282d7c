use super::traits::HistoryStore;
use crate::{
    error::{InkError, Result},
    models::HistoryEntry,
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps the history as one JSON array in a file. An unreadable or corrupt
/// file is logged and treated as an empty history.
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                log::error!("Error reading history from {}: {}", self.path.display(), e);
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::error!("Error parsing history in {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    async fn store(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            InkError::Storage(format!("failed to replace {}: {}", self.path.display(), e))
        })
    }

    fn backend_name(&self) -> &'static str {
        "json-file"
    }
}
