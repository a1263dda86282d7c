pub mod file;
pub mod memory;
pub mod traits;

use crate::{
    config::HistoryConfig,
    error::{InkError, Result},
    models::{GenerationResult, HistoryEntry, HistoryFilter, HistoryUpdate},
};
use std::sync::Arc;
use tokio::sync::Mutex;

pub use file::JsonFileHistoryStore;
pub use memory::InMemoryHistoryStore;
pub use traits::HistoryStore;

/// Read-modify-write operations over a `HistoryStore`. Writes are serialized
/// so concurrent requests cannot lose each other's updates.
pub struct HistoryManager {
    backend: Arc<dyn HistoryStore>,
    limit: usize,
    write_lock: Mutex<()>,
}

impl HistoryManager {
    pub fn new(backend: Arc<dyn HistoryStore>, limit: usize) -> Self {
        Self {
            backend,
            limit,
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        let backend: Arc<dyn HistoryStore> = match &config.file_path {
            Some(path) => Arc::new(JsonFileHistoryStore::new(path.clone())),
            None => Arc::new(InMemoryHistoryStore::new()),
        };
        log::info!("📚 History backend: {}", backend.backend_name());
        Self::new(backend, config.limit)
    }

    pub fn storage(&self) -> &Arc<dyn HistoryStore> {
        &self.backend
    }

    /// Prepends a finished generation, dropping the oldest entries past the limit.
    pub async fn save(&self, result: GenerationResult) -> Result<HistoryEntry> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.backend.load().await?;
        let entry = HistoryEntry::from(result);

        entries.insert(0, entry.clone());
        entries.truncate(self.limit);
        self.backend.store(&entries).await?;
        Ok(entry)
    }

    pub async fn list(&self) -> Result<Vec<HistoryEntry>> {
        self.backend.load().await
    }

    pub async fn get(&self, id: &str) -> Result<HistoryEntry> {
        self.backend
            .load()
            .await?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| InkError::NotFound(format!("history entry {}", id)))
    }

    pub async fn toggle_favorite(&self, id: &str) -> Result<HistoryEntry> {
        self.modify(id, |entry| entry.is_favorite = !entry.is_favorite)
            .await
    }

    pub async fn favorites(&self) -> Result<Vec<HistoryEntry>> {
        self.filter(&HistoryFilter {
            favorites_only: true,
            ..Default::default()
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.backend.load().await?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(InkError::NotFound(format!("history entry {}", id)));
        }
        self.backend.store(&entries).await
    }

    pub async fn update(&self, id: &str, update: HistoryUpdate) -> Result<HistoryEntry> {
        self.modify(id, move |entry| {
            if let Some(memo) = update.memo {
                entry.memo = Some(memo);
            }
            if let Some(tags) = update.tags {
                entry.tags = tags;
            }
        })
        .await
    }

    /// A blank query returns the whole history.
    pub async fn search(&self, query: &str) -> Result<Vec<HistoryEntry>> {
        let entries = self.backend.load().await?;
        Ok(entries.into_iter().filter(|e| e.matches(query)).collect())
    }

    pub async fn filter(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>> {
        let entries = self.backend.load().await?;
        Ok(entries.into_iter().filter(|e| filter.accepts(e)).collect())
    }

    async fn modify<F>(&self, id: &str, change: F) -> Result<HistoryEntry>
    where
        F: FnOnce(&mut HistoryEntry) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.backend.load().await?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| InkError::NotFound(format!("history entry {}", id)))?;

        change(entry);
        let updated = entry.clone();
        self.backend.store(&entries).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DesignRequest, GeneratedImage};
    use chrono::Utc;

    fn result(style: &str, theme: &str, description: Option<&str>) -> GenerationResult {
        let mut request = DesignRequest::new(style, "small", "arm", theme);
        request.description = description.map(str::to_string);
        let image = GeneratedImage::new(Utc::now(), 0, 1, "https://a", "1024x1024", "standard");
        GenerationResult::new("prompt".to_string(), vec![image], request)
    }

    fn manager(limit: usize) -> HistoryManager {
        HistoryManager::new(Arc::new(InMemoryHistoryStore::new()), limit)
    }

    #[tokio::test]
    async fn save_prepends_and_caps() {
        let history = manager(2);
        let first = history.save(result("tribal", "nature", None)).await.unwrap();
        let second = history.save(result("abstract", "nature", None)).await.unwrap();
        let third = history.save(result("watercolor", "nature", None)).await.unwrap();

        let ids: Vec<_> = history.list().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![third.id, second.id]);
        assert!(matches!(history.get(&first.id).await, Err(InkError::NotFound(_))));
    }

    #[tokio::test]
    async fn favorites_toggle_back_and_forth() {
        let history = manager(50);
        let entry = history.save(result("tribal", "nature", None)).await.unwrap();
        history.save(result("abstract", "symbolic", None)).await.unwrap();

        assert!(history.toggle_favorite(&entry.id).await.unwrap().is_favorite);
        let favorites = history.favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, entry.id);

        assert!(!history.toggle_favorite(&entry.id).await.unwrap().is_favorite);
        assert!(history.favorites().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_search_and_delete() {
        let history = manager(50);
        let rose = history
            .save(result("line art", "nature", Some("A single Rose")))
            .await
            .unwrap();
        let other = history.save(result("tribal", "cultural", None)).await.unwrap();

        history
            .update(
                &other.id,
                HistoryUpdate {
                    memo: Some("for my brother".to_string()),
                    tags: Some(vec!["Gift".to_string()]),
                },
            )
            .await
            .unwrap();

        let hits = history.search("rose").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, rose.id);
        assert_eq!(history.search("gift").await.unwrap()[0].id, other.id);
        assert_eq!(history.search("BROTHER").await.unwrap().len(), 1);
        assert_eq!(history.search("  ").await.unwrap().len(), 2);

        let filtered = history
            .filter(&HistoryFilter {
                style: Some("tribal".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);

        history.delete(&rose.id).await.unwrap();
        assert!(matches!(history.delete(&rose.id).await, Err(InkError::NotFound(_))));
        assert_eq!(history.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn file_backend_persists_between_managers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let config = HistoryConfig {
            file_path: Some(path.clone()),
            limit: 50,
        };

        let saved = HistoryManager::from_config(&config)
            .save(result("minimalism", "personal", None))
            .await
            .unwrap();

        let reopened = HistoryManager::from_config(&config);
        assert_eq!(reopened.storage().backend_name(), "json-file");
        let entries = reopened.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], saved);
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileHistoryStore::new(&path);
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.path(), path.as_path());
    }
}
