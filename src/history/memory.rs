use super::traits::HistoryStore;
use crate::{error::Result, models::HistoryEntry};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn store(&self, entries: &[HistoryEntry]) -> Result<()> {
        *self.entries.write().await = entries.to_vec();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
