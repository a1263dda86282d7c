use crate::{error::Result, models::HistoryEntry};
use async_trait::async_trait;

/// Blob-style storage for the generation history: the whole list is read
/// and written at once, newest entry first.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> Result<Vec<HistoryEntry>>;
    async fn store(&self, entries: &[HistoryEntry]) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}
