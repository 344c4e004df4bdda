use crate::db::{AnalysisStore, StoreError};
use crate::models::VideoAnalysisRecord;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// Process-local store, for running without Postgres. Contents are lost on
/// restart.
#[derive(Default)]
pub struct MemoryAnalysisStore {
    records: RwLock<Vec<VideoAnalysisRecord>>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    #[cfg(test)]
    pub async fn count_for(&self, youtube_url: &str) -> usize {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.youtube_url == youtube_url)
            .count()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn lookup(
        &self,
        youtube_url: &str,
        prompt_version: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<VideoAnalysisRecord>, StoreError> {
        let cutoff = now - window;
        let records = self.records.read().await;

        Ok(records
            .iter()
            .filter(|r| r.youtube_url == youtube_url)
            .filter(|r| r.prompt_version == prompt_version)
            .filter(|r| r.created_at >= cutoff)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn supersede(
        &self,
        youtube_url: &str,
        record: VideoAnalysisRecord,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.retain(|r| r.youtube_url != youtube_url);
        records.push(record);
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<VideoAnalysisRecord>, StoreError> {
        let mut records = self.records.read().await.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(records)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
