pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;

use crate::models::VideoAnalysisRecord;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use thiserror::Error;

pub use memory::MemoryAnalysisStore;
pub use postgres::PgAnalysisStore;

pub type DbPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type DbConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub fn create_pool(
    database_url: &str,
    max_connections: usize,
) -> Result<DbPool, deadpool::managed::BuildError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(config).max_size(max_connections).build()
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Database error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Stored analysis is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted analyses plus the URL-keyed cache view over them.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Most recent record for `youtube_url` produced with `prompt_version` and
    /// created no earlier than `now - window`.
    async fn lookup(
        &self,
        youtube_url: &str,
        prompt_version: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<VideoAnalysisRecord>, StoreError>;

    /// Deletes every record for `youtube_url`, then inserts `record`.
    ///
    /// The two steps are not atomic. A failure in between leaves no record for
    /// the URL, and the next lookup simply misses.
    async fn supersede(
        &self,
        youtube_url: &str,
        record: VideoAnalysisRecord,
    ) -> Result<(), StoreError>;

    /// Up to `limit` records, most recently created first.
    async fn recent(&self, limit: i64) -> Result<Vec<VideoAnalysisRecord>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}
