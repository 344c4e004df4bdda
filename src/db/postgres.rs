use crate::db::models::VideoAnalysisRow;
use crate::db::schema::video_analyses::dsl::*;
use crate::db::{AnalysisStore, DbConn, DbPool, StoreError};
use crate::models::VideoAnalysisRecord;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;

/// `video_analyses` table on Postgres.
pub struct PgAnalysisStore {
    pool: DbPool,
}

impl PgAnalysisStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool.get().await.map_err(|e| {
            log::error!("Failed to get DB connection: {}", e);
            StoreError::Pool(e.to_string())
        })
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn lookup(
        &self,
        url: &str,
        version: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<VideoAnalysisRecord>, StoreError> {
        let conn = &mut self.conn().await?;
        let cutoff = now - window;

        let row = video_analyses
            .filter(youtube_url.eq(url))
            .filter(prompt_version.eq(version))
            .filter(created_at.ge(cutoff))
            .order_by(created_at.desc())
            .first::<VideoAnalysisRow>(conn)
            .await
            .optional()?;

        Ok(row.map(VideoAnalysisRecord::try_from).transpose()?)
    }

    async fn supersede(&self, url: &str, record: VideoAnalysisRecord) -> Result<(), StoreError> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(video_analyses.filter(youtube_url.eq(url)))
            .execute(conn)
            .await?;
        if deleted > 0 {
            log::debug!("Removed {} superseded analyses for {}", deleted, url);
        }

        diesel::insert_into(video_analyses)
            .values(&VideoAnalysisRow::from(record))
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<VideoAnalysisRecord>, StoreError> {
        let conn = &mut self.conn().await?;

        let rows = video_analyses
            .order_by(created_at.desc())
            .limit(limit)
            .load::<VideoAnalysisRow>(conn)
            .await?;

        rows.into_iter()
            .map(|row| VideoAnalysisRecord::try_from(row).map_err(StoreError::from))
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.conn().await.map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
