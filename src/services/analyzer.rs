use crate::db::AnalysisStore;
use crate::models::{AnalysisResult, CacheInfo, VideoAnalysisRecord, RATING_CATEGORIES};
use crate::services::error::AnalysisError;
use crate::services::rating::RatingProvider;
use crate::services::transcript::TranscriptProvider;
use crate::services::video_id::extract_video_id;
use chrono::{Duration, Utc};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub const DEFAULT_LIST_LIMIT: i64 = 10;
pub const MAX_LIST_LIMIT: i64 = 100;

/// Runs one analysis request: validate, check the cache, fetch the transcript,
/// rate it, then persist.
pub struct Analyzer {
    transcripts: Arc<dyn TranscriptProvider>,
    rater: Arc<dyn RatingProvider>,
    store: Arc<dyn AnalysisStore>,
    cache_window: Duration,
}

impl Analyzer {
    pub fn new(
        transcripts: Arc<dyn TranscriptProvider>,
        rater: Arc<dyn RatingProvider>,
        store: Arc<dyn AnalysisStore>,
        cache_window: Duration,
    ) -> Self {
        Self {
            transcripts,
            rater,
            store,
            cache_window,
        }
    }

    pub fn store(&self) -> &dyn AnalysisStore {
        self.store.as_ref()
    }

    pub fn transcripts_configured(&self) -> bool {
        self.transcripts.is_configured()
    }

    pub fn rater_configured(&self) -> bool {
        self.rater.is_configured()
    }

    pub async fn analyze(&self, youtube_url: &str) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();

        let video_id = extract_video_id(youtube_url).ok_or(AnalysisError::InvalidUrl)?;
        log::info!("Starting analysis for video: {}", video_id);

        let prompt_version = self.rater.prompt_version();
        if let Some(record) = self
            .store
            .lookup(youtube_url, prompt_version, Utc::now(), self.cache_window)
            .await?
        {
            log::info!(
                "Serving cached analysis for {} from {}",
                video_id,
                record.created_at
            );
            let info = CacheInfo {
                from_cache: true,
                created_at: record.created_at,
                analysis_duration: record.analysis_duration,
                expires_at: record.created_at + self.cache_window,
            };
            return Ok(record.analysis_result.with_cache_info(&info));
        }

        let transcript = self.transcripts.fetch_transcript(youtube_url).await?;
        if transcript.trim().is_empty() {
            return Err(AnalysisError::NoTranscriptAvailable);
        }

        let analysis = self.rater.rate(&transcript).await?.without_cache_info();
        log::info!(
            "Rated {} of {} categories",
            analysis.typed_ratings().len(),
            RATING_CATEGORIES.len()
        );

        let created_at = Utc::now();
        let analysis_duration = started.elapsed().as_secs_f64();
        let record = VideoAnalysisRecord {
            id: Uuid::new_v4(),
            youtube_url: youtube_url.to_string(),
            transcript,
            analysis_result: analysis.clone(),
            prompt_version: prompt_version.to_string(),
            created_at,
            analysis_duration,
        };
        self.store.supersede(youtube_url, record).await?;

        log::info!("Analysis completed in {:.2} seconds", analysis_duration);

        let info = CacheInfo {
            from_cache: false,
            created_at,
            analysis_duration,
            expires_at: created_at + self.cache_window,
        };
        Ok(analysis.with_cache_info(&info))
    }

    pub async fn recent(&self, limit: Option<i64>) -> Result<Vec<VideoAnalysisRecord>, AnalysisError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        Ok(self.store.recent(limit).await?)
    }
}
