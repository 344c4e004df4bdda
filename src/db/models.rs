use crate::models::{AnalysisResult, VideoAnalysisRecord};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

/// Row shape of `video_analyses`.
#[derive(Debug, Queryable, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::video_analyses)]
pub struct VideoAnalysisRow {
    pub id: Uuid,
    pub youtube_url: String,
    pub transcript: String,
    pub analysis_result: Value,
    pub prompt_version: String,
    pub created_at: DateTime<Utc>,
    pub analysis_duration: f64,
}

impl From<VideoAnalysisRecord> for VideoAnalysisRow {
    fn from(record: VideoAnalysisRecord) -> Self {
        Self {
            id: record.id,
            youtube_url: record.youtube_url,
            transcript: record.transcript,
            analysis_result: record.analysis_result.into_value(),
            prompt_version: record.prompt_version,
            created_at: record.created_at,
            analysis_duration: record.analysis_duration,
        }
    }
}

impl TryFrom<VideoAnalysisRow> for VideoAnalysisRecord {
    type Error = serde_json::Error;

    fn try_from(row: VideoAnalysisRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            youtube_url: row.youtube_url,
            transcript: row.transcript,
            analysis_result: serde_json::from_value::<AnalysisResult>(row.analysis_result)?,
            prompt_version: row.prompt_version,
            created_at: row.created_at,
            analysis_duration: row.analysis_duration,
        })
    }
}
