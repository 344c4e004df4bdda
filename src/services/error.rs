use crate::db::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid YouTube URL format")]
    InvalidUrl,

    #[error("No transcript available for this video")]
    NoTranscriptAvailable,

    #[error("Transcript provider returned {status}: {body}")]
    TranscriptProviderError { status: u16, body: String },

    #[error("Transcript request timed out")]
    TranscriptTimeout,

    #[error("Transcript request failed: {0}")]
    TranscriptTransportError(String),

    #[error("Rating provider returned {status}: {body}")]
    RatingProviderError { status: u16, body: String },

    #[error("Failed to parse analysis response: {0}")]
    MalformedRatingResponse(String),

    #[error("Analysis timeout - video might be too long")]
    RatingTimeout,

    #[error("Rating request failed: {0}")]
    RatingTransportError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "InvalidUrl",
            Self::NoTranscriptAvailable => "NoTranscriptAvailable",
            Self::TranscriptProviderError { .. } => "TranscriptProviderError",
            Self::TranscriptTimeout => "TranscriptTimeout",
            Self::TranscriptTransportError(_) => "TranscriptTransportError",
            Self::RatingProviderError { .. } => "RatingProviderError",
            Self::MalformedRatingResponse(_) => "MalformedRatingResponse",
            Self::RatingTimeout => "RatingTimeout",
            Self::RatingTransportError(_) => "RatingTransportError",
            Self::UnexpectedError(_) => "UnexpectedError",
        }
    }

    pub fn from_transcript_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TranscriptTimeout
        } else {
            Self::TranscriptTransportError(err.to_string())
        }
    }

    pub fn from_rating_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RatingTimeout
        } else {
            Self::RatingTransportError(err.to_string())
        }
    }
}

impl From<StoreError> for AnalysisError {
    fn from(err: StoreError) -> Self {
        Self::UnexpectedError(err.to_string())
    }
}
