use crate::services::AnalysisError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Uniform `{ success, data, error }` body for every API response.
#[derive(Debug, Serialize)]
pub struct Envelope<T = serde_json::Value> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ResponseError for AnalysisError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl | Self::NoTranscriptAvailable => StatusCode::BAD_REQUEST,
            Self::TranscriptTimeout | Self::RatingTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::TranscriptProviderError { .. }
            | Self::TranscriptTransportError(_)
            | Self::RatingProviderError { .. }
            | Self::RatingTransportError(_) => StatusCode::BAD_GATEWAY,
            Self::MalformedRatingResponse(_) | Self::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(Envelope::failure(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_one_scheme() {
        let cases = [
            (AnalysisError::InvalidUrl, 400),
            (AnalysisError::NoTranscriptAvailable, 400),
            (AnalysisError::TranscriptTimeout, 408),
            (AnalysisError::RatingTimeout, 408),
            (
                AnalysisError::TranscriptProviderError {
                    status: 401,
                    body: "unauthorized".into(),
                },
                502,
            ),
            (AnalysisError::RatingTransportError("reset".into()), 502),
            (AnalysisError::MalformedRatingResponse("bad".into()), 500),
            (AnalysisError::UnexpectedError("boom".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{}", err.kind());
        }
    }

    #[test]
    fn failure_envelope_has_no_data() {
        let body = serde_json::to_value(Envelope::failure("Invalid YouTube URL format")).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"], "Invalid YouTube URL format");
    }
}
