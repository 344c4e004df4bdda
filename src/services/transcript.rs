use crate::config::TranscriptConfig;
use crate::services::error::AnalysisError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Takes the full video URL, not the extracted id.
    async fn fetch_transcript(&self, youtube_url: &str) -> Result<String, AnalysisError>;

    fn is_configured(&self) -> bool;
}

/// Dumpling AI transcript API. One request per call, no retries.
pub struct DumplingTranscriptClient {
    client: reqwest::Client,
    config: TranscriptConfig,
}

impl DumplingTranscriptClient {
    pub fn new(config: TranscriptConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn request_body(&self, youtube_url: &str) -> Value {
        json!({
            "videoUrl": youtube_url,
            "preferredLanguage": self.config.preferred_language,
            "includeTimestamps": self.config.include_timestamps,
        })
    }
}

#[async_trait]
impl TranscriptProvider for DumplingTranscriptClient {
    async fn fetch_transcript(&self, youtube_url: &str) -> Result<String, AnalysisError> {
        log::info!("Fetching transcript for: {}", youtube_url);

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&self.request_body(youtube_url));
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(AnalysisError::from_transcript_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Transcript provider returned status {}: {}", status, body);
            return Err(AnalysisError::TranscriptProviderError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(AnalysisError::from_transcript_transport)?;
        let transcript = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| transcript_from_body(&v))
            .ok_or(AnalysisError::NoTranscriptAvailable)?;

        log::info!("Fetched transcript: {} characters", transcript.len());
        Ok(transcript)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

/// `transcript` is the primary field, `text` the alias. Empty strings count as
/// missing.
pub fn transcript_from_body(body: &Value) -> Option<String> {
    ["transcript", "text"]
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|t| !t.is_empty())
        .map(str::to_owned)
}
