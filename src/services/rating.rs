use crate::config::RatingConfig;
use crate::models::AnalysisResult;
use crate::services::error::AnalysisError;
use crate::services::prompt::PromptTemplate;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

#[async_trait]
pub trait RatingProvider: Send + Sync {
    async fn rate(&self, transcript: &str) -> Result<AnalysisResult, AnalysisError>;

    /// Identifies the persona prompt the ratings were produced with.
    fn prompt_version(&self) -> &str;

    fn is_configured(&self) -> bool;
}

/// Gemini `generateContent` client using the Gradi persona prompt.
pub struct GeminiRatingClient {
    client: reqwest::Client,
    config: RatingConfig,
    prompt: PromptTemplate,
}

impl GeminiRatingClient {
    pub fn new(config: RatingConfig, prompt: PromptTemplate) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            prompt,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, transcript: &str) -> Value {
        json!({
            "contents": [{
                "parts": [{ "text": self.prompt.render(transcript) }]
            }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topK": self.config.top_k,
                "topP": self.config.top_p,
                "maxOutputTokens": self.config.max_output_tokens,
            }
        })
    }
}

#[async_trait]
impl RatingProvider for GeminiRatingClient {
    async fn rate(&self, transcript: &str) -> Result<AnalysisResult, AnalysisError> {
        log::info!("Starting Gemini analysis...");

        let mut request = self.client.post(self.url()).json(&self.request_body(transcript));
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(AnalysisError::from_rating_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini API error: {} - {}", status, body);
            return Err(AnalysisError::RatingProviderError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(AnalysisError::from_rating_transport)?;
        let body: Value = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::MalformedRatingResponse(e.to_string()))?;
        let text = candidate_text(&body).ok_or_else(|| {
            AnalysisError::MalformedRatingResponse("response has no candidate text".to_string())
        })?;

        let analysis = extract_json_object(text)?;
        let missing = analysis.missing_categories();
        if !missing.is_empty() {
            log::warn!("Gemini analysis is missing categories: {:?}", missing);
        }

        log::debug!("Gemini summary: {}", analysis.summary().unwrap_or("<none>"));
        log::info!("Successfully completed Gemini analysis");
        Ok(analysis)
    }

    fn prompt_version(&self) -> &str {
        self.prompt.version()
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

fn candidate_text(body: &Value) -> Option<&str> {
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
}

/// Parses everything from the first `{` to the last `}` as one JSON object.
///
/// Tolerates commentary or code fences the model wraps around the object.
pub fn extract_json_object(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(AnalysisError::MalformedRatingResponse(
                "no JSON object in response".to_string(),
            ))
        }
    };

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(object)) => Ok(AnalysisResult::from_object(object)),
        Ok(_) => Err(AnalysisError::MalformedRatingResponse(
            "response is not a JSON object".to_string(),
        )),
        Err(e) => {
            log::error!("JSON parsing error: {}", e);
            Err(AnalysisError::MalformedRatingResponse(e.to_string()))
        }
    }
}
