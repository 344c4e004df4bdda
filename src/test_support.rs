//! Fixtures and provider fakes shared by the unit tests.

use crate::models::{AnalysisResult, VideoAnalysisRecord};
use crate::services::error::AnalysisError;
use crate::services::rating::{extract_json_object, RatingProvider};
use crate::services::transcript::TranscriptProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const TEST_PROMPT_VERSION: &str = "test-persona";

pub fn sample_analysis_json() -> String {
    let category = r#"{"score": 4.0, "reason": "Clarity OP thi", "positives": ["clear"], "negatives": ["fast"], "suggestions": ["slow down"]}"#;
    format!(
        r#"{{
  "summary": "Gradi thinks this was solid.",
  "positives": ["Structured"],
  "negatives": ["Rushed ending"],
  "suggestions_for_improvement": ["Add recap"],
  "ratings": {{
    "Clarity of Content": {c},
    "Commercial Balance": {c},
    "Content Depth": {c},
    "Student Interaction": {c},
    "Content Structure": {c},
    "Communication Effectiveness": {c}
  }}
}}"#,
        c = category
    )
}

pub fn sample_analysis() -> AnalysisResult {
    extract_json_object(&sample_analysis_json()).unwrap()
}

pub fn record_at(youtube_url: &str, created_at: DateTime<Utc>) -> VideoAnalysisRecord {
    VideoAnalysisRecord {
        id: Uuid::new_v4(),
        youtube_url: youtube_url.to_string(),
        transcript: "Namaste friends! Aaj arrays seekhenge.".to_string(),
        analysis_result: sample_analysis(),
        prompt_version: TEST_PROMPT_VERSION.to_string(),
        created_at,
        analysis_duration: 3.5,
    }
}

/// Replays a fixed outcome and counts calls.
pub struct FakeTranscripts {
    outcome: Box<dyn Fn() -> Result<String, AnalysisError> + Send + Sync>,
    calls: AtomicUsize,
}

impl FakeTranscripts {
    pub fn returning(text: &str) -> Self {
        let text = text.to_string();
        Self::with(move || Ok(text.clone()))
    }

    pub fn with(outcome: impl Fn() -> Result<String, AnalysisError> + Send + Sync + 'static) -> Self {
        Self {
            outcome: Box::new(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptProvider for FakeTranscripts {
    async fn fetch_transcript(&self, _youtube_url: &str) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }

    fn is_configured(&self) -> bool {
        true
    }
}

pub struct FakeRater {
    outcome: Box<dyn Fn() -> Result<AnalysisResult, AnalysisError> + Send + Sync>,
    calls: AtomicUsize,
}

impl FakeRater {
    pub fn returning_sample() -> Self {
        Self::with(|| Ok(sample_analysis()))
    }

    pub fn with(
        outcome: impl Fn() -> Result<AnalysisResult, AnalysisError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            outcome: Box::new(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RatingProvider for FakeRater {
    async fn rate(&self, _transcript: &str) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }

    fn prompt_version(&self) -> &str {
        TEST_PROMPT_VERSION
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Accepts one HTTP request on a local port and answers it with `status` and
/// `body` after `delay`. Returns the base URL to point a client at.
pub async fn serve_once(status: &str, body: &str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        tokio::time::sleep(delay).await;
        // The client may already have given up
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}")
}

async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            return;
        }
    }
}
