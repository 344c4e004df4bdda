use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The six categories every rating is expected to cover.
pub const RATING_CATEGORIES: [&str; 6] = [
    "Clarity of Content",
    "Commercial Balance",
    "Content Depth",
    "Student Interaction",
    "Content Structure",
    "Communication Effectiveness",
];

pub const CACHE_INFO_KEY: &str = "_cache_info";

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub youtube_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRating {
    pub score: f64,
    pub reason: String,
    #[serde(default)]
    pub positives: Vec<String>,
    #[serde(default)]
    pub negatives: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Rating provider output, kept as the JSON object the provider produced.
///
/// Only JSON-parseability is enforced; the typed accessors below read what is
/// there and never fill gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Map<String, Value>);

impl AnalysisResult {
    pub fn from_object(object: Map<String, Value>) -> Self {
        Self(object)
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.get("summary").and_then(Value::as_str)
    }

    pub fn ratings(&self) -> Option<&Map<String, Value>> {
        self.0.get("ratings").and_then(Value::as_object)
    }

    pub fn category(&self, name: &str) -> Option<CategoryRating> {
        let raw = self.ratings()?.get(name)?;
        serde_json::from_value(raw.clone()).ok()
    }

    /// All categories that decode cleanly, keyed by name.
    pub fn typed_ratings(&self) -> BTreeMap<String, CategoryRating> {
        RATING_CATEGORIES
            .iter()
            .filter_map(|name| self.category(name).map(|r| (name.to_string(), r)))
            .collect()
    }

    pub fn missing_categories(&self) -> Vec<&'static str> {
        RATING_CATEGORIES
            .iter()
            .copied()
            .filter(|name| self.ratings().map_or(true, |r| !r.contains_key(*name)))
            .collect()
    }

    #[cfg(test)]
    pub fn cache_info(&self) -> Option<CacheInfo> {
        self.0
            .get(CACHE_INFO_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn with_cache_info(mut self, info: &CacheInfo) -> Self {
        // CacheInfo only holds plain scalars
        let value = serde_json::to_value(info).unwrap_or(Value::Null);
        self.0.insert(CACHE_INFO_KEY.to_string(), value);
        self
    }

    /// Provider output without any cache decoration, as it is persisted.
    pub fn without_cache_info(mut self) -> Self {
        self.0.remove(CACHE_INFO_KEY);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheInfo {
    pub from_cache: bool,
    pub created_at: DateTime<Utc>,
    pub analysis_duration: f64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysisRecord {
    pub id: Uuid,
    pub youtube_url: String,
    pub transcript: String,
    pub analysis_result: AnalysisResult,
    pub prompt_version: String,
    pub created_at: DateTime<Utc>,
    /// Seconds of wall-clock time the fresh analysis took.
    pub analysis_duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_analysis;
    use serde_json::json;

    #[test]
    fn sample_covers_every_category() {
        let result = sample_analysis();
        assert!(result.missing_categories().is_empty());
        assert_eq!(result.typed_ratings().len(), RATING_CATEGORIES.len());
        assert_eq!(result.summary(), Some("Gradi thinks this was solid."));
    }

    #[test]
    fn incomplete_output_is_reported_not_repaired() {
        let object = json!({
            "summary": "short",
            "ratings": { "Content Depth": { "score": 3.5, "reason": "ok" } }
        });
        let result = AnalysisResult::from_object(object.as_object().unwrap().clone());

        assert_eq!(result.missing_categories().len(), 5);
        let depth = result.category("Content Depth").unwrap();
        assert_eq!(depth.score, 3.5);
        assert!(depth.positives.is_empty());
        assert!(result.ratings().unwrap().get("Content Structure").is_none());
    }

    #[test]
    fn cache_info_is_appended_and_stripped() {
        let now = Utc::now();
        let info = CacheInfo {
            from_cache: true,
            created_at: now,
            analysis_duration: 4.2,
            expires_at: now + chrono::Duration::days(7),
        };

        let decorated = sample_analysis().with_cache_info(&info);
        assert_eq!(decorated.cache_info(), Some(info));
        assert_eq!(
            decorated.clone().into_value()[CACHE_INFO_KEY]["from_cache"],
            json!(true)
        );
        assert_eq!(decorated.without_cache_info(), sample_analysis());
    }
}
