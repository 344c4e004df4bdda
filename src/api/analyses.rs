use crate::api::shared::Envelope;
use crate::models::AnalysisRequest;
use crate::services::{AnalysisError, Analyzer};
use actix_web::{web, HttpResponse};
use futures::FutureExt;
use serde::Deserialize;
use std::panic::AssertUnwindSafe;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/analyze-video", web::post().to(analyze_video))
        .route("/analyses", web::get().to(list_analyses));
}

pub async fn analyze_video(
    request: web::Json<AnalysisRequest>,
    analyzer: web::Data<Analyzer>,
) -> Result<HttpResponse, AnalysisError> {
    let youtube_url = request.into_inner().youtube_url;

    // Last line of defence: a panic anywhere in the flow still yields an envelope
    let outcome = AssertUnwindSafe(analyzer.analyze(&youtube_url))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "analysis panicked".to_string());
            Err(AnalysisError::UnexpectedError(reason))
        });

    match outcome {
        Ok(result) => Ok(HttpResponse::Ok().json(Envelope::ok(result))),
        Err(e) => {
            log::error!("Analysis of {} failed ({}): {}", youtube_url, e.kind(), e);
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQueryParams {
    pub limit: Option<i64>,
}

pub async fn list_analyses(
    query: web::Query<ListQueryParams>,
    analyzer: web::Data<Analyzer>,
) -> Result<HttpResponse, AnalysisError> {
    let records = analyzer.recent(query.limit).await.map_err(|e| {
        log::error!("Error loading analyses: {}", e);
        e
    })?;
    Ok(HttpResponse::Ok().json(Envelope::ok(records)))
}
