use crate::services::Analyzer;
use actix_web::{web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

fn configured(flag: bool) -> &'static str {
    if flag {
        "configured"
    } else {
        "missing_api_key"
    }
}

async fn health_check(analyzer: web::Data<Analyzer>) -> HttpResponse {
    let store = analyzer.store();
    let store_connected = match store.ping().await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Health check could not reach the store: {}", e);
            false
        }
    };
    let transcripts_configured = analyzer.transcripts_configured();
    let rater_configured = analyzer.rater_configured();

    let status = if store_connected && transcripts_configured && rater_configured {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "services": {
            "transcript_provider": configured(transcripts_configured),
            "rating_provider": configured(rater_configured),
            "store": {
                "backend": store.backend_name(),
                "status": if store_connected { "connected" } else { "disconnected" },
            },
        }
    }))
}
