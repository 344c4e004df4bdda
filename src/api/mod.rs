pub mod analyses;
pub mod health;
pub mod shared;

use actix_web::{error, web, HttpResponse};
use shared::Envelope;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let response = HttpResponse::BadRequest().json(Envelope::failure(err.to_string()));
                error::InternalError::from_response(err, response).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let response = HttpResponse::BadRequest().json(Envelope::failure(err.to_string()));
                error::InternalError::from_response(err, response).into()
            }))
            .route("/", web::get().to(root))
            .configure(analyses::configure)
            .configure(health::configure),
    );
}

async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Gradi YouTube Video Analysis API - Ready to analyze!"
    }))
}
