use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod models;
mod services;
#[cfg(test)]
mod test_support;

use config::{AppConfig, StoreBackend};
use db::{AnalysisStore, MemoryAnalysisStore, PgAnalysisStore};
use services::prompt::PromptTemplate;
use services::rating::GeminiRatingClient;
use services::transcript::DumplingTranscriptClient;
use services::Analyzer;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    let config = AppConfig::new().context("Failed to load configuration")?;

    let store: Arc<dyn AnalysisStore> = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = db::create_pool(&config.database.url, config.database.max_connections)
                .context("Failed to create database pool")?;
            Arc::new(PgAnalysisStore::new(pool))
        }
        StoreBackend::Memory => {
            log::warn!("Using in-memory store, analyses are lost on restart");
            Arc::new(MemoryAnalysisStore::new())
        }
    };

    let prompt = PromptTemplate::load(config.rating.prompt_template_path.as_deref())
        .context("Failed to load persona prompt")?;
    log::info!("Persona prompt version {}", prompt.version());

    if config.transcript.api_key.is_none() {
        log::warn!("APP__TRANSCRIPT__API_KEY is not set, transcript requests will be rejected");
    }
    if config.rating.api_key.is_none() {
        log::warn!("APP__RATING__API_KEY is not set, rating requests will be rejected");
    }

    let transcripts = DumplingTranscriptClient::new(config.transcript.clone())
        .context("Failed to build transcript client")?;
    let rater = GeminiRatingClient::new(config.rating.clone(), prompt)
        .context("Failed to build rating client")?;

    let analyzer = web::Data::new(Analyzer::new(
        Arc::new(transcripts),
        Arc::new(rater),
        store,
        config.cache.window(),
    ));

    log::info!(
        "Starting server on {}:{} (cache window {} days)",
        config.server.host,
        config.server.port,
        config.cache.window_days
    );

    HttpServer::new(move || {
        App::new()
            .app_data(analyzer.clone())
            .wrap(Logger::default())
            .wrap(actix_cors::Cors::permissive())
            .configure(api::configure)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run()
    .await?;

    log::info!("Gradi API shut down");
    Ok(())
}
