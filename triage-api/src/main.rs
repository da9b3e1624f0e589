//! TRIAGE API Server Entry Point
//!
//! Bootstraps configuration, builds the HTTP providers and the PostgreSQL
//! result store, and starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use triage_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};
use triage_llm::{
    GeminiClient, GeminiJudgmentProvider, HttpClassificationProvider, HttpTranslationProvider,
};
use triage_storage::{DbConfig, PgResultStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ApiConfig::from_env();

    let translator = Arc::new(
        HttpTranslationProvider::new(
            config.translator_url.clone(),
            config.source_lang.clone(),
            config.translation_timeout,
        )
        .map_err(ApiError::from)?,
    );
    let classifier = Arc::new(
        HttpClassificationProvider::new(
            config.classifier_url.clone(),
            config.classification_timeout,
        )
        .map_err(ApiError::from)?,
    );
    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.judgment_timeout)
        .map_err(ApiError::from)?;
    let judge = Arc::new(GeminiJudgmentProvider::new(
        gemini,
        config.gemini_model.clone(),
    ));

    let db_config = DbConfig::from_env();
    let store = Arc::new(PgResultStore::from_config(&db_config).map_err(ApiError::from)?);

    let state = Arc::new(AppState::new(translator, classifier, judge, store, &config));
    let app: Router = create_api_router(state, &config);

    let addr = resolve_bind_addr(&config)?;
    tracing::info!(%addr, "Starting TRIAGE API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr(config: &ApiConfig) -> ApiResult<SocketAddr> {
    let addr = format!("{}:{}", config.bind_host, config.port);
    addr.parse::<SocketAddr>().map_err(|e| {
        ApiError::internal_error(format!("Invalid bind address {}: {}", addr, e))
    })
}
