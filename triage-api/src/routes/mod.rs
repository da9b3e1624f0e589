//! REST API Routes Module
//!
//! Includes:
//! - Ticket evaluation endpoint (the triage pipeline)
//! - Health check endpoints (Kubernetes-compatible)
//! - OpenAPI document endpoint
//! - CORS support for browser-based clients

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::state::AppState;

pub mod health;
pub mod ticket;

// Re-export route creation functions for convenience
pub use health::create_router as health_router;
pub use ticket::create_router as ticket_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        // Dev mode: allow all origins.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Create the complete API router.
///
/// Unsupported methods on known paths get 405 from Axum's method routing;
/// unknown paths get 404.
pub fn create_api_router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    let router = Router::new()
        .nest("/ticket", ticket_router(state.clone()))
        .nest("/health", health_router(state));

    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", axum::routing::get(openapi_json));

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}
