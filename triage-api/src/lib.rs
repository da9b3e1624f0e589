//! TRIAGE API - REST API Layer
//!
//! This crate provides the HTTP surface for the TRIAGE ticket pipeline:
//! request validation, the pipeline orchestrator, stage-tagged error
//! responses, health endpoints, and the fire-and-forget persistence hookup.

pub mod config;
pub mod error;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod validation;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use pipeline::run_pipeline;
pub use routes::create_api_router;
pub use state::AppState;
