//! Ticket Evaluation Route
//!
//! `POST /ticket/evaluate` runs the full triage pipeline and returns the
//! flat result. Validation happens here, before any remote capability is
//! called. Persistence is scheduled as a detached task after the result is
//! final - its outcome can never alter the response.

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

use triage_core::{PipelineResult, TicketRequest};
use triage_storage::spawn_persistence;

use crate::error::{ApiError, ApiResult};
use crate::pipeline::run_pipeline;
use crate::state::AppState;
use crate::validation::{ValidateMaxLength, ValidateNonEmpty};

/// POST /ticket/evaluate - Run the triage pipeline for one ticket
#[utoipa::path(
    post,
    path = "/ticket/evaluate",
    tag = "Ticket",
    request_body = TicketRequest,
    responses(
        (status = 200, description = "Pipeline completed", body = PipelineResult),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 503, description = "A dependency failed", body = ApiError),
        (status = 500, description = "Unexpected failure", body = ApiError),
    ),
)]
pub async fn evaluate_ticket(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TicketRequest>,
) -> ApiResult<Json<PipelineResult>> {
    request.text.validate_non_empty("text")?;
    request
        .text
        .validate_max_length("text", state.max_text_length)?;

    let result = run_pipeline(&state, &request).await.map_err(ApiError::from)?;

    // Fire-and-forget: the caller gets the response regardless of what the
    // sink does.
    spawn_persistence(
        state.store.clone(),
        result.clone(),
        state.extraction.clone(),
    );

    Ok(Json(result))
}

/// Create the ticket routes router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_ticket))
        .with_state(state)
}
