//! OpenAPI Documentation
//!
//! Aggregates the path annotations and schemas into one document served at
//! `/openapi.json`.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use triage_core::{
    ConfidenceAssessment, EscalationReason, IssueCategory, PipelineResult, PipelineStage,
    Priority, RecommendedAction, ResponseTone, TicketRequest, Urgency,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TRIAGE API",
        description = "Support ticket triage pipeline: translation, classification, judgment, escalation decisioning, and asynchronous analytics persistence.",
    ),
    paths(
        crate::routes::ticket::evaluate_ticket,
        crate::routes::health::ping,
        crate::routes::health::liveness,
        crate::routes::health::readiness,
    ),
    components(schemas(
        TicketRequest,
        PipelineResult,
        ApiError,
        ErrorCode,
        PipelineStage,
        Urgency,
        Priority,
        ConfidenceAssessment,
        IssueCategory,
        RecommendedAction,
        ResponseTone,
        EscalationReason,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ComponentHealth,
    )),
    tags(
        (name = "Ticket", description = "Triage pipeline operations"),
        (name = "Health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
