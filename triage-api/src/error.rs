//! Error Types for the TRIAGE API
//!
//! Every error response carries a stable `error_stage` discriminant plus a
//! human-readable message, so callers can distinguish "our input was bad"
//! from "a dependency is down". All errors are serialized as JSON with the
//! appropriate HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use triage_core::{PipelineStage, Timestamp, TriageError};

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses. One per pipeline stage that can fail a
/// request, plus a catch-all for the unanticipated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request validation failed (bad shape or length)
    ValidationFailed,

    /// Translation dependency failed
    TranslationFailed,

    /// Classification dependency failed
    ClassificationFailed,

    /// Judgment dependency failed or violated the structured-output contract
    JudgmentFailed,

    /// Anything unanticipated, caught at the outer boundary
    ProcessingFailed,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,

            // Dependency failures: the service is degraded, not the request.
            ErrorCode::TranslationFailed
            | ErrorCode::ClassificationFailed
            | ErrorCode::JudgmentFailed => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::ProcessingFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
///
/// Wire shape: `{ error, error_message, error_stage, timestamp }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub error: ErrorCode,

    /// Human-readable error message
    pub error_message: String,

    /// Pipeline stage that produced the error
    pub error_stage: PipelineStage,

    /// When the error response was assembled
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub timestamp: Timestamp,
}

impl ApiError {
    /// Create a new API error, stamped now.
    pub fn new(error: ErrorCode, stage: PipelineStage, message: impl Into<String>) -> Self {
        Self {
            error,
            error_message: message.into(),
            error_stage: stage,
            timestamp: Utc::now(),
        }
    }

    /// Create a ValidationFailed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, PipelineStage::Validation, message)
    }

    /// Create a ProcessingFailed error.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProcessingFailed, PipelineStage::Processing, message)
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.error, self.error_stage, self.error_message)
    }
}

impl std::error::Error for ApiError {}

/// Tag a pipeline error with its originating stage and pick the matching
/// code. Persistence errors never reach this boundary on the response path;
/// if one does, it is reported as a processing failure.
impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        let (code, stage) = match err.stage() {
            PipelineStage::Validation => (ErrorCode::ValidationFailed, PipelineStage::Validation),
            PipelineStage::Translation => {
                (ErrorCode::TranslationFailed, PipelineStage::Translation)
            }
            PipelineStage::MlService => {
                (ErrorCode::ClassificationFailed, PipelineStage::MlService)
            }
            PipelineStage::Gemini => (ErrorCode::JudgmentFailed, PipelineStage::Gemini),
            PipelineStage::Persistence | PipelineStage::Processing => {
                (ErrorCode::ProcessingFailed, PipelineStage::Processing)
            }
        };
        Self::new(code, stage, err.to_string())
    }
}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
