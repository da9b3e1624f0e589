//! Error types for TRIAGE pipeline operations
//!
//! One error kind per pipeline stage. The first four are fail-fast and
//! mutually exclusive; persistence errors are non-fatal and never reach the
//! caller.

use crate::PipelineStage;
use thiserror::Error;

/// Request validation errors. Terminal, no retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Field '{field}' exceeds maximum length: {length} > {max}")]
    TextTooLong {
        field: String,
        length: usize,
        max: usize,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Translation capability errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Translation request failed with status {status}: {message}")]
    RequestFailed { status: i32, message: String },

    #[error("Translation transport failure: {message}")]
    Transport { message: String },

    #[error("Translation service returned an empty translation")]
    EmptyTranslation,

    #[error("Invalid translation response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Translation timed out after {limit_ms}ms")]
    Timeout { limit_ms: u64 },
}

/// Classification capability errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Classification request failed with status {status}: {message}")]
    RequestFailed { status: i32, message: String },

    #[error("Classification transport failure: {message}")]
    Transport { message: String },

    #[error("Invalid classification response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Unknown cluster index: {cluster}")]
    UnknownCluster { cluster: i32 },

    #[error("Classification timed out after {limit_ms}ms")]
    Timeout { limit_ms: u64 },
}

/// Judgment capability errors. Transport failures and structured-output
/// contract violations are treated identically: the dependency is unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JudgmentError {
    #[error("Judgment request failed with status {status}: {message}")]
    RequestFailed { status: i32, message: String },

    #[error("Judgment transport failure: {message}")]
    Transport { message: String },

    #[error("Malformed judgment output: {reason}")]
    MalformedOutput { reason: String },

    #[error("Judgment contract violation on {field}: {reason}")]
    ContractViolation { field: String, reason: String },

    #[error("Judgment timed out after {limit_ms}ms")]
    Timeout { limit_ms: u64 },
}

/// Datastore errors. Always non-fatal: logged, never returned to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Insert failed: {reason}")]
    InsertFailed { reason: String },

    #[error("Datastore connection pool exhausted")]
    PoolExhausted,

    #[error("Datastore unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Master error type for all TRIAGE pipeline errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriageError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    #[error("Judgment error: {0}")]
    Judgment(#[from] JudgmentError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TriageError {
    /// The pipeline stage that produced this error.
    pub fn stage(&self) -> PipelineStage {
        match self {
            TriageError::Validation(_) => PipelineStage::Validation,
            TriageError::Translation(_) => PipelineStage::Translation,
            TriageError::Classification(_) => PipelineStage::MlService,
            TriageError::Judgment(_) => PipelineStage::Gemini,
            TriageError::Persistence(_) => PipelineStage::Persistence,
            TriageError::Internal { .. } => PipelineStage::Processing,
        }
    }

    /// Create an internal error from any message.
    pub fn internal(message: impl Into<String>) -> Self {
        TriageError::Internal {
            message: message.into(),
        }
    }
}

/// Result type alias for TRIAGE operations.
pub type TriageResult<T> = Result<T, TriageError>;

// =============================================================================
// TESTS
// =============================================================================
