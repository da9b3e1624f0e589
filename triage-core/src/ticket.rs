//! Pipeline data model
//!
//! Types flow in dependency order: a `TicketRequest` enters the pipeline,
//! each stage produces its own result type, and `PipelineResult` is the flat
//! wire-facing union of all of them. Flattening is a deliberate contract -
//! downstream consumers never navigate nested objects.

use crate::enums::{
    ConfidenceAssessment, EscalationReason, IssueCategory, Priority, RecommendedAction,
    ResponseTone, Urgency,
};
use crate::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// REQUEST
// ============================================================================

/// An incoming support ticket. Immutable once accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TicketRequest {
    /// Free-text ticket body in the customer's language.
    pub text: String,
    /// Caller-supplied correlation id. Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

// ============================================================================
// STAGE RESULTS
// ============================================================================

/// Output of the translation stage. Folded into the flat result, never
/// persisted independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub elapsed_ms: u64,
}

/// Output of the classification stage. The urgency/priority/auto_escalate
/// triple is derived from the static cluster table, not returned by the
/// remote capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub cluster: i32,
    pub urgency: Urgency,
    pub priority: Priority,
    pub confidence: f64,
    pub auto_escalate: bool,
    /// One entry per cluster, sums to ~1. The argmax invariant is trusted,
    /// not enforced.
    pub probabilities: Vec<f64>,
}

/// Structured output of the judgment stage. Every field is required; a
/// payload missing any field or violating an enum constraint is a contract
/// violation, not a business answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentResult {
    pub ml_valid: bool,
    pub confidence_assessment: ConfidenceAssessment,
    pub issue_category: IssueCategory,
    pub reasoning: String,
    /// Customer-facing reply, in the customer's language.
    pub customer_response: String,
    pub recommended_action: RecommendedAction,
    pub tone: ResponseTone,
    /// 5-10 short phrases, 2-50 chars each, deduplicated, sourced from the
    /// original text.
    pub keywords: Vec<String>,
}

/// Escalation verdict. Derived, not independently persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationDecision {
    pub triggered: bool,
    pub reason: EscalationReason,
    pub urgency: Urgency,
    pub priority: Priority,
}

// ============================================================================
// FLAT RESULT
// ============================================================================

/// The single flat record returned to the caller. Field names are prefixed
/// by originating stage (`ml_*`, `llm_*`); no nested objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PipelineResult {
    pub ticket_id: String,
    pub original_text: String,
    pub translated_text: String,
    pub translation_time_ms: u64,

    pub ml_cluster: i32,
    pub ml_urgency: Urgency,
    pub ml_priority: Priority,
    pub ml_confidence: f64,
    pub ml_auto_escalate: bool,
    pub ml_probabilities: Vec<f64>,
    pub ml_time_ms: u64,

    pub llm_ml_valid: bool,
    pub llm_confidence_assessment: ConfidenceAssessment,
    pub llm_issue_category: IssueCategory,
    pub llm_reasoning: String,
    pub llm_customer_response: String,
    pub llm_recommended_action: RecommendedAction,
    pub llm_tone: ResponseTone,
    pub llm_keywords: Vec<String>,
    pub llm_time_ms: u64,

    pub escalation_triggered: bool,
    pub escalation_reason: EscalationReason,

    /// End-to-end wall time, not the sum of stage times.
    pub total_processing_time_ms: u64,
    /// Stamped once at assembly.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub timestamp: Timestamp,
}

// ============================================================================
// PERSISTED FORMS
// ============================================================================

/// One append-only analytics row per successful pipeline run. Created
/// asynchronously after the response is committed; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub result_id: Uuid,
    pub ticket_id: String,
    pub original_text: String,
    pub translated_text: String,
    pub translation_time_ms: u64,
    pub ml_cluster: i32,
    pub ml_urgency: Urgency,
    pub ml_priority: Priority,
    pub ml_confidence: f64,
    pub ml_auto_escalate: bool,
    pub ml_probabilities: Vec<f64>,
    pub ml_time_ms: u64,
    pub llm_ml_valid: bool,
    pub llm_confidence_assessment: ConfidenceAssessment,
    pub llm_issue_category: IssueCategory,
    pub llm_reasoning: String,
    pub llm_customer_response: String,
    pub llm_recommended_action: RecommendedAction,
    pub llm_tone: ResponseTone,
    pub llm_keywords: Vec<String>,
    pub llm_time_ms: u64,
    pub escalation_triggered: bool,
    pub escalation_reason: EscalationReason,
    pub total_processing_time_ms: u64,
    pub timestamp: Timestamp,
}

impl PersistedRecord {
    /// Build the analytics row for a finished pipeline run, keyed by a fresh
    /// generated identifier.
    pub fn from_result(result: &PipelineResult) -> Self {
        Self {
            result_id: Uuid::new_v4(),
            ticket_id: result.ticket_id.clone(),
            original_text: result.original_text.clone(),
            translated_text: result.translated_text.clone(),
            translation_time_ms: result.translation_time_ms,
            ml_cluster: result.ml_cluster,
            ml_urgency: result.ml_urgency,
            ml_priority: result.ml_priority,
            ml_confidence: result.ml_confidence,
            ml_auto_escalate: result.ml_auto_escalate,
            ml_probabilities: result.ml_probabilities.clone(),
            ml_time_ms: result.ml_time_ms,
            llm_ml_valid: result.llm_ml_valid,
            llm_confidence_assessment: result.llm_confidence_assessment,
            llm_issue_category: result.llm_issue_category,
            llm_reasoning: result.llm_reasoning.clone(),
            llm_customer_response: result.llm_customer_response.clone(),
            llm_recommended_action: result.llm_recommended_action,
            llm_tone: result.llm_tone,
            llm_keywords: result.llm_keywords.clone(),
            llm_time_ms: result.llm_time_ms,
            escalation_triggered: result.escalation_triggered,
            escalation_reason: result.escalation_reason,
            total_processing_time_ms: result.total_processing_time_ms,
            timestamp: result.timestamp,
        }
    }
}

/// One extracted keyword linked to its parent result row. Inserted only
/// after the parent row exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub result_id: Uuid,
    pub keyword: String,
    pub frequency: i64,
}

// ============================================================================
// TESTS
// ============================================================================
