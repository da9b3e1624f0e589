//! Pipeline Orchestrator
//!
//! Sequences translation -> classification -> judgment as a strictly
//! sequential chain: each stage consumes the previous stage's output, so
//! there is no fan-out. On failure at any stage the chain aborts
//! immediately - later stages are never attempted with partial inputs.
//!
//! Each external call is wrapped in its own wall-clock timer and its own
//! timeout; total duration is measured around the whole pipeline so
//! orchestration overhead stays visible. Persistence is NOT triggered here -
//! the route handler schedules it after the result is final.

use std::time::Instant;

use chrono::Utc;
use tokio::time::timeout;
use triage_core::{
    decide_escalation, new_ticket_id, ClassificationError, JudgmentError, PipelineResult,
    TicketRequest, TranslationError, TriageResult,
};

use crate::state::AppState;

/// Run the full triage pipeline for one accepted request.
///
/// The request is assumed validated (non-empty, within the length limit);
/// validation happens at the route boundary before any remote call.
pub async fn run_pipeline(state: &AppState, request: &TicketRequest) -> TriageResult<PipelineResult> {
    let total_start = Instant::now();

    let ticket_id = request
        .ticket_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(new_ticket_id);

    tracing::info!(%ticket_id, "ticket accepted, starting pipeline");

    // Stage 1: translation.
    let stage_start = Instant::now();
    let translation = timeout(
        state.translation_timeout,
        state.translator.translate(&request.text),
    )
    .await
    .map_err(|_| TranslationError::Timeout {
        limit_ms: state.translation_timeout.as_millis() as u64,
    })??;
    let translation_time_ms = stage_start.elapsed().as_millis() as u64;
    tracing::debug!(%ticket_id, translation_time_ms, "translation stage complete");

    // Stage 2: classification, consumes the translation.
    let stage_start = Instant::now();
    let classification = timeout(
        state.classification_timeout,
        state
            .classifier
            .classify(&translation.translated_text, &ticket_id),
    )
    .await
    .map_err(|_| ClassificationError::Timeout {
        limit_ms: state.classification_timeout.as_millis() as u64,
    })??;
    let ml_time_ms = stage_start.elapsed().as_millis() as u64;
    tracing::debug!(
        %ticket_id,
        cluster = classification.cluster,
        ml_time_ms,
        "classification stage complete"
    );

    // Stage 3: judgment, contextual on the classification.
    let stage_start = Instant::now();
    let judgment = timeout(
        state.judgment_timeout,
        state
            .judge
            .judge(&request.text, &translation.translated_text, &classification),
    )
    .await
    .map_err(|_| JudgmentError::Timeout {
        limit_ms: state.judgment_timeout.as_millis() as u64,
    })??;
    let llm_time_ms = stage_start.elapsed().as_millis() as u64;
    tracing::debug!(
        %ticket_id,
        ml_valid = judgment.ml_valid,
        llm_time_ms,
        "judgment stage complete"
    );

    // Stage 4: escalation decisioning, pure.
    let decision = decide_escalation(&classification, &judgment);

    let result = PipelineResult {
        ticket_id,
        original_text: request.text.clone(),
        translated_text: translation.translated_text,
        translation_time_ms,
        ml_cluster: classification.cluster,
        ml_urgency: classification.urgency,
        ml_priority: classification.priority,
        ml_confidence: classification.confidence,
        ml_auto_escalate: classification.auto_escalate,
        ml_probabilities: classification.probabilities,
        ml_time_ms,
        llm_ml_valid: judgment.ml_valid,
        llm_confidence_assessment: judgment.confidence_assessment,
        llm_issue_category: judgment.issue_category,
        llm_reasoning: judgment.reasoning,
        llm_customer_response: judgment.customer_response,
        llm_recommended_action: judgment.recommended_action,
        llm_tone: judgment.tone,
        llm_keywords: judgment.keywords,
        llm_time_ms,
        escalation_triggered: decision.triggered,
        escalation_reason: decision.reason,
        total_processing_time_ms: total_start.elapsed().as_millis() as u64,
        timestamp: Utc::now(),
    };

    tracing::info!(
        ticket_id = %result.ticket_id,
        escalation_triggered = result.escalation_triggered,
        total_processing_time_ms = result.total_processing_time_ms,
        "pipeline complete"
    );

    Ok(result)
}

// ============================================================================
// TESTS
// ============================================================================
