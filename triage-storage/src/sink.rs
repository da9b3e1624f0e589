//! Fire-and-forget persistence sink
//!
//! Invoked after the pipeline response has already been handed to the
//! caller. Step 1: insert the result row. Step 2: re-tokenize the *original*
//! text and extract keywords. Step 3: bulk-insert keyword rows referencing
//! the parent id. Every failure on this path is logged and swallowed; the
//! sink can never alter, delay, or fail the caller-visible response.

use crate::async_trait::AsyncResultStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use triage_core::{
    extract_keywords, ExtractionConfig, KeywordRecord, PersistedRecord, PipelineResult,
};

/// Launch the persistence sink as a detached task. Callers must not await
/// the handle on the response path; it is returned for tests only.
pub fn spawn_persistence(
    store: Arc<dyn AsyncResultStore>,
    result: PipelineResult,
    config: ExtractionConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        persist_result(store.as_ref(), &result, &config).await;
    })
}

/// Persist one pipeline result and its extracted keywords.
///
/// Keyword rows are only inserted after the parent row's identifier is
/// known. A failure between the two inserts leaves an orphaned result row
/// with no keywords - logged, accepted, non-fatal.
pub async fn persist_result(
    store: &dyn AsyncResultStore,
    result: &PipelineResult,
    config: &ExtractionConfig,
) {
    let record = PersistedRecord::from_result(result);

    let result_id = match store.result_insert(&record).await {
        Ok(id) => id,
        Err(error) => {
            tracing::error!(
                ticket_id = %result.ticket_id,
                error = %error,
                "result insert failed, skipping keyword extraction"
            );
            return;
        }
    };

    let keywords: Vec<KeywordRecord> = extract_keywords(&result.original_text, config)
        .into_iter()
        .map(|kw| KeywordRecord {
            result_id,
            keyword: kw.keyword,
            frequency: kw.frequency,
        })
        .collect();

    if keywords.is_empty() {
        tracing::debug!(%result_id, "no keywords extracted");
        return;
    }

    if let Err(error) = store.keywords_insert(&keywords).await {
        tracing::warn!(
            %result_id,
            error = %error,
            "keyword insert failed, result row left without keywords"
        );
        return;
    }

    tracing::debug!(
        %result_id,
        keyword_count = keywords.len(),
        "pipeline result persisted"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryResultStore;
    use chrono::Utc;
    use triage_core::{
        ConfidenceAssessment, EscalationReason, IssueCategory, Priority, RecommendedAction,
        ResponseTone, Urgency,
    };

    fn result(original_text: &str) -> PipelineResult {
        PipelineResult {
            ticket_id: "T-1".to_string(),
            original_text: original_text.to_string(),
            translated_text: "internet down since morning".to_string(),
            translation_time_ms: 10,
            ml_cluster: 3,
            ml_urgency: Urgency::High,
            ml_priority: Priority::P1,
            ml_confidence: 0.99,
            ml_auto_escalate: true,
            ml_probabilities: vec![0.0, 0.0, 0.01, 0.99],
            ml_time_ms: 5,
            llm_ml_valid: true,
            llm_confidence_assessment: ConfidenceAssessment::High,
            llm_issue_category: IssueCategory::Connectivity,
            llm_reasoning: "outage".to_string(),
            llm_customer_response: "maaf".to_string(),
            llm_recommended_action: RecommendedAction::Escalate,
            llm_tone: ResponseTone::Apologetic,
            llm_keywords: vec![
                "internet mati".to_string(),
                "gangguan".to_string(),
                "jaringan".to_string(),
                "koneksi".to_string(),
                "mati total".to_string(),
            ],
            llm_time_ms: 30,
            escalation_triggered: true,
            escalation_reason: EscalationReason::Llm,
            total_processing_time_ms: 50,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_persists_result_then_keywords() {
        let store = Arc::new(InMemoryResultStore::new());
        let result = result("internet mati internet mati total sekali parah");

        persist_result(store.as_ref(), &result, &ExtractionConfig::default()).await;

        assert_eq!(store.result_count().await, 1);
        let stored = store.results().await.pop().unwrap();
        let keywords = store.keywords_for(stored.result_id).await;
        assert!(!keywords.is_empty());
        // Keywords come from the original text, not the translation.
        assert!(keywords.iter().any(|k| k.keyword.contains("internet")));
        assert!(!keywords.iter().any(|k| k.keyword.contains("morning")));
    }

    #[tokio::test]
    async fn test_result_insert_failure_stops_silently() {
        let store = Arc::new(InMemoryResultStore::new());
        store.fail_result_inserts(true);

        // Must not panic or propagate.
        persist_result(
            store.as_ref(),
            &result("internet mati"),
            &ExtractionConfig::default(),
        )
        .await;

        assert_eq!(store.result_count().await, 0);
    }

    #[tokio::test]
    async fn test_keyword_failure_leaves_orphaned_result_row() {
        let store = Arc::new(InMemoryResultStore::new());
        store.fail_keyword_inserts(true);

        persist_result(
            store.as_ref(),
            &result("internet mati total parah sekali"),
            &ExtractionConfig::default(),
        )
        .await;

        // Result row exists, keywords do not: the accepted inconsistency.
        assert_eq!(store.result_count().await, 1);
        let stored = store.results().await.pop().unwrap();
        assert!(store.keywords_for(stored.result_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_spawned_sink_completes() {
        let store = Arc::new(InMemoryResultStore::new());
        let handle = spawn_persistence(
            store.clone(),
            result("internet mati total"),
            ExtractionConfig::default(),
        );
        handle.await.unwrap();
        assert_eq!(store.result_count().await, 1);
    }
}
