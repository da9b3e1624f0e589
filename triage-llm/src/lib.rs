//! TRIAGE LLM - Inference Capability Layer
//!
//! Provider-agnostic traits for the three remote capabilities the pipeline
//! consumes: translation, classification, and judgment. HTTP implementations
//! live under `providers`; deterministic mock providers for testing live
//! here.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use triage_core::{
    ClassificationError, ClassificationResult, ConfidenceAssessment, IssueCategory,
    JudgmentError, JudgmentResult, RecommendedAction, ResponseTone, TranslationError,
    TranslationResult, TriageResult,
};

pub mod providers;

pub use providers::classifier::HttpClassificationProvider;
pub use providers::gemini::{GeminiClient, GeminiJudgmentProvider};
pub use providers::translator::HttpTranslationProvider;

// ============================================================================
// PROVIDER TRAITS
// ============================================================================

/// Trait for the translation capability.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate ticket text from the source language to the language the
    /// classification capability expects.
    ///
    /// # Returns
    /// * `Ok(TranslationResult)` - Translated text plus elapsed time
    /// * `Err(TriageError::Translation)` - Any remote failure; no retry
    async fn translate(&self, text: &str) -> TriageResult<TranslationResult>;
}

/// Trait for the classification capability.
#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    /// Classify translated text into one of the fixed clusters. The ticket
    /// id is passed for correlation/logging only.
    async fn classify(&self, text: &str, ticket_id: &str) -> TriageResult<ClassificationResult>;
}

/// Trait for the judgment capability: the independent review of a
/// classification plus generation of a customer-facing reply.
#[async_trait]
pub trait JudgmentProvider: Send + Sync {
    /// Judge a classification in the context of the original and translated
    /// text. Malformed or contract-violating structured output is an error,
    /// never silently repaired.
    async fn judge(
        &self,
        original_text: &str,
        translated_text: &str,
        classification: &ClassificationResult,
    ) -> TriageResult<JudgmentResult>;
}

// ============================================================================
// MOCK PROVIDERS FOR TESTING
// ============================================================================

/// Mock translation provider. Returns a canned translation or a canned
/// failure, and counts calls so tests can assert short-circuiting.
#[derive(Debug)]
pub struct MockTranslationProvider {
    translated: String,
    fail: Option<TranslationError>,
    calls: AtomicUsize,
}

impl MockTranslationProvider {
    /// Create a mock that always succeeds with the given translation.
    pub fn new(translated: impl Into<String>) -> Self {
        Self {
            translated: translated.into(),
            fail: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always fails with the given error.
    pub fn failing(error: TranslationError) -> Self {
        Self {
            translated: String::new(),
            fail: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `translate` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for MockTranslationProvider {
    async fn translate(&self, _text: &str) -> TriageResult<TranslationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail {
            Some(error) => Err(error.clone().into()),
            None => Ok(TranslationResult {
                translated_text: self.translated.clone(),
                elapsed_ms: 1,
            }),
        }
    }
}

/// Mock classification provider. Builds its result from the static cluster
/// table so derived fields stay consistent with production behavior.
#[derive(Debug)]
pub struct MockClassificationProvider {
    result: Option<ClassificationResult>,
    fail: Option<ClassificationError>,
    calls: AtomicUsize,
}

impl MockClassificationProvider {
    /// Create a mock that classifies every ticket into `cluster` with the
    /// given confidence.
    pub fn for_cluster(cluster: i32, confidence: f64) -> Self {
        let profile = triage_core::cluster_profile(cluster)
            .unwrap_or_else(|| panic!("unknown cluster {} in mock", cluster));
        let mut probabilities = vec![0.0; triage_core::CLUSTER_COUNT];
        probabilities[cluster as usize] = confidence;
        let rest = (1.0 - confidence) / (triage_core::CLUSTER_COUNT - 1) as f64;
        for (idx, p) in probabilities.iter_mut().enumerate() {
            if idx != cluster as usize {
                *p = rest;
            }
        }

        Self {
            result: Some(ClassificationResult {
                cluster,
                urgency: profile.urgency,
                priority: profile.priority,
                confidence,
                auto_escalate: profile.auto_escalate,
                probabilities,
            }),
            fail: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always fails with the given error.
    pub fn failing(error: ClassificationError) -> Self {
        Self {
            result: None,
            fail: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `classify` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationProvider for MockClassificationProvider {
    async fn classify(&self, _text: &str, _ticket_id: &str) -> TriageResult<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match (&self.fail, &self.result) {
            (Some(error), _) => Err(error.clone().into()),
            (None, Some(result)) => Ok(result.clone()),
            (None, None) => unreachable!("mock has neither result nor failure"),
        }
    }
}

/// Mock judgment provider with a canned verdict.
#[derive(Debug)]
pub struct MockJudgmentProvider {
    result: Option<JudgmentResult>,
    fail: Option<JudgmentError>,
    calls: AtomicUsize,
}

impl MockJudgmentProvider {
    /// Create a mock returning the given judgment verbatim.
    pub fn new(result: JudgmentResult) -> Self {
        Self {
            result: Some(result),
            fail: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A judgment that confirms the classification and recommends the given
    /// action. Keyword set satisfies the 5-10 item contract.
    pub fn approving(action: RecommendedAction) -> Self {
        Self::new(JudgmentResult {
            ml_valid: true,
            confidence_assessment: ConfidenceAssessment::High,
            issue_category: IssueCategory::Connectivity,
            reasoning: "Classification matches the reported symptoms".to_string(),
            customer_response: "Kami sedang menangani gangguan Anda".to_string(),
            recommended_action: action,
            tone: ResponseTone::Empathetic,
            keywords: vec![
                "internet mati".to_string(),
                "gangguan".to_string(),
                "jaringan".to_string(),
                "koneksi".to_string(),
                "mati total".to_string(),
            ],
        })
    }

    /// A judgment that rejects the classification.
    pub fn rejecting() -> Self {
        let mut mock = Self::approving(RecommendedAction::Standard);
        if let Some(result) = mock.result.as_mut() {
            result.ml_valid = false;
            result.confidence_assessment = ConfidenceAssessment::Low;
        }
        mock
    }

    /// Create a mock that always fails with the given error.
    pub fn failing(error: JudgmentError) -> Self {
        Self {
            result: None,
            fail: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `judge` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JudgmentProvider for MockJudgmentProvider {
    async fn judge(
        &self,
        _original_text: &str,
        _translated_text: &str,
        _classification: &ClassificationResult,
    ) -> TriageResult<JudgmentResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match (&self.fail, &self.result) {
            (Some(error), _) => Err(error.clone().into()),
            (None, Some(result)) => Ok(result.clone()),
            (None, None) => unreachable!("mock has neither result nor failure"),
        }
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{TriageError, Urgency};

    #[tokio::test]
    async fn test_mock_translation_success_and_counting() {
        let mock = MockTranslationProvider::new("internet is down");
        assert_eq!(mock.calls(), 0);

        let result = mock.translate("internet mati").await.unwrap();
        assert_eq!(result.translated_text, "internet is down");
        assert_eq!(mock.calls(), 1);

        mock.translate("lagi").await.unwrap();
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_mock_translation_failure() {
        let mock = MockTranslationProvider::failing(TranslationError::EmptyTranslation);
        let err = mock.translate("x").await.unwrap_err();
        assert!(matches!(
            err,
            TriageError::Translation(TranslationError::EmptyTranslation)
        ));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_classification_derives_from_cluster_table() {
        let mock = MockClassificationProvider::for_cluster(3, 0.99);
        let result = mock.classify("text", "T-1").await.unwrap();

        assert_eq!(result.cluster, 3);
        assert_eq!(result.urgency, Urgency::High);
        assert!(result.auto_escalate);
        assert_eq!(result.probabilities.len(), triage_core::CLUSTER_COUNT);

        let sum: f64 = result.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_mock_judgment_variants() {
        let approving = MockJudgmentProvider::approving(RecommendedAction::Escalate);
        let classification = MockClassificationProvider::for_cluster(0, 0.5)
            .classify("t", "id")
            .await
            .unwrap();

        let judgment = approving.judge("a", "b", &classification).await.unwrap();
        assert!(judgment.ml_valid);
        assert_eq!(judgment.recommended_action, RecommendedAction::Escalate);
        assert!(judgment.keywords.len() >= 5);

        let rejecting = MockJudgmentProvider::rejecting();
        let judgment = rejecting.judge("a", "b", &classification).await.unwrap();
        assert!(!judgment.ml_valid);
    }

    #[tokio::test]
    async fn test_mock_judgment_failure() {
        let mock = MockJudgmentProvider::failing(JudgmentError::MalformedOutput {
            reason: "not json".to_string(),
        });
        let classification = MockClassificationProvider::for_cluster(0, 0.5)
            .classify("t", "id")
            .await
            .unwrap();
        let err = mock.judge("a", "b", &classification).await.unwrap_err();
        assert!(matches!(err, TriageError::Judgment(_)));
    }
}
