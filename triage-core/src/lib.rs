//! TRIAGE Core - Pipeline Data Types and Decision Logic
//!
//! Pure data structures and pure functions. All other crates depend on this.
//! This crate contains no I/O - remote capabilities live in `triage-llm`,
//! persistence lives in `triage-storage`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod clusters;
pub mod enums;
pub mod error;
pub mod escalation;
pub mod keywords;
pub mod ticket;

pub use clusters::{cluster_profile, ClusterProfile, CLUSTER_COUNT};
pub use enums::{
    ConfidenceAssessment, EscalationReason, IssueCategory, PipelineStage, Priority,
    RecommendedAction, ResponseTone, Urgency,
};
pub use error::{
    ClassificationError, JudgmentError, PersistenceError, TranslationError, TriageError,
    TriageResult, ValidationError,
};
pub use escalation::decide_escalation;
pub use keywords::{extract_keywords, ExtractedKeyword, ExtractionConfig};
pub use ticket::{
    ClassificationResult, EscalationDecision, JudgmentResult, KeywordRecord, PersistedRecord,
    PipelineResult, TicketRequest, TranslationResult,
};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Identifier for a persisted pipeline result row.
pub type ResultId = Uuid;

/// Generate a ticket id for requests that did not supply one.
pub fn new_ticket_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticket_id_is_unique() {
        let a = new_ticket_id();
        let b = new_ticket_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
