//! Escalation decision engine
//!
//! Pure function combining the classification-derived and judgment-derived
//! escalation signals. The classifier's own flag is trusted only when the
//! judgment service confirms the classification is valid for this ticket;
//! the judgment service may escalate on its own authority regardless.

use crate::enums::EscalationReason;
use crate::ticket::{ClassificationResult, EscalationDecision, JudgmentResult};
use crate::RecommendedAction;

/// Combine both escalation signals into one verdict.
///
/// `triggered = (ml.auto_escalate && llm.ml_valid) || (llm.recommended_action == Escalate)`
///
/// Reason precedence: `Llm` whenever the judgment disjunct holds (including
/// when both hold), `Ml` when only the classifier disjunct holds, `None`
/// otherwise.
pub fn decide_escalation(
    classification: &ClassificationResult,
    judgment: &JudgmentResult,
) -> EscalationDecision {
    let ml_signal = classification.auto_escalate && judgment.ml_valid;
    let llm_signal = judgment.recommended_action == RecommendedAction::Escalate;

    let reason = if llm_signal {
        EscalationReason::Llm
    } else if ml_signal {
        EscalationReason::Ml
    } else {
        EscalationReason::None
    };

    EscalationDecision {
        triggered: ml_signal || llm_signal,
        reason,
        urgency: classification.urgency,
        priority: classification.priority,
    }
}
