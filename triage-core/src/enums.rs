//! Enum types for TRIAGE pipeline entities
//!
//! Every enum here is a closed set. Wire representations (serde renames)
//! match the judgment service contract and the flat response format, and
//! `as_db_str`/`from_db_str` provide the text form stored in the datastore.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// CLASSIFICATION ENUMS
// ============================================================================

/// Urgency derived from the cluster table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Operational priority derived from the cluster table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Priority {
    P1,
    P2,
    P3,
}

// ============================================================================
// JUDGMENT ENUMS
// ============================================================================

/// The judgment service's qualitative read of the classification confidence.
/// Independent of the numeric confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceAssessment {
    High,
    Medium,
    Low,
}

/// Fixed 5-way issue taxonomy. When several apply, the judgment service is
/// instructed to pick the most urgent/prominent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Connectivity,
    Billing,
    Installation,
    ServiceQuality,
    GeneralInquiry,
}

/// Handling route recommended by the judgment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RecommendedAction {
    Escalate,
    Standard,
    Automated,
}

/// Tone of the generated customer reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ResponseTone {
    Empathetic,
    Neutral,
    Apologetic,
    Informative,
}

// ============================================================================
// ESCALATION / PIPELINE ENUMS
// ============================================================================

/// Which signal triggered the escalation verdict.
///
/// `Llm` wins the tie-break when both signals fire - judgment confirmation
/// is the stronger signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EscalationReason {
    Ml,
    Llm,
    None,
}

/// Pipeline stage discriminant used for error tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Validation,
    Translation,
    MlService,
    Gemini,
    Persistence,
    Processing,
}

impl PipelineStage {
    /// Wire string used in the `error_stage` field of error responses.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            PipelineStage::Validation => "validation",
            PipelineStage::Translation => "translation",
            PipelineStage::MlService => "ml_service",
            PipelineStage::Gemini => "gemini",
            PipelineStage::Persistence => "persistence",
            PipelineStage::Processing => "processing",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

// ============================================================================
// DB STRING CONVERSIONS
// ============================================================================

/// Error returned when a stored enum string cannot be parsed back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown {kind} value: {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! impl_db_str {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Convert to database string representation.
            pub fn as_db_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }

            /// Parse from database string representation.
            pub fn from_db_str(s: &str) -> Result<Self, EnumParseError> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(EnumParseError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl FromStr for $ty {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::from_db_str(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_db_str())
            }
        }
    };
}

impl_db_str!(Urgency, "urgency", {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl_db_str!(Priority, "priority", {
    P1 => "P1",
    P2 => "P2",
    P3 => "P3",
});

impl_db_str!(ConfidenceAssessment, "confidence_assessment", {
    High => "high",
    Medium => "medium",
    Low => "low",
});

impl_db_str!(IssueCategory, "issue_category", {
    Connectivity => "connectivity",
    Billing => "billing",
    Installation => "installation",
    ServiceQuality => "service_quality",
    GeneralInquiry => "general_inquiry",
});

impl_db_str!(RecommendedAction, "recommended_action", {
    Escalate => "escalate",
    Standard => "standard",
    Automated => "automated",
});

impl_db_str!(ResponseTone, "tone", {
    Empathetic => "empathetic",
    Neutral => "neutral",
    Apologetic => "apologetic",
    Informative => "informative",
});

impl_db_str!(EscalationReason, "escalation_reason", {
    Ml => "ml",
    Llm => "llm",
    None => "none",
});

// ============================================================================
// TESTS
// ============================================================================
