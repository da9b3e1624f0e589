//! Gemini judgment provider with structured-output contract
//!
//! The provider serializes a deterministic instruction block, constrains the
//! model with a closed response schema, and validates every field of the
//! reply. Any deviation - unparseable output, missing field, out-of-enum
//! value, keyword bound violation - is a judgment-stage error. Nothing is
//! coerced or defaulted.

use super::client::GeminiClient;
use super::types::{Content, GenerateContentRequest, GenerationConfig, Part};
use crate::JudgmentProvider;
use async_trait::async_trait;
use serde::Deserialize;
use triage_core::{
    ClassificationResult, ConfidenceAssessment, IssueCategory, JudgmentError, JudgmentResult,
    RecommendedAction, ResponseTone, TriageResult,
};

const MIN_KEYWORDS: usize = 5;
const MAX_KEYWORDS: usize = 10;
const MIN_KEYWORD_CHARS: usize = 2;
const MAX_KEYWORD_CHARS: usize = 50;

/// Gemini-backed judgment provider.
pub struct GeminiJudgmentProvider {
    client: GeminiClient,
    model: String,
}

impl GeminiJudgmentProvider {
    /// Create a new judgment provider.
    ///
    /// # Arguments
    /// * `client` - Configured Gemini client
    /// * `model` - Model name (e.g. "gemini-2.0-flash")
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Create a provider with the default model.
    pub fn with_default_model(client: GeminiClient) -> Self {
        Self::new(client, "gemini-2.0-flash")
    }

    /// The deterministic instruction block: evaluation criteria,
    /// categorization rules, and keyword-extraction rules. Identical input
    /// always produces the identical instruction text.
    fn build_instructions() -> String {
        "You are a support ticket triage reviewer. Evaluate whether the ML \
         classification is valid for this ticket and produce a structured verdict.\n\
         \n\
         Evaluation criteria:\n\
         - confidence_assessment reflects the numeric ML confidence: \
         above 0.85 is 'high', between 0.60 and 0.85 is 'medium', below 0.60 is 'low'.\n\
         - ml_valid is true only when the predicted cluster matches the issue \
         actually described in the ticket.\n\
         \n\
         Categorization rules (pick exactly one issue_category):\n\
         - connectivity: outages, slow or intermittent connection, no signal.\n\
         - billing: invoices, charges, payments, refunds.\n\
         - installation: new service setup, relocation, technician visits.\n\
         - service_quality: degraded quality of an otherwise working service.\n\
         - general_inquiry: anything else.\n\
         When several categories apply, pick the most urgent and most prominent \
         issue in the ticket.\n\
         \n\
         Keyword rules:\n\
         - Extract 5 to 10 salient keywords from the ORIGINAL text only.\n\
         - Prefer multi-word phrases over single words.\n\
         - Keep tokens in the original language; do not translate them.\n\
         - Each keyword must be 2 to 50 characters; exclude stopwords; \
         no duplicates.\n\
         \n\
         customer_response must be written in the customer's language."
            .to_string()
    }

    /// Closed output schema: every field, every enum's allowed values, and
    /// the keyword array bounds.
    fn response_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "ml_valid": { "type": "BOOLEAN" },
                "confidence_assessment": {
                    "type": "STRING",
                    "enum": ["high", "medium", "low"]
                },
                "issue_category": {
                    "type": "STRING",
                    "enum": [
                        "connectivity",
                        "billing",
                        "installation",
                        "service_quality",
                        "general_inquiry"
                    ]
                },
                "reasoning": { "type": "STRING" },
                "customer_response": { "type": "STRING" },
                "recommended_action": {
                    "type": "STRING",
                    "enum": ["escalate", "standard", "automated"]
                },
                "tone": {
                    "type": "STRING",
                    "enum": ["empathetic", "neutral", "apologetic", "informative"]
                },
                "keywords": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": MIN_KEYWORDS,
                    "maxItems": MAX_KEYWORDS
                }
            },
            "required": [
                "ml_valid",
                "confidence_assessment",
                "issue_category",
                "reasoning",
                "customer_response",
                "recommended_action",
                "tone",
                "keywords"
            ]
        })
    }

    fn build_prompt(
        original_text: &str,
        translated_text: &str,
        classification: &ClassificationResult,
    ) -> TriageResult<String> {
        let classification_json = serde_json::to_string(classification).map_err(|e| {
            JudgmentError::MalformedOutput {
                reason: format!("Failed to serialize classification: {}", e),
            }
        })?;

        Ok(format!(
            "Original ticket text:\n{}\n\nTranslated text:\n{}\n\nML classification:\n{}",
            original_text, translated_text, classification_json
        ))
    }

    /// Extract the reply text from the first candidate.
    fn extract_text(response: super::types::GenerateContentResponse) -> Option<String> {
        let candidate = response.candidates.into_iter().next()?;
        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl JudgmentProvider for GeminiJudgmentProvider {
    async fn judge(
        &self,
        original_text: &str,
        translated_text: &str,
        classification: &ClassificationResult,
    ) -> TriageResult<JudgmentResult> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Self::build_prompt(original_text, translated_text, classification)?,
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: Self::build_instructions(),
                }],
            }),
            generation_config: Some(GenerationConfig {
                temperature: Some(0.0),
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(Self::response_schema()),
            }),
        };

        let response = self.client.generate(&self.model, &request).await?;

        let text = Self::extract_text(response).ok_or(JudgmentError::MalformedOutput {
            reason: "response contained no candidate text".to_string(),
        })?;

        let raw: RawJudgment =
            serde_json::from_str(&text).map_err(|e| JudgmentError::MalformedOutput {
                reason: format!("reply is not valid contract JSON: {}", e),
            })?;

        let judgment = validate_judgment(raw)?;
        tracing::debug!(
            ml_valid = judgment.ml_valid,
            action = %judgment.recommended_action,
            "judgment completed"
        );
        Ok(judgment)
    }
}

impl std::fmt::Debug for GeminiJudgmentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiJudgmentProvider")
            .field("model", &self.model)
            .finish()
    }
}

// ============================================================================
// CONTRACT VALIDATION
// ============================================================================

/// Raw judgment payload as received. Enum fields stay strings here so each
/// one can be validated against its closed set with a field-level error.
#[derive(Debug, Deserialize)]
struct RawJudgment {
    ml_valid: bool,
    confidence_assessment: String,
    issue_category: String,
    reasoning: String,
    customer_response: String,
    recommended_action: String,
    tone: String,
    keywords: Vec<String>,
}

fn contract_violation(field: &str, reason: impl Into<String>) -> JudgmentError {
    JudgmentError::ContractViolation {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Validate every field of a raw judgment against the contract.
fn validate_judgment(raw: RawJudgment) -> Result<JudgmentResult, JudgmentError> {
    let confidence_assessment = ConfidenceAssessment::from_db_str(&raw.confidence_assessment)
        .map_err(|e| contract_violation("confidence_assessment", e.to_string()))?;
    let issue_category = IssueCategory::from_db_str(&raw.issue_category)
        .map_err(|e| contract_violation("issue_category", e.to_string()))?;
    let recommended_action = RecommendedAction::from_db_str(&raw.recommended_action)
        .map_err(|e| contract_violation("recommended_action", e.to_string()))?;
    let tone = ResponseTone::from_db_str(&raw.tone)
        .map_err(|e| contract_violation("tone", e.to_string()))?;

    if raw.reasoning.trim().is_empty() {
        return Err(contract_violation("reasoning", "must not be empty"));
    }
    if raw.customer_response.trim().is_empty() {
        return Err(contract_violation("customer_response", "must not be empty"));
    }

    let count = raw.keywords.len();
    if !(MIN_KEYWORDS..=MAX_KEYWORDS).contains(&count) {
        return Err(contract_violation(
            "keywords",
            format!(
                "expected {}-{} items, got {}",
                MIN_KEYWORDS, MAX_KEYWORDS, count
            ),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    let mut keywords = Vec::with_capacity(count);
    for keyword in raw.keywords {
        let trimmed = keyword.trim();
        let chars = trimmed.chars().count();
        if !(MIN_KEYWORD_CHARS..=MAX_KEYWORD_CHARS).contains(&chars) {
            return Err(contract_violation(
                "keywords",
                format!(
                    "keyword {:?} has {} chars, expected {}-{}",
                    trimmed, chars, MIN_KEYWORD_CHARS, MAX_KEYWORD_CHARS
                ),
            ));
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(contract_violation(
                "keywords",
                format!("duplicate keyword {:?}", trimmed),
            ));
        }
        keywords.push(trimmed.to_string());
    }

    Ok(JudgmentResult {
        ml_valid: raw.ml_valid,
        confidence_assessment,
        issue_category,
        reasoning: raw.reasoning,
        customer_response: raw.customer_response,
        recommended_action,
        tone,
        keywords,
    })
}

// ============================================================================
// TESTS
// ============================================================================
