//! Classification service HTTP provider
//!
//! The remote service returns a bare `{cluster, confidence, probabilities}`
//! triple; urgency, priority, and the auto-escalate flag are derived locally
//! from the static cluster table.

use crate::ClassificationProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use triage_core::{
    cluster_profile, ClassificationError, ClassificationResult, TriageError, TriageResult,
    CLUSTER_COUNT,
};

/// HTTP client for the classification capability.
pub struct HttpClassificationProvider {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
    ticket_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    cluster: i32,
    confidence: f64,
    probabilities: Vec<f64>,
}

impl HttpClassificationProvider {
    /// Create a new classification provider.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TriageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TriageError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ClassificationError {
        if error.is_timeout() {
            ClassificationError::Timeout {
                limit_ms: self.timeout_ms,
            }
        } else {
            ClassificationError::Transport {
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ClassificationProvider for HttpClassificationProvider {
    async fn classify(&self, text: &str, ticket_id: &str) -> TriageResult<ClassificationResult> {
        let url = format!("{}/classify", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ClassifyRequest { text, ticket_id })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClassificationError::RequestFailed {
                status: status.as_u16() as i32,
                message,
            }
            .into());
        }

        let body: ClassifyResponse = response.json().await.map_err(|e| {
            TriageError::from(ClassificationError::InvalidResponse {
                reason: format!("Failed to parse response: {}", e),
            })
        })?;

        if body.probabilities.len() != CLUSTER_COUNT {
            return Err(ClassificationError::InvalidResponse {
                reason: format!(
                    "expected {} probabilities, got {}",
                    CLUSTER_COUNT,
                    body.probabilities.len()
                ),
            }
            .into());
        }

        let profile = cluster_profile(body.cluster)
            .ok_or(ClassificationError::UnknownCluster {
                cluster: body.cluster,
            })?;

        tracing::debug!(
            ticket_id,
            cluster = body.cluster,
            confidence = body.confidence,
            "classification completed"
        );

        Ok(ClassificationResult {
            cluster: body.cluster,
            urgency: profile.urgency,
            priority: profile.priority,
            confidence: body.confidence,
            auto_escalate: profile.auto_escalate,
            probabilities: body.probabilities,
        })
    }
}

impl std::fmt::Debug for HttpClassificationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClassificationProvider")
            .field("base_url", &self.base_url)
            .finish()
    }
}
