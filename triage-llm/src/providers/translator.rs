//! Translation service HTTP provider

use crate::TranslationProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use triage_core::{TranslationError, TranslationResult, TriageError, TriageResult};

/// HTTP client for the translation capability.
///
/// A single remote failure fails the whole request - no retry is attempted.
pub struct HttpTranslationProvider {
    client: reqwest::Client,
    base_url: String,
    source_lang: Option<String>,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

impl HttpTranslationProvider {
    /// Create a new translation provider.
    ///
    /// # Arguments
    /// * `base_url` - Service base URL, no trailing slash
    /// * `source_lang` - Optional source language hint forwarded verbatim
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        source_lang: Option<String>,
        timeout: Duration,
    ) -> TriageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TriageError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            source_lang,
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    fn map_transport_error(&self, error: reqwest::Error) -> TranslationError {
        if error.is_timeout() {
            TranslationError::Timeout {
                limit_ms: self.timeout_ms,
            }
        } else {
            TranslationError::Transport {
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl TranslationProvider for HttpTranslationProvider {
    async fn translate(&self, text: &str) -> TriageResult<TranslationResult> {
        let start = Instant::now();
        let url = format!("{}/translate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&TranslateRequest {
                text,
                source_lang: self.source_lang.as_deref(),
            })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslationError::RequestFailed {
                status: status.as_u16() as i32,
                message,
            }
            .into());
        }

        let body: TranslateResponse = response.json().await.map_err(|e| {
            TriageError::from(TranslationError::InvalidResponse {
                reason: format!("Failed to parse response: {}", e),
            })
        })?;

        if body.translated_text.trim().is_empty() {
            return Err(TranslationError::EmptyTranslation.into());
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(elapsed_ms, "translation completed");

        Ok(TranslationResult {
            translated_text: body.translated_text,
            elapsed_ms,
        })
    }
}

impl std::fmt::Debug for HttpTranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTranslationProvider")
            .field("base_url", &self.base_url)
            .field("source_lang", &self.source_lang)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_omits_missing_lang() {
        let with_lang = TranslateRequest {
            text: "internet mati",
            source_lang: Some("id"),
        };
        let json = serde_json::to_string(&with_lang).unwrap();
        assert!(json.contains("\"source_lang\":\"id\""));

        let without_lang = TranslateRequest {
            text: "internet mati",
            source_lang: None,
        };
        let json = serde_json::to_string(&without_lang).unwrap();
        assert!(!json.contains("source_lang"));
    }

    #[test]
    fn test_provider_construction() {
        let provider = HttpTranslationProvider::new(
            "http://localhost:8001",
            Some("id".to_string()),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(provider.base_url, "http://localhost:8001");
        assert_eq!(provider.timeout_ms, 10_000);
    }
}
