//! Gemini HTTP client

use super::types::{ApiError, GenerateContentRequest, GenerateContentResponse};
use reqwest::Client;
use std::time::Duration;
use triage_core::{JudgmentError, TriageError, TriageResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Arguments
    /// * `api_key` - Gemini API key
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> TriageResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TriageError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    /// Override the base URL. Used to point at a stub server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Call `generateContent` for the given model.
    pub async fn generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> TriageResult<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                TriageError::from(if e.is_timeout() {
                    JudgmentError::Timeout {
                        limit_ms: self.timeout_ms,
                    }
                } else {
                    JudgmentError::Transport {
                        message: e.to_string(),
                    }
                })
            })?;

        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|e| {
                TriageError::from(JudgmentError::MalformedOutput {
                    reason: format!("Failed to parse response envelope: {}", e),
                })
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            Err(JudgmentError::RequestFailed {
                status: status.as_u16() as i32,
                message,
            }
            .into())
        }
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction_and_base_url_override() {
        let client = GeminiClient::new("test-key", Duration::from_secs(30)).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.timeout_ms, 30_000);

        let client = client.with_base_url("http://localhost:9000");
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = GeminiClient::new("super-secret", Duration::from_secs(30)).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
