//! API Configuration Module
//!
//! Configuration for the HTTP server, the consumed capabilities, per-stage
//! timeouts, and keyword extraction. Loaded from environment variables with
//! sensible defaults for development. Timeouts are explicit configuration -
//! transport defaults are never relied on.

use std::time::Duration;
use triage_core::ExtractionConfig;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Top-level API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // Server
    // ========================================================================
    /// Bind host for the HTTP server.
    pub bind_host: String,

    /// Bind port for the HTTP server.
    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    // ========================================================================
    // Request validation
    // ========================================================================
    /// Maximum accepted ticket text length, in characters.
    pub max_text_length: usize,

    // ========================================================================
    // Consumed capabilities
    // ========================================================================
    /// Base URL of the translation service.
    pub translator_url: String,

    /// Source language hint forwarded to the translation service.
    pub source_lang: Option<String>,

    /// Base URL of the classification service.
    pub classifier_url: String,

    /// Gemini API key for the judgment capability.
    pub gemini_api_key: String,

    /// Gemini model name.
    pub gemini_model: String,

    // ========================================================================
    // Per-stage timeouts
    // ========================================================================
    /// Timeout for the translation stage.
    pub translation_timeout: Duration,

    /// Timeout for the classification stage.
    pub classification_timeout: Duration,

    /// Timeout for the judgment stage.
    pub judgment_timeout: Duration,

    // ========================================================================
    // Keyword extraction
    // ========================================================================
    /// Minimum token length for extracted keywords.
    pub keyword_min_token_len: usize,

    /// Number of single tokens to keep.
    pub keyword_top_unigrams: usize,

    /// Number of adjacent pairs to keep.
    pub keyword_top_bigrams: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let extraction = ExtractionConfig::default();
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(), // Empty = allow all
            max_text_length: 5000,
            translator_url: "http://localhost:8001".to_string(),
            source_lang: Some("id".to_string()),
            classifier_url: "http://localhost:8002".to_string(),
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.0-flash".to_string(),
            translation_timeout: Duration::from_secs(10),
            classification_timeout: Duration::from_secs(10),
            judgment_timeout: Duration::from_secs(30),
            keyword_min_token_len: extraction.min_token_len,
            keyword_top_unigrams: extraction.top_unigrams,
            keyword_top_bigrams: extraction.top_bigrams,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `TRIAGE_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` / `TRIAGE_API_PORT`: Bind port (default: 3000)
    /// - `TRIAGE_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `TRIAGE_MAX_TEXT_LENGTH`: Max ticket text length (default: 5000)
    /// - `TRIAGE_TRANSLATOR_URL`: Translation service base URL
    /// - `TRIAGE_SOURCE_LANG`: Source language hint (default: id)
    /// - `TRIAGE_CLASSIFIER_URL`: Classification service base URL
    /// - `GEMINI_API_KEY`: Judgment capability API key
    /// - `TRIAGE_GEMINI_MODEL`: Judgment model name (default: gemini-2.0-flash)
    /// - `TRIAGE_TRANSLATION_TIMEOUT_SECS`: Translation stage timeout (default: 10)
    /// - `TRIAGE_CLASSIFICATION_TIMEOUT_SECS`: Classification stage timeout (default: 10)
    /// - `TRIAGE_JUDGMENT_TIMEOUT_SECS`: Judgment stage timeout (default: 30)
    /// - `TRIAGE_KEYWORD_MIN_TOKEN_LEN`: Min keyword token length (default: 3)
    /// - `TRIAGE_KEYWORD_TOP_UNIGRAMS`: Single tokens to keep (default: 10)
    /// - `TRIAGE_KEYWORD_TOP_BIGRAMS`: Adjacent pairs to keep (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_origins = std::env::var("TRIAGE_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let port = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("TRIAGE_API_PORT").ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            bind_host: std::env::var("TRIAGE_API_BIND").unwrap_or(defaults.bind_host),
            port,
            cors_origins,
            max_text_length: env_parsed("TRIAGE_MAX_TEXT_LENGTH", defaults.max_text_length),
            translator_url: std::env::var("TRIAGE_TRANSLATOR_URL")
                .unwrap_or(defaults.translator_url),
            source_lang: std::env::var("TRIAGE_SOURCE_LANG")
                .ok()
                .or(defaults.source_lang),
            classifier_url: std::env::var("TRIAGE_CLASSIFIER_URL")
                .unwrap_or(defaults.classifier_url),
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: std::env::var("TRIAGE_GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            translation_timeout: Duration::from_secs(env_parsed(
                "TRIAGE_TRANSLATION_TIMEOUT_SECS",
                defaults.translation_timeout.as_secs(),
            )),
            classification_timeout: Duration::from_secs(env_parsed(
                "TRIAGE_CLASSIFICATION_TIMEOUT_SECS",
                defaults.classification_timeout.as_secs(),
            )),
            judgment_timeout: Duration::from_secs(env_parsed(
                "TRIAGE_JUDGMENT_TIMEOUT_SECS",
                defaults.judgment_timeout.as_secs(),
            )),
            keyword_min_token_len: env_parsed(
                "TRIAGE_KEYWORD_MIN_TOKEN_LEN",
                defaults.keyword_min_token_len,
            ),
            keyword_top_unigrams: env_parsed(
                "TRIAGE_KEYWORD_TOP_UNIGRAMS",
                defaults.keyword_top_unigrams,
            ),
            keyword_top_bigrams: env_parsed(
                "TRIAGE_KEYWORD_TOP_BIGRAMS",
                defaults.keyword_top_bigrams,
            ),
        }
    }

    /// Build the keyword extraction configuration for the persistence sink.
    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            min_token_len: self.keyword_min_token_len,
            top_unigrams: self.keyword_top_unigrams,
            top_bigrams: self.keyword_top_bigrams,
            ..ExtractionConfig::default()
        }
    }
}
