//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use triage_core::ExtractionConfig;
use triage_llm::{ClassificationProvider, JudgmentProvider, TranslationProvider};
use triage_storage::AsyncResultStore;

use crate::config::ApiConfig;

/// Application-wide state shared across all routes.
///
/// Providers and the store are trait objects so tests can swap in mocks and
/// the in-memory store without touching the router.
pub struct AppState {
    pub translator: Arc<dyn TranslationProvider>,
    pub classifier: Arc<dyn ClassificationProvider>,
    pub judge: Arc<dyn JudgmentProvider>,
    pub store: Arc<dyn AsyncResultStore>,

    pub max_text_length: usize,
    pub translation_timeout: Duration,
    pub classification_timeout: Duration,
    pub judgment_timeout: Duration,
    pub extraction: ExtractionConfig,

    pub start_time: Instant,
}

impl AppState {
    /// Assemble state from providers, a store, and configuration.
    pub fn new(
        translator: Arc<dyn TranslationProvider>,
        classifier: Arc<dyn ClassificationProvider>,
        judge: Arc<dyn JudgmentProvider>,
        store: Arc<dyn AsyncResultStore>,
        config: &ApiConfig,
    ) -> Self {
        Self {
            translator,
            classifier,
            judge,
            store,
            max_text_length: config.max_text_length,
            translation_timeout: config.translation_timeout,
            classification_timeout: config.classification_timeout,
            judgment_timeout: config.judgment_timeout,
            extraction: config.extraction_config(),
            start_time: Instant::now(),
        }
    }
}
