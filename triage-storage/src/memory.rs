//! In-memory result store
//!
//! Used in tests and development. Supports failure injection so tests can
//! verify that sink failures never reach the caller.

use crate::async_trait::AsyncResultStore;
use ::async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use triage_core::{KeywordRecord, PersistedRecord, PersistenceError, TriageResult};
use uuid::Uuid;

/// In-memory implementation of [`AsyncResultStore`].
#[derive(Default)]
pub struct InMemoryResultStore {
    results: RwLock<HashMap<Uuid, PersistedRecord>>,
    keywords: RwLock<HashMap<Uuid, Vec<KeywordRecord>>>,
    fail_result_inserts: AtomicBool,
    fail_keyword_inserts: AtomicBool,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `result_insert` fail.
    pub fn fail_result_inserts(&self, fail: bool) {
        self.fail_result_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `keywords_insert` fail.
    pub fn fail_keyword_inserts(&self, fail: bool) {
        self.fail_keyword_inserts.store(fail, Ordering::SeqCst);
    }

    /// Number of stored result rows.
    pub async fn result_count(&self) -> usize {
        self.results.read().await.len()
    }

    /// Fetch a stored result row.
    pub async fn result_get(&self, result_id: Uuid) -> Option<PersistedRecord> {
        self.results.read().await.get(&result_id).cloned()
    }

    /// All stored result rows.
    pub async fn results(&self) -> Vec<PersistedRecord> {
        self.results.read().await.values().cloned().collect()
    }

    /// Keyword rows stored for a result.
    pub async fn keywords_for(&self, result_id: Uuid) -> Vec<KeywordRecord> {
        self.keywords
            .read()
            .await
            .get(&result_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl AsyncResultStore for InMemoryResultStore {
    async fn result_insert(&self, record: &PersistedRecord) -> TriageResult<Uuid> {
        if self.fail_result_inserts.load(Ordering::SeqCst) {
            return Err(PersistenceError::InsertFailed {
                reason: "injected result insert failure".to_string(),
            }
            .into());
        }

        let mut results = self.results.write().await;
        results.insert(record.result_id, record.clone());
        Ok(record.result_id)
    }

    async fn keywords_insert(&self, records: &[KeywordRecord]) -> TriageResult<()> {
        if self.fail_keyword_inserts.load(Ordering::SeqCst) {
            return Err(PersistenceError::InsertFailed {
                reason: "injected keyword insert failure".to_string(),
            }
            .into());
        }

        let results = self.results.read().await;
        let mut keywords = self.keywords.write().await;
        for record in records {
            // Foreign-key ordering: the parent row must already exist.
            if !results.contains_key(&record.result_id) {
                return Err(PersistenceError::InsertFailed {
                    reason: format!("no parent result row {}", record.result_id),
                }
                .into());
            }
            keywords
                .entry(record.result_id)
                .or_default()
                .push(record.clone());
        }
        Ok(())
    }

    async fn health_check(&self) -> TriageResult<()> {
        Ok(())
    }
}
