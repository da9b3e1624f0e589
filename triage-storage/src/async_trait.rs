//! Async store trait for pipeline result persistence.
//!
//! Append-only: result rows and keyword rows are inserted once and never
//! updated or deleted. Keyword rows reference their parent result row, so
//! they may only be inserted after the parent insert returned its id.

use ::async_trait::async_trait;
use triage_core::{KeywordRecord, PersistedRecord, TriageResult};
use uuid::Uuid;

/// Async storage trait for pipeline results and keywords.
#[async_trait]
pub trait AsyncResultStore: Send + Sync {
    /// Insert one result row. Returns the row's generated identifier.
    async fn result_insert(&self, record: &PersistedRecord) -> TriageResult<Uuid>;

    /// Bulk-insert keyword rows for an existing result row.
    async fn keywords_insert(&self, records: &[KeywordRecord]) -> TriageResult<()>;

    /// Cheap connectivity check for readiness probes.
    async fn health_check(&self) -> TriageResult<()>;
}
