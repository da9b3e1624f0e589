//! PostgreSQL result store
//!
//! Connection pooling via deadpool-postgres. All operations are append-only
//! inserts; there are no updates or deletes on this path. Schema lives in
//! `migrations/V1__triage_results.sql`.

use crate::async_trait::AsyncResultStore;
use ::async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use triage_core::{KeywordRecord, PersistedRecord, PersistenceError, TriageResult};
use uuid::Uuid;

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "triage".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `TRIAGE_DB_HOST` (default: localhost)
    /// - `TRIAGE_DB_PORT` (default: 5432)
    /// - `TRIAGE_DB_NAME` (default: triage)
    /// - `TRIAGE_DB_USER` (default: postgres)
    /// - `TRIAGE_DB_PASSWORD` (default: empty)
    /// - `TRIAGE_DB_POOL_SIZE` (default: 16)
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("TRIAGE_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TRIAGE_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("TRIAGE_DB_NAME").unwrap_or_else(|_| "triage".to_string()),
            user: std::env::var("TRIAGE_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("TRIAGE_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("TRIAGE_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> TriageResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(deadpool_postgres::PoolConfig::new(self.max_size));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| PersistenceError::Unavailable {
                reason: format!("Failed to create pool: {}", e),
            })?;

        Ok(pool)
    }
}

// ============================================================================
// STORE
// ============================================================================

/// PostgreSQL implementation of [`AsyncResultStore`].
#[derive(Clone)]
pub struct PgResultStore {
    pool: Pool,
}

impl PgResultStore {
    /// Create a store from a configuration.
    pub fn from_config(config: &DbConfig) -> TriageResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<deadpool_postgres::Object, PersistenceError> {
        self.pool.get().await.map_err(|e| match e {
            deadpool_postgres::PoolError::Timeout(_) => PersistenceError::PoolExhausted,
            other => PersistenceError::Unavailable {
                reason: other.to_string(),
            },
        })
    }
}

const INSERT_RESULT: &str = "\
INSERT INTO triage_results (\
 result_id, ticket_id, original_text, translated_text, translation_time_ms,\
 ml_cluster, ml_urgency, ml_priority, ml_confidence, ml_auto_escalate,\
 ml_probabilities, ml_time_ms, llm_ml_valid, llm_confidence_assessment,\
 llm_issue_category, llm_reasoning, llm_customer_response,\
 llm_recommended_action, llm_tone, llm_keywords, llm_time_ms,\
 escalation_triggered, escalation_reason, total_processing_time_ms, created_at\
) VALUES (\
 $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
 $18, $19, $20, $21, $22, $23, $24, $25\
) RETURNING result_id";

const INSERT_KEYWORD: &str = "\
INSERT INTO triage_keywords (result_id, keyword, frequency) VALUES ($1, $2, $3)";

#[async_trait]
impl AsyncResultStore for PgResultStore {
    async fn result_insert(&self, record: &PersistedRecord) -> TriageResult<Uuid> {
        let client = self.connection().await?;

        let probabilities = serde_json::to_value(&record.ml_probabilities).map_err(|e| {
            PersistenceError::InsertFailed {
                reason: format!("Failed to encode probabilities: {}", e),
            }
        })?;
        let keywords =
            serde_json::to_value(&record.llm_keywords).map_err(|e| {
                PersistenceError::InsertFailed {
                    reason: format!("Failed to encode keywords: {}", e),
                }
            })?;

        let row = client
            .query_one(
                INSERT_RESULT,
                &[
                    &record.result_id,
                    &record.ticket_id,
                    &record.original_text,
                    &record.translated_text,
                    &(record.translation_time_ms as i64),
                    &record.ml_cluster,
                    &record.ml_urgency.as_db_str(),
                    &record.ml_priority.as_db_str(),
                    &record.ml_confidence,
                    &record.ml_auto_escalate,
                    &probabilities,
                    &(record.ml_time_ms as i64),
                    &record.llm_ml_valid,
                    &record.llm_confidence_assessment.as_db_str(),
                    &record.llm_issue_category.as_db_str(),
                    &record.llm_reasoning,
                    &record.llm_customer_response,
                    &record.llm_recommended_action.as_db_str(),
                    &record.llm_tone.as_db_str(),
                    &keywords,
                    &(record.llm_time_ms as i64),
                    &record.escalation_triggered,
                    &record.escalation_reason.as_db_str(),
                    &(record.total_processing_time_ms as i64),
                    &record.timestamp,
                ],
            )
            .await
            .map_err(|e| PersistenceError::InsertFailed {
                reason: e.to_string(),
            })?;

        Ok(row.get(0))
    }

    async fn keywords_insert(&self, records: &[KeywordRecord]) -> TriageResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let client = self.connection().await?;
        let statement =
            client
                .prepare(INSERT_KEYWORD)
                .await
                .map_err(|e| PersistenceError::InsertFailed {
                    reason: e.to_string(),
                })?;

        for record in records {
            client
                .execute(
                    &statement,
                    &[&record.result_id, &record.keyword, &record.frequency],
                )
                .await
                .map_err(|e| PersistenceError::InsertFailed {
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }

    async fn health_check(&self) -> TriageResult<()> {
        let client = self.connection().await?;
        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| PersistenceError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

impl std::fmt::Debug for PgResultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgResultStore").finish()
    }
}
