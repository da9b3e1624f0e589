//! TRIAGE Storage - Result Store and Persistence Sink
//!
//! Append-only analytics storage for pipeline results and extracted
//! keywords. The store trait is async; implementations are an in-memory
//! store (tests, development) and a PostgreSQL store (production). The sink
//! module owns the fire-and-forget persistence path.

pub mod async_trait;
pub mod memory;
pub mod postgres;
pub mod sink;

pub use crate::async_trait::AsyncResultStore;
pub use memory::InMemoryResultStore;
pub use postgres::{DbConfig, PgResultStore};
pub use sink::{persist_result, spawn_persistence};
