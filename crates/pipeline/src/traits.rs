//! Storage seams
//!
//! The pipeline drives persistence through these two traits so the core can
//! be exercised without a database. The production implementations live in
//! the store crate (sqlx/MySQL).

use async_trait::async_trait;
use shelf_protocol::Book;

use crate::error::PipelineError;

/// What happened to a book handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// New natural key; row inserted.
    Saved,
    /// Natural key already reserved or persisted; nothing written.
    Duplicate,
}

/// Durable book storage with natural-key dedup.
///
/// `persist` must be safe to call concurrently from several writers for the
/// same natural key: exactly one call may return [`PersistOutcome::Saved`].
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn persist(&self, book: &Book) -> Result<PersistOutcome, PipelineError>;
}

/// The progress journal of fully persisted terms.
///
/// `is_complete` is an in-memory check (it sits on the feeder's per-line hot
/// path); `mark_complete` must be idempotent.
#[async_trait]
pub trait TermJournal: Send + Sync {
    async fn is_complete(&self, term: &str) -> bool;
    async fn mark_complete(&self, term: &str) -> Result<(), PipelineError>;
}
