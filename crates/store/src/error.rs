//! Store error types

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from the catalog or journal.
///
/// Every variant is fatal to the run; the pipeline's recovery strategy is a
/// process restart, which rebuilds the caches from the tables.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database failure
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),
}
