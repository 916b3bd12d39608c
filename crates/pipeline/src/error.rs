//! Pipeline error types

use shelf_providers::ProviderError;
use thiserror::Error;

/// Errors that terminate the ingestion.
///
/// There is no in-process recovery for any of these: the first one recorded
/// cancels the pipeline and the process exits nonzero. Restarting is safe
/// because the dedup caches and the progress journal are rebuilt from durable
/// state.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file could not be read
    #[error("input file error: {0}")]
    Input(#[from] std::io::Error),

    /// Non-retryable provider failure (transport, decode, unexpected status)
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// All throttle retries failed
    #[error("provider still throttling after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// Database failure from the store or journal
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl PipelineError {
    /// Wrap a store-side error. Used by [`BookStore`](crate::BookStore) and
    /// [`TermJournal`](crate::TermJournal) implementations.
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(err))
    }
}
