//! Ingestion metrics
//!
//! Atomic counters recorded on the hot paths and snapshotted once at
//! shutdown for the final summary log.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one ingestion run.
#[derive(Debug, Default)]
pub struct IngestMetrics {
    /// Provider calls initiated (including retries)
    provider_calls: AtomicU64,
    /// Throttle responses that paused the pipeline
    throttle_pauses: AtomicU64,
    /// Dispatcher ticks skipped (gate raised or writer queue full)
    suppressed_ticks: AtomicU64,
    /// Result batches handed to the writer pool
    batches_emitted: AtomicU64,
    /// Queries that came back with zero results
    empty_results: AtomicU64,
    /// Books inserted
    books_saved: AtomicU64,
    /// Books dropped by natural-key dedup
    books_skipped: AtomicU64,
    /// Terms recorded in the progress journal
    terms_completed: AtomicU64,
}

/// Point-in-time copy of all counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub provider_calls: u64,
    pub throttle_pauses: u64,
    pub suppressed_ticks: u64,
    pub batches_emitted: u64,
    pub empty_results: u64,
    pub books_saved: u64,
    pub books_skipped: u64,
    pub terms_completed: u64,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_provider_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_throttle_pause(&self) {
        self.throttle_pauses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_suppressed_tick(&self) {
        self.suppressed_ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_batch_emitted(&self) {
        self.batches_emitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_empty_result(&self) {
        self.empty_results.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_book_saved(&self) {
        self.books_saved.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_book_skipped(&self) {
        self.books_skipped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_term_completed(&self) {
        self.terms_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            throttle_pauses: self.throttle_pauses.load(Ordering::Relaxed),
            suppressed_ticks: self.suppressed_ticks.load(Ordering::Relaxed),
            batches_emitted: self.batches_emitted.load(Ordering::Relaxed),
            empty_results: self.empty_results.load(Ordering::Relaxed),
            books_saved: self.books_saved.load(Ordering::Relaxed),
            books_skipped: self.books_skipped.load(Ordering::Relaxed),
            terms_completed: self.terms_completed.load(Ordering::Relaxed),
        }
    }
}
