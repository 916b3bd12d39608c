//! Shelf - Ingestion pipeline
//!
//! The concurrent core that turns a flat file of search terms into
//! deduplicated database rows, under a per-second provider call budget.
//!
//! # Architecture
//!
//! ```text
//! input file ──► [Feeder] ──► queries ──┐
//!                                        ├──► [Workers] ──► batches ──► [Writers] ──► store
//!                          priority ◄────┘                                  │
//!                                                                           └─► progress journal
//!                            ▲
//!                      [Dispatcher] (1s tick, call budget, back-pressure)
//! ```
//!
//! # Key design
//!
//! - **Bounded queues everywhere**: the main query queue (10) back-pressures
//!   the feeder, the batch queue (10) back-pressures dispatch, the priority
//!   queue (100) caps in-flight pagination.
//! - **Priority before main**: continuation pages drain before new terms are
//!   started, bounding the number of simultaneously open terms.
//! - **Work counter**: queries are counted in at enqueue and counted out when
//!   their last effect is durable; zero after EOF means drained.
//! - **Throttle gate**: a 504/429 pauses all dispatch while the worker that
//!   saw it sleeps; the query is retried, not lost.
//! - **First failure wins**: any fatal error cancels the shared token, the
//!   stages unwind, and the error surfaces from [`run_ingestion`].

mod counter;
mod dispatcher;
mod error;
mod failure;
mod feeder;
mod gate;
mod metrics;
mod queue;
mod traits;
mod worker;
mod writer;

#[cfg(test)]
pub(crate) mod testing;


pub use counter::WorkCounter;
pub use error::PipelineError;
pub use gate::TimeoutGate;
pub use metrics::{IngestMetrics, MetricsSnapshot};
pub use queue::Queue;
pub use traits::{BookStore, PersistOutcome, TermJournal};

use std::path::Path;
use std::sync::Arc;

use shelf_protocol::{BookBatch, SearchQuery};
use shelf_providers::{BookProvider, SearchMode};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::failure::FailureCell;

/// Capacity of the main query queue the feeder writes into.
pub const QUERY_QUEUE_CAPACITY: usize = 10;

/// Capacity of the continuation (next-page) queue. Larger than the main
/// queue so pagination never starves behind new terms.
pub const PRIORITY_QUEUE_CAPACITY: usize = 100;

/// Capacity of the result-batch queue feeding the writer pool.
pub const BATCH_QUEUE_CAPACITY: usize = 10;

/// Total provider attempts per query before giving up.
pub const SEARCH_RETRY_LIMIT: u32 = 3;

/// Tunable knobs for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// How input lines are interpreted.
    pub mode: SearchMode,
    /// Provider calls dispatched per one-second tick.
    pub calls_per_second: u32,
    /// Pause after a 504/429 before retrying.
    pub timeout_seconds: u64,
    /// Number of writer tasks draining the batch queue.
    pub db_writers: u32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::Title,
            calls_per_second: 1,
            timeout_seconds: 0,
            db_writers: 1,
        }
    }
}

/// Final accounting for a completed run.
#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub metrics: MetricsSnapshot,
}

/// Everything the pipeline stages share.
pub(crate) struct Shared {
    pub provider: Arc<dyn BookProvider>,
    pub store: Arc<dyn BookStore>,
    pub journal: Arc<dyn TermJournal>,
    pub queries: Queue<SearchQuery>,
    pub priority: Queue<SearchQuery>,
    pub batches: Queue<BookBatch>,
    pub counter: WorkCounter,
    pub gate: TimeoutGate,
    pub metrics: IngestMetrics,
    pub failure: FailureCell,
    pub cancel: CancellationToken,
    pub options: IngestOptions,
}

impl Shared {
    pub(crate) fn new(
        options: IngestOptions,
        provider: Arc<dyn BookProvider>,
        store: Arc<dyn BookStore>,
        journal: Arc<dyn TermJournal>,
    ) -> Arc<Self> {
        let cancel = CancellationToken::new();
        Arc::new(Self {
            provider,
            store,
            journal,
            queries: Queue::bounded(QUERY_QUEUE_CAPACITY),
            priority: Queue::bounded(PRIORITY_QUEUE_CAPACITY),
            batches: Queue::bounded(BATCH_QUEUE_CAPACITY),
            counter: WorkCounter::new(),
            gate: TimeoutGate::new(),
            metrics: IngestMetrics::new(),
            failure: FailureCell::new(cancel.clone()),
            cancel,
            options,
        })
    }
}

/// Run one ingestion to completion.
///
/// Spawns the writer pool and the dispatcher, feeds the input file, waits for
/// the work counter to drain, then tears everything down. Returns the first
/// fatal error if any stage failed; restarting the process afterwards is safe
/// (dedup and the journal are rebuilt from durable state).
pub async fn run_ingestion(
    options: IngestOptions,
    input: impl AsRef<Path>,
    provider: Arc<dyn BookProvider>,
    store: Arc<dyn BookStore>,
    journal: Arc<dyn TermJournal>,
) -> Result<IngestReport, PipelineError> {
    let shared = Shared::new(options, provider, store, journal);

    let mut writers = Vec::with_capacity(shared.options.db_writers as usize);
    for id in 0..shared.options.db_writers {
        writers.push(tokio::spawn(writer::run_writer(
            Arc::clone(&shared),
            id as usize,
        )));
    }
    let dispatcher = tokio::spawn(dispatcher::run_dispatcher(Arc::clone(&shared)));

    info!(
        provider = shared.provider.name(),
        calls_per_second = shared.options.calls_per_second,
        db_writers = shared.options.db_writers,
        "ingestion starting"
    );

    if let Err(e) = feeder::run_feeder(&shared, input.as_ref()).await {
        shared.failure.fail(e);
    }

    // EOF reached; the counter hitting zero now means the pipeline drained.
    tokio::select! {
        _ = shared.counter.drained() => {}
        _ = shared.cancel.cancelled() => {}
    }
    shared.cancel.cancel();

    let _ = dispatcher.await;
    for handle in writers {
        let _ = handle.await;
    }

    let metrics = shared.metrics.snapshot();
    info!(
        provider_calls = metrics.provider_calls,
        throttle_pauses = metrics.throttle_pauses,
        batches = metrics.batches_emitted,
        books_saved = metrics.books_saved,
        books_skipped = metrics.books_skipped,
        terms_completed = metrics.terms_completed,
        "ingestion finished"
    );

    match shared.failure.take() {
        Some(err) => Err(err),
        None => Ok(IngestReport { metrics }),
    }
}
