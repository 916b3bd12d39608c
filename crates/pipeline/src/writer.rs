//! Writer pool
//!
//! `db_writers` tasks drain the batch queue. Each book goes through the
//! store's dedup gate and inserts; after the whole batch, a terminal page
//! puts its term in the progress journal, and only then is the originating
//! query counted out. A store error is fatal for the run.

use std::sync::Arc;

use shelf_protocol::BookBatch;
use tracing::debug;

use crate::error::PipelineError;
use crate::traits::PersistOutcome;
use crate::Shared;

pub(crate) async fn run_writer(shared: Arc<Shared>, id: usize) {
    loop {
        let batch = tokio::select! {
            _ = shared.cancel.cancelled() => break,
            received = shared.batches.recv() => match received {
                Some(batch) => batch,
                None => break,
            },
        };

        if let Err(e) = persist_batch(&shared, batch).await {
            shared.failure.fail(e);
            break;
        }
    }

    debug!(writer = id, "writer stopped");
}

async fn persist_batch(shared: &Arc<Shared>, batch: BookBatch) -> Result<(), PipelineError> {
    for book in &batch.books {
        match shared.store.persist(book).await? {
            PersistOutcome::Saved => shared.metrics.record_book_saved(),
            PersistOutcome::Duplicate => shared.metrics.record_book_skipped(),
        }
    }

    // The journal insert happens only after every book in the terminal page
    // is durable; a crash before this point re-runs the term from page 1 and
    // dedup absorbs the replay.
    if batch.last_page
        && let Some(term) = &batch.source_term
    {
        shared.journal.mark_complete(term).await?;
        shared.metrics.record_term_completed();
    }

    shared.counter.done();
    Ok(())
}
