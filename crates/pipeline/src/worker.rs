//! Search worker
//!
//! One execution handles one query attempt: dequeue (priority queue first),
//! call the provider, handle throttling, schedule the next page, emit the
//! result batch. Workers are spawned by the dispatcher and run to completion
//! independently; an empty dequeue just means this tick had spare budget.

use std::sync::Arc;
use std::time::Duration;

use shelf_protocol::{Book, BookBatch, SearchQuery};
use shelf_providers::{SearchMode, SearchPage};
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::{SEARCH_RETRY_LIMIT, Shared};

/// Entry point for one spawned worker task.
pub(crate) async fn run_search(shared: Arc<Shared>) {
    let Some(query) = next_query(&shared) else {
        return;
    };
    if let Err(e) = handle_query(&shared, query).await {
        shared.failure.fail(e);
    }
}

/// Continuations drain before new terms so pagination finishes promptly and
/// the number of simultaneously open terms stays bounded.
fn next_query(shared: &Shared) -> Option<SearchQuery> {
    shared
        .priority
        .try_recv()
        .or_else(|| shared.queries.try_recv())
}

/// Provider results in either shape.
enum Fetched {
    Page(SearchPage),
    Batch(Vec<Book>),
}

async fn handle_query(shared: &Arc<Shared>, query: SearchQuery) -> Result<(), PipelineError> {
    for attempt in 1..=SEARCH_RETRY_LIMIT {
        shared.metrics.record_provider_call();

        let fetched = match &query {
            SearchQuery::Term { term, page } => {
                shared.provider.search(term, *page).await.map(Fetched::Page)
            }
            SearchQuery::IsbnBatch { isbns } => {
                shared.provider.lookup_isbns(isbns).await.map(Fetched::Batch)
            }
        };

        match fetched {
            Ok(result) => return deliver(shared, &query, result).await,
            Err(e) if e.is_throttle() => {
                warn!(
                    attempt,
                    pause_secs = shared.options.timeout_seconds,
                    error = %e,
                    "provider throttled, pausing dispatch"
                );
                shared.metrics.record_throttle_pause();
                shared
                    .gate
                    .hold(Duration::from_secs(shared.options.timeout_seconds))
                    .await;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(PipelineError::RetriesExhausted {
        attempts: SEARCH_RETRY_LIMIT,
    })
}

async fn deliver(
    shared: &Arc<Shared>,
    query: &SearchQuery,
    fetched: Fetched,
) -> Result<(), PipelineError> {
    match (query, fetched) {
        (SearchQuery::Term { term, page }, Fetched::Page(result)) => {
            if result.books.is_empty() {
                // Nothing to write: mark the term done right here instead of
                // routing an empty batch through the writer pool.
                debug!(term = %term, page, "no results, marking term complete");
                shared.metrics.record_empty_result();
                shared.journal.mark_complete(term).await?;
                shared.metrics.record_term_completed();
                shared.counter.done();
                return Ok(());
            }

            // ISBN-mode term searches (Google) have no meaningful total and
            // are never journaled.
            let mut last_page = false;
            if shared.options.mode != SearchMode::Isbn {
                let max_page = result.total.div_ceil(shared.provider.page_size()).max(1);
                last_page = *page >= max_page;
                if *page < max_page {
                    if let Some(next) = query.next_page() {
                        shared.counter.add(1);
                        tokio::select! {
                            _ = shared.cancel.cancelled() => return Ok(()),
                            _ = shared.priority.send(next) => {}
                        }
                    }
                }
            }

            emit(shared, BookBatch {
                books: result.books,
                source_term: Some(term.clone()),
                last_page,
            })
            .await;
            Ok(())
        }

        (SearchQuery::IsbnBatch { .. }, Fetched::Batch(books)) => {
            if books.is_empty() {
                // No per-ISBN tracking: an empty batch is dropped, the input
                // lines will be re-looked-up on a future run.
                shared.metrics.record_empty_result();
                shared.counter.done();
                return Ok(());
            }

            emit(shared, BookBatch {
                books,
                source_term: None,
                last_page: false,
            })
            .await;
            Ok(())
        }

        // A term query cannot produce a batch result and vice versa.
        _ => unreachable!("query and result shapes diverged"),
    }
}

async fn emit(shared: &Arc<Shared>, batch: BookBatch) {
    tokio::select! {
        _ = shared.cancel.cancelled() => {}
        res = shared.batches.send(batch) => {
            if res.is_ok() {
                shared.metrics.record_batch_emitted();
            }
        }
    }
}
