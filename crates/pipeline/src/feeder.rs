//! Input feeder
//!
//! Scans the input file line by line, skips terms the journal already marks
//! complete, and enqueues queries. In ISBN mode (when the provider has a
//! batched lookup endpoint) lines are accumulated and flushed in
//! provider-sized batches, with a tail flush at EOF.
//!
//! The feeder is oblivious to line content: trailing whitespace is trimmed,
//! blank lines pass through as terms.

use std::path::Path;
use std::sync::Arc;

use shelf_protocol::SearchQuery;
use shelf_providers::SearchMode;
use tracing::info;

use crate::error::PipelineError;
use crate::Shared;

/// How often to log scan progress, in lines.
const PROGRESS_INTERVAL: usize = 1000;

/// Read the input file and enqueue all not-yet-complete work.
///
/// Returns once every line is either skipped or enqueued. Sends apply
/// back-pressure via the main queue's capacity; cancellation aborts the scan
/// without error (a failure elsewhere is already recorded).
pub(crate) async fn run_feeder(shared: &Arc<Shared>, path: &Path) -> Result<(), PipelineError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let total_lines = contents.lines().count();

    let batch_size = match shared.options.mode {
        SearchMode::Isbn => shared.provider.isbn_batch_size(),
        _ => None,
    };

    let mut isbns: Vec<String> = Vec::new();
    let mut scanned = 0usize;
    let mut skipped = 0usize;

    for line in contents.lines() {
        if shared.cancel.is_cancelled() {
            return Ok(());
        }

        let term = line.trim_end();
        scanned += 1;

        if shared.journal.is_complete(term).await {
            skipped += 1;
        } else if let Some(size) = batch_size {
            isbns.push(term.to_owned());
            if isbns.len() == size {
                enqueue(shared, SearchQuery::IsbnBatch {
                    isbns: std::mem::take(&mut isbns),
                })
                .await;
            }
        } else {
            enqueue(shared, SearchQuery::term(term)).await;
        }

        if scanned % PROGRESS_INTERVAL == 0 {
            info!(scanned, total_lines, skipped, "scanning input");
        }
    }

    if !isbns.is_empty() {
        enqueue(shared, SearchQuery::IsbnBatch { isbns }).await;
    }

    info!(scanned, skipped, "input exhausted");
    Ok(())
}

/// Count the query in, then send it. The counter must rise before any
/// consumer can possibly retire the query.
async fn enqueue(shared: &Arc<Shared>, query: SearchQuery) {
    shared.counter.add(1);
    tokio::select! {
        _ = shared.cancel.cancelled() => {}
        _ = shared.queries.send(query) => {}
    }
}
