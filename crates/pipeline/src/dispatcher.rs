//! Rate-limiting dispatcher
//!
//! Enforces the provider's per-second call budget. Once a second it launches
//! up to `calls_per_second` one-shot search workers, unless the pipeline is
//! pushing back: a raised throttle gate or a full writer queue skips the
//! whole tick. The second condition keeps searches from outrunning the
//! writers and piling batches up in memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::{Shared, worker};

pub(crate) async fn run_dispatcher(shared: Arc<Shared>) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if shared.gate.is_raised() || shared.batches.is_full() {
            shared.metrics.record_suppressed_tick();
            continue;
        }

        for _ in 0..shared.options.calls_per_second {
            tokio::spawn(worker::run_search(Arc::clone(&shared)));
        }
    }

    debug!("dispatcher stopped");
}
