//! Outstanding-work counter
//!
//! Every enqueued query adds one; the side that retires the query (a writer
//! after persisting its final batch, or a worker on empty results) subtracts
//! one. The main coordinator waits on zero after the feeder hits EOF to know
//! the pipeline has drained.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Notify;

/// Shared counter of in-flight queries and their unpersisted batches.
#[derive(Debug, Default)]
pub struct WorkCounter {
    active: AtomicU64,
    drained: Notify,
}

impl WorkCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `n` new units of work.
    pub fn add(&self, n: u64) {
        self.active.fetch_add(n, Ordering::SeqCst);
    }

    /// Retire one unit of work, waking drain waiters on the last one.
    pub fn done(&self) {
        let prev = self.active.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(prev > 0, "work counter went negative");
        if prev == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Current outstanding count.
    pub fn outstanding(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait until the counter reaches zero. Returns immediately if it already
    /// is. Only meaningful once no new top-level work will be added (i.e.
    /// after the feeder finished); continuations are added before their
    /// parent query retires, so the count cannot dip to zero early.
    pub async fn drained(&self) {
        loop {
            let notified = self.drained.notified();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn drained_returns_immediately_at_zero() {
        let counter = WorkCounter::new();
        counter.drained().await;
    }

    #[tokio::test]
    async fn add_done_round_trip() {
        let counter = WorkCounter::new();
        counter.add(2);
        assert_eq!(counter.outstanding(), 2);
        counter.done();
        counter.done();
        assert_eq!(counter.outstanding(), 0);
    }

    #[tokio::test]
    async fn drained_wakes_on_last_done() {
        let counter = Arc::new(WorkCounter::new());
        counter.add(1);

        let waiter = {
            let counter = Arc::clone(&counter);
            tokio::spawn(async move { counter.drained().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        counter.done();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("drain waiter should wake")
            .unwrap();
    }
}
