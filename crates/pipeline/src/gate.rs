//! Throttle back-pressure gate
//!
//! When a worker sees a 504/429 it raises the gate, sleeps out the configured
//! pause, and lowers it again. The dispatcher checks the gate on every tick
//! and issues no calls while any worker is still sleeping.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Count of workers currently sleeping out a provider throttle.
#[derive(Debug, Default)]
pub struct TimeoutGate {
    sleepers: AtomicUsize,
}

impl TimeoutGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while at least one worker is sleeping.
    pub fn is_raised(&self) -> bool {
        self.sleepers.load(Ordering::SeqCst) > 0
    }

    /// Raise the gate, sleep `pause`, lower it again.
    pub async fn hold(&self, pause: Duration) {
        self.sleepers.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(pause).await;
        self.sleepers.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn gate_starts_lowered() {
        assert!(!TimeoutGate::new().is_raised());
    }

    #[tokio::test(start_paused = true)]
    async fn hold_raises_for_the_duration() {
        let gate = Arc::new(TimeoutGate::new());
        let holder = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.hold(Duration::from_secs(5)).await })
        };

        // Let the holder task reach its sleep.
        tokio::task::yield_now().await;
        assert!(gate.is_raised());

        tokio::time::sleep(Duration::from_secs(6)).await;
        holder.await.unwrap();
        assert!(!gate.is_raised());
    }

    #[tokio::test(start_paused = true)]
    async fn gate_stays_raised_while_any_sleeper_remains() {
        let gate = Arc::new(TimeoutGate::new());
        let short = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.hold(Duration::from_secs(1)).await })
        };
        let long = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.hold(Duration::from_secs(10)).await })
        };

        tokio::task::yield_now().await;
        assert!(gate.is_raised());

        tokio::time::sleep(Duration::from_secs(2)).await;
        short.await.unwrap();
        assert!(gate.is_raised(), "long sleeper still holds the gate");

        tokio::time::sleep(Duration::from_secs(9)).await;
        long.await.unwrap();
        assert!(!gate.is_raised());
    }
}
