//! Bounded MPMC queue handle
//!
//! Thin wrapper around a crossfire bounded channel that keeps an explicit
//! depth gauge. The dispatcher needs to ask "is the writer queue full?" on
//! every tick, and several workers and writers share one queue, so both ends
//! are cloneable and the gauge lives beside them.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossfire::{MAsyncRx, MAsyncTx};

/// Cloneable handle to a bounded in-memory queue.
pub struct Queue<T> {
    tx: MAsyncTx<T>,
    rx: MAsyncRx<T>,
    depth: Arc<AtomicUsize>,
    capacity: usize,
}

impl<T: Unpin> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
            depth: Arc::clone(&self.depth),
            capacity: self.capacity,
        }
    }
}

impl<T: Unpin + Send + 'static> Queue<T> {
    /// Create a bounded queue.
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = crossfire::mpmc::bounded_async(capacity);
        Self {
            tx,
            rx,
            depth: Arc::new(AtomicUsize::new(0)),
            capacity,
        }
    }

    /// Send, waiting for capacity. Returns `Err` only when the channel is
    /// closed, which does not happen while any handle is alive; callers treat
    /// it as shutdown.
    pub async fn send(&self, item: T) -> Result<(), ()> {
        match self.tx.send(item).await {
            Ok(()) => {
                self.depth.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(_) => Err(()),
        }
    }

    /// Non-blocking receive.
    pub fn try_recv(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => {
                self.depth.fetch_sub(1, Ordering::Relaxed);
                Some(item)
            }
            Err(_) => None,
        }
    }

    /// Receive, waiting for an item.
    pub async fn recv(&self) -> Option<T> {
        match self.rx.recv().await {
            Ok(item) => {
                self.depth.fetch_sub(1, Ordering::Relaxed);
                Some(item)
            }
            Err(_) => None,
        }
    }

    /// Items currently queued (approximate under concurrency).
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    /// True when the queue holds `capacity` items.
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_recv_round_trip() {
        let q: Queue<u32> = Queue::bounded(4);
        q.send(7).await.unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.recv().await, Some(7));
        assert!(q.is_empty());
    }

    #[tokio::test]
    async fn try_recv_on_empty_returns_none() {
        let q: Queue<u32> = Queue::bounded(1);
        assert_eq!(q.try_recv(), None);
    }

    #[tokio::test]
    async fn depth_tracks_fullness() {
        let q: Queue<u32> = Queue::bounded(2);
        q.send(1).await.unwrap();
        assert!(!q.is_full());
        q.send(2).await.unwrap();
        assert!(q.is_full());
        q.try_recv().unwrap();
        assert!(!q.is_full());
    }

    #[tokio::test]
    async fn clones_share_the_gauge() {
        let q: Queue<u32> = Queue::bounded(2);
        let q2 = q.clone();
        q.send(1).await.unwrap();
        assert_eq!(q2.len(), 1);
        assert_eq!(q2.try_recv(), Some(1));
        assert!(q.is_empty());
    }
}
