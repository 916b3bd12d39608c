//! First-failure capture
//!
//! Any stage can hit a fatal error; the first one wins, everything else is
//! logged and dropped. Recording a failure cancels the shared token so all
//! stages stop.

use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::PipelineError;

/// Holds the first fatal error of the run and the shutdown token.
#[derive(Debug)]
pub struct FailureCell {
    slot: Mutex<Option<PipelineError>>,
    cancel: CancellationToken,
}

impl FailureCell {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            slot: Mutex::new(None),
            cancel,
        }
    }

    /// Record a fatal error and cancel the pipeline. Later errors are logged
    /// but not stored.
    pub fn fail(&self, err: PipelineError) {
        error!(error = %err, "fatal pipeline error");
        let mut slot = self.slot.lock().expect("failure slot poisoned");
        if slot.is_none() {
            *slot = Some(err);
        }
        drop(slot);
        self.cancel.cancel();
    }

    /// True once any failure has been recorded.
    pub fn is_failed(&self) -> bool {
        self.slot.lock().expect("failure slot poisoned").is_some()
    }

    /// Take the stored error, if any.
    pub fn take(&self) -> Option<PipelineError> {
        self.slot.lock().expect("failure slot poisoned").take()
    }
}
