//! Cancellation for reconciliation passes.
//!
//! A pass checks its [`Cancellation`] before every remote key operation.
//! Calls already in flight are bounded by the HTTP timeout only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::{Result, SyncError};

/// Deadline and shared stop flag.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    /// Never cancels unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop once `timeout` has elapsed from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Stop at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Shared flag; storing `true` cancels every pass using this value.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fail with `SyncError::Cancelled` if the pass should stop.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            warn!("sync cancelled");
            return Err(SyncError::Cancelled.into());
        }
        Ok(())
    }
}
