//! Cancellable, deadline-bearing context for store operations

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{StoreError, StoreResult};

/// Context passed to every store operation
///
/// Carries a cooperative cancellation token and an optional deadline. Clones share the
/// same token, so cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// Context with no deadline that is never cancelled unless [`cancel`](Self::cancel) is called
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline(Instant::now() + timeout)
    }

    /// Set the deadline, keeping the earlier one if a deadline is already present
    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Run one backend call under this context
    ///
    /// The call is bounded by the earlier of the context deadline and `timeout`. A
    /// cancelled or expired context fails before `call` is polled at all.
    pub(crate) async fn run<F, T>(
        &self,
        operation: &str,
        timeout: Duration,
        call: F,
    ) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        if self.is_cancelled() {
            return Err(StoreError::backend_msg(format!(
                "{operation} cancelled before it started"
            )));
        }

        let deadline = match self.deadline {
            Some(deadline) => deadline.min(Instant::now() + timeout),
            None => Instant::now() + timeout,
        };
        if deadline <= Instant::now() {
            return Err(StoreError::backend_msg(format!(
                "{operation} deadline exceeded before it started"
            )));
        }

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(StoreError::backend_msg(format!(
                "{operation} cancelled"
            ))),
            _ = tokio::time::sleep_until(deadline) => Err(StoreError::backend_msg(format!(
                "{operation} timed out"
            ))),
            result = call => result,
        }
    }
}
