//! Caller-owned handle for a running poll.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use neuroscan_core::JobId;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// State shared between a [`PollHandle`] and its polling loop.
///
/// `settled` flips exactly once, either when the loop reports an outcome or
/// when the caller cancels. Whoever flips it owns the single terminal action.
#[derive(Debug, Default)]
pub(crate) struct PollControl {
    settled: AtomicBool,
    wake: Notify,
}

impl PollControl {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the terminal action. Returns `false` if someone already did.
    pub(crate) fn try_settle(&self) -> bool {
        !self.settled.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    /// Resolves once [`PollControl::cancel`] has been called.
    ///
    /// `Notify` keeps a permit, so a cancel that lands while the loop is
    /// awaiting a fetch still wakes the next interval wait immediately.
    pub(crate) async fn cancelled(&self) {
        self.wake.notified().await;
    }

    pub(crate) fn cancel(&self) -> bool {
        if self.try_settle() {
            self.wake.notify_one();
            true
        } else {
            false
        }
    }
}

/// Handle to a poll started with [`start_polling`](crate::start_polling) or
/// [`AsyncJobPoller::start`](crate::AsyncJobPoller::start).
///
/// Dropping the handle detaches the loop; it keeps running and still reports
/// its outcome. Call [`PollHandle::cancel`] to stop it.
#[derive(Debug)]
pub struct PollHandle {
    job_id: JobId,
    control: Arc<PollControl>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub(crate) fn new(job_id: JobId, control: Arc<PollControl>, task: JoinHandle<()>) -> Self {
        Self {
            job_id,
            control,
            task,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Stop polling. No callback fires after this returns.
    ///
    /// A pending interval wait ends immediately. A fetch that is already in
    /// flight is left to finish and its result is discarded. Cancelling twice,
    /// or after the poll has resolved, does nothing.
    pub fn cancel(&self) {
        if self.control.cancel() {
            tracing::debug!(job_id = %self.job_id, "poll cancelled");
        }
    }

    /// `true` once the poll has resolved or been cancelled.
    pub fn is_settled(&self) -> bool {
        self.control.is_settled()
    }

    /// Wait for the background loop to exit.
    ///
    /// After a cancel this may still wait for an in-flight fetch to finish.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            if e.is_panic() {
                tracing::error!(job_id = %self.job_id, "poll task panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_is_claimed_once() {
        let control = PollControl::new();
        assert!(!control.is_settled());
        assert!(control.try_settle());
        assert!(!control.try_settle());
        assert!(control.is_settled());
    }

    #[test]
    fn cancel_after_settle_is_a_no_op() {
        let control = PollControl::new();
        assert!(control.try_settle());
        assert!(!control.cancel());
    }

    #[tokio::test]
    async fn cancel_before_wait_is_remembered() {
        let control = PollControl::new();
        assert!(control.cancel());
        // Permit stored by notify_one: this must not hang.
        control.cancelled().await;
    }
}
