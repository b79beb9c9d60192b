//! Bounded, sequential status polling of a single backend job.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use neuroscan_core::JobId;
use tracing::{Instrument, debug, info, warn};

use crate::config::PollConfig;
use crate::error::PollError;
use crate::handle::{PollControl, PollHandle};
use crate::source::{StatusSource, from_fn};
use crate::status::JobStatus;

/// Polls jobs through one [`StatusSource`] with one [`PollConfig`].
///
/// The poller itself is stateless between polls: every call to
/// [`AsyncJobPoller::start`] or [`AsyncJobPoller::poll`] gets its own
/// attempt counter and timer, so one poller can watch many jobs at once.
#[derive(Debug)]
pub struct AsyncJobPoller<S> {
    source: Arc<S>,
    config: PollConfig,
}

impl<S> Clone for AsyncJobPoller<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            config: self.config,
        }
    }
}

impl<S> AsyncJobPoller<S> {
    pub fn new(source: S, config: PollConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Poll `job_id` inline until it resolves.
    ///
    /// Dropping the returned future cancels the poll; no fetch is issued
    /// afterwards.
    pub async fn poll<T>(&self, job_id: &JobId) -> Result<T, PollError<S::Error>>
    where
        S: StatusSource<T>,
    {
        let outcome = drive(&*self.source, job_id, self.config, &Uncancellable)
            .instrument(poll_span(job_id, self.config))
            .await;
        match outcome {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Start polling `job_id` in the background.
    ///
    /// Attempt #1 is issued immediately. Exactly one of `on_complete` /
    /// `on_error` fires, unless the returned handle is cancelled first, in
    /// which case neither does. The handle is returned before the first fetch
    /// settles.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<T, C, E>(&self, job_id: JobId, on_complete: C, on_error: E) -> PollHandle
    where
        S: StatusSource<T> + 'static,
        T: Send + 'static,
        C: FnOnce(T) + Send + 'static,
        E: FnOnce(PollError<S::Error>) + Send + 'static,
    {
        let control = PollControl::new();
        let span = poll_span(&job_id, self.config);

        let task = {
            let source = Arc::clone(&self.source);
            let control = Arc::clone(&control);
            let config = self.config;
            let job_id = job_id.clone();

            tokio::spawn(
                async move {
                    let Ok(outcome) = drive(&*source, &job_id, config, &*control).await else {
                        return;
                    };
                    if !control.try_settle() {
                        debug!("poll cancelled; dropping outcome");
                        return;
                    }
                    match outcome {
                        Ok(result) => on_complete(result),
                        Err(e) => on_error(e),
                    }
                }
                .instrument(span),
            )
        };

        PollHandle::new(job_id, control, task)
    }
}

/// Start polling `job_id` with a plain async closure as the status source.
///
/// Shorthand for `AsyncJobPoller::new(from_fn(fetch_status), config).start(..)`.
pub fn start_polling<T, Er, F, Fut, C, E>(
    job_id: JobId,
    fetch_status: F,
    config: PollConfig,
    on_complete: C,
    on_error: E,
) -> PollHandle
where
    T: Send + 'static,
    Er: std::error::Error + Send + Sync + 'static,
    F: Fn(JobId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<JobStatus<T>, Er>> + Send,
    C: FnOnce(T) + Send + 'static,
    E: FnOnce(PollError<Er>) + Send + 'static,
{
    AsyncJobPoller::new(from_fn(fetch_status), config).start(job_id, on_complete, on_error)
}

fn poll_span(job_id: &JobId, config: PollConfig) -> tracing::Span {
    tracing::info_span!(
        "poll_job",
        job_id = %job_id,
        max_attempts = config.max_attempts(),
        interval_ms = config.interval().as_millis() as u64,
    )
}

/// How the loop learns that its outcome is no longer wanted.
trait CancelSignal {
    type Cancelled;

    /// `Err` once the caller has cancelled.
    fn check(&self) -> Result<(), Self::Cancelled>;

    /// Resolves when the caller cancels.
    fn wait(&self) -> impl Future<Output = Self::Cancelled> + Send + '_;
}

impl CancelSignal for PollControl {
    type Cancelled = ();

    fn check(&self) -> Result<(), ()> {
        if self.is_settled() {
            Err(())
        } else {
            Ok(())
        }
    }

    fn wait(&self) -> impl Future<Output = ()> + Send + '_ {
        PollControl::cancelled(self)
    }
}

/// The future form: only dropping the future stops it.
struct Uncancellable;

impl CancelSignal for Uncancellable {
    type Cancelled = Infallible;

    fn check(&self) -> Result<(), Infallible> {
        Ok(())
    }

    fn wait(&self) -> impl Future<Output = Infallible> + Send + '_ {
        std::future::pending()
    }
}

/// The attempt → evaluate → {resolve | wait | timeout} loop.
///
/// Returns `Err` when `cancel` fired; the caller must then stay silent.
/// Otherwise returns the outcome, which a cancellable caller still has to
/// claim through [`PollControl::try_settle`] before acting on it.
async fn drive<T, S, X>(
    source: &S,
    job_id: &JobId,
    config: PollConfig,
    cancel: &X,
) -> Result<Result<T, PollError<S::Error>>, X::Cancelled>
where
    S: StatusSource<T> + ?Sized,
    X: CancelSignal,
{
    let max_attempts = config.max_attempts();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let fetched = source.fetch_status(job_id).await;

        if let Err(cancelled) = cancel.check() {
            debug!(attempt, "poll cancelled during fetch; discarding result");
            return Err(cancelled);
        }

        let status = match fetched {
            Ok(status) => status,
            Err(e) => {
                warn!(attempt, error = %e, "status fetch failed");
                return Ok(Err(PollError::Transport(e)));
            }
        };

        debug!(attempt, status = status.label(), "poll attempt");

        match status {
            JobStatus::Completed(result) => {
                info!(attempts = attempt, "job completed");
                return Ok(Ok(result));
            }
            JobStatus::Failed(message) => {
                info!(attempts = attempt, error = %message, "job failed");
                return Ok(Err(PollError::JobFailed(message)));
            }
            JobStatus::Pending | JobStatus::Processing => {}
        }

        if attempt >= max_attempts {
            warn!(attempts = attempt, "job still running; poll attempts exhausted");
            return Ok(Err(PollError::Timeout { attempts: attempt }));
        }

        tokio::select! {
            _ = tokio::time::sleep(config.interval()) => {}
            cancelled = cancel.wait() => return Err(cancelled),
        }
    }
}
