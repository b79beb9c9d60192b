//! The single I/O seam of the poller.

use std::future::Future;

use async_trait::async_trait;
use neuroscan_core::JobId;

use crate::status::JobStatus;

/// Fetches the current status of a job.
///
/// Implementations own every transport concern (HTTP, auth, decoding). Any
/// failure, including a status value the implementation does not recognise,
/// must be reported as `Err` so the poller can stop instead of looping.
#[async_trait]
pub trait StatusSource<T>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_status(&self, job_id: &JobId) -> Result<JobStatus<T>, Self::Error>;
}

/// A [`StatusSource`] backed by an async closure. Build one with [`from_fn`].
#[derive(Clone)]
pub struct FnSource<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}

/// Wrap `f(job_id) -> Future<Result<JobStatus<T>, E>>` as a [`StatusSource`].
pub fn from_fn<F>(f: F) -> FnSource<F> {
    FnSource { f }
}

#[async_trait]
impl<T, E, F, Fut> StatusSource<T> for FnSource<F>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(JobId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<JobStatus<T>, E>> + Send,
{
    type Error = E;

    async fn fetch_status(&self, job_id: &JobId) -> Result<JobStatus<T>, E> {
        (self.f)(job_id.clone()).await
    }
}
