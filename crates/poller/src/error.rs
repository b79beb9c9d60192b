//! Terminal polling failures.

use thiserror::Error;

/// Why a poll ended without a result.
///
/// `E` is the error type of the [`StatusSource`](crate::StatusSource) in use,
/// so transport causes stay typed all the way to the caller.
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// The backend reported the job as failed.
    #[error("job failed: {0}")]
    JobFailed(String),

    /// Every attempt observed a non-terminal status.
    #[error("job still running after {attempts} poll attempt(s)")]
    Timeout { attempts: u32 },

    /// The status fetch itself failed (network, HTTP, decoding, unknown status).
    #[error("status fetch failed: {0}")]
    Transport(#[source] E),
}

impl<E> PollError<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::Timeout { .. })
    }

    pub fn transport(&self) -> Option<&E> {
        match self {
            PollError::Transport(e) => Some(e),
            _ => None,
        }
    }
}
