//! `neuroscan-poller`
//!
//! **Responsibility:** drive repeated status checks of one long-running backend
//! job and deliver exactly one terminal outcome.
//!
//! ## Design
//!
//! - The poller knows nothing about transport: callers supply a [`StatusSource`]
//!   (or a plain async closure via [`from_fn`]).
//! - Polling is strictly sequential: attempt N+1 is never issued before attempt
//!   N has been observed, and at most one timer is pending per job.
//! - The only timeout is the attempt ceiling in [`PollConfig`]; there is no
//!   wall-clock deadline.
//! - Transport errors are terminal. They are surfaced, never retried.
//!
//! ## Forms
//!
//! - Callback form: [`start_polling`] / [`AsyncJobPoller::start`] spawn the loop
//!   on the tokio runtime and return a cancellable [`PollHandle`].
//! - Future form: [`AsyncJobPoller::poll`] runs the same loop inline; dropping
//!   the future cancels it.

pub mod config;
pub mod error;
pub mod handle;
pub mod poller;
pub mod source;
pub mod status;

pub use config::{PollConfig, DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS};
pub use error::PollError;
pub use handle::PollHandle;
pub use poller::{start_polling, AsyncJobPoller};
pub use source::{from_fn, FnSource, StatusSource};
pub use status::JobStatus;

pub use neuroscan_core::JobId;
