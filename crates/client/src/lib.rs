//! `neuroscan-client`
//!
//! **Responsibility:** typed access to the scan-analysis backend.
//!
//! - [`ScanApiClient`] wraps the four HTTP operations (upload, fetch, list by
//!   owner, delete) behind bearer-token auth.
//! - It implements [`StatusSource`](neuroscan_poller::StatusSource), so it can
//!   be handed straight to an [`AsyncJobPoller`](neuroscan_poller::AsyncJobPoller).
//! - Credentials are an explicit, shareable object; nothing is read from
//!   ambient global state at request time.

pub mod api;
pub mod config;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod model;

pub use api::ScanApiClient;
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use envelope::{ApiEnvelope, ApiErrorBody};
pub use error::ApiError;
pub use model::{ScanJob, guess_mime};
