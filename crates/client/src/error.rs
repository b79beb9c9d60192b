//! Errors raised while talking to the scan backend.

use neuroscan_core::{ConfigError, JobId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no bearer token configured")]
    MissingToken,

    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response, or a 2xx envelope with `success: false`.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("unrecognised job status {0:?}")]
    UnknownStatus(String),

    #[error("job {0} reported completed without a result")]
    MissingResult(JobId),

    #[error("cannot read upload: {0}")]
    Io(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// The backend rejected the bearer token; refresh [`Credentials`](crate::Credentials)
    /// and start a new poll.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Api { status: 401, .. } | ApiError::MissingToken)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
