//! The backend's `{ success, data, error }` response wrapper.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

/// Every backend response body, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap `data`, turning `success: false` or a non-2xx `http_status` into
    /// [`ApiError::Api`].
    pub fn into_data(self, http_status: u16) -> Result<T, ApiError> {
        self.check(http_status)?;
        self.data
            .ok_or_else(|| ApiError::Decode("response envelope has no data".to_string()))
    }

    /// Like [`ApiEnvelope::into_data`] for operations whose payload is ignored.
    pub fn into_unit(self, http_status: u16) -> Result<(), ApiError> {
        self.check(http_status)
    }

    fn check(&self, http_status: u16) -> Result<(), ApiError> {
        let ok_status = (200..300).contains(&http_status);
        if self.success && ok_status {
            return Ok(());
        }
        let message = self
            .error
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "request failed".to_string());
        Err(ApiError::api(http_status, message))
    }
}
