//! Bearer-token credentials shared between a client and its callers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ApiError;

/// Refreshable bearer token.
///
/// Clones share the same slot, so a caller that refreshes the token after an
/// [`ApiError::is_unauthorized`] response updates every client holding it.
#[derive(Clone, Default)]
pub struct Credentials {
    token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("token", &"<redacted>").finish()
    }
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }

    /// Credentials with no token; every request fails with [`ApiError::MissingToken`]
    /// until [`Credentials::set_token`] is called.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    /// Current token, or [`ApiError::MissingToken`] when none (or a blank one) is set.
    pub async fn bearer(&self) -> Result<String, ApiError> {
        self.token
            .read()
            .await
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(ApiError::MissingToken)
    }
}
