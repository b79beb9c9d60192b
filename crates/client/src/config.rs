//! Client configuration, read from the environment.

use std::time::Duration;

use neuroscan_core::ConfigError;
use neuroscan_poller::PollConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/brain-tumor";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_URL: &str = "NEUROSCAN_API_URL";
pub const ENV_API_TOKEN: &str = "NEUROSCAN_API_TOKEN";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "NEUROSCAN_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the scan backend, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout.
    pub http_timeout: Duration,
    /// Initial bearer token, if one was provided.
    pub token: Option<String>,
    pub poll: PollConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            token: None,
            poll: PollConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_url(&api_url.into())?,
            ..Self::default()
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// The configured bearer token, or [`ConfigError::Missing`] naming
    /// `NEUROSCAN_API_TOKEN`.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_API_TOKEN))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = match lookup(ENV_API_URL) {
            Some(url) => normalize_url(&url)?,
            None => {
                tracing::warn!("{ENV_API_URL} not set; using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
        };

        let http_timeout = match lookup(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::parse(ENV_HTTP_TIMEOUT_SECS, &raw))?;
                if secs == 0 {
                    return Err(ConfigError::not_positive(ENV_HTTP_TIMEOUT_SECS));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_HTTP_TIMEOUT,
        };

        let token = lookup(ENV_API_TOKEN).filter(|t| !t.trim().is_empty());
        let poll = PollConfig::from_lookup(&lookup)?;

        Ok(Self {
            api_url,
            http_timeout,
            token,
            poll,
        })
    }
}

fn normalize_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed).map_err(|_| ConfigError::parse(ENV_API_URL, raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::parse(ENV_API_URL, raw));
    }
    Ok(trimmed.to_string())
}
