//! Poll pacing configuration.

use std::time::Duration;

use neuroscan_core::ConfigError;

/// Delay between attempts when nothing else is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);

/// Attempt ceiling when nothing else is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

pub const ENV_INTERVAL_MS: &str = "NEUROSCAN_POLL_INTERVAL_MS";
pub const ENV_MAX_ATTEMPTS: &str = "NEUROSCAN_POLL_MAX_ATTEMPTS";

/// Immutable pacing for a single poll.
///
/// Both fields are guaranteed positive; construct through [`PollConfig::new`]
/// or [`PollConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    interval: Duration,
    max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::not_positive("interval"));
        }
        if max_attempts == 0 {
            return Err(ConfigError::not_positive("max_attempts"));
        }
        Ok(Self {
            interval,
            max_attempts,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Total time spent sleeping before a timeout is declared.
    ///
    /// Fetch latency comes on top of this.
    pub fn total_delay(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts - 1)
    }

    /// Read overrides from `NEUROSCAN_POLL_INTERVAL_MS` / `NEUROSCAN_POLL_MAX_ATTEMPTS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PollConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let interval = match lookup(ENV_INTERVAL_MS) {
            Some(raw) => Duration::from_millis(parse_u64(ENV_INTERVAL_MS, &raw)?),
            None => DEFAULT_INTERVAL,
        };
        let max_attempts = match lookup(ENV_MAX_ATTEMPTS) {
            Some(raw) => u32::try_from(parse_u64(ENV_MAX_ATTEMPTS, &raw)?)
                .map_err(|_| ConfigError::parse(ENV_MAX_ATTEMPTS, raw))?,
            None => DEFAULT_MAX_ATTEMPTS,
        };
        Self::new(interval, max_attempts)
    }
}

fn parse_u64(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::parse(field, raw))
}
