//! Tracing and logging setup shared by NeuroScan binaries.

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(DEFAULT_FILTER, LogFormat::Json);
}

/// Environment variable selecting [`LogFormat`] for [`init_from_env`].
pub const ENV_LOG_FORMAT: &str = "NEUROSCAN_LOG_FORMAT";

/// Like [`init`], with the output format taken from `NEUROSCAN_LOG_FORMAT`.
pub fn init_from_env() {
    let format = std::env::var(ENV_LOG_FORMAT)
        .map(|v| LogFormat::from_name(&v))
        .unwrap_or_default();
    tracing::init(DEFAULT_FILTER, format);
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line (services, log shippers).
    #[default]
    Json,
    /// Human-readable single-line output (interactive terminals).
    Compact,
}

impl LogFormat {
    /// Parse `json` / `compact` (case-insensitive). Unknown values fall back to JSON.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" | "pretty" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

/// Tracing configuration (filters, layers).
pub mod tracing;
