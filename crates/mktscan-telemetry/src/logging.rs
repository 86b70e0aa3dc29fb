//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,mktscan=debug";

/// Whether `RUST_ENV` selects production (JSON) output.
pub fn is_production() -> bool {
    std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false)
}

/// Build the env filter: `RUST_LOG` if set, otherwise `default_filter`.
pub fn build_filter(default_filter: &str) -> TelemetryResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(default_filter).map_err(|e| TelemetryError::InvalidFilter {
        filter: default_filter.to_string(),
        reason: e.to_string(),
    })
}

/// Initialize structured logging.
///
/// Configures tracing with JSON output for production and
/// pretty output for development. Logs go to stderr so command output on
/// stdout stays clean.
pub fn init_logging(default_filter: &str) -> TelemetryResult<()> {
    let env_filter = build_filter(default_filter)?;

    let result = if is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
