//! Structured logging for mktscan.
//!
//! JSON lines in production, human-readable output otherwise. `RUST_LOG`
//! always takes precedence over the configured filter.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{build_filter, init_logging, is_production, DEFAULT_LOG_FILTER};
