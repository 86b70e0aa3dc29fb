//! mktscan application.
//!
//! Wires the REST client, the ticker stream and the formatters into the
//! commands exposed by the `mktscan` binary:
//! - Ranked instrument listing
//! - Last price, 24h summary and order-book depth for one symbol
//! - Live price watch over the ticker stream

pub mod app;
pub mod config;
pub mod error;
pub mod render;

pub use app::Application;
pub use config::{resolve_config_path, AppConfig, ConfigSource, TelemetryConfig};
pub use error::{AppError, AppResult};
