//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Core(#[from] mktscan_core::CoreError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] mktscan_catalog::CatalogError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<mktscan_ws::WsError>),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] mktscan_telemetry::TelemetryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No symbols to watch")]
    NoSymbols,
}

impl From<mktscan_ws::WsError> for AppError {
    fn from(e: mktscan_ws::WsError) -> Self {
        AppError::WebSocket(Box::new(e))
    }
}

pub type AppResult<T> = Result<T, AppError>;
