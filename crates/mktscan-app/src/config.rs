//! Application configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at the default location) yields a working configuration.

use crate::error::{AppError, AppResult};
use mktscan_catalog::{CatalogRanker, DEFAULT_RANK_LIMIT, DEFAULT_REST_URL, REFERENCE_QUOTE_ASSET};
use mktscan_telemetry::DEFAULT_LOG_FILTER;
use mktscan_ws::{StreamConfig, DEFAULT_STREAM_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "MKTSCAN_CONFIG";

/// Configuration file used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Where the configuration path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` argument.
    Cli(PathBuf),
    /// `MKTSCAN_CONFIG` environment variable.
    Env(PathBuf),
    /// Built-in default path; allowed to be missing.
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Cli(path) | ConfigSource::Env(path) | ConfigSource::Default(path) => path,
        }
    }

    /// Explicitly named paths must exist.
    pub fn is_explicit(&self) -> bool {
        !matches!(self, ConfigSource::Default(_))
    }
}

/// Determine config path: CLI arg > `MKTSCAN_CONFIG` env var > default.
pub fn resolve_config_path(cli: Option<String>, env: Option<String>) -> ConfigSource {
    if let Some(path) = cli {
        return ConfigSource::Cli(PathBuf::from(path));
    }
    match env {
        Some(path) if !path.trim().is_empty() => ConfigSource::Env(PathBuf::from(path)),
        _ => ConfigSource::Default(PathBuf::from(DEFAULT_CONFIG_PATH)),
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST API base URL.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// Stream endpoint base URL.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// REST request timeout (ms). Default: 10,000.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Number of instruments returned by `top`. Default: 300.
    #[serde(default = "default_rank_limit")]
    pub rank_limit: usize,

    /// Symbols streamed by `watch` when none are given. Default: 10.
    #[serde(default = "default_watch_count")]
    pub watch_count: usize,

    /// Price update channel capacity. Default: 1024.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,

    /// Time allowed for the stream close handshake (ms). Default: 2,000.
    #[serde(default = "default_close_timeout_ms")]
    pub close_timeout_ms: u64,

    /// Base assets ranked ahead of the rest. Unset uses the built-in list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_assets: Option<Vec<String>>,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_rest_url() -> String {
    DEFAULT_REST_URL.to_string()
}

fn default_ws_url() -> String {
    DEFAULT_STREAM_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_rank_limit() -> usize {
    DEFAULT_RANK_LIMIT
}

fn default_watch_count() -> usize {
    10
}

fn default_broadcast_capacity() -> usize {
    1024
}

fn default_close_timeout_ms() -> u64 {
    2_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            ws_url: default_ws_url(),
            request_timeout_ms: default_request_timeout_ms(),
            rank_limit: default_rank_limit(),
            watch_count: default_watch_count(),
            broadcast_capacity: default_broadcast_capacity(),
            close_timeout_ms: default_close_timeout_ms(),
            major_assets: None,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the resolved source.
    ///
    /// A missing file at the default location falls back to defaults; a
    /// missing file named by the CLI or environment is an error.
    pub fn load(source: &ConfigSource) -> AppResult<Self> {
        let path = source.path();
        if path.exists() {
            Self::from_file(path)
        } else if source.is_explicit() {
            Err(AppError::Config(format!(
                "Config file not found: {}",
                path.display()
            )))
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.rest_url.trim().is_empty() {
            return Err(AppError::Config("rest_url must not be empty".to_string()));
        }
        if self.ws_url.trim().is_empty() {
            return Err(AppError::Config("ws_url must not be empty".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(AppError::Config(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        if self.broadcast_capacity == 0 {
            return Err(AppError::Config(
                "broadcast_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Ranking policy: configured majors, or the built-in list.
    pub fn ranker(&self) -> CatalogRanker {
        match &self.major_assets {
            Some(majors) => CatalogRanker::new(
                REFERENCE_QUOTE_ASSET,
                majors.iter().map(|asset| asset.trim().to_ascii_uppercase()),
            ),
            None => CatalogRanker::default(),
        }
    }

    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            base_url: self.ws_url.clone(),
            broadcast_capacity: self.broadcast_capacity,
            close_timeout_ms: self.close_timeout_ms,
        }
    }
}
