//! services/snapnote/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::time::Duration;
use tracing::Level;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://snapnote.db?mode=rwc";
pub const DEFAULT_REMOTE_LATENCY_MS: u64 = 2000;
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 1000;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Artificial latency of the simulated remote store.
    pub remote_latency: Duration,
    pub log_level: Level,
    /// How often `watch` polls the database for changes made by other processes.
    pub watch_interval: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let remote_latency = match std::env::var("REMOTE_LATENCY_MS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("REMOTE_LATENCY_MS".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_REMOTE_LATENCY_MS,
        };

        let watch_interval = match std::env::var("WATCH_INTERVAL_MS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::InvalidValue(
                        "WATCH_INTERVAL_MS".to_string(),
                        "must be greater than zero".to_string(),
                    ))
                }
                Ok(ms) => ms,
                Err(e) => {
                    return Err(ConfigError::InvalidValue(
                        "WATCH_INTERVAL_MS".to_string(),
                        e.to_string(),
                    ))
                }
            },
            Err(_) => DEFAULT_WATCH_INTERVAL_MS,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            database_url,
            remote_latency: Duration::from_millis(remote_latency),
            log_level,
            watch_interval: Duration::from_millis(watch_interval),
        })
    }
}
