//! services/snapnote/src/error.rs
//!
//! Defines the primary error type for the snapnote service.

use crate::config::ConfigError;
use snapnote_core::ports::PortError;

/// The primary error type for the `snapnote` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core store ports.
    #[error("Store Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization Error: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents a standard Input/Output error (e.g., waiting for Ctrl-C).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The command line could not be understood.
    #[error("{0}")]
    Usage(String),

    /// A note draft was rejected before reaching the repository.
    #[error("{0}")]
    Validation(String),
}
