//! services/cli/src/error.rs
//!
//! Defines the primary error type for the terminal client.

use crate::config::ConfigError;

/// The primary error type for the `cli` service.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading the terminal or a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
