//! services/cli/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which clipboard tool the clipboard adapter shells out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    /// Wayland when `WAYLAND_DISPLAY` is set, X11 otherwise.
    Auto,
    Wayland,
    X11,
}

impl FromStr for ClipboardBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "wayland" => Ok(Self::Wayland),
            "x11" => Ok(Self::X11),
            other => Err(format!("'{other}' is not one of auto, wayland, x11")),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: reqwest::Url,
    pub autosave: bool,
    pub autosave_delay: Duration,
    pub http_timeout: Duration,
    pub clipboard: ClipboardBackend,
    pub log_level: Level,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url_str =
            lookup("MEMOPAD_API_URL").unwrap_or_else(|| "http://localhost:8080/api".to_string());
        let api_url = reqwest::Url::parse(&api_url_str)
            .map_err(|e| ConfigError::InvalidValue("MEMOPAD_API_URL".to_string(), e.to_string()))?;

        let autosave = parse_or(&lookup, "MEMOPAD_AUTOSAVE", true)?;
        let autosave_delay =
            Duration::from_millis(parse_or(&lookup, "MEMOPAD_AUTOSAVE_DELAY_MS", 2000u64)?);
        let http_timeout =
            Duration::from_secs(parse_or(&lookup, "MEMOPAD_HTTP_TIMEOUT_SECS", 30u64)?);
        let clipboard = parse_or(&lookup, "MEMOPAD_CLIPBOARD", ClipboardBackend::Auto)?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_url,
            autosave,
            autosave_delay,
            http_timeout,
            clipboard,
            log_level,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
    }
}
