//! Process configuration.
//!
//! Configuration is read from the environment once at startup and passed
//! into the application as an immutable value; nothing re-reads the
//! environment after boot.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Default article database path.
pub const DEFAULT_DB_PATH: &str = "gazette.redb";

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address, `GAZETTE_ADDR`.
    pub addr: String,
    /// The shared posting secret, `GAZETTE_GOD_PASSWORD`.
    pub god_password: String,
    /// Session cookie signing key, `GAZETTE_SECRET_KEY`.
    pub secret_key: String,
    /// Article database path, `GAZETTE_DB_PATH`.
    pub db_path: PathBuf,
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// `GAZETTE_GOD_PASSWORD` and `GAZETTE_SECRET_KEY` are required;
    /// the bind address and database path fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when a required variable is
    /// absent or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            addr: env::var("GAZETTE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
            god_password: require_var("GAZETTE_GOD_PASSWORD")?,
            secret_key: require_var("GAZETTE_SECRET_KEY")?,
            db_path: env::var("GAZETTE_DB_PATH")
                .map_or_else(|_| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from),
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
