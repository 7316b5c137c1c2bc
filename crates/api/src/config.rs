//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `RETRO_GAMES_DATABASE_PATH` - `SQLite` file shared with the CLI (default: `retro_games.db`)
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 8000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (default: development)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the catalog database file.
pub const DATABASE_PATH_VAR: &str = "RETRO_GAMES_DATABASE_PATH";

/// Database file used when `RETRO_GAMES_DATABASE_PATH` is unset.
pub const DEFAULT_DATABASE_PATH: &str = "retro_games.db";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Path to the catalog `SQLite` file
    pub database_path: PathBuf,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the host or port cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let host = or_default("API_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".to_owned(), e.to_string()))?;
        let port = or_default("API_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".to_owned(), e.to_string()))?;

        let database_path = PathBuf::from(or_default(DATABASE_PATH_VAR, DEFAULT_DATABASE_PATH));
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                DATABASE_PATH_VAR.to_owned(),
                "path must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            database_path,
            host,
            port,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: or_default("SENTRY_ENVIRONMENT", "development"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.database_path, PathBuf::from("retro_games.db"));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8000");
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.sentry_environment, "development");
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("RETRO_GAMES_DATABASE_PATH", "/var/lib/games.db"),
            ("API_HOST", "0.0.0.0"),
            ("API_PORT", "9000"),
            ("SENTRY_DSN", "https://key@sentry.invalid/1"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/games.db"));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_port() {
        let err = ApiConfig::from_lookup(lookup_from(&[("API_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "API_PORT"));
    }

    #[test]
    fn test_invalid_host() {
        let err = ApiConfig::from_lookup(lookup_from(&[("API_HOST", "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "API_HOST"));
    }

    #[test]
    fn test_empty_sentry_dsn_is_disabled() {
        let config = ApiConfig::from_lookup(lookup_from(&[("SENTRY_DSN", "")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
