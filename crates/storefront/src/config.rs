//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PHARMACY_API_URL` - Base URL of the pharmacy backend (e.g., <http://localhost:5555>)
//!
//! ## Optional
//! - `APTEKA_HOST` - Bind address (default: 127.0.0.1)
//! - `APTEKA_PORT` - Listen port (default: 3000)
//! - `APTEKA_DEFAULT_STORE` - Store preselected on first visit (default: `Magazin_1`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use apteka_core::StoreName;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the pharmacy backend
    pub pharmacy_api_url: Url,
    /// Store preselected when the session has not chosen one.
    ///
    /// The configured name may not exist in the fetched store list; catalog
    /// selection falls back to the first fetched store in that case.
    pub default_store: StoreName,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("APTEKA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("APTEKA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("APTEKA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("APTEKA_PORT".to_string(), e.to_string()))?;
        let pharmacy_api_url = parse_base_url(&get_required_env("PHARMACY_API_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("PHARMACY_API_URL".to_string(), e))?;
        let default_store = StoreName::new(get_env_or_default("APTEKA_DEFAULT_STORE", "Magazin_1"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            pharmacy_api_url,
            default_store,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and normalize the backend base URL.
///
/// `Url::join` treats a base without a trailing slash as a file and would
/// replace its last path segment, so the path is normalized to end in `/`.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err("URL cannot be used as a base".to_string());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
