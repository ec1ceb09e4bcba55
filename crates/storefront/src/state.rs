//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::pharmacy::PharmacyClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the pharmacy backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pharmacy: PharmacyClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let pharmacy = PharmacyClient::new(&config.pharmacy_api_url);

        Self {
            inner: Arc::new(AppStateInner { config, pharmacy }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the pharmacy backend client.
    #[must_use]
    pub fn pharmacy(&self) -> &PharmacyClient {
        &self.inner.pharmacy
    }
}
