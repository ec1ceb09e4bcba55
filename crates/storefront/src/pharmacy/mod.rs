//! Pharmacy backend API client.
//!
//! # Architecture
//!
//! - Plain REST JSON over `reqwest`; the backend is the source of truth for
//!   stores and products - no local sync, direct API calls on every render
//! - Wire types live in [`types`] and are converted to `apteka-core` domain
//!   types at the boundary
//! - No retries and no request timeouts beyond the client defaults; a failed
//!   fetch degrades to whatever the page was already showing
//!
//! # Endpoints
//!
//! - `GET /stores` - store name list
//! - `GET /products/{store}` - product list for one store
//! - `POST /orders` - order submission; only the status code matters
//!
//! # Example
//!
//! ```rust,ignore
//! use apteka_storefront::pharmacy::PharmacyClient;
//!
//! let client = PharmacyClient::new(&config.pharmacy_api_url);
//!
//! let stores = client.get_stores().await?;
//! let products = client.get_products(&stores[0]).await?;
//! client.submit_order(&order).await?;
//! ```

mod client;
pub mod types;

pub use client::PharmacyClient;
pub use types::{OrderRequest, ProductPayload};

use thiserror::Error;

/// Errors that can occur when talking to the pharmacy backend.
#[derive(Debug, Error)]
pub enum PharmacyError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built from the configured base.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pharmacy_error_display() {
        let err = PharmacyError::Rejected {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: "bad order".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "backend returned 400 Bad Request: bad order"
        );
    }
}
