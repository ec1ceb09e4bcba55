//! Pharmacy backend HTTP client implementation.

use std::sync::Arc;

use apteka_core::{Product, StoreName};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::types::{OrderRequest, ProductPayload};
use super::PharmacyError;

/// Client for the pharmacy backend REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct PharmacyClient {
    inner: Arc<PharmacyClientInner>,
}

struct PharmacyClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl PharmacyClient {
    /// Create a new client for the given backend base URL.
    ///
    /// The base URL must end in a slash (the config layer normalizes this)
    /// so endpoint paths join onto it instead of replacing its last segment.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        Self {
            inner: Arc::new(PharmacyClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.clone(),
            }),
        }
    }

    /// Fetch the list of store names.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a JSON
    /// array of strings.
    #[instrument(skip(self))]
    pub async fn get_stores(&self) -> Result<Vec<StoreName>, PharmacyError> {
        let url = self.inner.base_url.join("stores")?;
        self.get_json(url).await
    }

    /// Fetch the product list for one store.
    ///
    /// The result replaces any previously fetched list wholesale; nothing is
    /// cached across store switches.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response body does not
    /// parse.
    #[instrument(skip(self), fields(store = %store))]
    pub async fn get_products(&self, store: &StoreName) -> Result<Vec<Product>, PharmacyError> {
        // Store names go into the path; percent-encode so names with spaces
        // or slashes cannot break out of the segment.
        let url = self
            .inner
            .base_url
            .join(&format!("products/{}", urlencoding::encode(store.as_str())))?;
        let payloads: Vec<ProductPayload> = self.get_json(url).await?;
        Ok(payloads.into_iter().map(Product::from).collect())
    }

    /// Submit an order.
    ///
    /// A 2xx status means accepted; anything else is a rejection. The
    /// response body carries no contract and is only captured for
    /// diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// order.
    #[instrument(skip(self, order), fields(lines = order.medicines.len()))]
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<(), PharmacyError> {
        let url = self.inner.base_url.join("orders")?;

        let response = self.inner.client.post(url).json(order).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = truncated_body(response).await;
        tracing::error!(status = %status, body = %body, "order rejected by pharmacy backend");
        Err(PharmacyError::Rejected { status, body })
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PharmacyError> {
        let response = self.inner.client.get(url).send().await?;

        let status = response.status();

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text),
                "pharmacy backend returned non-success status"
            );
            return Err(PharmacyError::Rejected {
                status,
                body: truncate(&response_text),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&response_text),
                    "failed to parse pharmacy backend response"
                );
                Err(PharmacyError::Parse(e))
            }
        }
    }
}

/// Read a response body, truncated for log hygiene.
async fn truncated_body(response: reqwest::Response) -> String {
    response.text().await.map_or_else(|_| String::new(), |t| truncate(&t))
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
