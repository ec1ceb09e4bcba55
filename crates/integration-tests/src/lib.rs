//! Integration tests for Apteka.
//!
//! Each test boots the real storefront router against a stub pharmacy
//! backend on an ephemeral port and drives it over HTTP with a
//! cookie-holding client, so the session-held cart behaves exactly as it
//! does for a browser.
//!
//! # Stub backend
//!
//! The stub serves two stores with fixed product lists, counts every
//! request per endpoint, and records each order body it accepts. Tests
//! assert on those counters to prove negative properties ("no network call
//! was made") that a response body alone cannot show.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use apteka_core::StoreName;
use apteka_storefront::config::AppConfig;
use apteka_storefront::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

/// Shared, inspectable state of the stub pharmacy backend.
#[derive(Clone, Default)]
pub struct StubPharmacy {
    store_hits: Arc<AtomicUsize>,
    product_hits: Arc<AtomicUsize>,
    order_hits: Arc<AtomicUsize>,
    orders: Arc<Mutex<Vec<Value>>>,
    reject_orders: Arc<AtomicBool>,
}

impl StubPharmacy {
    /// Number of `GET /stores` requests served.
    #[must_use]
    pub fn store_hits(&self) -> usize {
        self.store_hits.load(Ordering::SeqCst)
    }

    /// Number of `GET /products/{store}` requests served.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.product_hits.load(Ordering::SeqCst)
    }

    /// Number of `POST /orders` requests served.
    #[must_use]
    pub fn order_hits(&self) -> usize {
        self.order_hits.load(Ordering::SeqCst)
    }

    /// Bodies of the orders received, in arrival order.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.orders.lock().expect("orders lock").clone()
    }

    /// Make the stub reject subsequent orders with a 500.
    pub fn reject_orders(&self, reject: bool) {
        self.reject_orders.store(reject, Ordering::SeqCst);
    }

    fn router(self) -> Router {
        Router::new()
            .route("/stores", get(stub_stores))
            .route("/products/{store}", get(stub_products))
            .route("/orders", post(stub_orders))
            .with_state(self)
    }
}

async fn stub_stores(State(stub): State<StubPharmacy>) -> Json<Value> {
    stub.store_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!(["Magazin_1", "Magazin_2"]))
}

async fn stub_products(
    State(stub): State<StubPharmacy>,
    Path(store): Path<String>,
) -> Json<Value> {
    stub.product_hits.fetch_add(1, Ordering::SeqCst);
    let products = match store.as_str() {
        "Magazin_1" => json!([
            {"_id": "a1", "title": "Analgin", "price": 10.5, "imageURL": "http://img.example/a1.png"},
            {"_id": "a2", "title": "Vitamin C", "price": 42, "imageURL": "http://img.example/a2.png"},
        ]),
        "Magazin_2" => json!([
            {"_id": "b1", "title": "Citramon", "price": 7, "imageURL": "http://img.example/b1.png"},
        ]),
        _ => json!([]),
    };
    Json(products)
}

async fn stub_orders(State(stub): State<StubPharmacy>, Json(body): Json<Value>) -> StatusCode {
    stub.order_hits.fetch_add(1, Ordering::SeqCst);
    stub.orders.lock().expect("orders lock").push(body);
    if stub.reject_orders.load(Ordering::SeqCst) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

/// A running storefront wired to a running stub backend.
pub struct TestContext {
    /// Cookie-holding HTTP client (one browser session).
    pub client: reqwest::Client,
    /// Base URL of the storefront under test.
    pub base_url: String,
    /// Handle to the stub backend's counters and recordings.
    pub stub: StubPharmacy,
}

impl TestContext {
    /// Boot the stub backend and the storefront on ephemeral ports.
    ///
    /// # Panics
    ///
    /// Panics on any setup failure; tests cannot proceed without a server.
    pub async fn new() -> Self {
        let stub = StubPharmacy::default();
        let stub_addr = spawn(stub.clone().router()).await;

        let config = AppConfig {
            host: "127.0.0.1".parse().expect("loopback"),
            port: 0,
            pharmacy_api_url: format!("http://{stub_addr}/")
                .parse()
                .expect("stub base URL"),
            default_store: StoreName::new("Magazin_1"),
            sentry_dsn: None,
        };

        let app = apteka_storefront::app(AppState::new(config));
        let app_addr = spawn(app).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("HTTP client");

        Self {
            client,
            base_url: format!("http://{app_addr}"),
            stub,
        }
    }

    /// GET a storefront path and return the response body.
    pub async fn get_text(&self, path: &str) -> String {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request");
        assert!(
            resp.status().is_success(),
            "GET {path} returned {}",
            resp.status()
        );
        resp.text().await.expect("response body")
    }

    /// POST a form to a storefront path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// Load the shop page (which populates the session's catalog) and add a
    /// product to the cart.
    pub async fn add_to_cart(&self, product_id: &str) {
        let _ = self.get_text("/").await;
        let resp = self
            .post_form("/cart/add", &[("product_id", product_id)])
            .await;
        assert!(
            resp.status().is_success(),
            "add to cart returned {}",
            resp.status()
        );
    }
}

/// Serve a router on an ephemeral loopback port.
async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}
