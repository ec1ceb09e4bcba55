//! Apteka Storefront library.
//!
//! This crate provides the storefront functionality as a library, allowing
//! the full router to be booted by integration tests and reused by the
//! binary.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX for interactivity
//! - Askama templates for server-side rendering
//! - Pharmacy backend REST API for stores, products, and orders
//! - In-memory sessions holding the cart, catalog selection, and
//!   submission state (no persistence by design)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod pharmacy;
pub mod routes;
pub mod state;

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Build the complete application router.
///
/// Everything except the Sentry tower layers lives here so integration
/// tests boot exactly what production serves.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(middleware::create_session_layer())
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the pharmacy
/// backend.
async fn health() -> &'static str {
    "ok"
}
