//! Shop page route handlers.
//!
//! The shop page is a read-through of the pharmacy backend: the store list
//! is fetched on every page load and the product grid on every store switch.
//! Fetch failures are logged and degrade to whatever the session already
//! holds - the page stays interactive either way.

use apteka_core::StoreName;
use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::Catalog;
use crate::filters;
use crate::models::session::keys;
use crate::routes::cart::{format_price, load_cart};
use crate::state::AppState;

/// Store display data for templates.
#[derive(Clone)]
pub struct StoreView {
    pub name: String,
    pub active: bool,
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image_url: String,
    pub in_cart: bool,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub stores: Vec<StoreView>,
    pub selected: Option<String>,
    pub products: Vec<ProductCardView>,
    pub cart_count: usize,
}

/// Shop content fragment template (for HTMX store switching).
#[derive(Template, WebTemplate)]
#[template(path = "partials/shop_content.html")]
pub struct ShopContentTemplate {
    pub stores: Vec<StoreView>,
    pub selected: Option<String>,
    pub products: Vec<ProductCardView>,
}

/// Store selection form data.
#[derive(Debug, Deserialize)]
pub struct SelectStoreForm {
    pub store: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the catalog selection from the session.
pub(crate) async fn load_catalog(session: &Session) -> Catalog {
    session
        .get::<Catalog>(keys::CATALOG)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the catalog selection in the session.
pub(crate) async fn save_catalog(
    session: &Session,
    catalog: &Catalog,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CATALOG, catalog).await
}

// =============================================================================
// View Assembly
// =============================================================================

fn store_views(catalog: &Catalog) -> Vec<StoreView> {
    catalog
        .stores()
        .iter()
        .map(|store| StoreView {
            name: store.to_string(),
            active: catalog.selected() == Some(store),
        })
        .collect()
}

fn product_views(catalog: &Catalog, cart: &apteka_core::Cart) -> Vec<ProductCardView> {
    catalog
        .products()
        .iter()
        .map(|product| ProductCardView {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: format_price(&product.price),
            image_url: product.image_url.clone(),
            in_cart: cart.contains(&product.id),
        })
        .collect()
}

/// Fetch the product list for the current selection and install it.
///
/// Failures are logged and leave the previously fetched list in place; a
/// stale ticket (selection changed while the fetch was in flight) discards
/// the response.
async fn refresh_products(state: &AppState, catalog: &mut Catalog) {
    let Some(store) = catalog.selected().cloned() else {
        return;
    };
    let ticket = catalog.ticket();

    match state.pharmacy().get_products(&store).await {
        Ok(products) => {
            if let Err(stale) = catalog.apply(ticket, products) {
                tracing::debug!(store = %store, "{stale}");
            }
        }
        Err(e) => {
            tracing::warn!(store = %store, "failed to fetch product list: {e}");
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the shop page.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let mut catalog = load_catalog(&session).await;

    match state.pharmacy().get_stores().await {
        Ok(stores) => catalog.set_stores(stores, &state.config().default_store),
        Err(e) => tracing::warn!("failed to fetch store list: {e}"),
    }

    refresh_products(&state, &mut catalog).await;

    if let Err(e) = save_catalog(&session, &catalog).await {
        tracing::error!("failed to save catalog to session: {e}");
    }

    let cart = load_cart(&session).await;

    ShopTemplate {
        stores: store_views(&catalog),
        selected: catalog.selected().map(ToString::to_string),
        products: product_views(&catalog, &cart),
        cart_count: cart.len(),
    }
}

/// Switch the selected store (HTMX).
///
/// Triggers exactly one product-list fetch per actual change; selecting the
/// store that is already current re-renders without a fetch.
#[instrument(skip(state, session))]
pub async fn select_store(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SelectStoreForm>,
) -> impl IntoResponse {
    let mut catalog = load_catalog(&session).await;

    let store = StoreName::new(form.store);
    if let Some(ticket) = catalog.select(store.clone()) {
        match state.pharmacy().get_products(&store).await {
            Ok(products) => {
                if let Err(stale) = catalog.apply(ticket, products) {
                    tracing::debug!(store = %store, "{stale}");
                }
            }
            Err(e) => {
                tracing::warn!(store = %store, "failed to fetch product list: {e}");
            }
        }
    }

    if let Err(e) = save_catalog(&session, &catalog).await {
        tracing::error!("failed to save catalog to session: {e}");
    }

    let cart = load_cart(&session).await;

    ShopContentTemplate {
        stores: store_views(&catalog),
        selected: catalog.selected().map(ToString::to_string),
        products: product_views(&catalog, &cart),
    }
}
