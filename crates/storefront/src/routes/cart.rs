//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself is an `apteka_core::Cart` stored in the session; every
//! handler loads it, applies one engine operation, and saves it back.

use apteka_core::{Cart, CustomerInfo, Price, ProductId};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::session::keys;
use crate::routes::shop::load_catalog;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: usize,
}

impl CartView {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart
                .lines()
                .map(|line| CartItemView {
                    id: line.product.id.to_string(),
                    title: line.product.title.clone(),
                    quantity: line.quantity,
                    price: format_price(&line.product.price),
                    line_price: format_price(&line.line_total()),
                    image_url: line.product.image_url.clone(),
                })
                .collect(),
            total: format_price(&cart.total()),
            item_count: cart.len(),
        }
    }
}

/// Format a price the way the catalog displays it ("10.5 UAH").
///
/// Normalized so decimal arithmetic does not leak trailing zeros into the
/// page ("21.0" for 10.5 x 2).
pub(crate) fn format_price(price: &Price) -> String {
    format!("{} {}", price.amount.normalize(), price.currency_code)
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, empty if none exists yet.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the cart in the session.
pub(crate) async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Get the saved customer form values from the session.
pub(crate) async fn load_customer(session: &Session) -> CustomerInfo {
    session
        .get::<CustomerInfo>(keys::CUSTOMER_INFO)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub customer: CustomerInfo,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    let customer = load_customer(&session).await;

    CartShowTemplate {
        cart: CartView::from_cart(&cart),
        customer,
    }
}

/// Add item to cart (HTMX).
///
/// The product snapshot comes from the session's current catalog - the shop
/// page can only offer products it has fetched. Adding an id that is not in
/// the current product list is a 404, not a blind insert.
///
/// Returns an HTMX trigger to update the cart count badge.
#[instrument(skip(session))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);

    let catalog = load_catalog(&session).await;
    let Some(product) = catalog
        .products()
        .iter()
        .find(|p| p.id == product_id)
        .cloned()
    else {
        return Err(AppError::NotFound(format!(
            "product {product_id} is not in the current catalog"
        )));
    };

    let mut cart = load_cart(&session).await;
    cart.add_item(product);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count: cart.len() },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// The engine clamps quantities at a floor of 1, so the decrement control
/// can never push a line to zero.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    cart.set_quantity(&ProductId::new(form.product_id), form.quantity);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_cart(&cart),
        },
    )
        .into_response())
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    cart.remove_item(&ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_cart(&cart),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartCountTemplate { count: cart.len() }
}

#[cfg(test)]
mod tests {
    use apteka_core::CurrencyCode;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_format_price() {
        let price = Price::new(Decimal::new(105, 1), CurrencyCode::UAH);
        assert_eq!(format_price(&price), "10.5 UAH");
    }

    #[test]
    fn test_format_price_strips_trailing_zeros() {
        let price = Price::new(Decimal::new(105, 1), CurrencyCode::UAH) * 2;
        assert_eq!(format_price(&price), "21 UAH");
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add_item(apteka_core::Product {
            id: ProductId::new("a"),
            title: "Analgin".to_string(),
            price: Price::new(Decimal::from(10), CurrencyCode::UAH),
            image_url: String::new(),
        });
        cart.set_quantity(&ProductId::new("a"), 2);

        let view = CartView::from_cart(&cart);
        assert_eq!(view.item_count, 1);
        assert_eq!(view.total, "20 UAH");
        let item = view.items.first().expect("one item");
        assert_eq!(item.line_price, "20 UAH");
        assert_eq!(item.quantity, 2);
    }
}
