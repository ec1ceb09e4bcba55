//! The cart engine.
//!
//! An in-memory, insertion-ordered collection of line items keyed by product
//! id. The engine owns every mutation rule; it knows nothing about rendering
//! or sessions, which lets the invariants be tested without a running server.
//!
//! # Invariants
//!
//! - No two line items share a [`ProductId`].
//! - Every line item has `quantity >= 1`.
//! - Iteration order is insertion order.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// Minimum quantity a line item can hold.
const MIN_QUANTITY: u32 = 1;

/// One product-quantity pair in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    /// Units of the product, always at least 1.
    pub quantity: u32,
}

impl LineItem {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// The shopping cart: an ordered sequence of unique line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a product to the cart.
    ///
    /// If a line item for the product already exists its quantity is
    /// incremented by 1; otherwise a new line item with quantity 1 is
    /// appended. Repeated adds never create duplicate lines.
    pub fn add_item(&mut self, product: Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity += 1;
        } else {
            self.lines.push(LineItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Replace the quantity of the matching line item.
    ///
    /// Values below 1 are clamped to 1, so decrementing a line at quantity 1
    /// leaves it at 1. Increments have no ceiling. No-op if the id is not in
    /// the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity.max(MIN_QUANTITY);
        }
    }

    /// Delete the matching line item. No-op (not an error) if absent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product.id != product_id);
    }

    /// Whether a product is already in the cart.
    ///
    /// The shop page uses this to disable duplicate "add" buttons.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lines.iter().any(|line| &line.product.id == product_id)
    }

    /// Sum of `price x quantity` over all line items.
    ///
    /// Recomputed on demand; carts are small enough that caching would buy
    /// nothing and cost an invariant on every mutation.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    /// Number of line items (not unit quantities).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line items in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.lines
            .iter_mut()
            .find(|line| &line.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::CurrencyCode;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::new(Decimal::from(price), CurrencyCode::UAH),
            image_url: format!("https://img.example/{id}.jpg"),
        }
    }

    #[test]
    fn test_adding_same_product_n_times_yields_one_line() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add_item(product("a", 10));
        }

        assert_eq!(cart.len(), 1);
        let line = cart.lines().next().expect("one line");
        assert_eq!(line.quantity, 5);
    }

    #[test]
    fn test_distinct_products_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));
        cart.add_item(product("b", 5));
        cart.add_item(product("a", 10));

        let ids: Vec<&str> = cart.lines().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_set_quantity_replaces_value() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));

        cart.set_quantity(&ProductId::new("a"), 7);
        assert_eq!(cart.lines().next().expect("line").quantity, 7);
    }

    #[test]
    fn test_set_quantity_never_goes_below_one() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));

        cart.set_quantity(&ProductId::new("a"), 0);
        assert_eq!(cart.lines().next().expect("line").quantity, 1);
    }

    #[test]
    fn test_set_quantity_has_no_ceiling() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));

        cart.set_quantity(&ProductId::new("a"), u32::MAX);
        assert_eq!(cart.lines().next().expect("line").quantity, u32::MAX);
    }

    #[test]
    fn test_set_quantity_on_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));

        let before = cart.clone();
        cart.set_quantity(&ProductId::new("missing"), 3);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));
        cart.add_item(product("b", 5));

        cart.remove_item(&ProductId::new("a"));
        assert_eq!(cart.len(), 1);
        assert!(!cart.contains(&ProductId::new("a")));
        assert!(cart.contains(&ProductId::new("b")));
    }

    #[test]
    fn test_remove_missing_id_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));

        let before = cart.clone();
        cart.remove_item(&ProductId::new("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_total() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));
        cart.set_quantity(&ProductId::new("a"), 2);
        cart.add_item(product("b", 5));
        cart.set_quantity(&ProductId::new("b"), 3);

        assert_eq!(cart.total().amount, Decimal::from(35));
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        assert_eq!(Cart::new().total(), Price::zero());
    }

    #[test]
    fn test_fractional_prices_total_exactly() {
        let mut cart = Cart::new();
        let mut item = product("a", 0);
        item.price = Price::uah(Decimal::new(105, 1)); // 10.5
        cart.add_item(item);
        cart.set_quantity(&ProductId::new("a"), 3);

        assert_eq!(cart.total().amount, Decimal::new(315, 1)); // 31.5
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add_item(product("a", 10));
        cart.add_item(product("b", 5));

        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
