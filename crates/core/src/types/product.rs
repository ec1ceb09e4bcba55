//! Catalog product snapshot.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as fetched from the catalog.
///
/// Immutable snapshot owned by the catalog fetch result; the cart copies it
/// into a line item so a line survives the catalog being replaced on the next
/// store switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend-assigned identifier, unique within the catalog.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image reference, passed through to the page untouched.
    pub image_url: String,
}
