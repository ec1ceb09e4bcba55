//! Wire types for the pharmacy backend.
//!
//! The backend's field names (`_id`, `imageURL`) and its double-encoded
//! `medicines` field are quirks of the deployed service; they are confined
//! to this module and converted to `apteka-core` domain types at the edge.

use apteka_core::{CurrencyCode, CustomerInfo, OrderLine, Price, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub price: Decimal,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl From<ProductPayload> for Product {
    fn from(payload: ProductPayload) -> Self {
        Self {
            id: ProductId::new(payload.id),
            title: payload.title,
            // The catalog quotes prices as bare numbers in hryvnias.
            price: Price::new(payload.price, CurrencyCode::UAH),
            image_url: payload.image_url,
        }
    }
}

/// The `/orders` request body.
///
/// `medicines` is double-encoded: the backend expects the line-item list as
/// a JSON *string* inside the outer JSON body, not as a nested array. The
/// [`medicines_wire`] serde module performs that encoding so the rest of the
/// crate can work with `Vec<OrderLine>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(with = "medicines_wire")]
    pub medicines: Vec<OrderLine>,
}

impl OrderRequest {
    /// Pair the customer fields with the projected order lines.
    #[must_use]
    pub fn new(customer: CustomerInfo, medicines: Vec<OrderLine>) -> Self {
        Self {
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            medicines,
        }
    }
}

/// Serde adapter for the double-encoded `medicines` field.
///
/// Serializes `Vec<OrderLine>` to its JSON text and emits that text as a
/// string value; deserialization reverses the two steps.
mod medicines_wire {
    use apteka_core::OrderLine;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        medicines: &[OrderLine],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded = serde_json::to_string(medicines).map_err(S::Error::custom)?;
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<OrderLine>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        serde_json::from_str(&encoded).map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn request() -> OrderRequest {
        OrderRequest {
            name: "Olena K".to_string(),
            email: "olena@example.com".to_string(),
            phone: "+380501234567".to_string(),
            address: "Kyiv".to_string(),
            medicines: vec![
                OrderLine {
                    id: ProductId::new("a1"),
                    qty: 2,
                },
                OrderLine {
                    id: ProductId::new("b2"),
                    qty: 1,
                },
            ],
        }
    }

    #[test]
    fn test_medicines_is_a_json_string_not_an_array() {
        let body: Value = serde_json::to_value(request()).unwrap();

        let medicines = body.get("medicines").unwrap();
        let encoded = medicines.as_str().expect("medicines must be a string");

        // The embedded text itself parses back to the line list.
        let lines: Vec<OrderLine> = serde_json::from_str(encoded).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.first().unwrap().id.as_str(), "a1");
        assert_eq!(lines.first().unwrap().qty, 2);
    }

    #[test]
    fn test_customer_fields_are_flat_siblings() {
        let body: Value = serde_json::to_value(request()).unwrap();

        assert_eq!(body.get("name").unwrap(), "Olena K");
        assert_eq!(body.get("email").unwrap(), "olena@example.com");
        assert_eq!(body.get("phone").unwrap(), "+380501234567");
        assert_eq!(body.get("address").unwrap(), "Kyiv");
    }

    #[test]
    fn test_order_request_roundtrip() {
        let original = request();
        let json = serde_json::to_string(&original).unwrap();
        let back: OrderRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_product_payload_wire_field_names() {
        let payload: ProductPayload = serde_json::from_str(
            r#"{"_id": "6502beef", "title": "Analgin", "price": 10.5, "imageURL": "http://img/a.png"}"#,
        )
        .unwrap();

        let product = Product::from(payload);
        assert_eq!(product.id.as_str(), "6502beef");
        assert_eq!(product.title, "Analgin");
        assert_eq!(product.price.amount, Decimal::new(105, 1));
        assert_eq!(product.price.currency_code, CurrencyCode::UAH);
        assert_eq!(product.image_url, "http://img/a.png");
    }

    #[test]
    fn test_product_payload_accepts_integer_price() {
        let payload: ProductPayload = serde_json::from_str(
            r#"{"_id": "x", "title": "Vitamin C", "price": 42, "imageURL": ""}"#,
        )
        .unwrap();
        assert_eq!(payload.price, Decimal::from(42));
    }
}
