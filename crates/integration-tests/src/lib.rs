//! Integration tests for Oud Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p oud-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Cart store invariants over a durable store
//! - `session_flow` - Whole sessions: catalog, cart, coupon, wizard
//!
//! Everything runs against temporary directories and an in-process HTTP stub,
//! so no external services are needed.

use oud_cart_core::{Price, ProductId, ProductRecord};
use oud_cart_storefront::catalog::Catalog;

/// Static catalog document in the shape the storefront markup exposes.
pub const STATIC_CATALOG: &str = r#"[
    {"id": "1", "price": "350 ج.م", "img": "citrus.jpg", "name": "Citrus Bloom", "desc": "Bright and fresh"},
    {"id": "2", "price": "480", "img": "cedar.jpg", "name": "Cedar Ember", "desc": "Warm woods"},
    {"id": "3", "price": "520.50", "img": "rose.jpg", "title": "Velvet Rose", "desc": "Romantic florals"},
    {"id": "4", "price": "1,250 ج.م", "img": "midnight.jpg", "name": "Midnight Oud", "desc": "For evenings out"}
]"#;

/// A product record with a whole-unit price.
#[must_use]
pub fn product(id: i64, name: &str, price: u64) -> ProductRecord {
    ProductRecord {
        id: ProductId::new(id),
        name: name.to_string(),
        unit_price: Price::from_units(price),
        image: format!("{id}.jpg"),
        description: String::new(),
    }
}

/// The four-product catalog used across tests.
#[must_use]
pub fn fixture_catalog() -> Catalog {
    Catalog::from_records([
        product(1, "Citrus Bloom", 350),
        product(2, "Cedar Ember", 480),
        product(3, "Velvet Rose", 520),
        product(4, "Midnight Oud", 1250),
    ])
}
