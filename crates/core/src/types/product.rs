//! Catalog product records.

use serde::{Deserialize, Serialize};

use crate::{CartLine, Price, ProductId};

/// A purchasable product as listed in the catalog.
///
/// Records are immutable once loaded. Consumers such as the cart and the
/// recommendation wizard keep their own copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Price,
    /// Image reference (URL or path).
    #[serde(default)]
    pub image: String,
    /// Short marketing description.
    #[serde(default)]
    pub description: String,
}

impl ProductRecord {
    /// A fresh cart line for one unit of this product.
    #[must_use]
    pub fn to_cart_line(&self) -> CartLine {
        CartLine::new(self.id, self.name.clone(), self.unit_price, self.image.clone())
    }
}
