//! Cart lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// One product's entry in the cart.
///
/// The quantity of a line is always at least one. A line that would drop to
/// zero is removed from the cart by its owner rather than stored at zero, so
/// the only ways to change the quantity here keep it positive.
///
/// The stored shape uses camelCase names; the short `price`, `img` and `qty`
/// names written by older carts are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCartLine")]
pub struct CartLine {
    id: ProductId,
    name: String,
    unit_price: Price,
    image: String,
    quantity: u32,
}

/// Errors that can occur when reading a stored [`CartLine`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartLineError {
    /// Stored quantity is zero, negative, or too large.
    #[error("cart line quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCartLine {
    id: ProductId,
    #[serde(default)]
    name: String,
    #[serde(alias = "price")]
    unit_price: Price,
    #[serde(default, alias = "img")]
    image: String,
    #[serde(alias = "qty")]
    quantity: i64,
}

impl TryFrom<RawCartLine> for CartLine {
    type Error = CartLineError;

    fn try_from(raw: RawCartLine) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(raw.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or(CartLineError::InvalidQuantity(raw.quantity))?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            unit_price: raw.unit_price,
            image: raw.image,
            quantity,
        })
    }
}

impl CartLine {
    /// Create a line holding a single unit.
    #[must_use]
    pub const fn new(id: ProductId, name: String, unit_price: Price, image: String) -> Self {
        Self {
            id,
            name,
            unit_price,
            image,
            quantity: 1,
        }
    }

    /// Create a line with an explicit quantity.
    ///
    /// Returns `None` for a quantity of zero.
    #[must_use]
    pub fn with_quantity(
        id: ProductId,
        name: String,
        unit_price: Price,
        image: String,
        quantity: u32,
    ) -> Option<Self> {
        if quantity == 0 {
            return None;
        }
        Some(Self {
            id,
            name,
            unit_price,
            image,
            quantity,
        })
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price * quantity`, exact.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }

    /// Add one unit.
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Move the quantity by `delta`, never below one.
    pub fn apply_delta(&mut self, delta: i64) {
        let next = i64::from(self.quantity).saturating_add(delta).max(1);
        self.quantity = u32::try_from(next).unwrap_or(u32::MAX);
    }

    /// Fold another line's units into this one.
    pub fn absorb(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }
}
