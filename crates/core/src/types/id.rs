//! Canonical product identifier.
//!
//! Product ids reach the cart from several places: numeric ids in stored
//! carts, text ids read from catalog markup, and millisecond timestamps for
//! manually added items. All of them are normalized into [`ProductId`] at the
//! boundary so that comparisons never mix representations.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when normalizing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProductIdError {
    /// The input text is empty after trimming.
    #[error("product id cannot be empty")]
    Empty,
    /// The input text is not an integer.
    #[error("product id must be an integer, got {0:?}")]
    NotAnInteger(String),
    /// The input number has a fractional part or is out of range.
    #[error("product id must be a whole number, got {0}")]
    NotWhole(f64),
}

/// A product identifier, shared by catalog records and cart lines.
///
/// Serializes as a plain JSON number. Deserializes from a number or from
/// numeric text, so `4`, `4.0` and `"4"` all denote the same product.
///
/// ## Examples
///
/// ```
/// use oud_cart_core::ProductId;
///
/// let from_text: ProductId = " 4 ".parse().unwrap();
/// assert_eq!(from_text, ProductId::new(4));
/// assert!("four".parse::<ProductId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether this id is the zero id, which never refers to a product.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.0 == 0
    }

    /// Normalize a JSON number into an id.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::NotWhole`] if the number has a fractional
    /// part or does not fit in an i64.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_f64(value: f64) -> Result<Self, ProductIdError> {
        if !value.is_finite() || value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
            return Err(ProductIdError::NotWhole(value));
        }
        Ok(Self(value as i64))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }

        if let Ok(id) = trimmed.parse::<i64>() {
            return Ok(Self(id));
        }

        // "4.0" is still product 4
        trimmed
            .parse::<f64>()
            .map_err(|_| ProductIdError::NotAnInteger(trimmed.to_owned()))
            .and_then(Self::from_f64)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawProductId::deserialize(deserializer)? {
            RawProductId::Integer(id) => Ok(Self(id)),
            RawProductId::Float(value) => Self::from_f64(value).map_err(serde::de::Error::custom),
            RawProductId::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
