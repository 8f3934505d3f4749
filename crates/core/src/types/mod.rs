//! Core types for Oud Cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod line;
pub mod locale;
pub mod price;
pub mod product;

pub use id::{ProductId, ProductIdError};
pub use line::{CartLine, CartLineError};
pub use locale::{Locale, LocaleError};
pub use price::{Price, PriceError};
pub use product::ProductRecord;
