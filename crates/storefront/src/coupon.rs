//! Coupon evaluation.
//!
//! A coupon only changes the total shown to the customer. It never touches
//! the stored cart, so reloading the page shows the undiscounted total again.

use rust_decimal::Decimal;
use thiserror::Error;

/// The one code this store honours: 10% off the cart total.
pub const DISCOUNT_CODE: &str = "DISCOUNT10";

/// Why a coupon was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    /// Nothing was entered (or only whitespace).
    #[error("missing coupon code")]
    MissingCode,

    /// The code is not recognized.
    #[error("invalid coupon code: {0}")]
    InvalidCode(String),
}

/// Apply `code` to `total` and return the discounted total.
///
/// Surrounding whitespace is ignored and the code is case-sensitive. The
/// discounted total is rounded to a whole currency unit, with halves rounded
/// up.
///
/// # Errors
///
/// Returns [`CouponError::MissingCode`] for blank input and
/// [`CouponError::InvalidCode`] for anything other than [`DISCOUNT_CODE`].
///
/// ```
/// use oud_cart_storefront::coupon::{evaluate, CouponError};
/// use rust_decimal::Decimal;
///
/// assert_eq!(evaluate("  DISCOUNT10 ", Decimal::from(100)), Ok(Decimal::from(90)));
/// assert_eq!(evaluate("", Decimal::from(100)), Err(CouponError::MissingCode));
/// ```
pub fn evaluate(code: &str, total: Decimal) -> Result<Decimal, CouponError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(CouponError::MissingCode);
    }
    if code != DISCOUNT_CODE {
        return Err(CouponError::InvalidCode(code.to_string()));
    }

    let discounted = total.saturating_mul(Decimal::new(9, 1));
    Ok(discounted.saturating_add(Decimal::new(5, 1)).floor())
}
