//! Display locales.
//!
//! Formatting here is display-only. Stored prices and quantities are never
//! rounded or rewritten by anything in this module.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Locale`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unsupported locale: {0}")]
    Unsupported(String),
}

/// Locale used for number formatting and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Locale {
    /// Arabic (Egypt): Arabic-Indic digits, `٬` grouping, `٫` decimal mark.
    #[default]
    #[serde(rename = "ar-EG")]
    ArEg,
    /// English (United States).
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    /// Fraction digits kept when formatting an amount.
    const MAX_FRACTION_DIGITS: u32 = 3;

    /// Format an amount with grouping and this locale's digits.
    ///
    /// At most three fraction digits are shown (midpoints round away from
    /// zero) and trailing zeros are dropped, so `1250` renders as `١٬٢٥٠`
    /// in `ar-EG` and `1,250` in `en-US`.
    ///
    /// ```
    /// use oud_cart_core::Locale;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Locale::EnUs.format_amount(Decimal::new(1_234_565, 1)), "123,456.5");
    /// assert_eq!(Locale::ArEg.format_amount(Decimal::from(1250)), "١٬٢٥٠");
    /// ```
    #[must_use]
    pub fn format_amount(&self, amount: Decimal) -> String {
        let rounded = amount
            .round_dp_with_strategy(Self::MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let text = rounded.abs().to_string();
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

        let mut out = String::with_capacity(text.len() * 3);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }

        let len = whole.len();
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(self.group_separator());
            }
            out.push(self.digit(digit));
        }

        if !fraction.is_empty() {
            out.push_str(self.decimal_separator());
            out.extend(fraction.chars().map(|d| self.digit(d)));
        }

        out
    }

    /// Format a price followed by the currency label.
    #[must_use]
    pub fn format_price(&self, amount: Decimal) -> String {
        format!("{} {}", self.format_amount(amount), self.currency_label())
    }

    const fn group_separator(self) -> &'static str {
        match self {
            Self::ArEg => "\u{066C}",
            Self::EnUs => ",",
        }
    }

    const fn decimal_separator(self) -> &'static str {
        match self {
            Self::ArEg => "\u{066B}",
            Self::EnUs => ".",
        }
    }

    fn digit(self, ascii: char) -> char {
        match self {
            Self::EnUs => ascii,
            Self::ArEg => ascii
                .to_digit(10)
                .and_then(|d| char::from_u32(0x0660 + d))
                .unwrap_or(ascii),
        }
    }

    /// Short currency label shown after prices.
    #[must_use]
    pub const fn currency_label(&self) -> &'static str {
        match self {
            Self::ArEg => "ج.م",
            Self::EnUs => "EGP",
        }
    }

    /// Message shown in place of the checkout table when the cart is empty.
    #[must_use]
    pub const fn empty_cart(&self) -> &'static str {
        match self {
            Self::ArEg => "سلة فارغة",
            Self::EnUs => "Your cart is empty",
        }
    }

    /// Label for the remove-line control.
    #[must_use]
    pub const fn remove_label(&self) -> &'static str {
        match self {
            Self::ArEg => "حذف",
            Self::EnUs => "Remove",
        }
    }

    /// Name used for catalog records that carry none.
    #[must_use]
    pub const fn default_product_name(&self) -> &'static str {
        match self {
            Self::ArEg => "منتج",
            Self::EnUs => "Product",
        }
    }

    #[must_use]
    pub const fn coupon_missing(&self) -> &'static str {
        match self {
            Self::ArEg => "ادخلي كود الخصم",
            Self::EnUs => "Please enter a discount code",
        }
    }

    #[must_use]
    pub const fn coupon_invalid(&self) -> &'static str {
        match self {
            Self::ArEg => "كود غير صالح",
            Self::EnUs => "Invalid code",
        }
    }

    #[must_use]
    pub const fn coupon_applied(&self) -> &'static str {
        match self {
            Self::ArEg => "تم تطبيق خصم 10%",
            Self::EnUs => "10% discount applied",
        }
    }

    /// BCP 47 tag for this locale.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::ArEg => "ar-EG",
            Self::EnUs => "en-US",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "ar-eg" | "ar" => Ok(Self::ArEg),
            "en-us" | "en" => Ok(Self::EnUs),
            _ => Err(LocaleError::Unsupported(s.to_owned())),
        }
    }
}
