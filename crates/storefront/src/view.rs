//! Totals and display projection of the cart.
//!
//! [`project`] is a pure function of the cart lines. It computes exact
//! subtotals and the grand total; turning those into display strings is left
//! to the renderer, so formatting never feeds back into stored values.

use oud_cart_core::{CartLine, ProductId};
use rust_decimal::Decimal;

/// One checkout table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl From<&CartLine> for LineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id(),
            name: line.name().to_string(),
            image: line.image().to_string(),
            quantity: line.quantity(),
            unit_price: line.unit_price().amount(),
            subtotal: line.subtotal(),
        }
    }
}

/// Display model of the cart.
///
/// An empty cart is its own variant so that consumers show the "cart is
/// empty" message instead of an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartView {
    Empty,
    Filled {
        lines: Vec<LineView>,
        grand_total: Decimal,
    },
}

impl CartView {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Rows of the checkout table; none for an empty cart.
    #[must_use]
    pub fn lines(&self) -> &[LineView] {
        match self {
            Self::Empty => &[],
            Self::Filled { lines, .. } => lines,
        }
    }

    /// Sum of all subtotals; zero for an empty cart.
    #[must_use]
    pub const fn grand_total(&self) -> Decimal {
        match self {
            Self::Empty => Decimal::ZERO,
            Self::Filled { grand_total, .. } => *grand_total,
        }
    }
}

/// Project cart lines into their display model.
///
/// Amounts past [`Decimal::MAX`] saturate there.
#[must_use]
pub fn project(lines: &[CartLine]) -> CartView {
    if lines.is_empty() {
        return CartView::Empty;
    }

    let lines: Vec<LineView> = lines.iter().map(LineView::from).collect();
    let grand_total = lines
        .iter()
        .fold(Decimal::ZERO, |total, line| total.saturating_add(line.subtotal));
    CartView::Filled { lines, grand_total }
}
