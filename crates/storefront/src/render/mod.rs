//! Rendering of cart, catalog, and wizard output.
//!
//! Views are turned into display strings here (locale-aware numbers,
//! localized labels) and then into HTML fragments or plain text through
//! Askama templates. Nothing in this module mutates session state.

mod sink;

pub use sink::{Buffer, Sink, Sinks};

use askama::Template;
use oud_cart_core::{Locale, ProductRecord};

use crate::catalog::Catalog;
use crate::view::{CartView, LineView};

/// Output flavour for rendered fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// HTML fragments for a page.
    #[default]
    Html,
    /// Plain text for a terminal.
    Text,
}

/// A checkout table row, formatted for display.
#[derive(Debug, Clone)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

impl RowView {
    fn new(line: &LineView, locale: Locale) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            unit_price: locale.format_amount(line.unit_price),
            subtotal: locale.format_amount(line.subtotal),
        }
    }
}

/// A catalog card, formatted for display.
#[derive(Debug, Clone)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: String,
}

impl CardView {
    fn new(product: &ProductRecord, locale: Locale) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
            price: locale.format_price(product.unit_price.amount()),
        }
    }
}

/// Checkout table body.
#[derive(Template)]
#[template(path = "cart/items.html")]
struct CartItemsHtml<'a> {
    rows: &'a [RowView],
    empty_message: &'a str,
    remove_label: &'a str,
}

#[derive(Template)]
#[template(path = "cart/items.txt")]
struct CartItemsText<'a> {
    rows: &'a [RowView],
    empty_message: &'a str,
}

/// Product grid.
#[derive(Template)]
#[template(path = "catalog/grid.html")]
struct CatalogGridHtml<'a> {
    cards: &'a [CardView],
}

#[derive(Template)]
#[template(path = "catalog/grid.txt")]
struct CatalogGridText<'a> {
    cards: &'a [CardView],
}

/// Wizard result panel.
#[derive(Template)]
#[template(path = "wizard/result.html")]
struct RecommendationHtml<'a> {
    card: &'a CardView,
}

#[derive(Template)]
#[template(path = "wizard/result.txt")]
struct RecommendationText<'a> {
    card: &'a CardView,
}

/// Renders views into display strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    locale: Locale,
    format: Format,
}

impl Renderer {
    #[must_use]
    pub const fn new(locale: Locale, format: Format) -> Self {
        Self { locale, format }
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Badge value: the total number of items in the cart.
    #[must_use]
    pub fn badge(&self, item_count: u64) -> String {
        item_count.to_string()
    }

    /// Formatted grand total (undiscounted).
    #[must_use]
    pub fn total(&self, view: &CartView) -> String {
        self.locale.format_amount(view.grand_total())
    }

    /// Checkout table body, or the empty-cart row for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `askama::Error` if the template fails to render.
    pub fn cart_items(&self, view: &CartView) -> askama::Result<String> {
        let rows: Vec<RowView> = view
            .lines()
            .iter()
            .map(|line| RowView::new(line, self.locale))
            .collect();
        let empty_message = self.locale.empty_cart();

        match self.format {
            Format::Html => CartItemsHtml {
                rows: &rows,
                empty_message,
                remove_label: self.locale.remove_label(),
            }
            .render(),
            Format::Text => CartItemsText {
                rows: &rows,
                empty_message,
            }
            .render(),
        }
    }

    /// Product grid for the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `askama::Error` if the template fails to render.
    pub fn catalog(&self, catalog: &Catalog) -> askama::Result<String> {
        let cards: Vec<CardView> = catalog
            .iter()
            .map(|product| CardView::new(product, self.locale))
            .collect();

        match self.format {
            Format::Html => CatalogGridHtml { cards: &cards }.render(),
            Format::Text => CatalogGridText { cards: &cards }.render(),
        }
    }

    /// Wizard result panel for a staged product.
    ///
    /// # Errors
    ///
    /// Returns `askama::Error` if the template fails to render.
    pub fn recommendation(&self, product: &ProductRecord) -> askama::Result<String> {
        let card = CardView::new(product, self.locale);

        match self.format {
            Format::Html => RecommendationHtml { card: &card }.render(),
            Format::Text => RecommendationText { card: &card }.render(),
        }
    }
}
