//! Static catalog records embedded with the page.
//!
//! Each record mirrors what a product card exposes: its data attributes
//! (`id`, `price`, `img`, `name`) with the visible card text (`priceLabel`,
//! `title`, `description`) as a fallback when an attribute is missing.
//! Prices are free text and go through [`Price::from_text`].

use std::path::Path;

use oud_cart_core::{Locale, Price, ProductId, ProductRecord};
use serde::Deserialize;
use tracing::info;

use super::{Catalog, CatalogError};

/// One product card as embedded in the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticRecord {
    pub id: ProductId,
    #[serde(default)]
    pub price: Option<PriceText>,
    #[serde(default)]
    pub price_label: Option<String>,
    #[serde(default, alias = "img")]
    pub image: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "desc")]
    pub description: Option<String>,
}

/// A price attribute, written either as a number or as display text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceText {
    Number(serde_json::Number),
    Text(String),
}

impl PriceText {
    pub(crate) fn to_price(&self) -> Price {
        match self {
            Self::Number(n) => Price::from_text(&n.to_string()),
            Self::Text(text) => Price::from_text(text),
        }
    }
}

impl StaticRecord {
    /// Resolve attribute/text fallbacks into a catalog record.
    #[must_use]
    pub fn into_product(self, locale: Locale) -> ProductRecord {
        let unit_price = match (&self.price, &self.price_label) {
            (Some(price), _) => price.to_price(),
            (None, Some(label)) => Price::from_text(label),
            (None, None) => Price::ZERO,
        };
        let name = [self.name, self.title]
            .into_iter()
            .flatten()
            .map(|name| name.trim().to_string())
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| locale.default_product_name().to_string());

        ProductRecord {
            id: self.id,
            name,
            unit_price,
            image: self.image.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        }
    }
}

impl Catalog {
    /// Parse a JSON list of [`StaticRecord`]s.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the document is not a list of records.
    pub fn from_static_json(json: &str, locale: Locale) -> Result<Self, CatalogError> {
        let records: Vec<StaticRecord> = serde_json::from_str(json)?;
        Ok(records
            .into_iter()
            .map(|record| record.into_product(locale))
            .collect())
    }

    /// Read and parse a static catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn load_static(path: &Path, locale: Locale) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_static_json(&json, locale)?;
        info!(path = %path.display(), products = catalog.len(), "Static catalog loaded");
        Ok(catalog)
    }
}
