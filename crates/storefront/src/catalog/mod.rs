//! Product catalog.
//!
//! The catalog maps product ids to records in the order the records were
//! loaded. It is read-only for the rest of the session: the cart and the
//! wizard copy what they need out of it. Two sources fill it:
//!
//! - [`markup`] - static records embedded with the page (source A)
//! - [`remote`] - a one-shot JSON fetch that replaces the catalog wholesale
//!   (source B)
//!
//! Lookups of unknown ids return `None`; callers treat that as "nothing to
//! do" rather than as an error, since the catalog may legitimately be empty
//! when the cart or wizard is first used.

pub mod markup;
pub mod remote;

use indexmap::IndexMap;
use oud_cart_core::{ProductId, ProductRecord};
use thiserror::Error;

pub use markup::StaticRecord;
pub use remote::{RemoteCatalogClient, RemoteRecord};

/// Errors that can occur when loading a catalog source.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog file failed.
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog document is not valid JSON of the expected shape.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// HTTP request failed.
    #[error("catalog HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("catalog endpoint returned HTTP {0}")]
    Status(u16),
}

/// Immutable-for-the-session mapping from product id to product record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: IndexMap<ProductId, ProductRecord>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records. A repeated id keeps its first position
    /// and takes the later record's data.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        let mut products = IndexMap::new();
        for record in records {
            products.insert(record.id, record);
        }
        Self { products }
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&ProductRecord> {
        self.products.get(&id)
    }

    /// Id of the first product in load order.
    #[must_use]
    pub fn first_id(&self) -> Option<ProductId> {
        self.products.keys().next().copied()
    }

    /// Records in load order.
    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.products.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<ProductRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}
