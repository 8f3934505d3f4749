//! Catalog listing.
//!
//! ```bash
//! CATALOG_PATH=catalog.json oud-cart catalog
//! ```

use oud_cart_storefront::config::StorefrontConfig;
use oud_cart_storefront::error::AppError;
use oud_cart_storefront::render::Format;

use super::{Screen, Section, open_session};

/// Print the product grid.
///
/// # Errors
///
/// Returns `AppError::Catalog` if the static catalog cannot be loaded.
pub async fn show(config: &StorefrontConfig, format: Format) -> Result<(), AppError> {
    let screen = Screen::new(config.locale);
    let session = open_session(config, format, &screen, true).await?;

    if session.catalog().is_empty() {
        tracing::warn!("Catalog is empty; set CATALOG_PATH or CATALOG_URL");
    }
    screen.print(&[Section::Catalog]);
    Ok(())
}
