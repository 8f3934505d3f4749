//! Cart commands.
//!
//! ```bash
//! oud-cart add 4
//! oud-cart inc 4
//! oud-cart dec 4
//! oud-cart remove 4
//! oud-cart add-item --name "Gift wrap" --price 15
//! oud-cart coupon DISCOUNT10
//! ```
//!
//! Each command prints the cart as it stands afterwards. A failed write is
//! returned as `AppError::Storage`, after the (unchanged) cart is printed.

use oud_cart_core::{Price, ProductId};
use oud_cart_storefront::config::StorefrontConfig;
use oud_cart_storefront::error::AppError;
use oud_cart_storefront::render::Format;
use oud_cart_storefront::session::Session;
use oud_cart_storefront::storage::{FileStore, StorageError};

use super::{Screen, Section, open_session};

/// Open a session, apply one cart change, and print the cart.
async fn with_cart<F>(config: &StorefrontConfig, format: Format, change: F) -> Result<(), AppError>
where
    F: FnOnce(&mut Session<FileStore>) -> Result<(), StorageError>,
{
    let screen = Screen::new(config.locale);
    let mut session = open_session(config, format, &screen, false).await?;

    let result = change(&mut session);
    screen.print(&[Section::Cart]);
    result.map_err(AppError::from)
}

/// Print the cart.
///
/// # Errors
///
/// Returns `AppError::Catalog` if the static catalog cannot be loaded.
pub async fn show(config: &StorefrontConfig, format: Format) -> Result<(), AppError> {
    with_cart(config, format, |_| Ok(())).await
}

/// Add a catalog product.
///
/// # Errors
///
/// Returns `AppError` if the catalog cannot be loaded or the cart not saved.
pub async fn add(config: &StorefrontConfig, format: Format, id: ProductId) -> Result<(), AppError> {
    with_cart(config, format, |session| {
        if session.catalog().get(id).is_none() {
            tracing::warn!(%id, "Product is not in the catalog");
        }
        session.on_add_to_cart(id)
    })
    .await
}

/// Add an item by name and price.
///
/// # Errors
///
/// Returns `AppError` if the catalog cannot be loaded or the cart not saved.
pub async fn add_item(
    config: &StorefrontConfig,
    format: Format,
    name: &str,
    price: Price,
    image: &str,
) -> Result<(), AppError> {
    with_cart(config, format, |session| {
        let id = session.on_add_manual(name, price, image)?;
        tracing::info!(%id, name, "Item added");
        Ok(())
    })
    .await
}

/// # Errors
///
/// Returns `AppError` if the catalog cannot be loaded or the cart not saved.
pub async fn increment(
    config: &StorefrontConfig,
    format: Format,
    id: ProductId,
) -> Result<(), AppError> {
    with_cart(config, format, |session| session.on_increment(id)).await
}

/// # Errors
///
/// Returns `AppError` if the catalog cannot be loaded or the cart not saved.
pub async fn decrement(
    config: &StorefrontConfig,
    format: Format,
    id: ProductId,
) -> Result<(), AppError> {
    with_cart(config, format, |session| session.on_decrement(id)).await
}

/// # Errors
///
/// Returns `AppError` if the catalog cannot be loaded or the cart not saved.
pub async fn remove(
    config: &StorefrontConfig,
    format: Format,
    id: ProductId,
) -> Result<(), AppError> {
    with_cart(config, format, |session| session.on_remove(id)).await
}

/// Show the outcome of a coupon code and the resulting total.
///
/// A rejected code is not an error: the message is printed like any other
/// outcome, and the regular total is shown.
///
/// # Errors
///
/// Returns `AppError::Catalog` if the static catalog cannot be loaded.
pub async fn coupon(config: &StorefrontConfig, format: Format, code: &str) -> Result<(), AppError> {
    let screen = Screen::new(config.locale);
    let mut session = open_session(config, format, &screen, false).await?;

    if let Err(e) = session.on_coupon_submit(code) {
        tracing::debug!(error = %e, "Coupon rejected");
    }
    screen.print(&[Section::Notice, Section::Total]);
    Ok(())
}
