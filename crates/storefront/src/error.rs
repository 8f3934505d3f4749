//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends driving a storefront
//! session. Failures that point at the environment (storage, catalog source,
//! templates) are captured to Sentry when reported; user mistakes such as a
//! bad coupon code never reach this type.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A catalog source could not be read.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The cart could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A fragment failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    /// Whether the session cannot continue after this error.
    ///
    /// A session needs its configuration and its catalog; a failed write or
    /// render only loses that one update.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Catalog(_))
    }

    /// Log the error and capture it to Sentry where it is worth tracking.
    pub fn report(&self) {
        if matches!(self, Self::Config(_)) {
            tracing::error!(error = %self, "Session error");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Session error"
        );
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "4")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(StorageError::InvalidKey("a/b".to_string()));
        assert!(err.to_string().starts_with("Storage error: "));

        let err = AppError::from(CatalogError::Status(503));
        assert!(err.to_string().starts_with("Catalog error: "));
    }

    #[test]
    fn test_fatal_errors() {
        assert!(
            AppError::Config(ConfigError::InvalidEnvVar(
                "CART_LOCALE".to_string(),
                "unsupported".to_string()
            ))
            .is_fatal()
        );
        assert!(AppError::Catalog(CatalogError::Status(500)).is_fatal());
        assert!(!AppError::Storage(StorageError::LockPoisoned).is_fatal());
        assert!(!AppError::from(askama::Error::Fmt).is_fatal());
    }

    #[test]
    fn test_template_error_display() {
        let err = AppError::from(askama::Error::Fmt);
        assert!(err.to_string().starts_with("Template error: "));
        err.report();
    }

    #[test]
    fn test_report_without_client_is_harmless() {
        AppError::Storage(StorageError::LockPoisoned).report();
    }
}
