//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_DIR` - Directory of the durable cart store (default: .oud-cart)
//! - `CART_STORAGE_KEY` - Key holding the serialized cart (default: cart)
//! - `CART_LOCALE` - Display locale, `ar-EG` or `en-US` (default: ar-EG)
//! - `CATALOG_PATH` - JSON file with the static product catalog
//! - `CATALOG_URL` - Remote catalog endpoint returning a JSON product list
//! - `CATALOG_CACHE_TTL_SECS` - Cache lifetime for the remote catalog (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use oud_cart_core::Locale;
use thiserror::Error;
use url::Url;

const DEFAULT_STORAGE_DIR: &str = ".oud-cart";
const DEFAULT_STORAGE_KEY: &str = "cart";
const DEFAULT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront session configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Durable cart store settings
    pub storage: StorageConfig,
    /// Product catalog sources
    pub catalog: CatalogConfig,
    /// Locale for formatted numbers and messages
    pub locale: Locale,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Durable cart store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one JSON file per key
    pub dir: PathBuf,
    /// Key under which the cart is stored
    pub key: String,
}

/// Catalog source configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Static catalog records (source A)
    pub path: Option<PathBuf>,
    /// Remote catalog endpoint (source B)
    pub url: Option<Url>,
    /// How long a fetched remote catalog is reused
    pub cache_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let storage = StorageConfig {
            dir: PathBuf::from(env.or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            key: env.or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
        };

        let locale = env
            .or_default("CART_LOCALE", Locale::default().tag())
            .parse::<Locale>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_LOCALE".to_string(), e.to_string()))?;

        let catalog = CatalogConfig::from_env(&env)?;
        let sentry_dsn = env.optional("SENTRY_DSN");

        Ok(Self {
            storage,
            catalog,
            locale,
            sentry_dsn,
        })
    }
}

impl CatalogConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = env
            .optional("CATALOG_URL")
            .map(|raw| Url::parse(&raw))
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_URL".to_string(), e.to_string()))?;

        let ttl_secs = env
            .or_default("CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            path: env.optional("CATALOG_PATH").map(PathBuf::from),
            url,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
