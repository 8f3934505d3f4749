//! Command implementations.
//!
//! Every command opens one session against the configured store and catalog,
//! runs its handlers, then prints the final state of the sinks it cares about.
//! Sinks are buffered so that intermediate renders (the initial one, the one
//! after a remote catalog arrives) never reach stdout.

pub mod cart;
pub mod catalog;
pub mod wizard;

use std::io::Write;

use oud_cart_core::Locale;
use oud_cart_storefront::catalog::{Catalog, RemoteCatalogClient};
use oud_cart_storefront::config::StorefrontConfig;
use oud_cart_storefront::error::AppError;
use oud_cart_storefront::render::{Buffer, Format, Renderer, Sinks};
use oud_cart_storefront::session::Session;
use oud_cart_storefront::storage::FileStore;

/// Parts of the screen a command can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Catalog,
    Cart,
    Total,
    Recommendation,
    Notice,
}

/// Buffered render targets for one invocation.
pub struct Screen {
    locale: Locale,
    badge: Buffer,
    items: Buffer,
    total: Buffer,
    catalog: Buffer,
    recommendation: Buffer,
    notice: Buffer,
}

impl Screen {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            badge: Buffer::new(),
            items: Buffer::new(),
            total: Buffer::new(),
            catalog: Buffer::new(),
            recommendation: Buffer::new(),
            notice: Buffer::new(),
        }
    }

    /// Sinks for a session; the product grid is only wired up on request.
    fn sinks(&self, with_catalog: bool) -> Sinks {
        Sinks {
            badges: vec![self.badge.boxed()],
            cart_items: Some(self.items.boxed()),
            cart_total: Some(self.total.boxed()),
            catalog: with_catalog.then(|| self.catalog.boxed()),
            recommendation: Some(self.recommendation.boxed()),
            notice: Some(self.notice.boxed()),
        }
    }

    /// Text for the given sections, skipping empty ones.
    pub fn compose(&self, sections: &[Section]) -> String {
        let mut out = String::new();
        for section in sections {
            let block = match section {
                Section::Catalog => self.catalog.contents(),
                Section::Cart => format!(
                    "{}\n{}",
                    self.items.contents().trim_end(),
                    self.summary()
                ),
                Section::Total => self.summary(),
                Section::Recommendation => self.recommendation.contents(),
                Section::Notice => self.notice.contents(),
            };
            let block = block.trim_end();
            if !block.is_empty() {
                out.push_str(block);
                out.push('\n');
            }
        }
        out
    }

    fn summary(&self) -> String {
        format!(
            "Total: {} {}\nItems: {}",
            self.total.contents(),
            self.locale.currency_label(),
            self.badge.contents()
        )
    }

    /// Write the given sections to stdout.
    pub fn print(&self, sections: &[Section]) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(self.compose(sections).as_bytes()) {
            tracing::warn!(error = %e, "Failed to write output");
        }
    }
}

/// Open a session: static catalog first, then the remote one if configured.
///
/// # Errors
///
/// Returns `AppError::Catalog` if the static catalog cannot be loaded. A
/// failed remote fetch is reported and the static catalog is kept.
pub async fn open_session(
    config: &StorefrontConfig,
    format: Format,
    screen: &Screen,
    with_catalog: bool,
) -> Result<Session<FileStore>, AppError> {
    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load_static(path, config.locale)?,
        None => Catalog::new(),
    };

    let mut session = Session::open(
        FileStore::new(config.storage.dir.clone()),
        &config.storage.key,
        catalog,
        Renderer::new(config.locale, format),
        screen.sinks(with_catalog),
    );

    if let Some(url) = &config.catalog.url {
        let client = RemoteCatalogClient::new(url.clone(), config.catalog.cache_ttl);
        match client.fetch().await {
            Ok(remote) => session.replace_catalog(remote),
            Err(e) => {
                tracing::warn!(endpoint = %client.endpoint(), "Keeping static catalog");
                AppError::from(e).report();
            }
        }
    }

    Ok(session)
}
