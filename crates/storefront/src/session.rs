//! Storefront session: command handlers between UI events and the core.
//!
//! A [`Session`] owns the one cart of a page session together with the
//! catalog, the wizard, and the render sinks. UI adapters call the `on_*`
//! handlers; each handler runs to completion, persists any cart change, and
//! re-renders the affected sinks before returning.
//!
//! Unknown products are ignored, missing sinks are skipped, and a failed
//! storage write leaves the cart as it was. The only errors handed back are
//! storage failures and user-facing rejections (coupons, wizard misuse).

use oud_cart_core::{CartLine, Price, ProductId};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::coupon::{self, CouponError};
use crate::error::{AppError, add_breadcrumb};
use crate::render::{Renderer, Sink, Sinks};
use crate::storage::{KeyValueStore, StorageError};
use crate::view::{self, CartView};
use crate::wizard::{Wizard, WizardError, WizardStep};

/// One page session.
pub struct Session<S> {
    cart: CartStore<S>,
    catalog: Catalog,
    wizard: Wizard,
    renderer: Renderer,
    sinks: Sinks,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session over a restored cart and render the initial state.
    pub fn new(cart: CartStore<S>, catalog: Catalog, renderer: Renderer, sinks: Sinks) -> Self {
        let mut session = Self {
            cart,
            catalog,
            wizard: Wizard::new(),
            renderer,
            sinks,
        };
        session.render_catalog();
        session.refresh();
        session
    }

    /// Restore the cart stored under `key` and start a session over it.
    pub fn open(
        storage: S,
        key: &str,
        catalog: Catalog,
        renderer: Renderer,
        sinks: Sinks,
    ) -> Self {
        Self::new(CartStore::load(storage, key), catalog, renderer, sinks)
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Current display model of the cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        view::project(self.cart.lines())
    }

    /// Add-to-cart click on a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn on_add_to_cart(&mut self, id: ProductId) -> Result<(), StorageError> {
        let Some(product) = self.catalog.get(id).cloned() else {
            debug!("Ignoring add for product not in catalog");
            return Ok(());
        };
        let product_id = id.to_string();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
        let result = self.cart.add_product(&product);
        self.refresh();
        result
    }

    /// Add an item that is not in the catalog, merged by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn on_add_manual(
        &mut self,
        name: &str,
        unit_price: Price,
        image: &str,
    ) -> Result<ProductId, StorageError> {
        let result = self.cart.add_manual(name, unit_price, image);
        self.refresh();
        result
    }

    /// Move a line's quantity by `delta`, clamped at one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn on_quantity_change(&mut self, id: ProductId, delta: i64) -> Result<(), StorageError> {
        let result = self.cart.set_quantity(id, delta);
        self.refresh();
        result
    }

    /// "+" button on a checkout row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    pub fn on_increment(&mut self, id: ProductId) -> Result<(), StorageError> {
        self.on_quantity_change(id, 1)
    }

    /// "−" button on a checkout row: one unit less, or drop the line when it
    /// is already at one unit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    pub fn on_decrement(&mut self, id: ProductId) -> Result<(), StorageError> {
        let quantity = self.cart.line(id).map(CartLine::quantity);
        match quantity {
            Some(quantity) if quantity > 1 => self.on_quantity_change(id, -1),
            _ => self.on_remove(id),
        }
    }

    /// Remove button on a checkout row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn on_remove(&mut self, id: ProductId) -> Result<(), StorageError> {
        let product_id = id.to_string();
        add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", product_id.as_str())]));
        let result = self.cart.remove(id);
        self.refresh();
        result
    }

    /// Coupon form submission.
    ///
    /// On success the discounted total replaces the rendered total; the
    /// stored cart is untouched, so the next full render shows the regular
    /// total again. Either way the outcome message goes to the notice sink.
    ///
    /// # Errors
    ///
    /// Returns the `CouponError` describing why the code was rejected.
    #[instrument(skip(self))]
    pub fn on_coupon_submit(&mut self, code: &str) -> Result<Decimal, CouponError> {
        add_breadcrumb("checkout", "Coupon submitted", None);
        let locale = self.renderer.locale();
        let outcome = coupon::evaluate(code, self.view().grand_total());

        let message = match &outcome {
            Ok(discounted) => {
                let total = locale.format_amount(*discounted);
                write_to(self.sinks.cart_total.as_deref_mut(), &total);
                locale.coupon_applied()
            }
            Err(CouponError::MissingCode) => locale.coupon_missing(),
            Err(CouponError::InvalidCode(_)) => locale.coupon_invalid(),
        };
        write_to(self.sinks.notice.as_deref_mut(), message);

        outcome
    }

    /// Wizard answer submission for the current question.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::AlreadyComplete`] after the last question.
    #[instrument(skip(self))]
    pub fn on_answer(&mut self, answer: &str) -> Result<WizardStep, WizardError> {
        let step = self.wizard.submit_answer(answer, &self.catalog)?;
        if step == WizardStep::Result {
            self.render_recommendation();
        }
        Ok(step)
    }

    /// One-click add of the wizard's recommendation.
    ///
    /// Returns `false` (and does nothing) if no product is staged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn on_add_recommended(&mut self) -> Result<bool, StorageError> {
        let Some(product) = self.wizard.recommended().cloned() else {
            debug!("No recommendation staged");
            return Ok(false);
        };
        let result = self.cart.add_product(&product);
        self.refresh();
        result.map(|()| true)
    }

    /// Restart the wizard from the first question.
    pub fn on_wizard_reset(&mut self) {
        self.wizard.reset();
    }

    /// Replace the catalog wholesale, e.g. after a remote fetch completes.
    ///
    /// Lines already in the cart keep their copied data.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        debug!(products = catalog.len(), "Catalog replaced");
        self.catalog = catalog;
        self.render_catalog();
    }

    /// Re-render badges, the checkout table, and the total from the cart.
    pub fn refresh(&mut self) {
        let badge = self.renderer.badge(self.cart.item_count());
        for sink in &mut self.sinks.badges {
            sink.write(&badge);
        }

        // The table and the total are rendered together or not at all
        let (Some(items), Some(total)) = (
            self.sinks.cart_items.as_deref_mut(),
            self.sinks.cart_total.as_deref_mut(),
        ) else {
            return;
        };

        let view = view::project(self.cart.lines());
        match self.renderer.cart_items(&view) {
            Ok(html) => items.write(&html),
            Err(e) => AppError::from(e).report(),
        }
        total.write(&self.renderer.total(&view));
    }

    fn render_catalog(&mut self) {
        let Some(sink) = self.sinks.catalog.as_deref_mut() else {
            return;
        };
        match self.renderer.catalog(&self.catalog) {
            Ok(html) => sink.write(&html),
            Err(e) => AppError::from(e).report(),
        }
    }

    fn render_recommendation(&mut self) {
        let (Some(sink), Some(product)) = (
            self.sinks.recommendation.as_deref_mut(),
            self.wizard.recommended(),
        ) else {
            return;
        };
        match self.renderer.recommendation(product) {
            Ok(html) => sink.write(&html),
            Err(e) => AppError::from(e).report(),
        }
    }
}

impl<S: KeyValueStore> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("lines", &self.cart.lines().len())
            .field("catalog", &self.catalog.len())
            .field("wizard", &self.wizard.step())
            .field("sinks", &self.sinks)
            .finish_non_exhaustive()
    }
}

fn write_to(sink: Option<&mut (dyn Sink + 'static)>, content: &str) {
    if let Some(sink) = sink {
        sink.write(content);
    }
}
