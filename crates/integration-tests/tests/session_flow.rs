//! Whole storefront sessions driven through their command handlers.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::routing::get;
use oud_cart_core::{Locale, ProductId};
use oud_cart_integration_tests::{STATIC_CATALOG, fixture_catalog};
use oud_cart_storefront::catalog::{Catalog, RemoteCatalogClient};
use oud_cart_storefront::coupon::CouponError;
use oud_cart_storefront::render::{Buffer, Format, Renderer, Sinks};
use oud_cart_storefront::session::Session;
use oud_cart_storefront::storage::{FileStore, MemoryStore};
use oud_cart_storefront::wizard::WizardStep;
use rust_decimal::Decimal;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

const KEY: &str = "cart";

/// Buffers standing in for the page's render targets.
#[derive(Clone, Default)]
struct Page {
    header_badge: Buffer,
    floating_badge: Buffer,
    items: Buffer,
    total: Buffer,
    grid: Buffer,
    result: Buffer,
    notice: Buffer,
}

impl Page {
    fn sinks(&self) -> Sinks {
        Sinks {
            badges: vec![self.header_badge.boxed(), self.floating_badge.boxed()],
            cart_items: Some(self.items.boxed()),
            cart_total: Some(self.total.boxed()),
            catalog: Some(self.grid.boxed()),
            recommendation: Some(self.result.boxed()),
            notice: Some(self.notice.boxed()),
        }
    }
}

fn text_renderer(locale: Locale) -> Renderer {
    Renderer::new(locale, Format::Text)
}

async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/shop/api.php")).unwrap()
}

// ============================================================================
// Cart Sessions
// ============================================================================

#[test]
fn test_cart_survives_a_new_session() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::from_static_json(STATIC_CATALOG, Locale::EnUs).unwrap();

    let page = Page::default();
    let mut session = Session::open(
        FileStore::new(dir.path()),
        KEY,
        catalog.clone(),
        text_renderer(Locale::EnUs),
        page.sinks(),
    );
    session.on_add_to_cart(ProductId::new(4)).unwrap();
    session.on_add_to_cart(ProductId::new(1)).unwrap();
    session.on_increment(ProductId::new(1)).unwrap();
    let lines = session.cart().lines().to_vec();

    assert_eq!(page.header_badge.contents(), "3");
    assert_eq!(page.floating_badge.contents(), "3");
    assert_eq!(page.total.contents(), "1,950");
    assert!(page.items.contents().contains("[1] Citrus Bloom x 2 @ 350 = 700"));

    let reopened = Page::default();
    let session = Session::open(
        FileStore::new(dir.path()),
        KEY,
        catalog,
        text_renderer(Locale::EnUs),
        reopened.sinks(),
    );
    assert_eq!(session.cart().lines(), lines.as_slice());
    assert_eq!(reopened.header_badge.contents(), "3");
    assert_eq!(reopened.total.contents(), "1,950");
}

#[test]
fn test_arabic_checkout_with_coupon() {
    let catalog = Catalog::from_static_json(STATIC_CATALOG, Locale::ArEg).unwrap();
    let page = Page::default();
    let mut session = Session::open(
        MemoryStore::new(),
        KEY,
        catalog,
        text_renderer(Locale::ArEg),
        page.sinks(),
    );

    session.on_add_to_cart(ProductId::new(4)).unwrap();
    assert_eq!(page.total.contents(), "١٬٢٥٠");

    assert_eq!(
        session.on_coupon_submit(""),
        Err(CouponError::MissingCode)
    );
    assert_eq!(page.notice.contents(), "ادخلي كود الخصم");

    assert!(session.on_coupon_submit("discount10").is_err());
    assert_eq!(page.notice.contents(), "كود غير صالح");

    assert_eq!(
        session.on_coupon_submit("  DISCOUNT10  "),
        Ok(Decimal::from(1125))
    );
    assert_eq!(page.total.contents(), "١٬١٢٥");
    assert_eq!(page.notice.contents(), "تم تطبيق خصم 10%");

    // Stored cart still carries the full price
    assert_eq!(session.view().grand_total(), Decimal::from(1250));
}

#[test]
fn test_decrement_at_one_unit_empties_cart() {
    let page = Page::default();
    let mut session = Session::open(
        MemoryStore::new(),
        KEY,
        fixture_catalog(),
        text_renderer(Locale::EnUs),
        page.sinks(),
    );
    let id = ProductId::new(2);

    session.on_add_to_cart(id).unwrap();
    session.on_add_to_cart(id).unwrap();
    session.on_quantity_change(id, -1).unwrap();
    assert_eq!(page.total.contents(), "480");

    session.on_decrement(id).unwrap();
    assert!(session.cart().is_empty());
    assert_eq!(page.header_badge.contents(), "0");
    assert_eq!(page.total.contents(), "0");
    assert!(page.items.contents().contains("Your cart is empty"));
}

#[test]
fn test_sessions_do_not_share_state() {
    let first_page = Page::default();
    let second_page = Page::default();
    let mut first = Session::open(
        MemoryStore::new(),
        KEY,
        fixture_catalog(),
        text_renderer(Locale::EnUs),
        first_page.sinks(),
    );
    let second = Session::open(
        MemoryStore::new(),
        KEY,
        fixture_catalog(),
        text_renderer(Locale::EnUs),
        second_page.sinks(),
    );

    first.on_add_to_cart(ProductId::new(3)).unwrap();
    assert_eq!(first.cart().item_count(), 1);
    assert!(second.cart().is_empty());
    assert_eq!(second_page.header_badge.contents(), "0");
}

// ============================================================================
// Wizard
// ============================================================================

#[test]
fn test_wizard_recommendation_goes_to_cart() {
    let page = Page::default();
    let mut session = Session::open(
        MemoryStore::new(),
        KEY,
        fixture_catalog(),
        text_renderer(Locale::EnUs),
        page.sinks(),
    );

    assert_eq!(
        session.on_answer("أحب المناسبات المسائية").unwrap(),
        WizardStep::Question(2)
    );
    session.on_answer("أخشاب دافئة").unwrap();
    assert_eq!(session.on_answer("زهور رومانسية").unwrap(), WizardStep::Result);

    assert_eq!(
        session.wizard().recommended().unwrap().id,
        ProductId::new(4)
    );
    assert!(page.result.contents().contains("Midnight Oud"));
    assert!(page.result.contents().contains("1,250 EGP"));

    assert!(session.on_add_recommended().unwrap());
    assert_eq!(session.cart().line(ProductId::new(4)).unwrap().quantity(), 1);

    session.on_wizard_reset();
    for answer in ["انتعاش", "", ""] {
        session.on_answer(answer).unwrap();
    }
    assert_eq!(
        session.wizard().recommended().unwrap().id,
        ProductId::new(1)
    );
}

// ============================================================================
// Remote Catalog
// ============================================================================

#[tokio::test]
async fn test_remote_catalog_replaces_static_one() {
    let body = r#"[
        {"name": "Amber Night", "image": "amber.jpg", "description": "Smoky amber", "price": 700},
        {"name": "Lime Zest", "image": "lime.jpg", "price": "275"}
    ]"#;
    let url = serve(Router::new().route("/shop/api.php", get(move || async move { body }))).await;

    let page = Page::default();
    let static_catalog = Catalog::from_static_json(STATIC_CATALOG, Locale::EnUs).unwrap();
    let mut session = Session::open(
        MemoryStore::new(),
        KEY,
        static_catalog,
        text_renderer(Locale::EnUs),
        page.sinks(),
    );
    assert!(page.grid.contents().contains("[4] Midnight Oud"));
    session.on_add_to_cart(ProductId::new(4)).unwrap();

    let client = RemoteCatalogClient::new(url, Duration::from_secs(60));
    session.replace_catalog(client.fetch().await.unwrap());

    let grid = page.grid.contents();
    assert!(grid.contains("[1] Amber Night - 700 EGP"));
    assert!(grid.contains("[2] Lime Zest - 275 EGP"));
    assert!(!grid.contains("Midnight Oud"));

    // Lines already in the cart keep their copied data
    assert_eq!(
        session.cart().line(ProductId::new(4)).unwrap().name(),
        "Midnight Oud"
    );

    // Products only in the old catalog can no longer be added
    session.on_add_to_cart(ProductId::new(3)).unwrap();
    assert!(session.cart().line(ProductId::new(3)).is_none());

    session.on_add_to_cart(ProductId::new(2)).unwrap();
    assert_eq!(session.cart().line(ProductId::new(2)).unwrap().name(), "Lime Zest");
}
