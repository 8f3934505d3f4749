//! Recommendation wizard.
//!
//! ```bash
//! oud-cart wizard "أحب المناسبات المسائية" "أخشاب دافئة" "زهور" --add
//! ```

use oud_cart_storefront::config::StorefrontConfig;
use oud_cart_storefront::error::AppError;
use oud_cart_storefront::render::Format;
use oud_cart_storefront::wizard::WizardStep;

use super::{Screen, Section, open_session};

/// Answer every question in order, print the recommendation, and optionally
/// add it to the cart.
///
/// # Errors
///
/// Returns `AppError` if the catalog cannot be loaded or the cart not saved.
pub async fn run(
    config: &StorefrontConfig,
    format: Format,
    answers: &[String],
    add: bool,
) -> Result<(), AppError> {
    let screen = Screen::new(config.locale);
    let mut session = open_session(config, format, &screen, false).await?;

    for answer in answers {
        match session.on_answer(answer) {
            Ok(WizardStep::Result) => break,
            Ok(WizardStep::Question(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Extra wizard answer ignored");
                break;
            }
        }
    }

    if session.wizard().recommended().is_none() {
        tracing::warn!("Recommended product is not in the catalog");
        return Ok(());
    }

    if !add {
        screen.print(&[Section::Recommendation]);
        return Ok(());
    }

    let result = session.on_add_recommended();
    screen.print(&[Section::Recommendation, Section::Cart]);
    result?;
    Ok(())
}
