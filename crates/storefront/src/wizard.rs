//! Recommendation wizard.
//!
//! Three questions, one free-text answer each, then a result. Answers are
//! matched against keyword groups in a fixed priority order to pick a
//! catalog product, which is staged for a one-click add to the cart.
//!
//! ```text
//! Question(1) --answer--> Question(2) --answer--> Question(3) --answer--> Result
//!      ^                                                                    |
//!      +-------------------------------- reset ------------------------------+
//! ```

use core::fmt;

use oud_cart_core::{ProductId, ProductRecord};
use thiserror::Error;
use tracing::debug;

use crate::catalog::Catalog;

/// Number of questions before the result.
pub const QUESTION_COUNT: u8 = 3;

/// Product recommended when the catalog is empty and nothing matched.
const FALLBACK_PRODUCT: ProductId = ProductId::new(1);

/// Keyword groups in priority order; the first group with any hit wins.
///
/// Arabic keywords are matched as substrings of the joined answers, so each
/// group lists the common word forms (singular, plural, adjective).
const KEYWORD_RULES: &[(&[&str], ProductId)] = &[
    // Evening and occasions
    (
        &[
            "ليل", "مسائي", "مساء", "سهرة", "مناسبة", "مناسبات", "evening", "night",
            "occasion",
        ],
        ProductId::new(4),
    ),
    // Woods and warmth
    (
        &["أخشاب", "خشب", "دفء", "دافئ", "wood", "warm"],
        ProductId::new(2),
    ),
    // Flowers and romance
    (
        &[
            "زهور", "زهر", "ورود", "رومانسية", "رومانسي", "floral", "flower", "rose",
            "romantic",
        ],
        ProductId::new(3),
    ),
    // Freshness and fruit
    (
        &[
            "انتعاش", "منعش", "فواكه", "فاكهة", "fresh", "fruit", "citrus",
        ],
        ProductId::new(1),
    ),
];

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    /// Waiting for the answer to question `n` (1-based).
    Question(u8),
    /// All questions answered.
    Result,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question(n) => write!(f, "step {n}"),
            Self::Result => write!(f, "result"),
        }
    }
}

/// Errors from driving the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// An answer arrived after the last question; call `reset` first.
    #[error("wizard already finished, reset it to start over")]
    AlreadyComplete,
}

/// One user's pass through the wizard.
///
/// Not persisted: a new session starts a new wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    answers: Vec<String>,
    step: WizardStep,
    recommended: Option<ProductRecord>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            answers: Vec::new(),
            step: WizardStep::Question(1),
            recommended: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// Answers in the order they were given.
    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// The staged recommendation, once the result has resolved to a product.
    #[must_use]
    pub const fn recommended(&self) -> Option<&ProductRecord> {
        self.recommended.as_ref()
    }

    /// Record the answer to the current question and advance.
    ///
    /// Answering the last question moves to [`WizardStep::Result`] and runs
    /// the decision procedure against `catalog`. If the chosen product is not
    /// in the catalog the wizard still reaches the result step, but nothing
    /// is staged.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::AlreadyComplete`] if the wizard is already at
    /// the result step.
    pub fn submit_answer(
        &mut self,
        answer: &str,
        catalog: &Catalog,
    ) -> Result<WizardStep, WizardError> {
        let WizardStep::Question(n) = self.step else {
            return Err(WizardError::AlreadyComplete);
        };

        self.answers.push(answer.trim().to_string());

        self.step = if n < QUESTION_COUNT {
            WizardStep::Question(n + 1)
        } else {
            self.resolve(catalog);
            WizardStep::Result
        };

        debug!(step = %self.step, answers = self.answers.len(), "Wizard advanced");
        Ok(self.step)
    }

    /// Start over from the first question.
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("Wizard reset");
    }

    fn resolve(&mut self, catalog: &Catalog) {
        let id = decide_product(&self.answers, catalog);
        self.recommended = catalog.get(id).cloned();
        if self.recommended.is_none() {
            debug!(%id, "Recommended product is not in the catalog");
        }
    }
}

/// Pick a product id for a set of answers.
///
/// The answers are joined and lower-cased, then checked against each keyword
/// group in priority order. With no hit, the first catalog product is chosen
/// (or product 1 if the catalog is empty).
#[must_use]
pub fn decide_product(answers: &[String], catalog: &Catalog) -> ProductId {
    let haystack = answers.join("|").to_lowercase();

    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(_, id)| *id)
        .or_else(|| catalog.first_id())
        .unwrap_or(FALLBACK_PRODUCT)
}
