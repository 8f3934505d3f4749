//! Render sinks.
//!
//! A sink is anywhere rendered output can land: a badge, the checkout table
//! body, the total cell. Every target is optional; a session with no sink for
//! a target simply skips rendering it.

use std::cell::RefCell;
use std::rc::Rc;

/// A render target that accepts replacement content.
pub trait Sink {
    /// Replace the sink's content.
    fn write(&mut self, content: &str);
}

impl<F: FnMut(&str)> Sink for F {
    fn write(&mut self, content: &str) {
        self(content);
    }
}

/// A sink that keeps the last content written to it.
///
/// Clones share the buffer, so one handle can be installed in [`Sinks`] and
/// another kept to read back what was rendered.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    content: Rc<RefCell<String>>,
}

impl Buffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent content.
    #[must_use]
    pub fn contents(&self) -> String {
        self.content.borrow().clone()
    }

    /// A boxed handle suitable for [`Sinks`].
    #[must_use]
    pub fn boxed(&self) -> Box<dyn Sink> {
        Box::new(self.clone())
    }
}

impl Sink for Buffer {
    fn write(&mut self, content: &str) {
        content.clone_into(&mut self.content.borrow_mut());
    }
}

/// The set of render targets available to a session.
#[derive(Default)]
pub struct Sinks {
    /// Item-count badges (header button, floating cart button, ...).
    pub badges: Vec<Box<dyn Sink>>,
    /// Checkout table body.
    pub cart_items: Option<Box<dyn Sink>>,
    /// Checkout grand total.
    pub cart_total: Option<Box<dyn Sink>>,
    /// Product grid.
    pub catalog: Option<Box<dyn Sink>>,
    /// Wizard result panel.
    pub recommendation: Option<Box<dyn Sink>>,
    /// User-facing messages such as coupon outcomes.
    pub notice: Option<Box<dyn Sink>>,
}

impl Sinks {
    /// No targets at all; every render is skipped.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for Sinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sinks")
            .field("badges", &self.badges.len())
            .field("cart_items", &self.cart_items.is_some())
            .field("cart_total", &self.cart_total.is_some())
            .field("catalog", &self.catalog.is_some())
            .field("recommendation", &self.recommendation.is_some())
            .field("notice", &self.notice.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_keeps_last_write() {
        let buffer = Buffer::new();
        let mut sink = buffer.boxed();
        sink.write("first");
        sink.write("second");
        assert_eq!(buffer.contents(), "second");
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |content: &str| seen.push(content.to_string());
            Sink::write(&mut sink, "3");
        }
        assert_eq!(seen, vec!["3".to_string()]);
    }
}
