//! In-memory search context and elements for unit-testing page objects.
//!
//! Results are registered per [`Selector`], like stubbing a driver, and
//! every lookup is recorded so tests can assert how often the context was
//! actually queried.
//!
//! ```ignore
//! let context = MockSearchContext::new().with_matches(
//!     Selector::new(How::XPath, ".//div"),
//!     vec![MockElement::new("row").with_text("text").into_ref(); 10],
//! );
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::by::{By, Selector};
use crate::context::{BoundingBox, ElementRef, SearchContext, WebElement};
use crate::result::{LocalizarError, LocalizarResult};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A lookup recorded by [`MockSearchContext`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `find_element` was called
    FindElement(Selector),
    /// `find_elements` was called
    FindElements(Selector),
}

/// Search context answering from registered results
#[derive(Debug, Default)]
pub struct MockSearchContext {
    matches: Mutex<HashMap<Selector, Vec<ElementRef>>>,
    failures: Mutex<HashMap<Selector, String>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockSearchContext {
    /// Create an empty context (nothing matches)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the elements returned for `selector`
    #[must_use]
    pub fn with_matches(self, selector: Selector, elements: Vec<ElementRef>) -> Self {
        self.set_matches(selector, elements);
        self
    }

    /// Make lookups for `selector` fail with a driver error
    #[must_use]
    pub fn with_failure(self, selector: Selector, message: impl Into<String>) -> Self {
        let _ = lock(&self.failures).insert(selector, message.into());
        self
    }

    /// Replace the elements returned for `selector`
    pub fn set_matches(&self, selector: Selector, elements: Vec<ElementRef>) {
        let _ = lock(&self.matches).insert(selector, elements);
    }

    /// Every lookup so far, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Number of `find_element` calls for `selector`
    #[must_use]
    pub fn find_element_calls(&self, selector: &Selector) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, MockCall::FindElement(s) if s == selector))
            .count()
    }

    /// Number of `find_elements` calls for `selector`
    #[must_use]
    pub fn find_elements_calls(&self, selector: &Selector) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, MockCall::FindElements(s) if s == selector))
            .count()
    }

    /// Total number of lookups
    #[must_use]
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).len()
    }

    fn lookup(&self, selector: &Selector) -> LocalizarResult<Vec<ElementRef>> {
        if let Some(message) = lock(&self.failures).get(selector) {
            return Err(LocalizarError::Driver {
                message: message.clone(),
            });
        }
        Ok(lock(&self.matches)
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }
}

impl SearchContext for MockSearchContext {
    fn find_element(&self, selector: &Selector) -> LocalizarResult<ElementRef> {
        lock(&self.calls).push(MockCall::FindElement(selector.clone()));
        self.lookup(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| LocalizarError::not_found(By::from(selector.clone())))
    }

    fn find_elements(&self, selector: &Selector) -> LocalizarResult<Vec<ElementRef>> {
        lock(&self.calls).push(MockCall::FindElements(selector.clone()));
        self.lookup(selector)
    }
}

/// Element with fixed properties that records interactions
#[derive(Debug)]
pub struct MockElement {
    label: String,
    tag_name: String,
    text: String,
    attributes: HashMap<String, String>,
    displayed: bool,
    enabled: bool,
    selected: AtomicBool,
    bounding_box: BoundingBox,
    children: MockSearchContext,
    clicks: AtomicUsize,
    submits: AtomicUsize,
    typed: Mutex<String>,
}

impl MockElement {
    /// Create a visible, enabled `div` identified by `label`
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tag_name: "div".to_string(),
            text: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            enabled: true,
            selected: AtomicBool::new(false),
            bounding_box: BoundingBox::default(),
            children: MockSearchContext::new(),
            clicks: AtomicUsize::new(0),
            submits: AtomicUsize::new(0),
            typed: Mutex::new(String::new()),
        }
    }

    /// Set the tag name
    #[must_use]
    pub fn with_tag(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    /// Set enabled state
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the bounding box
    #[must_use]
    pub const fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Register descendants returned when searching inside this element
    #[must_use]
    pub fn with_matches(self, selector: Selector, elements: Vec<ElementRef>) -> Self {
        self.children.set_matches(selector, elements);
        self
    }

    /// Number of clicks received
    #[must_use]
    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    /// Number of submits received
    #[must_use]
    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    /// Text typed since the last clear
    #[must_use]
    pub fn typed_text(&self) -> String {
        lock(&self.typed).clone()
    }

    /// Share as an [`ElementRef`]
    #[must_use]
    pub fn into_ref(self) -> ElementRef {
        Arc::new(self)
    }

    /// Share while keeping access to the recorded interactions
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl SearchContext for MockElement {
    fn find_element(&self, selector: &Selector) -> LocalizarResult<ElementRef> {
        self.children.find_element(selector)
    }

    fn find_elements(&self, selector: &Selector) -> LocalizarResult<Vec<ElementRef>> {
        self.children.find_elements(selector)
    }
}

impl WebElement for MockElement {
    fn tag_name(&self) -> LocalizarResult<String> {
        Ok(self.tag_name.clone())
    }

    fn text(&self) -> LocalizarResult<String> {
        Ok(self.text.clone())
    }

    fn attribute(&self, name: &str) -> LocalizarResult<Option<String>> {
        Ok(self.attributes.get(name).cloned())
    }

    fn is_displayed(&self) -> LocalizarResult<bool> {
        Ok(self.displayed)
    }

    fn is_enabled(&self) -> LocalizarResult<bool> {
        Ok(self.enabled)
    }

    fn is_selected(&self) -> LocalizarResult<bool> {
        Ok(self.selected.load(Ordering::SeqCst))
    }

    fn bounding_box(&self) -> LocalizarResult<BoundingBox> {
        Ok(self.bounding_box)
    }

    fn click(&self) -> LocalizarResult<()> {
        if !self.enabled {
            return Err(LocalizarError::Driver {
                message: format!("element '{}' is not enabled", self.label),
            });
        }
        let _ = self.clicks.fetch_add(1, Ordering::SeqCst);
        let _ = self.selected.fetch_xor(true, Ordering::SeqCst);
        Ok(())
    }

    fn send_keys(&self, text: &str) -> LocalizarResult<()> {
        lock(&self.typed).push_str(text);
        Ok(())
    }

    fn clear(&self) -> LocalizarResult<()> {
        lock(&self.typed).clear();
        Ok(())
    }

    fn submit(&self) -> LocalizarResult<()> {
        let _ = self.submits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::by::How;

    #[test]
    fn test_unregistered_selector_is_not_found() {
        let context = MockSearchContext::new();
        let selector = Selector::new(How::Id, "missing");
        assert!(context.find_element(&selector).unwrap_err().is_not_found());
        assert!(context.find_elements(&selector).unwrap().is_empty());
        assert_eq!(context.find_element_calls(&selector), 1);
        assert_eq!(context.find_elements_calls(&selector), 1);
    }

    #[test]
    fn test_failure_is_driver_error() {
        let selector = Selector::new(How::Css, "div");
        let context = MockSearchContext::new().with_failure(selector.clone(), "session closed");
        let err = context.find_elements(&selector).unwrap_err();
        assert!(matches!(err, LocalizarError::Driver { .. }));
    }

    #[test]
    fn test_element_records_interactions() {
        let element = MockElement::new("input").with_tag("input").shared();
        element.send_keys("hello").unwrap();
        element.send_keys(" world").unwrap();
        assert_eq!(element.typed_text(), "hello world");
        element.clear().unwrap();
        assert!(element.typed_text().is_empty());
        element.click().unwrap();
        assert_eq!(element.clicks(), 1);
        assert!(element.is_selected().unwrap());
        element.submit().unwrap();
        assert_eq!(element.submits(), 1);
    }

    #[test]
    fn test_disabled_element_rejects_click() {
        let element = MockElement::new("button").with_enabled(false);
        assert!(element.click().is_err());
        assert_eq!(element.clicks(), 0);
    }
}
