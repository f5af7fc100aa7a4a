//! Lazy single-element proxy.

use std::fmt;
use std::sync::Arc;

use super::slot::LookupSlot;
use crate::by::Selector;
use crate::context::{BoundingBox, ElementRef, SearchContext, WebElement};
use crate::locator::ElementLocator;
use crate::plan::LocatorPlan;
use crate::result::LocalizarResult;

/// Stands in for one element that has not been looked up yet.
///
/// Every capability call resolves the element first (once when the plan
/// caches, on every call otherwise) and then forwards to it. Lookup errors,
/// including [`crate::LocalizarError::ElementNotFound`], reach the caller
/// exactly as the locator produced them.
pub struct ElementProxy {
    locator: Arc<dyn ElementLocator>,
    plan: LocatorPlan,
    slot: LookupSlot<ElementRef>,
}

impl ElementProxy {
    /// Create an unresolved proxy
    #[must_use]
    pub fn new(locator: Arc<dyn ElementLocator>, plan: LocatorPlan) -> Self {
        let slot = LookupSlot::new(plan.cache());
        Self {
            locator,
            plan,
            slot,
        }
    }

    /// The resolved element behind this proxy
    pub fn wrapped_element(&self) -> LocalizarResult<ElementRef> {
        self.slot.with(
            || {
                tracing::trace!(bys = ?self.plan.bys(), cache = self.plan.cache(), "resolving element");
                self.locator.locate_element(self.plan.bys())
            },
            |element| Arc::clone(element),
        )
    }

    /// The plan this proxy resolves
    #[must_use]
    pub const fn plan(&self) -> &LocatorPlan {
        &self.plan
    }

    /// Whether a resolved element is currently held
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.slot.is_filled()
    }

    /// Share as an [`ElementRef`]
    #[must_use]
    pub fn into_ref(self) -> ElementRef {
        Arc::new(self)
    }
}

impl fmt::Debug for ElementProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementProxy")
            .field("plan", &self.plan)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

impl SearchContext for ElementProxy {
    fn find_element(&self, selector: &Selector) -> LocalizarResult<ElementRef> {
        self.wrapped_element()?.find_element(selector)
    }

    fn find_elements(&self, selector: &Selector) -> LocalizarResult<Vec<ElementRef>> {
        self.wrapped_element()?.find_elements(selector)
    }
}

impl WebElement for ElementProxy {
    fn tag_name(&self) -> LocalizarResult<String> {
        self.wrapped_element()?.tag_name()
    }

    fn text(&self) -> LocalizarResult<String> {
        self.wrapped_element()?.text()
    }

    fn attribute(&self, name: &str) -> LocalizarResult<Option<String>> {
        self.wrapped_element()?.attribute(name)
    }

    fn is_displayed(&self) -> LocalizarResult<bool> {
        self.wrapped_element()?.is_displayed()
    }

    fn is_enabled(&self) -> LocalizarResult<bool> {
        self.wrapped_element()?.is_enabled()
    }

    fn is_selected(&self) -> LocalizarResult<bool> {
        self.wrapped_element()?.is_selected()
    }

    fn bounding_box(&self) -> LocalizarResult<BoundingBox> {
        self.wrapped_element()?.bounding_box()
    }

    fn click(&self) -> LocalizarResult<()> {
        self.wrapped_element()?.click()
    }

    fn send_keys(&self, text: &str) -> LocalizarResult<()> {
        self.wrapped_element()?.send_keys(text)
    }

    fn clear(&self) -> LocalizarResult<()> {
        self.wrapped_element()?.clear()
    }

    fn submit(&self) -> LocalizarResult<()> {
        self.wrapped_element()?.submit()
    }
}
