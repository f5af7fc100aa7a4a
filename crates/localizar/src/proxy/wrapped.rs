//! Lazy list of element wrappers.

use std::fmt;
use std::sync::Arc;

use super::list::ElementList;
use super::slot::LookupSlot;
use crate::context::ElementRef;
use crate::locator::ElementLocator;
use crate::plan::LocatorPlan;
use crate::result::LocalizarResult;

/// Builds one wrapper around a located element
pub type WrapFn<T> = fn(ElementRef) -> LocalizarResult<T>;

/// Stands in for a list of wrappers, one per matched element.
///
/// Resolution locates every element and wraps each in match order. A
/// wrapper that cannot be built fails the whole resolution.
pub struct WrappedListProxy<T> {
    locator: Arc<dyn ElementLocator>,
    plan: LocatorPlan,
    wrap: WrapFn<T>,
    slot: LookupSlot<Vec<T>>,
}

impl<T> WrappedListProxy<T> {
    /// Create an unresolved wrapper list
    #[must_use]
    pub fn new(locator: Arc<dyn ElementLocator>, plan: LocatorPlan, wrap: WrapFn<T>) -> Self {
        let slot = LookupSlot::new(plan.cache());
        Self {
            locator,
            plan,
            wrap,
            slot,
        }
    }

    /// The plan this proxy resolves
    #[must_use]
    pub const fn plan(&self) -> &LocatorPlan {
        &self.plan
    }

    /// Whether a resolved list is currently held
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.slot.is_filled()
    }

    fn resolve(&self) -> LocalizarResult<Vec<T>> {
        tracing::trace!(bys = ?self.plan.bys(), cache = self.plan.cache(), "resolving wrapper list");
        self.locator
            .locate_elements(self.plan.bys())?
            .into_iter()
            .map(self.wrap)
            .collect()
    }
}

impl<T> fmt::Debug for WrappedListProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedListProxy")
            .field("item", &std::any::type_name::<T>())
            .field("plan", &self.plan)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

impl<T> ElementList for WrappedListProxy<T> {
    type Item = T;

    fn with_items<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> LocalizarResult<R> {
        self.slot.with(|| self.resolve(), f)
    }
}
