//! List capability and the lazy element-list proxy.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::slot::LookupSlot;
use crate::context::ElementRef;
use crate::locator::ElementLocator;
use crate::plan::LocatorPlan;
use crate::result::{LocalizarError, LocalizarResult};

/// An ordered list of elements (or element wrappers).
///
/// Implementors provide [`ElementList::with_items`]; every provided
/// operation is exactly one call to it, so on a lazy list each top-level
/// operation is exactly one resolution, and on a cached one none after the
/// first. Operations that hand out entries by value need `Item: Clone`.
pub trait ElementList {
    /// Entry type
    type Item;

    /// Run `f` against the (resolved) entries.
    fn with_items<R>(&self, f: impl FnOnce(&mut Vec<Self::Item>) -> R) -> LocalizarResult<R>;

    /// Number of entries
    fn len(&self) -> LocalizarResult<usize> {
        self.with_items(|items| items.len())
    }

    /// Whether there are no entries
    fn is_empty(&self) -> LocalizarResult<bool> {
        self.with_items(|items| items.is_empty())
    }

    /// Entry at `index`
    fn get(&self, index: usize) -> LocalizarResult<Option<Self::Item>>
    where
        Self::Item: Clone,
    {
        self.with_items(|items| items.get(index).cloned())
    }

    /// First entry
    fn first(&self) -> LocalizarResult<Option<Self::Item>>
    where
        Self::Item: Clone,
    {
        self.get(0)
    }

    /// Snapshot of every entry
    fn to_vec(&self) -> LocalizarResult<Vec<Self::Item>>
    where
        Self::Item: Clone,
    {
        self.with_items(|items| items.clone())
    }

    /// Iterate over a snapshot of the entries
    fn iter(&self) -> LocalizarResult<std::vec::IntoIter<Self::Item>>
    where
        Self::Item: Clone,
    {
        Ok(self.to_vec()?.into_iter())
    }

    /// Map every entry
    fn map<B>(&self, f: impl FnMut(&Self::Item) -> B) -> LocalizarResult<Vec<B>> {
        self.with_items(|items| items.iter().map(f).collect())
    }

    /// Entries matching `predicate`
    fn filter(
        &self,
        mut predicate: impl FnMut(&Self::Item) -> bool,
    ) -> LocalizarResult<Vec<Self::Item>>
    where
        Self::Item: Clone,
    {
        self.with_items(|items| {
            items
                .iter()
                .filter(|item| predicate(item))
                .cloned()
                .collect()
        })
    }

    /// Index of the first entry matching `predicate`
    fn position(&self, predicate: impl FnMut(&Self::Item) -> bool) -> LocalizarResult<Option<usize>> {
        self.with_items(|items| items.iter().position(predicate))
    }

    /// Whether an equal entry is present
    fn contains(&self, item: &Self::Item) -> LocalizarResult<bool>
    where
        Self::Item: PartialEq,
    {
        self.with_items(|items| items.contains(item))
    }

    /// Append an entry
    fn push(&self, item: Self::Item) -> LocalizarResult<()> {
        self.with_items(|items| items.push(item))
    }

    /// Insert an entry at `index`
    fn insert(&self, index: usize, item: Self::Item) -> LocalizarResult<()> {
        self.with_items(|items| {
            if index > items.len() {
                return Err(out_of_range(index, items.len()));
            }
            items.insert(index, item);
            Ok(())
        })?
    }

    /// Replace the entry at `index`, returning the previous one
    fn set(&self, index: usize, item: Self::Item) -> LocalizarResult<Self::Item> {
        self.with_items(|items| match items.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, item)),
            None => Err(out_of_range(index, items.len())),
        })?
    }

    /// Remove the entry at `index`
    fn remove(&self, index: usize) -> LocalizarResult<Option<Self::Item>> {
        self.with_items(|items| (index < items.len()).then(|| items.remove(index)))
    }

    /// Remove every entry
    fn clear(&self) -> LocalizarResult<()> {
        self.with_items(|items| items.clear())
    }
}

fn out_of_range(index: usize, len: usize) -> LocalizarError {
    LocalizarError::InvalidArgument {
        message: format!("index {index} out of range for list of length {len}"),
    }
}

/// A list that is already resolved.
///
/// Each operation runs on a snapshot taken under the lock and stores the
/// snapshot back afterwards, so an operation may read the same list again
/// from inside its closure. Concurrent mutations race; the last one stored
/// wins.
#[derive(Debug, Default)]
pub struct ResolvedList<T> {
    items: Mutex<Vec<T>>,
}

impl<T> ResolvedList<T> {
    /// Wrap resolved entries
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the entries back
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.items
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> From<Vec<T>> for ResolvedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Clone> ElementList for ResolvedList<T> {
    type Item = T;

    fn with_items<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> LocalizarResult<R> {
        let mut items = self.lock().clone();
        let result = f(&mut items);
        *self.lock() = items;
        Ok(result)
    }
}

/// Stands in for every element a plan matches.
///
/// Zero matches is a valid resolution, not an error. Without caching each
/// operation re-queries the context in full.
pub struct ElementListProxy {
    locator: Arc<dyn ElementLocator>,
    plan: LocatorPlan,
    slot: LookupSlot<Vec<ElementRef>>,
}

impl ElementListProxy {
    /// Create an unresolved list proxy
    #[must_use]
    pub fn new(locator: Arc<dyn ElementLocator>, plan: LocatorPlan) -> Self {
        let slot = LookupSlot::new(plan.cache());
        Self {
            locator,
            plan,
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
}

impl fmt::Debug for ElementListProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementListProxy")
            .field("plan", &self.plan)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

impl ElementList for ElementListProxy {
    type Item = ElementRef;

    fn with_items<R>(&self, f: impl FnOnce(&mut Vec<ElementRef>) -> R) -> LocalizarResult<R> {
        self.slot.with(
            || {
                tracing::trace!(bys = ?self.plan.bys(), cache = self.plan.cache(), "resolving element list");
                self.locator.locate_elements(self.plan.bys())
            },
            f,
        )
    }
}
