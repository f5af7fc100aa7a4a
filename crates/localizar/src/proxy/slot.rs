//! The resolve-then-delegate state machine shared by every proxy.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::result::LocalizarResult;

/// Single lazily populated cache slot.
///
/// With caching on, the slot is filled by the first access and reused
/// afterwards. With caching off, every access performs a fresh lookup and
/// overwrites the slot. The lock is held only to take or store the value,
/// never across a lookup or a caller's access. While one access holds the
/// value the slot reads as empty, so a racing or nested access looks the
/// value up again; every caller still sees a complete result.
#[derive(Debug)]
pub(crate) struct LookupSlot<T> {
    cache: bool,
    value: Mutex<Option<T>>,
}

impl<T> LookupSlot<T> {
    pub(crate) const fn new(cache: bool) -> Self {
        Self {
            cache,
            value: Mutex::new(None),
        }
    }

    pub(crate) fn is_filled(&self) -> bool {
        self.lock().is_some()
    }

    /// Run `access` against the cached value, looking it up first when needed.
    pub(crate) fn with<R>(
        &self,
        lookup: impl FnOnce() -> LocalizarResult<T>,
        access: impl FnOnce(&mut T) -> R,
    ) -> LocalizarResult<R> {
        let held = if self.cache { self.lock().take() } else { None };
        let mut value = match held {
            Some(value) => value,
            None => lookup()?,
        };
        let result = access(&mut value);
        *self.lock() = Some(value);
        Ok(result)
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
