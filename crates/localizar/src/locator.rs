//! Element locator: turns ordered descriptors into elements.
//!
//! The default locator is a single best-effort pass. It never waits, polls
//! or retries, and it never checks for staleness; a higher layer owns that.

use std::fmt;
use std::sync::Arc;

use crate::by::By;
use crate::context::{ElementRef, SearchContext};
use crate::result::{LocalizarError, LocalizarResult};

/// Resolves descriptor lists against some search context.
pub trait ElementLocator: Send + Sync + fmt::Debug {
    /// First element matched by the first descriptor that matches anything.
    ///
    /// # Errors
    ///
    /// [`LocalizarError::InvalidArgument`] for an empty list;
    /// [`LocalizarError::ElementNotFound`] naming every descriptor tried.
    fn locate_element(&self, bys: &[By]) -> LocalizarResult<ElementRef>;

    /// All matches of every descriptor, concatenated in descriptor order.
    fn locate_elements(&self, bys: &[By]) -> LocalizarResult<Vec<ElementRef>>;
}

/// Locator over a shared [`SearchContext`]
#[derive(Clone)]
pub struct DefaultElementLocator {
    context: Arc<dyn SearchContext>,
}

impl DefaultElementLocator {
    /// Create a locator searching `context`
    #[must_use]
    pub fn new(context: Arc<dyn SearchContext>) -> Self {
        Self { context }
    }
}

impl fmt::Debug for DefaultElementLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultElementLocator").finish_non_exhaustive()
    }
}

impl ElementLocator for DefaultElementLocator {
    fn locate_element(&self, bys: &[By]) -> LocalizarResult<ElementRef> {
        if bys.is_empty() {
            return Err(LocalizarError::InvalidArgument {
                message: "List of criteria may not be empty".to_string(),
            });
        }

        let mut tried = Vec::with_capacity(bys.len());
        for by in bys {
            match by.find_element(self.context.as_ref()) {
                Ok(element) => {
                    tracing::trace!(%by, attempts = tried.len() + 1, "located element");
                    return Ok(element);
                }
                Err(err) if err.is_not_found() => {
                    tracing::trace!(%by, "no element");
                    tried.push(by.clone());
                }
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(attempts = tried.len(), "element not found");
        Err(LocalizarError::ElementNotFound { tried })
    }

    fn locate_elements(&self, bys: &[By]) -> LocalizarResult<Vec<ElementRef>> {
        let mut elements = Vec::new();
        for by in bys {
            let found = by.find_elements(self.context.as_ref())?;
            tracing::trace!(%by, count = found.len(), "located elements");
            elements.extend(found);
        }
        Ok(elements)
    }
}
