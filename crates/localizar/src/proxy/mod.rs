//! Lazy stand-ins for page members.
//!
//! A proxy holds a locator and a [`crate::LocatorPlan`] and does nothing
//! until it is used. Each use resolves through the locator, or reuses the
//! first resolution when the plan caches.

mod element;
mod list;
mod slot;
mod wrapped;

pub use element::ElementProxy;
pub use list::{ElementList, ElementListProxy, ResolvedList};
pub use wrapped::{WrapFn, WrappedListProxy};
