//! Localizar: lazy, cached, multi-strategy element resolution for page objects
//!
//! Localizar ("to locate") turns locator annotations on page-object members
//! into proxies that find their element only when it is first used.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     LOCALIZAR Architecture                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐      │
//! │   │ Declaration │    │ PlanBuilder │    │ Proxy            │      │
//! │   │ (derive or  │───►│ combinator  │───►│ element / list / │      │
//! │   │  YAML)      │    │ + cache     │    │ wrapper list     │      │
//! │   └─────────────┘    └─────────────┘    └────────┬─────────┘      │
//! │                                                  │ first use      │
//! │                                                  ▼                │
//! │                      ┌─────────────┐    ┌──────────────────┐      │
//! │                      │ Search      │◄───│ ElementLocator   │      │
//! │                      │ Context     │    │ (By, By, ...)    │      │
//! │                      └─────────────┘    └──────────────────┘      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use localizar::prelude::*;
//!
//! let context = Arc::new(MockSearchContext::new().with_matches(
//!     Selector::new(How::Id, "q"),
//!     vec![MockElement::new("q").with_tag("input").into_ref()],
//! ));
//! let locator: Arc<dyn ElementLocator> = Arc::new(DefaultElementLocator::new(context.clone()));
//!
//! let query = ElementProxy::new(locator, LocatorPlan::first_match(vec![By::id("q")], true));
//! assert_eq!(context.total_calls(), 0);
//! assert_eq!(query.tag_name().unwrap(), "input");
//! assert_eq!(context.total_calls(), 1);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Locator descriptors: [`How`], [`Selector`], [`By`] and its combinators
pub mod by;

/// Search contexts and the element capability set
pub mod context;

/// Page declarations, loadable from YAML or JSON
pub mod declaration;

/// Runtime member decoration
pub mod decorator;

/// Element locator over a search context
pub mod locator;

/// In-memory search context for tests
pub mod mock;

/// Page objects and the page factory
pub mod page_object;

/// Per-member locator plans
pub mod plan;

/// Lazy element, list and wrapper-list proxies
pub mod proxy;

mod result;

/// Custom element wrappers
pub mod wrap;

pub use by::{By, How, Selector};
pub use context::{BoundingBox, ElementRef, SearchContext, WebElement};
pub use declaration::{FindsBy, MemberDeclaration, PageDeclaration};
pub use decorator::{
    DecoratedMember, DecoratedPage, DefaultMemberDecorator, MemberBuilder, MemberType,
    WebElementBuilder, WebElementListBuilder, WrappedElementBuilder, WrappedElementListBuilder,
};
pub use locator::{DefaultElementLocator, ElementLocator};
pub use page_object::{Decoratable, ElementContext, PageFactory, PageMembers, PageObject};
pub use plan::{Combinator, LocatorPlan, PagePlans, PlanBuilder};
pub use proxy::{
    ElementList, ElementListProxy, ElementProxy, ResolvedList, WrapFn, WrappedListProxy,
};
pub use result::{LocalizarError, LocalizarResult};
pub use wrap::{wrap, AnyWrapper, ErasedWrap, WrapperRegistry, WrapsElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::by::*;
    pub use super::context::*;
    pub use super::declaration::*;
    pub use super::decorator::*;
    pub use super::locator::*;
    pub use super::mock::*;
    pub use super::page_object::*;
    pub use super::plan::*;
    pub use super::proxy::*;
    pub use super::result::*;
    pub use super::wrap::*;

    #[cfg(feature = "derive")]
    pub use localizar_derive::PageObject;
}

// Re-export derive macros when the `derive` feature is enabled
#[cfg(feature = "derive")]
pub use localizar_derive::PageObject;
