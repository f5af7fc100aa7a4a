//! Page Object Model support.
//!
//! A page object is a struct whose fields are lazy element proxies. Its
//! locator annotations are written once, either with
//! `#[derive(PageObject)]` or by hand through [`PageObject::declaration`],
//! and [`PageFactory`] turns them into proxies bound to a search context.
//!
//! ```ignore
//! #[derive(PageObject)]
//! #[cache_lookup]
//! struct LoginPage {
//!     #[find_by(id = "username")]
//!     username: ElementProxy,
//!     #[find_by(css = "button[type='submit']")]
//!     submit: ElementProxy,
//!     #[find_by(class_name = "error")]
//!     errors: ElementListProxy,
//! }
//!
//! let page: LoginPage = PageFactory::init_elements(context)?;
//! page.username.send_keys("alice")?;
//! page.submit.click()?;
//! ```

use std::fmt;
use std::sync::Arc;

use crate::by::Selector;
use crate::context::{ElementRef, SearchContext};
use crate::declaration::PageDeclaration;
use crate::decorator::{DecoratedPage, DefaultMemberDecorator};
use crate::locator::{DefaultElementLocator, ElementLocator};
use crate::plan::{LocatorPlan, PagePlans, PlanBuilder};
use crate::proxy::{ElementListProxy, ElementProxy, WrappedListProxy};
use crate::result::{LocalizarError, LocalizarResult};
use crate::wrap::{wrap, WrapperRegistry, WrapsElement};

/// A page or component with declaratively located members.
///
/// Usually derived; see the crate docs for the attribute syntax.
pub trait PageObject: Sized {
    /// What the page declares about its members
    fn declaration() -> PageDeclaration;

    /// Assemble the page from decorated members
    fn from_members(members: &mut PageMembers) -> LocalizarResult<Self>;
}

/// A member type [`PageMembers::decorate`] can build from a plan
pub trait Decoratable: Sized {
    /// Build the member; must not resolve anything
    fn decorate(locator: Arc<dyn ElementLocator>, plan: LocatorPlan) -> LocalizarResult<Self>;
}

impl Decoratable for ElementProxy {
    fn decorate(locator: Arc<dyn ElementLocator>, plan: LocatorPlan) -> LocalizarResult<Self> {
        Ok(Self::new(locator, plan))
    }
}

impl Decoratable for ElementRef {
    fn decorate(locator: Arc<dyn ElementLocator>, plan: LocatorPlan) -> LocalizarResult<Self> {
        Ok(ElementProxy::new(locator, plan).into_ref())
    }
}

impl Decoratable for ElementListProxy {
    fn decorate(locator: Arc<dyn ElementLocator>, plan: LocatorPlan) -> LocalizarResult<Self> {
        Ok(Self::new(locator, plan))
    }
}

impl<T: WrapsElement> Decoratable for WrappedListProxy<T> {
    fn decorate(locator: Arc<dyn ElementLocator>, plan: LocatorPlan) -> LocalizarResult<Self> {
        Ok(Self::new(locator, plan, wrap::<T>))
    }
}

/// Wrappers are built at once around a lazy element proxy
impl<T: WrapsElement> Decoratable for T {
    fn decorate(locator: Arc<dyn ElementLocator>, plan: LocatorPlan) -> LocalizarResult<Self> {
        wrap(ElementProxy::new(locator, plan).into_ref())
    }
}

/// Planned members of a page being initialized
pub struct PageMembers {
    page: String,
    locator: Arc<dyn ElementLocator>,
    plans: PagePlans,
}

impl PageMembers {
    /// Members of `page`, with plans already built
    #[must_use]
    pub fn new(page: impl Into<String>, locator: Arc<dyn ElementLocator>, plans: PagePlans) -> Self {
        Self {
            page: page.into(),
            locator,
            plans,
        }
    }

    /// Page name
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Locator shared by every member
    #[must_use]
    pub fn locator(&self) -> &Arc<dyn ElementLocator> {
        &self.locator
    }

    /// Build the annotated member `name`
    ///
    /// # Errors
    ///
    /// [`LocalizarError::InvalidArgument`] when `name` has no plan (it was
    /// not annotated, or was already taken), or whatever building `T` fails
    /// with.
    pub fn decorate<T: Decoratable>(&mut self, name: &str) -> LocalizarResult<T> {
        let plan = self
            .plans
            .remove(name)
            .ok_or_else(|| LocalizarError::InvalidArgument {
                message: format!("page '{}' has no locator plan for member '{name}'", self.page),
            })?;
        T::decorate(Arc::clone(&self.locator), plan)
    }

    /// Initialize a nested page object sharing this page's locator
    pub fn component<P: PageObject>(&self) -> LocalizarResult<P> {
        PageFactory::init_with_locator(Arc::clone(&self.locator))
    }
}

impl fmt::Debug for PageMembers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending: Vec<&str> = self.plans.keys().map(String::as_str).collect();
        pending.sort_unstable();
        f.debug_struct("PageMembers")
            .field("page", &self.page)
            .field("pending", &pending)
            .finish_non_exhaustive()
    }
}

/// Searches within one element
#[derive(Debug, Clone)]
pub struct ElementContext {
    element: ElementRef,
}

impl ElementContext {
    /// Scope searches to `element`
    #[must_use]
    pub fn new(element: ElementRef) -> Self {
        Self { element }
    }

    /// The scoping element
    #[must_use]
    pub fn element(&self) -> &ElementRef {
        &self.element
    }
}

impl SearchContext for ElementContext {
    fn find_element(&self, selector: &Selector) -> LocalizarResult<ElementRef> {
        self.element.find_element(selector)
    }

    fn find_elements(&self, selector: &Selector) -> LocalizarResult<Vec<ElementRef>> {
        self.element.find_elements(selector)
    }
}

/// Initializes page objects
#[derive(Debug, Clone, Copy, Default)]
pub struct PageFactory;

impl PageFactory {
    /// Initialize `P` against `context`.
    ///
    /// Nothing is looked up here; every member resolves on first use.
    ///
    /// # Errors
    ///
    /// Every declaration error in `P` at once (see
    /// [`PlanBuilder::plan_page`]), or a wrapper that cannot be built.
    pub fn init_elements<P: PageObject>(context: Arc<dyn SearchContext>) -> LocalizarResult<P> {
        Self::init_with_locator(Arc::new(DefaultElementLocator::new(context)))
    }

    /// Initialize `P` with members searched within `element`
    pub fn init_within<P: PageObject>(element: ElementRef) -> LocalizarResult<P> {
        Self::init_elements(Arc::new(ElementContext::new(element)))
    }

    /// Initialize `P` with a custom locator
    pub fn init_with_locator<P: PageObject>(locator: Arc<dyn ElementLocator>) -> LocalizarResult<P> {
        let declaration = P::declaration();
        let plans = PlanBuilder::plan_page(&declaration)?;
        tracing::debug!(page = %declaration.name, members = plans.len(), "initializing page object");
        let mut members = PageMembers::new(declaration.name, locator, plans);
        P::from_members(&mut members)
    }

    /// Decorate a page declared at runtime, such as one loaded from YAML
    pub fn decorate(
        declaration: &PageDeclaration,
        context: Arc<dyn SearchContext>,
        registry: WrapperRegistry,
    ) -> LocalizarResult<DecoratedPage> {
        let locator: Arc<dyn ElementLocator> = Arc::new(DefaultElementLocator::new(context));
        DefaultMemberDecorator::new(registry).decorate_page(declaration, &locator)
    }
}
