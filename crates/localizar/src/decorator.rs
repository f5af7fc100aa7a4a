//! Member decoration for pages declared at runtime.
//!
//! A [`PageDeclaration`] loaded from YAML names its member types as
//! strings. The decorator parses each into a [`MemberType`], plans the
//! member, and asks its [`MemberBuilder`]s in a fixed order (element,
//! element list, wrapper, wrapper list) to build the proxy. The first
//! builder that recognizes the shape wins.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::declaration::{MemberDeclaration, PageDeclaration};
use crate::locator::ElementLocator;
use crate::plan::{collect_errors, duplicate_member, LocatorPlan, PlanBuilder};
use crate::proxy::{ElementListProxy, ElementProxy, WrappedListProxy};
use crate::result::{LocalizarError, LocalizarResult};
use crate::wrap::{short_type_name, AnyWrapper, WrapperRegistry};

/// Declared shape of a member, parsed from its type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberType {
    /// `WebElement`, `ElementRef`, `ElementProxy`, `Arc<dyn WebElement>`
    Element,
    /// `Vec<WebElement>`, `Vec<ElementRef>`, `ElementListProxy`
    ElementList,
    /// `Vec<T>` or `WrappedListProxy<T>` for any other `T`
    ListOf(String),
    /// Any other type, by short name
    Named(String),
}

impl MemberType {
    /// Parse a declared type name. Whitespace and module paths are ignored.
    #[must_use]
    pub fn parse(declared: &str) -> Self {
        let compact: String = declared.chars().filter(|c| !c.is_whitespace()).collect();
        if is_element_type(&compact) {
            return Self::Element;
        }
        let (outer, inner) = split_generic(&compact);
        match (short_type_name(outer), inner) {
            ("ElementListProxy", None) => Self::ElementList,
            ("Vec", Some(inner)) if is_element_type(inner) => Self::ElementList,
            ("Vec" | "WrappedListProxy", Some(inner)) => {
                Self::ListOf(short_type_name(inner).to_string())
            }
            ("Arc", Some(inner)) => Self::Named(short_type_name(inner).to_string()),
            (name, _) => Self::Named(name.to_string()),
        }
    }
}

fn split_generic(ty: &str) -> (&str, Option<&str>) {
    match ty.find('<') {
        Some(open) if ty.ends_with('>') => (&ty[..open], Some(&ty[open + 1..ty.len() - 1])),
        _ => (ty, None),
    }
}

fn is_element_type(ty: &str) -> bool {
    let (outer, inner) = split_generic(ty);
    match (short_type_name(outer), inner) {
        ("WebElement" | "ElementRef" | "ElementProxy", None) => true,
        ("Arc", Some(inner)) => {
            let inner = inner.strip_prefix("dyn").unwrap_or(inner);
            matches!(short_type_name(inner), "WebElement" | "ElementProxy")
        }
        _ => false,
    }
}

/// A decorated member, ready to use
pub enum DecoratedMember {
    /// Lazy single element
    Element(Arc<ElementProxy>),
    /// Lazy element list
    ElementList(ElementListProxy),
    /// Wrapper around a lazy single element
    Wrapped(AnyWrapper),
    /// Lazy list of wrappers
    WrappedList(WrappedListProxy<AnyWrapper>),
}

impl DecoratedMember {
    /// Shape name, for diagnostics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Element(_) => "element",
            Self::ElementList(_) => "element list",
            Self::Wrapped(_) => "wrapper",
            Self::WrappedList(_) => "wrapper list",
        }
    }
}

impl fmt::Debug for DecoratedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(proxy) => f.debug_tuple("Element").field(proxy).finish(),
            Self::ElementList(proxy) => f.debug_tuple("ElementList").field(proxy).finish(),
            Self::Wrapped(_) => f.write_str("Wrapped(..)"),
            Self::WrappedList(proxy) => f.debug_tuple("WrappedList").field(proxy).finish(),
        }
    }
}

/// Builds one member shape.
///
/// Returns `None` when `member_type` is not this builder's shape.
pub trait MemberBuilder: Send + Sync + fmt::Debug {
    /// Build the member, or decline
    fn build(
        &self,
        member_type: &MemberType,
        locator: &Arc<dyn ElementLocator>,
        plan: &LocatorPlan,
        registry: &WrapperRegistry,
    ) -> Option<LocalizarResult<DecoratedMember>>;
}

/// Builds [`DecoratedMember::Element`]
#[derive(Debug, Clone, Copy, Default)]
pub struct WebElementBuilder;

impl MemberBuilder for WebElementBuilder {
    fn build(
        &self,
        member_type: &MemberType,
        locator: &Arc<dyn ElementLocator>,
        plan: &LocatorPlan,
        _registry: &WrapperRegistry,
    ) -> Option<LocalizarResult<DecoratedMember>> {
        (*member_type == MemberType::Element).then(|| {
            Ok(DecoratedMember::Element(Arc::new(ElementProxy::new(
                Arc::clone(locator),
                plan.clone(),
            ))))
        })
    }
}

/// Builds [`DecoratedMember::ElementList`]
#[derive(Debug, Clone, Copy, Default)]
pub struct WebElementListBuilder;

impl MemberBuilder for WebElementListBuilder {
    fn build(
        &self,
        member_type: &MemberType,
        locator: &Arc<dyn ElementLocator>,
        plan: &LocatorPlan,
        _registry: &WrapperRegistry,
    ) -> Option<LocalizarResult<DecoratedMember>> {
        (*member_type == MemberType::ElementList).then(|| {
            Ok(DecoratedMember::ElementList(ElementListProxy::new(
                Arc::clone(locator),
                plan.clone(),
            )))
        })
    }
}

/// Builds [`DecoratedMember::Wrapped`] for registered wrapper types.
///
/// The wrapper is built at once, around a lazy element proxy.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrappedElementBuilder;

impl MemberBuilder for WrappedElementBuilder {
    fn build(
        &self,
        member_type: &MemberType,
        locator: &Arc<dyn ElementLocator>,
        plan: &LocatorPlan,
        registry: &WrapperRegistry,
    ) -> Option<LocalizarResult<DecoratedMember>> {
        let MemberType::Named(name) = member_type else {
            return None;
        };
        let wrap = registry.factory(name)?;
        let proxy = ElementProxy::new(Arc::clone(locator), plan.clone());
        Some(wrap(proxy.into_ref()).map(DecoratedMember::Wrapped))
    }
}

/// Builds [`DecoratedMember::WrappedList`] for registered wrapper types
#[derive(Debug, Clone, Copy, Default)]
pub struct WrappedElementListBuilder;

impl MemberBuilder for WrappedElementListBuilder {
    fn build(
        &self,
        member_type: &MemberType,
        locator: &Arc<dyn ElementLocator>,
        plan: &LocatorPlan,
        registry: &WrapperRegistry,
    ) -> Option<LocalizarResult<DecoratedMember>> {
        let MemberType::ListOf(name) = member_type else {
            return None;
        };
        registry.factory(name).map(|wrap| {
            Ok(DecoratedMember::WrappedList(WrappedListProxy::new(
                Arc::clone(locator),
                plan.clone(),
                wrap,
            )))
        })
    }
}

/// Decorates members with the four standard builders
#[derive(Debug)]
pub struct DefaultMemberDecorator {
    builders: Vec<Box<dyn MemberBuilder>>,
    registry: WrapperRegistry,
}

impl Default for DefaultMemberDecorator {
    fn default() -> Self {
        Self::new(WrapperRegistry::default())
    }
}

impl DefaultMemberDecorator {
    /// Decorator resolving wrapper names through `registry`
    #[must_use]
    pub fn new(registry: WrapperRegistry) -> Self {
        Self {
            builders: vec![
                Box::new(WebElementBuilder),
                Box::new(WebElementListBuilder),
                Box::new(WrappedElementBuilder),
                Box::new(WrappedElementListBuilder),
            ],
            registry,
        }
    }

    /// Append a builder, tried after the standard ones
    #[must_use]
    pub fn with_builder(mut self, builder: impl MemberBuilder + 'static) -> Self {
        self.builders.push(Box::new(builder));
        self
    }

    /// Wrapper types known to this decorator
    #[must_use]
    pub const fn registry(&self) -> &WrapperRegistry {
        &self.registry
    }

    /// Decorate one member.
    ///
    /// Returns `Ok(None)` for members without locator annotations.
    ///
    /// # Errors
    ///
    /// [`LocalizarError::Configuration`] for conflicting combinator flags,
    /// [`LocalizarError::UnsupportedMemberType`] when no builder recognizes
    /// the declared type, and [`LocalizarError::UnsupportedWrapperType`] when
    /// a registered wrapper type cannot be built.
    pub fn decorate(
        &self,
        member: &MemberDeclaration,
        type_cache: bool,
        locator: &Arc<dyn ElementLocator>,
    ) -> LocalizarResult<Option<DecoratedMember>> {
        let Some(plan) = PlanBuilder::build_member(member, type_cache)? else {
            return Ok(None);
        };
        self.build(member, &plan, locator).map(Some)
    }

    fn build(
        &self,
        member: &MemberDeclaration,
        plan: &LocatorPlan,
        locator: &Arc<dyn ElementLocator>,
    ) -> LocalizarResult<DecoratedMember> {
        let member_type = MemberType::parse(&member.type_name);
        self.builders
            .iter()
            .find_map(|builder| builder.build(&member_type, locator, plan, &self.registry))
            .unwrap_or_else(|| {
                Err(LocalizarError::UnsupportedMemberType {
                    member: member.name.clone(),
                    type_name: member.type_name.clone(),
                })
            })
    }

    /// Decorate every member of a page in one pass.
    ///
    /// # Errors
    ///
    /// Every member error is collected; one is returned as is, several as
    /// [`LocalizarError::InvalidPage`].
    pub fn decorate_page(
        &self,
        page: &PageDeclaration,
        locator: &Arc<dyn ElementLocator>,
    ) -> LocalizarResult<DecoratedPage> {
        let mut members = Vec::with_capacity(page.members.len());
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for member in &page.members {
            if !seen.insert(member.name.as_str()) {
                errors.push(duplicate_member(&page.name, &member.name));
                continue;
            }
            match self.decorate(member, page.cache_lookup, locator) {
                Ok(Some(decorated)) => {
                    tracing::trace!(member = %member.name, kind = decorated.kind(), "decorated member");
                    members.push((member.name.clone(), decorated));
                }
                Ok(None) => {}
                Err(err) => errors.push(err),
            }
        }

        collect_errors(&page.name, errors)?;
        tracing::debug!(page = %page.name, members = members.len(), "decorated page");
        Ok(DecoratedPage {
            name: page.name.clone(),
            members,
        })
    }
}

/// A runtime-declared page with its members decorated
#[derive(Debug)]
pub struct DecoratedPage {
    name: String,
    members: Vec<(String, DecoratedMember)>,
}

impl DecoratedPage {
    /// Page name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decorated member names, in declaration order
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    /// Any decorated member
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DecoratedMember> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, decorated)| decorated)
    }

    /// A single-element member
    pub fn element(&self, name: &str) -> LocalizarResult<Arc<ElementProxy>> {
        match self.require(name)? {
            DecoratedMember::Element(proxy) => Ok(Arc::clone(proxy)),
            other => Err(self.wrong_kind(name, "element", other)),
        }
    }

    /// An element-list member
    pub fn elements(&self, name: &str) -> LocalizarResult<&ElementListProxy> {
        match self.require(name)? {
            DecoratedMember::ElementList(proxy) => Ok(proxy),
            other => Err(self.wrong_kind(name, "element list", other)),
        }
    }

    /// A wrapper member, as its concrete type
    pub fn wrapped<T: Any + Send + Sync>(&self, name: &str) -> LocalizarResult<Arc<T>> {
        match self.require(name)? {
            DecoratedMember::Wrapped(wrapper) => {
                Arc::clone(wrapper)
                    .downcast::<T>()
                    .map_err(|_| LocalizarError::InvalidArgument {
                        message: format!(
                            "member '{name}' of page '{}' is not a {}",
                            self.name,
                            std::any::type_name::<T>()
                        ),
                    })
            }
            other => Err(self.wrong_kind(name, "wrapper", other)),
        }
    }

    /// A wrapper-list member; entries downcast with [`Arc::downcast`]
    pub fn wrapped_list(&self, name: &str) -> LocalizarResult<&WrappedListProxy<AnyWrapper>> {
        match self.require(name)? {
            DecoratedMember::WrappedList(proxy) => Ok(proxy),
            other => Err(self.wrong_kind(name, "wrapper list", other)),
        }
    }

    fn require(&self, name: &str) -> LocalizarResult<&DecoratedMember> {
        self.get(name).ok_or_else(|| LocalizarError::InvalidArgument {
            message: format!("page '{}' has no decorated member '{name}'", self.name),
        })
    }

    fn wrong_kind(&self, name: &str, wanted: &str, found: &DecoratedMember) -> LocalizarError {
        LocalizarError::InvalidArgument {
            message: format!(
                "member '{name}' of page '{}' is a {}, not a {wanted}",
                self.name,
                found.kind()
            ),
        }
    }
}
