//! Custom wrapper types built around an element.
//!
//! A wrapper type opts in by implementing [`WrapsElement`] and providing
//! either [`WrapsElement::from_element`] or the pair
//! [`WrapsElement::blank`] / [`WrapsElement::set_wrapped_element`]. When
//! both are provided the constructor wins.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ElementRef;
use crate::proxy::WrapFn;
use crate::result::{LocalizarError, LocalizarResult};

/// A user type backed by an element.
///
/// ```
/// use localizar::{ElementRef, WrapsElement};
///
/// struct Checkbox {
///     element: ElementRef,
/// }
///
/// impl WrapsElement for Checkbox {
///     fn wrapped_element(&self) -> &ElementRef {
///         &self.element
///     }
///
///     fn from_element(element: &ElementRef) -> Option<Self> {
///         Some(Self { element: element.clone() })
///     }
/// }
/// ```
pub trait WrapsElement: Sized {
    /// The element this wrapper is backed by
    fn wrapped_element(&self) -> &ElementRef;

    /// One-argument construction from an element
    fn from_element(_element: &ElementRef) -> Option<Self> {
        None
    }

    /// Parameterless construction, followed by [`Self::set_wrapped_element`]
    fn blank() -> Option<Self> {
        None
    }

    /// Assign the backing element; returns `false` when not writable
    fn set_wrapped_element(&mut self, _element: ElementRef) -> bool {
        false
    }
}

/// Build a `T` around `element`.
///
/// # Errors
///
/// [`LocalizarError::UnsupportedWrapperType`] when `T` supports neither
/// construction path.
pub fn wrap<T: WrapsElement>(element: ElementRef) -> LocalizarResult<T> {
    if let Some(wrapper) = T::from_element(&element) {
        return Ok(wrapper);
    }
    if let Some(mut wrapper) = T::blank() {
        if wrapper.set_wrapped_element(element) {
            return Ok(wrapper);
        }
    }
    tracing::debug!(wrapper = type_name::<T>(), "wrapper type cannot be constructed");
    Err(LocalizarError::UnsupportedWrapperType {
        type_name: type_name::<T>().to_string(),
    })
}

/// A type-erased wrapper instance
pub type AnyWrapper = Arc<dyn Any + Send + Sync>;

/// Type-erased [`wrap`] for one registered type
pub type ErasedWrap = WrapFn<AnyWrapper>;

fn wrap_erased<T>(element: ElementRef) -> LocalizarResult<AnyWrapper>
where
    T: WrapsElement + Send + Sync + 'static,
{
    Ok(Arc::new(wrap::<T>(element)?))
}

/// Last path segment of a type name, without generic arguments
pub(crate) fn short_type_name(full: &str) -> &str {
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Wrapper types known by name, for pages declared at runtime.
///
/// Statically typed pages never need this: the type itself is the lookup.
#[derive(Debug, Clone, Default)]
pub struct WrapperRegistry {
    factories: HashMap<String, ErasedWrap>,
}

impl WrapperRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its short type name (`Checkbox` for `app::Checkbox`)
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: WrapsElement + Send + Sync + 'static,
    {
        self.register_as::<T>(short_type_name(type_name::<T>()))
    }

    /// Register `T` under `name`
    pub fn register_as<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: WrapsElement + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::trace!(%name, wrapper = type_name::<T>(), "registered wrapper type");
        let _ = self.factories.insert(name, wrap_erased::<T> as ErasedWrap);
        self
    }

    /// Builder form of [`Self::register`]
    #[must_use]
    pub fn with<T>(mut self) -> Self
    where
        T: WrapsElement + Send + Sync + 'static,
    {
        let _ = self.register::<T>();
        self
    }

    /// Whether `name` is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Erased factory for `name`
    #[must_use]
    pub fn factory(&self, name: &str) -> Option<ErasedWrap> {
        self.factories.get(name).copied()
    }

    /// Wrap `element` as the type registered under `name`
    #[must_use]
    pub fn wrap(&self, name: &str, element: ElementRef) -> Option<LocalizarResult<AnyWrapper>> {
        self.factory(name).map(|factory| factory(element))
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
