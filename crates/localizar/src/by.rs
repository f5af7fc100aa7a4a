//! Locator descriptors: "find by X" criteria and their combinators.
//!
//! # Design Philosophy
//!
//! - **Opaque leaves**: a [`Selector`] is a strategy plus a query string; the
//!   search context decides what the query means
//! - **Combinators as values**: [`By::Chained`] narrows step by step,
//!   [`By::All`] merges the matches of every descriptor
//! - **Stable rendering**: `Display` output is what not-found errors list

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::{ElementRef, SearchContext};
use crate::result::{LocalizarError, LocalizarResult};

/// Strategy kind for a leaf selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum How {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// CSS class name
    ClassName,
    /// CSS selector (e.g., "button.primary")
    Css,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// Element tag name
    TagName,
    /// Exact link text
    LinkText,
    /// Partial link text
    PartialLinkText,
    /// Test ID selector (data-testid attribute)
    TestId,
}

impl How {
    /// Label used when rendering a descriptor
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name",
            Self::ClassName => "ClassName",
            Self::Css => "CssSelector",
            Self::XPath => "XPath",
            Self::TagName => "TagName",
            Self::LinkText => "LinkText",
            Self::PartialLinkText => "PartialLinkText",
            Self::TestId => "TestId",
        }
    }
}

/// A leaf criterion handed to a [`SearchContext`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    /// Strategy kind
    pub how: How,
    /// Query string interpreted by the strategy
    pub using: String,
}

impl Selector {
    /// Create a selector from a strategy and query
    #[must_use]
    pub fn new(how: How, using: impl Into<String>) -> Self {
        Self {
            how,
            using: using.into(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "By.{}: {}", self.how.label(), self.using)
    }
}

/// A locator descriptor
///
/// Leaves are evaluated by the search context; combinators are evaluated
/// here, in terms of leaf lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    /// Single strategy lookup
    Selector(Selector),
    /// Each descriptor searches within the results of the previous one
    Chained(Vec<By>),
    /// Matches of every descriptor, concatenated in order
    All(Vec<By>),
}

impl By {
    /// Lookup by `id` attribute
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::Id, id))
    }

    /// Lookup by `name` attribute
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::Name, name))
    }

    /// Lookup by class name
    #[must_use]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::ClassName, class))
    }

    /// Lookup by CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::Css, selector))
    }

    /// Lookup by XPath
    #[must_use]
    pub fn xpath(xpath: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::XPath, xpath))
    }

    /// Lookup by tag name
    #[must_use]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::TagName, tag))
    }

    /// Lookup by exact link text
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::LinkText, text))
    }

    /// Lookup by partial link text
    #[must_use]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::PartialLinkText, text))
    }

    /// Lookup by `data-testid`
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::Selector(Selector::new(How::TestId, id))
    }

    /// Chain descriptors, narrowing the search at each step
    #[must_use]
    pub fn chained(bys: impl IntoIterator<Item = By>) -> Self {
        Self::Chained(bys.into_iter().collect())
    }

    /// Union of descriptors
    #[must_use]
    pub fn all(bys: impl IntoIterator<Item = By>) -> Self {
        Self::All(bys.into_iter().collect())
    }

    /// Find the first element this descriptor matches in `context`
    pub fn find_element<C>(&self, context: &C) -> LocalizarResult<ElementRef>
    where
        C: SearchContext + ?Sized,
    {
        match self {
            Self::Selector(selector) => context.find_element(selector),
            Self::Chained(_) => self
                .find_elements(context)?
                .into_iter()
                .next()
                .ok_or_else(|| LocalizarError::not_found(self.clone())),
            Self::All(bys) => {
                for by in bys {
                    if let Some(element) = by.find_elements(context)?.into_iter().next() {
                        return Ok(element);
                    }
                }
                Err(LocalizarError::not_found(self.clone()))
            }
        }
    }

    /// Find every element this descriptor matches in `context`
    pub fn find_elements<C>(&self, context: &C) -> LocalizarResult<Vec<ElementRef>>
    where
        C: SearchContext + ?Sized,
    {
        match self {
            Self::Selector(selector) => context.find_elements(selector),
            Self::Chained(bys) => {
                let Some((first, rest)) = bys.split_first() else {
                    return Ok(Vec::new());
                };
                let mut elements = first.find_elements(context)?;
                for by in rest {
                    let mut narrowed = Vec::new();
                    for element in &elements {
                        narrowed.extend(by.find_elements(element.as_ref())?);
                    }
                    elements = narrowed;
                }
                Ok(elements)
            }
            Self::All(bys) => {
                let mut elements = Vec::new();
                for by in bys {
                    elements.extend(by.find_elements(context)?);
                }
                Ok(elements)
            }
        }
    }
}

impl From<Selector> for By {
    fn from(selector: Selector) -> Self {
        Self::Selector(selector)
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(selector) => selector.fmt(f),
            Self::Chained(bys) => write!(f, "By.Chained([{}])", join(bys)),
            Self::All(bys) => write!(f, "By.All([{}])", join(bys)),
        }
    }
}

fn join(bys: &[By]) -> String {
    bys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
