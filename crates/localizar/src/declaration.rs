//! Declarative page descriptions.
//!
//! A [`PageDeclaration`] is what a page object *says* about its members:
//! which descriptors locate each one, how multiple descriptors combine, and
//! whether lookups are cached. `#[derive(PageObject)]` generates one, and
//! the same structure loads from YAML or JSON for pages described in
//! configuration files.
//!
//! ```yaml
//! name: SearchPage
//! cache_lookup: false
//! members:
//!   - name: query
//!     type: WebElement
//!     finds_by:
//!       - how: name
//!         using: q
//!   - name: results
//!     type: Vec<WebElement>
//!     finds_by_all: true
//!     finds_by:
//!       - how: css
//!         using: .result
//!       - how: css
//!         using: .ad
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::by::{By, How, Selector};
use crate::result::LocalizarResult;

/// One locator annotation on a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindsBy {
    /// Strategy kind
    pub how: How,
    /// Query string; defaults to the member name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using: Option<String>,
    /// Lower values are tried first
    #[serde(default)]
    pub priority: i32,
}

impl FindsBy {
    /// Annotation whose query defaults to the member name
    #[must_use]
    pub const fn new(how: How) -> Self {
        Self {
            how,
            using: None,
            priority: 0,
        }
    }

    /// Set the query string
    #[must_use]
    pub fn using(mut self, using: impl Into<String>) -> Self {
        self.using = Some(using.into());
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The descriptor for a member called `member`
    #[must_use]
    pub fn finder(&self, member: &str) -> By {
        let using = self.using.as_deref().unwrap_or(member);
        By::Selector(Selector::new(self.how, using))
    }
}

/// What a page object declares about one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    /// Member name
    pub name: String,
    /// Declared type, as written (`WebElement`, `Vec<MenuItem>`, ...)
    #[serde(rename = "type")]
    pub type_name: String,
    /// Locator annotations, in declaration order
    #[serde(default)]
    pub finds_by: Vec<FindsBy>,
    /// Search each descriptor within the results of the previous one
    #[serde(default)]
    pub finds_by_sequence: bool,
    /// Merge the results of every descriptor
    #[serde(default)]
    pub finds_by_all: bool,
    /// Cache the first lookup
    #[serde(default)]
    pub cache_lookup: bool,
}

impl MemberDeclaration {
    /// Declare a member with no annotations yet
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            finds_by: Vec::new(),
            finds_by_sequence: false,
            finds_by_all: false,
            cache_lookup: false,
        }
    }

    /// Add a locator annotation
    #[must_use]
    pub fn with_finds_by(mut self, finds_by: FindsBy) -> Self {
        self.finds_by.push(finds_by);
        self
    }

    /// Mark the descriptors as a chain
    #[must_use]
    pub const fn finds_by_sequence(mut self, enabled: bool) -> Self {
        self.finds_by_sequence = enabled;
        self
    }

    /// Mark the descriptors as a union
    #[must_use]
    pub const fn finds_by_all(mut self, enabled: bool) -> Self {
        self.finds_by_all = enabled;
        self
    }

    /// Cache lookups for this member
    #[must_use]
    pub const fn cache_lookup(mut self, enabled: bool) -> Self {
        self.cache_lookup = enabled;
        self
    }
}

/// What a page object declares about itself and its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDeclaration {
    /// Page (type) name
    pub name: String,
    /// Cache lookups for every member
    #[serde(default)]
    pub cache_lookup: bool,
    /// Members, in declaration order
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
}

impl PageDeclaration {
    /// Declare a page with no members
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cache_lookup: false,
            members: Vec::new(),
        }
    }

    /// Cache lookups for every member
    #[must_use]
    pub const fn with_cache_lookup(mut self, enabled: bool) -> Self {
        self.cache_lookup = enabled;
        self
    }

    /// Add a member
    #[must_use]
    pub fn with_member(mut self, member: MemberDeclaration) -> Self {
        self.members.push(member);
        self
    }

    /// Look up a member by name
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberDeclaration> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Parse a YAML declaration
    pub fn from_yaml(yaml: &str) -> LocalizarResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse a JSON declaration
    pub fn from_json(json: &str) -> LocalizarResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a declaration file; `.json` files are JSON, anything else YAML
    pub fn load(path: impl AsRef<Path>) -> LocalizarResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        tracing::debug!(path = %path.display(), is_json, "loading page declaration");
        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> LocalizarResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
