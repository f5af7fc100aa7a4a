//! Search context and element capabilities.
//!
//! The core only ever *consumes* these traits. Browser sessions, DOM
//! bindings or test doubles implement them; a page object never owns the
//! context it searches.
//!
//! ```text
//! ┌──────────────────┐  find_element(&Selector)   ┌──────────────────┐
//! │  ElementLocator  │ ─────────────────────────► │  SearchContext   │
//! │  (By combinators)│ ◄───────────────────────── │  (driver, DOM,   │
//! └──────────────────┘   ElementRef / Vec<..>     │   mock, element) │
//!                                                 └──────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::by::Selector;
use crate::result::LocalizarResult;

/// Shared handle to a resolved (or lazily resolved) element
pub type ElementRef = Arc<dyn WebElement>;

/// Something elements can be searched in: a page, a frame, or an element.
pub trait SearchContext: Send + Sync {
    /// Find the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LocalizarError::ElementNotFound`] when nothing
    /// matches, or [`crate::LocalizarError::Driver`] for any other failure.
    fn find_element(&self, selector: &Selector) -> LocalizarResult<ElementRef>;

    /// Find every element matching `selector`, in document order.
    ///
    /// No match is an empty list, not an error.
    fn find_elements(&self, selector: &Selector) -> LocalizarResult<Vec<ElementRef>>;
}

/// Capabilities of a single element.
///
/// Elements are themselves search contexts, which is what chained
/// descriptors narrow into.
pub trait WebElement: SearchContext + std::fmt::Debug {
    /// Tag name (e.g. `"button"`)
    fn tag_name(&self) -> LocalizarResult<String>;

    /// Rendered text content
    fn text(&self) -> LocalizarResult<String>;

    /// Attribute value, if present
    fn attribute(&self, name: &str) -> LocalizarResult<Option<String>>;

    /// Whether the element is displayed
    fn is_displayed(&self) -> LocalizarResult<bool>;

    /// Whether the element is enabled
    fn is_enabled(&self) -> LocalizarResult<bool>;

    /// Whether a checkbox, radio or option is selected
    fn is_selected(&self) -> LocalizarResult<bool>;

    /// Position and size on the page
    fn bounding_box(&self) -> LocalizarResult<BoundingBox>;

    /// Click the element
    fn click(&self) -> LocalizarResult<()>;

    /// Type text into the element
    fn send_keys(&self, text: &str) -> LocalizarResult<()>;

    /// Clear an editable element
    fn clear(&self) -> LocalizarResult<()>;

    /// Submit the form the element belongs to
    fn submit(&self) -> LocalizarResult<()>;
}

/// Bounding box for an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
