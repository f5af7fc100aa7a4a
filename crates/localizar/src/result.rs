//! Result and error types for Localizar.

use thiserror::Error;

use crate::by::By;

/// Result type for Localizar operations
pub type LocalizarResult<T> = Result<T, LocalizarError>;

/// Errors that can occur while declaring, planning or resolving page members
#[derive(Debug, Error)]
pub enum LocalizarError {
    /// No descriptor matched; `tried` keeps the attempt order
    #[error("Could not find element by: {}", join_tried(.tried))]
    ElementNotFound {
        /// Descriptors tried, in the order they were attempted
        tried: Vec<By>,
    },

    /// Invalid argument passed to a locator or page factory
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Malformed member declaration (e.g. sequence and all on one member)
    #[error("Invalid declaration of member '{member}': {message}")]
    Configuration {
        /// Member name
        member: String,
        /// Error message
        message: String,
    },

    /// Every configuration-class error found while planning one page
    #[error("Page '{page}' has {} invalid member(s): {}", .errors.len(), join_errors(.errors))]
    InvalidPage {
        /// Page name
        page: String,
        /// Individual member errors, in declaration order
        errors: Vec<LocalizarError>,
    },

    /// Declared member type is none of the four decoratable shapes
    #[error("Type of member '{member}' is '{type_name}', which is not an element, an element list, a wrapper or a wrapper list")]
    UnsupportedMemberType {
        /// Member name
        member: String,
        /// Declared type name
        type_name: String,
    },

    /// Wrapper type offers no way to be built from an element
    #[error("Cannot create instance of type '{type_name}'")]
    UnsupportedWrapperType {
        /// Wrapper type name
        type_name: String,
    },

    /// Search context failure other than "no such element"
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl LocalizarError {
    /// Not-found error for a single descriptor
    #[must_use]
    pub fn not_found(by: By) -> Self {
        Self::ElementNotFound { tried: vec![by] }
    }

    /// Whether this is an [`LocalizarError::ElementNotFound`]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

fn join_tried(tried: &[By]) -> String {
    tried
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", or: ")
}

fn join_errors(errors: &[LocalizarError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
