//! Namespace prefix declarations used while compiling selectors.

use std::collections::HashMap;

use crate::error::SelectorError;

/// [§ 5.3 Namespaces in Selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
///
/// The `@namespace` context a selector list is compiled in: an optional
/// default namespace plus a prefix → URL map.
///
/// ```
/// use sift_select::Namespaces;
///
/// let namespaces = Namespaces::new()
///     .with_default("http://www.w3.org/1999/xhtml")
///     .with_prefix("svg", "http://www.w3.org/2000/svg");
/// assert_eq!(namespaces.resolve("svg").unwrap(), "http://www.w3.org/2000/svg");
/// assert!(namespaces.resolve("math").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    default: Option<String>,
    prefixes: HashMap<String, String>,
}

impl Namespaces {
    /// No default namespace and no declared prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `url` the default namespace.
    ///
    /// It is only applied to compound selectors that contain a type or
    /// universal selector; `.foo` alone still matches in every namespace.
    #[must_use]
    pub fn with_default(mut self, url: impl Into<String>) -> Self {
        self.default = Some(url.into());
        self
    }

    /// Declare `prefix` as an alias for `url`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, url: impl Into<String>) -> Self {
        let _ = self.prefixes.insert(prefix.into(), url.into());
        self
    }

    /// The declared default namespace, if any.
    #[must_use]
    pub fn default_namespace(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Look up a declared prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UndeclaredNamespace`] for unknown prefixes.
    pub fn resolve(&self, prefix: &str) -> Result<&str, SelectorError> {
        self.prefixes
            .get(prefix)
            .map(String::as_str)
            .ok_or_else(|| SelectorError::UndeclaredNamespace(prefix.to_string()))
    }
}
