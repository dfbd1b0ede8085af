//! Compiled selectors: the unit the [`Matcher`](crate::Matcher) indexes.

use crate::compiler::CompiledTest;
use crate::element::Element;
use crate::pseudo::PseudoElement;
use crate::specificity::Specificity;

/// The full "does this selector match this element" predicate.
///
/// The matcher treats it as opaque: combinators, structural pseudo-classes
/// and attribute logic all live behind this call.
pub trait SelectorTest {
    /// Whether `element` is matched.
    fn matches<E: Element>(&self, element: &E) -> bool;
}

/// A selector ready to be indexed: its test plus the static facts the index
/// files it by.
///
/// The key fields are hints taken from the subject compound. When present,
/// an element can only match if it carries that id, class, local name or
/// namespace; the index relies on this to skip irrelevant selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSelector<T = CompiledTest> {
    /// The predicate.
    pub test: T,
    /// Cascade weight.
    pub specificity: Specificity,
    /// Required id.
    pub id: Option<String>,
    /// A class the element must carry.
    pub class_name: Option<String>,
    /// Required local name, as written.
    pub local_name: Option<String>,
    /// `local_name`, ASCII-lowercased.
    pub lower_local_name: Option<String>,
    /// Required namespace URL; `Some("")` requires no namespace.
    pub namespace: Option<String>,
    /// The element must have a `lang` attribute.
    pub requires_lang_attr: bool,
    /// Proven unsatisfiable; the index drops it.
    pub never_matches: bool,
    /// Pseudo-element to report with matches.
    pub pseudo_element: Option<PseudoElement>,
}

impl<T> CompiledSelector<T> {
    /// A selector with no dispatch keys, which the index files in its
    /// catch-all bucket.
    #[must_use]
    pub const fn new(test: T, specificity: Specificity) -> Self {
        Self {
            test,
            specificity,
            id: None,
            class_name: None,
            local_name: None,
            lower_local_name: None,
            namespace: None,
            requires_lang_attr: false,
            never_matches: false,
            pseudo_element: None,
        }
    }

    /// Builder: set the id key.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set the class key.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Builder: set the local name key and its lowercase form.
    #[must_use]
    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        let local_name = local_name.into();
        self.lower_local_name = Some(local_name.to_ascii_lowercase());
        self.local_name = Some(local_name);
        self
    }

    /// Builder: set the namespace key.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Builder: mark the selector as needing a `lang` attribute.
    #[must_use]
    pub fn requiring_lang_attr(mut self) -> Self {
        self.requires_lang_attr = true;
        self
    }

    /// Builder: mark the selector as unsatisfiable.
    #[must_use]
    pub fn never_matching(mut self) -> Self {
        self.never_matches = true;
        self
    }

    /// Builder: attach a pseudo-element.
    #[must_use]
    pub fn with_pseudo_element(mut self, pseudo_element: PseudoElement) -> Self {
        self.pseudo_element = Some(pseudo_element);
        self
    }
}
