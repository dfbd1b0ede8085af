//! The read-only view of an element that selectors are matched against.

use sift_dom::ElementRef;

/// An element of a markup tree, as seen by the matcher and by compiled
/// selector tests.
///
/// Implementations are cheap handles (`Copy` in practice): navigation returns
/// new handles by value.
pub trait Element: Sized {
    /// The `id` attribute.
    fn id(&self) -> Option<&str>;

    /// The distinct class names of the `class` attribute, in order.
    fn classes(&self) -> impl Iterator<Item = &str>;

    /// Local name as stored in the tree.
    fn local_name(&self) -> &str;

    /// Namespace URL; the empty string means no namespace.
    fn namespace_url(&self) -> &str;

    /// Attribute value by name. Namespaced attributes use `{url}name` keys.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Every `(name, value)` attribute pair.
    fn attributes(&self) -> impl Iterator<Item = (&str, &str)>;

    /// Whether the element has a `lang` attribute of its own.
    fn has_lang_attr(&self) -> bool {
        self.attribute("lang").is_some()
    }

    /// The parent, if it is an element.
    fn parent_element(&self) -> Option<Self>;

    /// The closest preceding sibling that is an element.
    fn previous_sibling_element(&self) -> Option<Self>;

    /// The closest following sibling that is an element.
    fn next_sibling_element(&self) -> Option<Self>;

    /// Whether this is the root element of its document.
    fn is_root(&self) -> bool {
        self.parent_element().is_none()
    }

    /// No element children and no text content.
    fn is_empty(&self) -> bool;

    /// Whether the element lives in an HTML document, where type selectors
    /// and attribute names compare case-insensitively.
    fn in_html_document(&self) -> bool;

    /// The language the element is in, inherited from its ancestors.
    fn lang(&self) -> Option<&str>;
}

impl Element for ElementRef<'_> {
    fn id(&self) -> Option<&str> {
        self.data().id()
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.data().classes().into_iter()
    }

    fn local_name(&self) -> &str {
        &self.data().local_name
    }

    fn namespace_url(&self) -> &str {
        &self.data().namespace_url
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.data().attr(name)
    }

    fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data()
            .attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn parent_element(&self) -> Option<Self> {
        ElementRef::parent_element(self)
    }

    fn previous_sibling_element(&self) -> Option<Self> {
        ElementRef::previous_sibling_element(self)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        ElementRef::next_sibling_element(self)
    }

    fn is_empty(&self) -> bool {
        ElementRef::is_empty(self)
    }

    fn in_html_document(&self) -> bool {
        ElementRef::in_html_document(self)
    }

    fn lang(&self) -> Option<&str> {
        ElementRef::lang(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_dom::{DomTree, ElementData, NodeId};

    #[test]
    fn test_element_ref_view() {
        let mut tree = DomTree::new();
        let html = tree.append_element(NodeId::ROOT, ElementData::new("html").with_attr("lang", "en"));
        let div = tree.append_element(
            html,
            ElementData::new("div")
                .with_attr("id", "main")
                .with_attr("class", "a b a"),
        );

        let div = tree.element(div).unwrap();
        assert_eq!(Element::id(&div), Some("main"));
        assert_eq!(div.classes().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(div.local_name(), "div");
        assert_eq!(div.namespace_url(), "");
        assert!(!div.has_lang_attr());
        assert_eq!(Element::lang(&div), Some("en"));
        assert!(!Element::is_root(&div));

        let root = Element::parent_element(&div).unwrap();
        assert!(root.is_root());
        assert!(root.has_lang_attr());
        assert_eq!(root.attributes().count(), 1);
    }
}
