//! Borrowed element handles.
//!
//! Selector matching walks from an element to its parent and siblings, and
//! only ever stops on elements. [`ElementRef`] packages a tree reference with
//! an element id so these walks read naturally and skip text and comment
//! nodes.

use crate::{DomTree, ElementData, HTML_NAMESPACE, NodeId, NodeType, XML_NAMESPACE};

/// A borrowed handle to an element node in a [`DomTree`].
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    node_id: NodeId,
    data: &'a ElementData,
}

impl<'a> ElementRef<'a> {
    /// Wrap `node_id` if it refers to an element of `tree`.
    #[must_use]
    pub fn new(tree: &'a DomTree, node_id: NodeId) -> Option<Self> {
        tree.as_element(node_id).map(|data| Self {
            tree,
            node_id,
            data,
        })
    }

    /// The tree this element belongs to.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The element's node id.
    #[must_use]
    pub const fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// The element's name, namespace and attributes.
    #[must_use]
    pub const fn data(&self) -> &'a ElementData {
        self.data
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#parent-element)
    ///
    /// "A node's parent element is its parent if its parent is an element,
    /// and null otherwise."
    #[must_use]
    pub fn parent_element(&self) -> Option<Self> {
        self.tree
            .parent(self.node_id)
            .and_then(|parent| Self::new(self.tree, parent))
    }

    /// [§ 4.2.6](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-previouselementsibling)
    ///
    /// "The previousElementSibling getter steps are to return the first
    /// preceding sibling of this that is an element; otherwise null."
    #[must_use]
    pub fn previous_sibling_element(&self) -> Option<Self> {
        let mut current = self.tree.prev_sibling(self.node_id);
        while let Some(id) = current {
            if let Some(element) = Self::new(self.tree, id) {
                return Some(element);
            }
            current = self.tree.prev_sibling(id);
        }
        None
    }

    /// [§ 4.2.6](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-nextelementsibling)
    ///
    /// "The nextElementSibling getter steps are to return the first
    /// following sibling of this that is an element; otherwise null."
    #[must_use]
    pub fn next_sibling_element(&self) -> Option<Self> {
        let mut current = self.tree.next_sibling(self.node_id);
        while let Some(id) = current {
            if let Some(element) = Self::new(self.tree, id) {
                return Some(element);
            }
            current = self.tree.next_sibling(id);
        }
        None
    }

    /// Child elements in document order.
    pub fn element_children(&self) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
        let tree = self.tree;
        tree.children(self.node_id)
            .iter()
            .filter_map(move |&id| ElementRef::new(tree, id))
    }

    /// [Selectors 4 § 13.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    ///
    /// "The :empty pseudo-class represents an element that has no children
    /// except, optionally, document white space characters."
    ///
    /// Whitespace-only text counts as content here, as in Selectors Level 3;
    /// comments never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree
            .children(self.node_id)
            .iter()
            .all(|&id| match self.tree.get(id).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => text.is_empty(),
                Some(NodeType::Comment(_)) | None => true,
                Some(NodeType::Element(_) | NodeType::Document) => false,
            })
    }

    /// Whether the owning document is an HTML document.
    #[must_use]
    pub const fn in_html_document(&self) -> bool {
        self.tree.is_html_document()
    }

    /// [HTML § 3.2.6.2 The lang and xml:lang attributes](https://html.spec.whatwg.org/multipage/dom.html#the-lang-and-xml:lang-attributes)
    ///
    /// "To determine the language of a node, user agents must look at the
    /// nearest ancestor element (including the element itself if the node is
    /// an element) that has a lang attribute in the XML namespace set or is an
    /// HTML element and has a lang in no namespace attribute set."
    #[must_use]
    pub fn lang(&self) -> Option<&'a str> {
        let xml_lang = format!("{{{XML_NAMESPACE}}}lang");
        let mut current = Some(*self);
        while let Some(element) = current {
            let data = element.data;
            if let Some(lang) = data.attr(&xml_lang) {
                return Some(lang);
            }
            let is_html = self.in_html_document() || data.namespace_url == HTML_NAMESPACE;
            if is_html {
                if let Some(lang) = data.attr("lang") {
                    return Some(lang);
                }
            }
            current = element.parent_element();
        }
        None
    }

    /// This element followed by all of its descendant elements, in document
    /// (pre-)order.
    #[must_use]
    pub fn iter_subtree(&self) -> Subtree<'a> {
        Subtree {
            tree: self.tree,
            stack: vec![self.node_id],
        }
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.node_id == other.node_id
    }
}

impl Eq for ElementRef<'_> {}

/// Pre-order iterator over an element and its descendant elements.
pub struct Subtree<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Subtree<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            self.stack
                .extend(self.tree.children(id).iter().rev().copied());
            if let Some(element) = ElementRef::new(self.tree, id) {
                return Some(element);
            }
        }
        None
    }
}
