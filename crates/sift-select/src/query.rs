//! `querySelector`-style lookups over a subtree.
//!
//! These bypass the [`Matcher`](crate::Matcher): every element is tested
//! against every selector, which is the right trade-off for one-off queries.

use sift_dom::ElementRef;

use crate::compiled::{CompiledSelector, SelectorTest};

/// [DOM § 4.2.6](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
///
/// Every element of `root`'s subtree, `root` included, matched by at least
/// one of `selectors`, in document order. Pseudo-elements are ignored: a
/// selector like `p::before` yields the `p` elements.
pub fn query_all<'a, T: SelectorTest>(
    root: ElementRef<'a>,
    selectors: &[CompiledSelector<T>],
) -> impl Iterator<Item = ElementRef<'a>> {
    root.iter_subtree()
        .filter(move |element| selectors.iter().any(|selector| selector.test.matches(element)))
}

/// The first element [`query_all`] would yield.
#[must_use]
pub fn query<'a, T: SelectorTest>(
    root: ElementRef<'a>,
    selectors: &[CompiledSelector<T>],
) -> Option<ElementRef<'a>> {
    query_all(root, selectors).next()
}
