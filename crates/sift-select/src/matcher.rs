//! The selector index.
//!
//! Every selector is filed under the most selective key it exposes (id, then
//! class, then local name, then namespace, then "needs a `lang` attribute"),
//! or in a catch-all list when it exposes none. Matching an element then only
//! evaluates selectors from the buckets that element could possibly satisfy,
//! instead of every selector in the index.

use std::collections::HashMap;

use serde::Serialize;

use crate::compiled::{CompiledSelector, SelectorTest};
use crate::compiler::CompiledTest;
use crate::element::Element;
use crate::pseudo::PseudoElement;
use crate::specificity::Specificity;

/// One stored selector. Never mutated after insertion.
#[derive(Debug)]
struct Entry<T, P> {
    test: T,
    specificity: Specificity,
    order: u64,
    pseudo_element: Option<PseudoElement>,
    payload: P,
}

/// A selector that matched, as returned by [`Matcher::match_element`].
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Match<'a, P> {
    /// Specificity of the matching selector.
    pub specificity: Specificity,
    /// Insertion order of the selector, starting at 1.
    pub order: u64,
    /// Pseudo-element the selector targets, if any.
    pub pseudo_element: Option<PseudoElement>,
    /// The payload the selector was added with.
    pub payload: &'a P,
}

impl<P> Clone for Match<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Match<'_, P> {}

type Bucket<T, P> = Vec<Entry<T, P>>;

/// An index of compiled selectors, each carrying a payload of type `P`.
///
/// Built with [`add_selector`](Self::add_selector), then queried with
/// [`match_element`](Self::match_element) as many times as needed, from as
/// many threads as needed.
///
/// ```
/// use sift_dom::{DomTree, ElementData, NodeId};
/// use sift_select::{Matcher, Namespaces, compile_selector_list};
///
/// let mut matcher = Matcher::new();
/// let namespaces = Namespaces::new();
/// matcher.add_selectors(compile_selector_list("p", &namespaces).unwrap(), "paragraph");
/// matcher.add_selectors(compile_selector_list(".lead", &namespaces).unwrap(), "lead");
///
/// let mut tree = DomTree::new();
/// let p = tree.append_element(NodeId::ROOT, ElementData::new("p").with_attr("class", "lead"));
///
/// let payloads: Vec<&str> = matcher
///     .match_element(&tree.element(p).unwrap())
///     .iter()
///     .map(|m| *m.payload)
///     .collect();
/// assert_eq!(payloads, ["paragraph", "lead"]);
/// ```
#[derive(Debug)]
pub struct Matcher<P, T = CompiledTest> {
    id_selectors: HashMap<String, Bucket<T, P>>,
    class_selectors: HashMap<String, Bucket<T, P>>,
    lower_local_name_selectors: HashMap<String, Bucket<T, P>>,
    namespace_selectors: HashMap<String, Bucket<T, P>>,
    lang_attr_selectors: Bucket<T, P>,
    other_selectors: Bucket<T, P>,
    order: u64,
}

impl<P, T> Default for Matcher<P, T> {
    fn default() -> Self {
        Self {
            id_selectors: HashMap::new(),
            class_selectors: HashMap::new(),
            lower_local_name_selectors: HashMap::new(),
            namespace_selectors: HashMap::new(),
            lang_attr_selectors: Vec::new(),
            other_selectors: Vec::new(),
            order: 0,
        }
    }
}

impl<P, T> Matcher<P, T> {
    /// An empty index whose insertion counter starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one selector with its payload.
    ///
    /// The insertion counter advances on every call. Selectors flagged
    /// `never_matches` are then dropped without being stored.
    pub fn add_selector(&mut self, selector: CompiledSelector<T>, payload: P) {
        self.order += 1;
        if selector.never_matches {
            return;
        }

        let CompiledSelector {
            test,
            specificity,
            id,
            class_name,
            local_name,
            lower_local_name,
            namespace,
            requires_lang_attr,
            pseudo_element,
            ..
        } = selector;
        let entry = Entry {
            test,
            specificity,
            order: self.order,
            pseudo_element,
            payload,
        };

        if let Some(id) = id {
            self.id_selectors.entry(id).or_default().push(entry);
        } else if let Some(class_name) = class_name {
            self.class_selectors.entry(class_name).or_default().push(entry);
        } else if let Some(local_name) = local_name {
            let key = lower_local_name.unwrap_or_else(|| local_name.to_ascii_lowercase());
            self.lower_local_name_selectors
                .entry(key)
                .or_default()
                .push(entry);
        } else if let Some(namespace) = namespace {
            self.namespace_selectors
                .entry(namespace)
                .or_default()
                .push(entry);
        } else if requires_lang_attr {
            self.lang_attr_selectors.push(entry);
        } else {
            self.other_selectors.push(entry);
        }
    }

    /// Add every selector of a list, each with its own clone of `payload`.
    /// This is how one style rule with a comma-separated selector list is
    /// registered.
    pub fn add_selectors<I>(&mut self, selectors: I, payload: P)
    where
        I: IntoIterator<Item = CompiledSelector<T>>,
        P: Clone,
    {
        for selector in selectors {
            self.add_selector(selector, payload.clone());
        }
    }

    /// Number of `add_selector` calls so far, dropped selectors included.
    #[must_use]
    pub const fn order(&self) -> u64 {
        self.order
    }

    /// Number of stored selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        let keyed: usize = [
            &self.id_selectors,
            &self.class_selectors,
            &self.lower_local_name_selectors,
            &self.namespace_selectors,
        ]
        .iter()
        .flat_map(|map| map.values())
        .map(Vec::len)
        .sum();
        keyed + self.lang_attr_selectors.len() + self.other_selectors.len()
    }

    /// Whether no selector is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P, T: SelectorTest> Matcher<P, T> {
    /// Every stored selector that matches `element`, sorted ascending by
    /// `(specificity, order)`.
    ///
    /// Applying the results in order and letting later ones override earlier
    /// ones gives cascade order: the most specific, latest selector is last.
    #[must_use]
    pub fn match_element<E: Element>(&self, element: &E) -> Vec<Match<'_, P>> {
        let mut candidates: Vec<&[Entry<T, P>]> = Vec::new();
        if let Some(id) = element.id() {
            candidates.push(bucket(&self.id_selectors, id));
        }
        for class_name in element.classes() {
            candidates.push(bucket(&self.class_selectors, class_name));
        }
        candidates.push(bucket(
            &self.lower_local_name_selectors,
            &element.local_name().to_ascii_lowercase(),
        ));
        candidates.push(bucket(&self.namespace_selectors, element.namespace_url()));
        if element.has_lang_attr() {
            candidates.push(&self.lang_attr_selectors);
        }
        candidates.push(&self.other_selectors);

        let mut results: Vec<Match<'_, P>> = candidates
            .iter()
            .flat_map(|entries| entries.iter())
            .filter(|entry| entry.test.matches(element))
            .map(|entry| Match {
                specificity: entry.specificity,
                order: entry.order,
                pseudo_element: entry.pseudo_element,
                payload: &entry.payload,
            })
            .collect();
        results.sort_by_key(|m| (m.specificity, m.order));

        #[cfg(feature = "match-trace")]
        eprintln!(
            "[MATCH] <{}> {} candidates, {} matched",
            element.local_name(),
            candidates.iter().map(|entries| entries.len()).sum::<usize>(),
            results.len()
        );

        results
    }
}

fn bucket<'m, T, P>(map: &'m HashMap<String, Bucket<T, P>>, key: &str) -> &'m [Entry<T, P>] {
    map.get(key).map_or(&[], Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_selector_list;
    use crate::namespaces::Namespaces;

    /// Minimal element: no tree around it.
    #[derive(Debug, Clone, Copy, Default)]
    struct FakeElement<'a> {
        id: Option<&'a str>,
        classes: &'a [&'a str],
        local_name: &'a str,
        namespace_url: &'a str,
        lang: Option<&'a str>,
    }

    impl Element for FakeElement<'_> {
        fn id(&self) -> Option<&str> {
            self.id
        }
        fn classes(&self) -> impl Iterator<Item = &str> {
            self.classes.iter().copied()
        }
        fn local_name(&self) -> &str {
            self.local_name
        }
        fn namespace_url(&self) -> &str {
            self.namespace_url
        }
        fn attribute(&self, name: &str) -> Option<&str> {
            match name {
                "id" => self.id,
                "lang" => self.lang,
                _ => None,
            }
        }
        fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
            self.id.map(|id| ("id", id)).into_iter()
        }
        fn parent_element(&self) -> Option<Self> {
            None
        }
        fn previous_sibling_element(&self) -> Option<Self> {
            None
        }
        fn next_sibling_element(&self) -> Option<Self> {
            None
        }
        fn is_empty(&self) -> bool {
            true
        }
        fn in_html_document(&self) -> bool {
            true
        }
        fn lang(&self) -> Option<&str> {
            self.lang
        }
    }

    /// Hand-built predicates, so the index is tested without the compiler.
    #[derive(Debug, Clone, Copy)]
    enum Fixture {
        Always,
        Never,
        LocalName(&'static str),
    }

    impl SelectorTest for Fixture {
        fn matches<E: Element>(&self, element: &E) -> bool {
            match self {
                Self::Always => true,
                Self::Never => false,
                Self::LocalName(name) => element.local_name() == *name,
            }
        }
    }

    fn selector(test: Fixture, specificity: Specificity) -> CompiledSelector<Fixture> {
        CompiledSelector::new(test, specificity)
    }

    fn payloads(matches: &[Match<'_, &'static str>]) -> Vec<&'static str> {
        matches.iter().map(|m| *m.payload).collect()
    }

    #[test]
    fn test_id_and_tag_sorted_by_specificity() {
        let mut matcher = Matcher::new();
        matcher.add_selector(
            selector(Fixture::Always, Specificity(1, 0, 0)).with_id("nav"),
            "A",
        );
        matcher.add_selector(
            selector(Fixture::Always, Specificity(0, 0, 1)).with_local_name("div"),
            "B",
        );

        let element = FakeElement {
            id: Some("nav"),
            local_name: "div",
            ..FakeElement::default()
        };
        assert_eq!(payloads(&matcher.match_element(&element)), vec!["B", "A"]);
    }

    #[test]
    fn test_never_matching_selector_is_dropped_but_counted() {
        let mut matcher = Matcher::new();
        matcher.add_selector(selector(Fixture::Always, Specificity(0, 0, 0)), "kept");
        matcher.add_selector(
            selector(Fixture::Always, Specificity(0, 1, 0)).never_matching(),
            "C",
        );

        assert_eq!(matcher.order(), 2);
        assert_eq!(matcher.len(), 1);
        assert!(matcher.other_selectors.iter().all(|e| e.payload != "C"));

        let element = FakeElement {
            local_name: "p",
            ..FakeElement::default()
        };
        assert_eq!(payloads(&matcher.match_element(&element)), vec!["kept"]);
    }

    #[test]
    fn test_equal_specificity_keeps_insertion_order() {
        let mut matcher = Matcher::new();
        matcher.add_selector(
            selector(Fixture::Always, Specificity(0, 1, 0)).with_class_name("warn"),
            "D",
        );
        matcher.add_selector(
            selector(Fixture::Always, Specificity(0, 1, 0)).with_class_name("error"),
            "E",
        );

        // Bucket visiting order follows the element's class order, so the sort
        // has to restore insertion order.
        let element = FakeElement {
            classes: &["error", "warn"],
            local_name: "p",
            ..FakeElement::default()
        };
        let matches = matcher.match_element(&element);
        assert_eq!(payloads(&matches), vec!["D", "E"]);
        assert_eq!(matches[0].order, 1);
        assert_eq!(matches[1].order, 2);
    }

    #[test]
    fn test_unrelated_buckets_give_empty_result() {
        let mut matcher = Matcher::new();
        matcher.add_selector(
            selector(Fixture::Always, Specificity(1, 0, 0)).with_id("main"),
            "id",
        );
        matcher.add_selector(
            selector(Fixture::Always, Specificity(0, 1, 0)).requiring_lang_attr(),
            "lang",
        );

        let span = FakeElement {
            local_name: "span",
            ..FakeElement::default()
        };
        assert!(matcher.match_element(&span).is_empty());

        // The same element with a lang attribute reaches the lang bucket.
        let span_with_lang = FakeElement {
            lang: Some("en"),
            ..span
        };
        assert_eq!(payloads(&matcher.match_element(&span_with_lang)), vec!["lang"]);
    }

    #[test]
    fn test_bucket_priority() {
        let mut matcher: Matcher<&str, Fixture> = Matcher::new();
        let spec = Specificity::default();
        matcher.add_selector(
            selector(Fixture::Always, spec)
                .with_id("i")
                .with_class_name("c")
                .with_local_name("Div")
                .with_namespace("urn:x")
                .requiring_lang_attr(),
            "id",
        );
        matcher.add_selector(
            selector(Fixture::Always, spec)
                .with_class_name("c")
                .with_local_name("Div"),
            "class",
        );
        matcher.add_selector(
            selector(Fixture::Always, spec)
                .with_local_name("Div")
                .with_namespace("urn:x"),
            "tag",
        );
        matcher.add_selector(
            selector(Fixture::Always, spec)
                .with_namespace("urn:x")
                .requiring_lang_attr(),
            "namespace",
        );
        matcher.add_selector(selector(Fixture::Always, spec).requiring_lang_attr(), "lang");
        matcher.add_selector(selector(Fixture::Always, spec), "other");

        assert_eq!(matcher.id_selectors["i"][0].payload, "id");
        assert_eq!(matcher.class_selectors["c"][0].payload, "class");
        assert_eq!(matcher.lower_local_name_selectors["div"][0].payload, "tag");
        assert_eq!(matcher.namespace_selectors["urn:x"][0].payload, "namespace");
        assert_eq!(matcher.lang_attr_selectors[0].payload, "lang");
        assert_eq!(matcher.other_selectors[0].payload, "other");
        assert_eq!(matcher.len(), 6);
    }

    #[test]
    fn test_local_name_key_lowercased_when_missing() {
        let mut matcher = Matcher::new();
        let mut hand_built = selector(Fixture::LocalName("svg"), Specificity(0, 0, 1));
        hand_built.local_name = Some("SVG".to_string());
        matcher.add_selector(hand_built, "svg");

        assert!(matcher.lower_local_name_selectors.contains_key("svg"));
        let element = FakeElement {
            local_name: "svg",
            ..FakeElement::default()
        };
        assert_eq!(payloads(&matcher.match_element(&element)), vec!["svg"]);
    }

    #[test]
    fn test_candidate_test_is_still_evaluated() {
        let mut matcher = Matcher::new();
        matcher.add_selector(
            selector(Fixture::Never, Specificity(0, 1, 0)).with_class_name("x"),
            "fails",
        );
        matcher.add_selector(
            selector(Fixture::LocalName("a"), Specificity(0, 0, 1)).with_local_name("a"),
            "a",
        );

        let element = FakeElement {
            classes: &["x"],
            local_name: "b",
            ..FakeElement::default()
        };
        assert!(matcher.match_element(&element).is_empty());
    }

    #[test]
    fn test_match_element_is_idempotent() {
        let mut matcher = Matcher::new();
        matcher.add_selector(selector(Fixture::Always, Specificity(0, 0, 0)), "*");
        matcher.add_selector(
            selector(Fixture::Always, Specificity(0, 0, 1)).with_local_name("p"),
            "p",
        );

        let element = FakeElement {
            local_name: "P",
            ..FakeElement::default()
        };
        let first = matcher.match_element(&element);
        let second = matcher.match_element(&element);
        assert_eq!(first, second);
        assert_eq!(payloads(&first), vec!["*", "p"]);
    }

    #[test]
    fn test_new_matcher_starts_counting_from_zero() {
        let selectors = compile_selector_list("a, b:hover, c", &Namespaces::new()).unwrap();
        let mut first: Matcher<()> = Matcher::new();
        first.add_selectors(selectors, ());
        assert_eq!(first.len(), 2);

        let second: Matcher<()> = Matcher::default();
        assert_eq!(first.order(), 3);
        assert_eq!(second.order(), 0);
        assert!(second.is_empty());
    }
}
