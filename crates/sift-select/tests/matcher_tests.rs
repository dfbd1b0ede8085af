//! Integration tests for the Matcher index over real DOM trees.

use std::collections::HashMap;
use std::thread;

use sift_dom::{DomTree, ElementData, NodeId};
use sift_select::{
    Match, Matcher, Namespaces, PseudoElement, Specificity, compile_selector_list,
};

fn make_element(tag: &str, id: Option<&str>, classes: &[&str]) -> ElementData {
    let mut data = ElementData::new(tag);
    if let Some(id_val) = id {
        data = data.with_attr("id", id_val);
    }
    if !classes.is_empty() {
        data = data.with_attr("class", classes.join(" "));
    }
    data
}

/// Build a matcher from `(selector list, payload)` rules in source order.
fn build_matcher<P: Clone>(rules: &[(&str, P)]) -> Matcher<P> {
    let namespaces = Namespaces::new();
    let mut matcher = Matcher::new();
    for (selectors, payload) in rules {
        let compiled = compile_selector_list(selectors, &namespaces).unwrap();
        matcher.add_selectors(compiled, payload.clone());
    }
    matcher
}

fn payloads<P: Copy>(matches: &[Match<'_, P>]) -> Vec<P> {
    matches.iter().map(|m| *m.payload).collect()
}

#[test]
fn test_matches_come_back_in_cascade_order() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
    let p = tree.append_element(body, make_element("p", Some("lead"), &["intro", "big"]));

    let matcher = build_matcher(&[
        ("#lead", "id"),
        (".big", "big"),
        ("p", "type"),
        ("body > p", "child"),
        (".intro", "intro"),
        ("*", "universal"),
        ("p.intro", "compound"),
    ]);

    let element = tree.element(p).unwrap();
    let matches = matcher.match_element(&element);
    assert_eq!(
        payloads(&matches),
        vec!["universal", "type", "child", "big", "intro", "compound", "id"]
    );

    // Folding left over the results lets the winner come last.
    let mut color: HashMap<&str, &str> = HashMap::new();
    for m in &matches {
        let _ = color.insert("color", *m.payload);
    }
    assert_eq!(color.get("color"), Some(&"id"));
}

#[test]
fn test_equal_specificity_keeps_insertion_order() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, make_element("div", None, &["b", "a"]));

    let matcher = build_matcher(&[(".a", 1), (".b", 2), (".a", 3)]);
    let element = tree.element(div).unwrap();
    let matches = matcher.match_element(&element);

    assert_eq!(payloads(&matches), vec![1, 2, 3]);
    assert_eq!(
        matches.iter().map(|m| m.order).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_selector_list_shares_payload() {
    let mut tree = DomTree::new();
    let h1 = tree.append_element(NodeId::ROOT, ElementData::new("h1"));
    let h2 = tree.append_element(NodeId::ROOT, ElementData::new("h2"));
    let h3 = tree.append_element(NodeId::ROOT, ElementData::new("h3"));

    let matcher = build_matcher(&[("h1, h2", "heading")]);
    assert_eq!(matcher.order(), 2);
    assert_eq!(matcher.len(), 2);

    for (node, expected) in [(h1, 1), (h2, 1), (h3, 0)] {
        let element = tree.element(node).unwrap();
        let matches = matcher.match_element(&element);
        assert_eq!(matches.len(), expected);
        assert!(matches.iter().all(|m| *m.payload == "heading"));
    }
}

#[test]
fn test_never_matching_selectors_still_consume_order() {
    let mut tree = DomTree::new();
    let a = tree.append_element(NodeId::ROOT, ElementData::new("a").with_attr("href", "/"));

    let matcher = build_matcher(&[("a:hover", "hover"), ("a:link", "link"), ("[href^='']", "empty-prefix")]);
    assert_eq!(matcher.order(), 3);
    assert_eq!(matcher.len(), 1);

    let element = tree.element(a).unwrap();
    let matches = matcher.match_element(&element);
    assert_eq!(payloads(&matches), vec!["link"]);
    assert_eq!(matches[0].order, 2);
}

#[test]
fn test_candidates_still_run_the_full_test() {
    // div.a > div.b > div.b > span.c
    let mut tree = DomTree::new();
    let outer = tree.append_element(NodeId::ROOT, make_element("div", None, &["a"]));
    let b1 = tree.append_element(outer, make_element("div", None, &["b"]));
    let b2 = tree.append_element(b1, make_element("div", None, &["b"]));
    let span = tree.append_element(b2, make_element("span", None, &["c"]));

    let matcher = build_matcher(&[
        (".a > .b .c", "nested"),
        (".a > .c", "direct"),
        ("div span", "type"),
    ]);

    let element = tree.element(span).unwrap();
    assert_eq!(payloads(&matcher.match_element(&element)), vec!["type", "nested"]);

    let outer_element = tree.element(outer).unwrap();
    assert!(matcher.match_element(&outer_element).is_empty());
}

#[test]
fn test_type_bucket_is_case_insensitive_in_html() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
    let matcher = build_matcher(&[("DIV", "upper"), ("div", "lower")]);

    let element = tree.element(div).unwrap();
    assert_eq!(payloads(&matcher.match_element(&element)), vec!["upper", "lower"]);
}

#[test]
fn test_type_bucket_still_respects_case_in_xml() {
    let mut tree = DomTree::new_xml();
    let node = tree.append_element(NodeId::ROOT, ElementData::new("clipPath"));
    let matcher = build_matcher(&[("clipPath", "exact"), ("clippath", "folded")]);

    // Both land in the same lowercase bucket; only the exact name passes.
    assert_eq!(matcher.len(), 2);
    let element = tree.element(node).unwrap();
    assert_eq!(payloads(&matcher.match_element(&element)), vec!["exact"]);
}

#[test]
fn test_namespace_and_lang_buckets() {
    const SVG: &str = "http://www.w3.org/2000/svg";
    let namespaces = Namespaces::new().with_prefix("svg", SVG);
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div").with_attr("lang", "en"));
    let svg = tree.append_element(div, ElementData::new("svg").with_namespace(SVG));
    let p = tree.append_element(div, ElementData::new("p"));

    let mut matcher = Matcher::new();
    for (selectors, payload) in [("svg|*", "svg"), ("[lang]", "lang"), (":lang(en)", "lang-pseudo")] {
        matcher.add_selectors(compile_selector_list(selectors, &namespaces).unwrap(), payload);
    }

    let svg_element = tree.element(svg).unwrap();
    assert_eq!(payloads(&matcher.match_element(&svg_element)), vec!["svg", "lang-pseudo"]);

    let div_element = tree.element(div).unwrap();
    assert_eq!(payloads(&matcher.match_element(&div_element)), vec!["lang", "lang-pseudo"]);

    // Inherits the language without carrying the attribute.
    let p_element = tree.element(p).unwrap();
    assert_eq!(payloads(&matcher.match_element(&p_element)), vec!["lang-pseudo"]);
}

#[test]
fn test_nth_child_with_extreme_offset() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
    let first = tree.append_element(div, ElementData::new("p"));
    let second = tree.append_element(div, ElementData::new("p"));

    let matcher = build_matcher(&[
        (":nth-child(2n-2147483647)", "odd"),
        ("p:nth-child(-n+2147483647)", "all"),
    ]);

    let first_element = tree.element(first).unwrap();
    assert_eq!(payloads(&matcher.match_element(&first_element)), vec!["odd", "all"]);
    let second_element = tree.element(second).unwrap();
    assert_eq!(payloads(&matcher.match_element(&second_element)), vec!["all"]);
}

#[test]
fn test_pseudo_elements_are_reported_not_filtered() {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, ElementData::new("p"));
    let matcher = build_matcher(&[("p::before", "before"), ("p", "plain"), ("p:after", "after")]);

    let element = tree.element(p).unwrap();
    let matches = matcher.match_element(&element);
    let summary: Vec<_> = matches
        .iter()
        .map(|m| (*m.payload, m.pseudo_element, m.specificity))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("plain", None, Specificity::new(0, 0, 1)),
            ("before", Some(PseudoElement::Before), Specificity::new(0, 0, 2)),
            ("after", Some(PseudoElement::After), Specificity::new(0, 0, 2)),
        ]
    );
}

#[test]
fn test_shared_matcher_across_threads() {
    let mut tree = DomTree::new();
    let list = tree.append_element(NodeId::ROOT, ElementData::new("ul"));
    let items: Vec<NodeId> = (0..8)
        .map(|i| {
            let class = if i % 2 == 0 { "even" } else { "odd" };
            tree.append_element(list, make_element("li", None, &[class]))
        })
        .collect();

    let matcher = build_matcher(&[("li", 1_u32), (".odd", 10), ("ul > li:first-child", 100)]);

    let totals: Vec<u32> = thread::scope(|scope| {
        let handles: Vec<_> = items
            .iter()
            .map(|&node| {
                let tree = &tree;
                let matcher = &matcher;
                scope.spawn(move || {
                    let element = tree.element(node).unwrap();
                    matcher
                        .match_element(&element)
                        .iter()
                        .map(|m| *m.payload)
                        .sum::<u32>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(totals, vec![101, 11, 1, 11, 1, 11, 1, 11]);
}

#[test]
fn test_match_serializes_to_json() {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, make_element("p", None, &["note"]));
    let matcher = build_matcher(&[("p.note::first-line", "rule-1")]);

    let element = tree.element(p).unwrap();
    let matches = matcher.match_element(&element);
    let json = serde_json::to_value(&matches).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "specificity": [0, 1, 2],
            "order": 1,
            "pseudo_element": "first-line",
            "payload": "rule-1",
        }])
    );
}
