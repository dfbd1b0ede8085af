//! Integration tests for subtree queries.

use sift_dom::{DomTree, ElementData, ElementRef, NodeId};
use sift_select::{Namespaces, compile_selector_list, query, query_all};

fn names<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements
        .map(|element| match element.data().id() {
            Some(id) => format!("{}#{id}", element.data().local_name),
            None => element.data().local_name.clone(),
        })
        .collect()
}

/// ```text
/// <section id="s">
///   <h2 id="title"></h2>
///   <div id="d1"><p id="p1"></p></div>
///   <p id="p2"><span id="inner"></span></p>
/// </section>
/// <footer><p id="p3"></p></footer>
/// ```
fn sample_tree() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let section = tree.append_element(NodeId::ROOT, ElementData::new("section").with_attr("id", "s"));
    let _ = tree.append_element(section, ElementData::new("h2").with_attr("id", "title"));
    let div = tree.append_element(section, ElementData::new("div").with_attr("id", "d1"));
    let _ = tree.append_element(div, ElementData::new("p").with_attr("id", "p1"));
    let p2 = tree.append_element(section, ElementData::new("p").with_attr("id", "p2"));
    let _ = tree.append_element(p2, ElementData::new("span").with_attr("id", "inner"));
    let footer = tree.append_element(NodeId::ROOT, ElementData::new("footer"));
    let _ = tree.append_element(footer, ElementData::new("p").with_attr("id", "p3"));
    (tree, section)
}

#[test]
fn test_query_all_in_document_order() {
    let (tree, section) = sample_tree();
    let root = tree.element(section).unwrap();
    let selectors = compile_selector_list("span, h2, p", &Namespaces::new()).unwrap();

    assert_eq!(
        names(query_all(root, &selectors)),
        vec!["h2#title", "p#p1", "p#p2", "span#inner"]
    );
}

#[test]
fn test_query_all_includes_root() {
    let (tree, section) = sample_tree();
    let root = tree.element(section).unwrap();
    let selectors = compile_selector_list("section, #p1", &Namespaces::new()).unwrap();

    assert_eq!(names(query_all(root, &selectors)), vec!["section#s", "p#p1"]);
}

#[test]
fn test_query_all_stays_inside_root() {
    let (tree, section) = sample_tree();
    let root = tree.element(section).unwrap();
    let selectors = compile_selector_list("footer p, p", &Namespaces::new()).unwrap();

    // #p3 lives outside the queried subtree.
    assert_eq!(names(query_all(root, &selectors)), vec!["p#p1", "p#p2"]);
}

#[test]
fn test_combinators_may_look_above_root() {
    let (tree, section) = sample_tree();
    let div = tree.element(section).unwrap().element_children().nth(1).unwrap();
    let selectors = compile_selector_list("section > div > p", &Namespaces::new()).unwrap();

    assert_eq!(names(query_all(div, &selectors)), vec!["p#p1"]);
}

#[test]
fn test_query_returns_first_match() {
    let (tree, section) = sample_tree();
    let root = tree.element(section).unwrap();

    let selectors = compile_selector_list("p:last-child, span", &Namespaces::new()).unwrap();
    let first = query(root, &selectors).unwrap();
    assert_eq!(first.data().id(), Some("p1"));

    let none = compile_selector_list("table", &Namespaces::new()).unwrap();
    assert!(query(root, &none).is_none());
}

#[test]
fn test_query_ignores_pseudo_elements() {
    let (tree, section) = sample_tree();
    let root = tree.element(section).unwrap();
    let selectors = compile_selector_list("p::before", &Namespaces::new()).unwrap();

    assert_eq!(names(query_all(root, &selectors)), vec!["p#p1", "p#p2"]);
}

#[test]
fn test_never_matching_selectors_yield_nothing() {
    let (tree, section) = sample_tree();
    let root = tree.element(section).unwrap();
    let selectors = compile_selector_list("p:hover, [id~='']", &Namespaces::new()).unwrap();

    assert_eq!(query_all(root, &selectors).count(), 0);
}
