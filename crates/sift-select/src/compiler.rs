//! Selector compilation.
//!
//! A parsed complex selector is lowered to a tree of tests, evaluated from the
//! subject outwards. Constant parts are folded while the tree is built, so a
//! selector that can never match collapses to a single `Never` and is flagged
//! for the index to drop. The subject compound also yields the id, class,
//! local name and namespace keys the index files selectors by.

use std::iter::successors;

use sift_common::warning::warn_once;
use sift_dom::HTML_NAMESPACE;

use crate::compiled::{CompiledSelector, SelectorTest};
use crate::element::Element;
use crate::error::SelectorError;
use crate::namespaces::Namespaces;
use crate::parser::ast::{
    AttributeNamespace, AttributeOperator, AttributeSelector, Combinator, ComplexSelector,
    CompoundSelector, ParsedSelector, PseudoClass, SimpleSelector,
};
use crate::parser::parse_selector_list;

/// Compile a selector list in the given namespace context.
///
/// ```
/// use sift_select::{Namespaces, compile_selector_list};
///
/// let selectors = compile_selector_list("div.note, #main a:hover", &Namespaces::new()).unwrap();
/// assert_eq!(selectors[0].class_name.as_deref(), Some("note"));
/// assert!(selectors[1].never_matches);
/// ```
///
/// # Errors
///
/// Returns the first [`SelectorError`] found; one invalid selector rejects
/// the whole list.
pub fn compile_selector_list(
    input: &str,
    namespaces: &Namespaces,
) -> Result<Vec<CompiledSelector>, SelectorError> {
    Ok(parse_selector_list(input, namespaces)?
        .iter()
        .map(CompiledSelector::from_parsed)
        .collect())
}

impl CompiledSelector<CompiledTest> {
    /// Lower one parsed selector and extract its dispatch keys.
    ///
    /// Keys come from the subject compound only, and when a compound repeats
    /// a kind (`.a.b`), the last one wins.
    #[must_use]
    pub fn from_parsed(parsed: &ParsedSelector) -> Self {
        let test = CompiledTest(compile_complex(&parsed.complex));
        let mut selector = Self::new(test, parsed.specificity);
        selector.never_matches = selector.test.is_never();
        selector.pseudo_element = parsed.pseudo_element;

        for simple in &parsed.complex.subject.simple_selectors {
            match simple {
                SimpleSelector::Id(id) => selector.id = Some(id.clone()),
                SimpleSelector::Class(class_name) => selector.class_name = Some(class_name.clone()),
                SimpleSelector::LocalName {
                    local_name,
                    lower_local_name,
                } => {
                    selector.local_name = Some(local_name.clone());
                    selector.lower_local_name = Some(lower_local_name.clone());
                }
                SimpleSelector::Namespace(url) => selector.namespace = Some(url.clone()),
                SimpleSelector::Attribute(attr)
                    if attr.name == "lang" && attr.namespace == AttributeNamespace::Null =>
                {
                    selector.requires_lang_attr = true;
                }
                _ => {}
            }
        }
        selector
    }
}

/// The compiled predicate of one selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTest(Test);

impl CompiledTest {
    /// Folded to the constant `false`: matches nothing, ever.
    #[must_use]
    pub const fn is_never(&self) -> bool {
        matches!(self.0, Test::Never)
    }

    /// Folded to the constant `true`: matches every element.
    #[must_use]
    pub const fn is_always(&self) -> bool {
        matches!(self.0, Test::Always)
    }
}

impl SelectorTest for CompiledTest {
    fn matches<E: Element>(&self, element: &E) -> bool {
        self.0.matches(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Test {
    Always,
    Never,
    All(Vec<Test>),
    Any(Vec<Test>),
    Not(Box<Test>),
    LocalName {
        local_name: String,
        lower_local_name: String,
    },
    Namespace(String),
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
    PseudoClass(PseudoClass),
    /// `right` holds for the element and `left` for the element reached
    /// through `combinator`. `left` may itself be relative, so a failed
    /// ancestor or sibling candidate falls through to the next one.
    Relative {
        combinator: Combinator,
        left: Box<Test>,
        right: Box<Test>,
    },
}

impl Test {
    fn all(tests: Vec<Self>) -> Self {
        let mut kept = Vec::with_capacity(tests.len());
        for test in tests {
            match test {
                Self::Never => return Self::Never,
                Self::Always => {}
                test => kept.push(test),
            }
        }
        if kept.len() > 1 {
            Self::All(kept)
        } else {
            kept.pop().unwrap_or(Self::Always)
        }
    }

    fn any(tests: Vec<Self>) -> Self {
        let mut kept = Vec::with_capacity(tests.len());
        for test in tests {
            match test {
                Self::Always => return Self::Always,
                Self::Never => {}
                test => kept.push(test),
            }
        }
        if kept.len() > 1 {
            Self::Any(kept)
        } else {
            kept.pop().unwrap_or(Self::Never)
        }
    }

    fn not(test: Self) -> Self {
        match test {
            Self::Always => Self::Never,
            Self::Never => Self::Always,
            test => Self::Not(Box::new(test)),
        }
    }

    fn relative(combinator: Combinator, left: Self, right: Self) -> Self {
        if left == Self::Never || right == Self::Never {
            return Self::Never;
        }
        Self::Relative {
            combinator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn matches<E: Element>(&self, element: &E) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::All(tests) => tests.iter().all(|test| test.matches(element)),
            Self::Any(tests) => tests.iter().any(|test| test.matches(element)),
            Self::Not(test) => !test.matches(element),
            // [§ 5.1](https://www.w3.org/TR/selectors-4/#type-selectors)
            // HTML element names are matched ASCII case-insensitively.
            Self::LocalName {
                local_name,
                lower_local_name,
            } => {
                let name = if element.in_html_document() {
                    lower_local_name
                } else {
                    local_name
                };
                element.local_name() == name.as_str()
            }
            Self::Namespace(url) => element.namespace_url() == url.as_str(),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class_name) => element.classes().any(|class| class == class_name.as_str()),
            Self::Attribute(attr) => matches_attribute(attr, element),
            Self::PseudoClass(pseudo) => matches_pseudo_class(pseudo, element),
            Self::Relative {
                combinator,
                left,
                right,
            } => right.matches(element) && matches_relative(*combinator, left, element),
        }
    }
}

/// Build the test chain from the leftmost compound to the subject.
fn compile_complex(complex: &ComplexSelector) -> Test {
    let mut pairs = complex.combinators.iter().rev();
    let Some((first_combinator, first)) = pairs.next() else {
        return compile_compound(&complex.subject);
    };

    let mut pending = *first_combinator;
    let mut left = compile_compound(first);
    for (combinator, compound) in pairs {
        left = Test::relative(pending, left, compile_compound(compound));
        pending = *combinator;
    }
    Test::relative(pending, left, compile_compound(&complex.subject))
}

fn compile_compound(compound: &CompoundSelector) -> Test {
    Test::all(compound.simple_selectors.iter().map(compile_simple).collect())
}

fn compile_list(list: &[ComplexSelector]) -> Test {
    Test::any(list.iter().map(compile_complex).collect())
}

fn compile_simple(simple: &SimpleSelector) -> Test {
    match simple {
        SimpleSelector::LocalName {
            local_name,
            lower_local_name,
        } => Test::LocalName {
            local_name: local_name.clone(),
            lower_local_name: lower_local_name.clone(),
        },
        SimpleSelector::Namespace(url) => Test::Namespace(url.clone()),
        SimpleSelector::Id(id) => Test::Id(id.clone()),
        SimpleSelector::Class(class_name) => Test::Class(class_name.clone()),
        SimpleSelector::Attribute(attr) => compile_attribute(attr),
        SimpleSelector::PseudoClass(PseudoClass::Dynamic(name)) => {
            let _ = warn_once(
                "Selectors",
                &format!(":{name} never matches a static document; selectors using it are dropped"),
            );
            Test::Never
        }
        SimpleSelector::PseudoClass(pseudo) => Test::PseudoClass(pseudo.clone()),
        SimpleSelector::Negation(list) => Test::not(compile_list(list)),
        SimpleSelector::Is(list) | SimpleSelector::Where(list) => compile_list(list),
    }
}

/// [§ 6.2 Substring matching attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-substrings)
///
/// "If 'val' is the empty string then the selector does not represent
/// anything." The same goes for `~=` with an empty value or one containing
/// whitespace, which can never equal a single word.
fn compile_attribute(attr: &AttributeSelector) -> Test {
    if let Some((operator, value)) = &attr.operator {
        let unsatisfiable = match operator {
            AttributeOperator::Prefix | AttributeOperator::Suffix | AttributeOperator::Substring => {
                value.is_empty()
            }
            AttributeOperator::Includes => {
                value.is_empty() || value.contains(|c: char| c.is_ascii_whitespace())
            }
            AttributeOperator::Equals | AttributeOperator::DashMatch => false,
        };
        if unsatisfiable {
            return Test::Never;
        }
    }
    Test::Attribute(attr.clone())
}

fn matches_relative<E: Element>(combinator: Combinator, left: &Test, element: &E) -> bool {
    match combinator {
        Combinator::Descendant => {
            successors(element.parent_element(), E::parent_element).any(|ancestor| left.matches(&ancestor))
        }
        Combinator::Child => element
            .parent_element()
            .is_some_and(|parent| left.matches(&parent)),
        Combinator::NextSibling => element
            .previous_sibling_element()
            .is_some_and(|sibling| left.matches(&sibling)),
        Combinator::SubsequentSibling => {
            successors(element.previous_sibling_element(), E::previous_sibling_element)
                .any(|sibling| left.matches(&sibling))
        }
    }
}

fn matches_attribute<E: Element>(attr: &AttributeSelector, element: &E) -> bool {
    let value = match &attr.namespace {
        AttributeNamespace::Null => {
            let name = if element.in_html_document() {
                &attr.lower_name
            } else {
                &attr.name
            };
            element.attribute(name)
        }
        AttributeNamespace::Url(url) => element.attribute(&format!("{{{url}}}{}", attr.name)),
        AttributeNamespace::Any => element
            .attributes()
            .find(|&(key, _)| {
                let local = key.rsplit_once('}').map_or(key, |(_, local)| local);
                local == attr.name || local == attr.lower_name
            })
            .map(|(_, value)| value),
    };

    let Some(value) = value else {
        return false;
    };
    let Some((operator, expected)) = &attr.operator else {
        return true;
    };
    let expected = expected.as_str();
    match operator {
        AttributeOperator::Equals => value == expected,
        AttributeOperator::Includes => value.split_ascii_whitespace().any(|word| word == expected),
        AttributeOperator::DashMatch => value
            .strip_prefix(expected)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('-')),
        AttributeOperator::Prefix => value.starts_with(expected),
        AttributeOperator::Suffix => value.ends_with(expected),
        AttributeOperator::Substring => value.contains(expected),
    }
}

fn matches_pseudo_class<E: Element>(pseudo: &PseudoClass, element: &E) -> bool {
    match pseudo {
        PseudoClass::Root => element.is_root(),
        PseudoClass::Empty => element.is_empty(),
        PseudoClass::FirstChild => element.previous_sibling_element().is_none(),
        PseudoClass::LastChild => element.next_sibling_element().is_none(),
        PseudoClass::OnlyChild => {
            element.previous_sibling_element().is_none() && element.next_sibling_element().is_none()
        }
        PseudoClass::FirstOfType => sibling_index(element, false, true) == 1,
        PseudoClass::LastOfType => sibling_index(element, true, true) == 1,
        PseudoClass::OnlyOfType => {
            sibling_index(element, false, true) == 1 && sibling_index(element, true, true) == 1
        }
        PseudoClass::NthChild(nth) => nth.matches(sibling_index(element, false, false)),
        PseudoClass::NthLastChild(nth) => nth.matches(sibling_index(element, true, false)),
        PseudoClass::NthOfType(nth) => nth.matches(sibling_index(element, false, true)),
        PseudoClass::NthLastOfType(nth) => nth.matches(sibling_index(element, true, true)),
        PseudoClass::Lang(range) => element.lang().is_some_and(|lang| lang_matches(lang, range)),
        // [HTML § 4.16.3](https://html.spec.whatwg.org/multipage/semantics-other.html#selector-link)
        // "a and area elements that have an href attribute, and all link
        // elements that have an href attribute"
        PseudoClass::Link => {
            is_html_element(element)
                && matches!(element.local_name(), "a" | "area" | "link")
                && element.attribute("href").is_some()
        }
        PseudoClass::Enabled => {
            is_html_element(element)
                && is_form_control(element)
                && element.attribute("disabled").is_none()
        }
        PseudoClass::Disabled => {
            is_html_element(element)
                && is_form_control(element)
                && element.attribute("disabled").is_some()
        }
        // "input elements whose type attribute is in the Checkbox or Radio
        // Button state and whose checkedness is true; option elements whose
        // selectedness is true"
        PseudoClass::Checked => {
            is_html_element(element)
                && match element.local_name() {
                    "input" => {
                        element.attribute("checked").is_some()
                            && element.attribute("type").is_some_and(|kind| {
                                kind.eq_ignore_ascii_case("checkbox")
                                    || kind.eq_ignore_ascii_case("radio")
                            })
                    }
                    "option" => element.attribute("selected").is_some(),
                    _ => false,
                }
        }
        PseudoClass::Dynamic(_) => false,
    }
}

/// 1-based position among element siblings, counted from the start or the
/// end, optionally among siblings of the same type only.
fn sibling_index<E: Element>(element: &E, from_end: bool, of_type: bool) -> i32 {
    let step: fn(&E) -> Option<E> = if from_end {
        E::next_sibling_element
    } else {
        E::previous_sibling_element
    };
    let before = successors(step(element), step)
        .filter(|sibling| {
            !of_type
                || (sibling.local_name() == element.local_name()
                    && sibling.namespace_url() == element.namespace_url())
        })
        .count();
    i32::try_from(before).map_or(i32::MAX, |before| before.saturating_add(1))
}

/// [§ 7.2](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
/// The range matches the language itself, or a prefix of it ending at `-`,
/// ASCII case-insensitively.
fn lang_matches(lang: &str, range: &str) -> bool {
    lang.split_at_checked(range.len())
        .is_some_and(|(prefix, rest)| {
            prefix.eq_ignore_ascii_case(range) && (rest.is_empty() || rest.starts_with('-'))
        })
}

/// [HTML § 4.16.3](https://html.spec.whatwg.org/multipage/semantics-other.html#selector-enabled)
/// elements that can be `:enabled` or `:disabled`.
fn is_form_control<E: Element>(element: &E) -> bool {
    matches!(
        element.local_name(),
        "button" | "input" | "select" | "textarea" | "optgroup" | "option" | "fieldset"
    )
}

fn is_html_element<E: Element>(element: &E) -> bool {
    element.namespace_url() == HTML_NAMESPACE
        || (element.in_html_document() && element.namespace_url().is_empty())
}
