//! Parsed selector syntax trees, per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! These mirror the grammar closely. Everything the matcher needs is derived
//! from them by [`crate::compiler`].

use crate::pseudo::PseudoElement;
use crate::specificity::Specificity;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// The universal selector `*` produces no `LocalName` at all.
    LocalName {
        /// The name as written.
        local_name: String,
        /// ASCII-lowercased, compared against elements of HTML documents.
        lower_local_name: String,
    },

    /// [§ 5.3 Namespaces](https://www.w3.org/TR/selectors-4/#type-nmsp)
    ///
    /// Restricts the element to one namespace URL. The empty string is the
    /// null namespace written as `|E`.
    Namespace(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`
    Id(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.highlight`, `.btn`
    Class(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),

    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    /// "represents an element that is not represented by its argument."
    Negation(Vec<ComplexSelector>),

    /// [§ 4.2 :is()](https://www.w3.org/TR/selectors-4/#matches), also
    /// spelled `:matches()`.
    Is(Vec<ComplexSelector>),

    /// [§ 4.4 :where()](https://www.w3.org/TR/selectors-4/#zero-matches)
    /// Like `:is()`, but "the specificity of the :where() pseudo-class is
    /// replaced by zero."
    Where(Vec<ComplexSelector>),
}

/// The namespace part of an attribute selector's qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeNamespace {
    /// `[attr]` or `[|attr]`: "attribute selectors without a namespace
    /// component apply only to attributes that have no namespace".
    Null,
    /// `[ns|attr]` with `ns` resolved to its URL.
    Url(String),
    /// `[*|attr]`: the attribute in any namespace, or in none.
    Any,
}

/// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[att=val]` - "whose value is exactly 'val'"
    Equals,
    /// `[att~=val]` - "a whitespace-separated list of words, one of which is
    /// exactly 'val'"
    Includes,
    /// `[att|=val]` - "either being exactly 'val' or beginning with 'val'
    /// immediately followed by '-'"
    DashMatch,
    /// `[att^=val]` - "begins with the prefix 'val'"
    Prefix,
    /// `[att$=val]` - "ends with the suffix 'val'"
    Suffix,
    /// `[att*=val]` - "contains at least one instance of the substring 'val'"
    Substring,
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Examples: `[href]`, `[type=text]`, `[lang|=en]`, `[xlink|href^="#"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute local name as written.
    pub name: String,
    /// ASCII-lowercased name, used for elements of HTML documents.
    pub lower_name: String,
    /// Namespace component.
    pub namespace: AttributeNamespace,
    /// Operator and value; `None` for a presence test.
    pub operator: Option<(AttributeOperator, String)>,
}

/// [§ 14.1 `An+B` microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// "represents the elements whose index is `An+B` for some non-negative `n`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// Step (`A`).
    pub a: i32,
    /// Offset (`B`).
    pub b: i32,
}

/// Pseudo-classes per [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "represents an element that is the root of the document."
    Root,

    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "represents an element that has no children except, optionally,
    /// document white space characters." Here any text counts as content.
    Empty,

    /// [§ 14.4.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.4.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.4.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.5.1 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.5.2 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.5.3 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 14.4.4 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    NthChild(Nth),
    /// [§ 14.4.5 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild(Nth),
    /// [§ 14.5.4 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType(Nth),
    /// [§ 14.5.5 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType(Nth),

    /// [§ 7.2 :lang()](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
    ///
    /// Example: `:lang(en)` matches `lang="en"` and `lang="en-GB"`
    Lang(String),

    /// `:link` and `:any-link`. Every link is treated as unvisited.
    Link,
    /// `:enabled` - a form control without the `disabled` attribute
    Enabled,
    /// `:disabled` - a form control with the `disabled` attribute
    Disabled,
    /// `:checked` - a ticked checkbox/radio or a selected option
    Checked,

    /// User-action and time-dimensional pseudo-classes (`:hover`, `:focus`,
    /// `:visited`, `:past`, ...). A static tree is never in these states.
    Dynamic(String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    /// Empty for a bare `*`.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`: B is an arbitrary descendant of some ancestor A.
    Descendant,
    /// `A > B`: B is a direct child of A.
    Child,
    /// `A + B`: B immediately follows A.
    NextSibling,
    /// `A ~ B`: B follows A, not necessarily immediately.
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// Example: `div.container > ul.nav li` is stored as
/// ```text
/// subject: [li]
/// combinators: [(Descendant, [ul.nav]), (Child, [div.container])]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    pub subject: CompoundSelector,

    /// Chain of (combinator, `compound_selector`) pairs going left from the
    /// subject. Each combinator relates its compound to the one on its right.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// One selector of a parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
    /// Specificity, pseudo-element included.
    pub specificity: Specificity,
    /// Trailing pseudo-element, if any.
    pub pseudo_element: Option<PseudoElement>,
}

impl ComplexSelector {
    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Sum of the specificities of every compound in the chain.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.combinators
            .iter()
            .fold(compound_specificity(&self.subject), |spec, (_, compound)| {
                spec + compound_specificity(compound)
            })
    }
}

fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();

    for simple in &compound.simple_selectors {
        match simple {
            // "count the number of ID selectors in the selector (= A)"
            SimpleSelector::Id(_) => spec.0 += 1,

            // "count the number of class selectors, attributes selectors,
            // and pseudo-classes in the selector (= B)"
            SimpleSelector::Class(_)
            | SimpleSelector::PseudoClass(_)
            | SimpleSelector::Attribute(_) => spec.1 += 1,

            // "count the number of type selectors and pseudo-elements
            // in the selector (= C)"
            SimpleSelector::LocalName { .. } => spec.2 += 1,

            // "The specificity of an :is(), :not(), or :has() pseudo-class is
            // replaced by the specificity of the most specific complex
            // selector in its selector list argument."
            SimpleSelector::Negation(list) | SimpleSelector::Is(list) => {
                spec += list
                    .iter()
                    .map(ComplexSelector::specificity)
                    .max()
                    .unwrap_or_default();
            }

            SimpleSelector::Namespace(_) | SimpleSelector::Where(_) => {}
        }
    }

    spec
}
