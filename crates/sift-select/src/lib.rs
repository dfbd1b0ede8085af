//! Selector compilation and indexed matching for the Sift engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector parsing** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, class, ID and attribute selectors, with namespaces
//!   - All four combinators
//!   - Structural, `:lang()`, `:not()`/`:is()`/`:where()` and HTML state
//!     pseudo-classes
//!   - Pseudo-elements, including the legacy one-colon forms
//!   - Specificity calculation
//!
//! - **Compilation** - selectors become [`CompiledSelector`]s: a folded match
//!   predicate plus the id/class/name/namespace keys used for dispatch
//!
//! - **The [`Matcher`] index** - selectors are bucketed by their most
//!   selective key, and [`Matcher::match_element`] returns every match for an
//!   element in cascade order
//!
//! - **Subtree queries** - [`query`] and [`query_all`]
//!
//! Any tree can be matched against by implementing [`Element`]; `sift-dom`'s
//! [`ElementRef`](sift_dom::ElementRef) implements it out of the box.
//!
//! # Not Yet Implemented
//!
//! - `:has()` and `:nth-child(An+B of S)`
//! - Attribute selector case-sensitivity flags (`[a=b i]`)
//! - Quirks-mode case-insensitive class and ID matching

/// Selector predicates and [`CompiledSelector`].
pub mod compiled;
/// Lowering parsed selectors to [`CompiledTest`]s.
pub mod compiler;
/// The [`Element`] trait.
pub mod element;
/// [`SelectorError`].
pub mod error;
/// The [`Matcher`] selector index.
pub mod matcher;
/// `@namespace` context for compilation.
pub mod namespaces;
/// Selector tokenizer and parser per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod parser;
/// Pseudo-element names.
pub mod pseudo;
/// Subtree queries.
pub mod query;
/// Cascade specificity.
pub mod specificity;

pub use compiled::{CompiledSelector, SelectorTest};
pub use compiler::{CompiledTest, compile_selector_list};
pub use element::Element;
pub use error::SelectorError;
pub use matcher::{Match, Matcher};
pub use namespaces::Namespaces;
pub use pseudo::PseudoElement;
pub use query::{query, query_all};
pub use specificity::Specificity;
