//! Selector compilation errors.

use thiserror::Error;

/// Why a selector list was rejected.
///
/// Only the compiler produces these; adding selectors to a
/// [`Matcher`](crate::Matcher) and matching elements cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A selector list, or one entry of it, contained no selector at all.
    #[error("empty selector")]
    Empty,

    /// A token that cannot appear at this point.
    #[error("unexpected '{found}', expected {expected}")]
    UnexpectedToken {
        /// The offending token, serialized back to CSS.
        found: String,
        /// What the parser was waiting for.
        expected: &'static str,
    },

    /// The input ended in the middle of a selector.
    #[error("unexpected end of selector, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was waiting for.
        expected: &'static str,
    },

    /// [Selectors 4 § 3.5](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// unrecognized pseudo-classes make the selector invalid.
    #[error("unknown pseudo-class ':{0}'")]
    UnknownPseudoClass(String),

    /// An unrecognized pseudo-element name.
    #[error("unknown pseudo-element '::{0}'")]
    UnknownPseudoElement(String),

    /// [Selectors 4 § 3.6.1](https://www.w3.org/TR/selectors-4/#pseudo-element-syntax)
    /// "Pseudo-elements may only be placed after the compound selector that
    /// represents the originating element", i.e. at the end.
    #[error("pseudo-element '::{0}' must be at the end of a selector")]
    MisplacedPseudoElement(String),

    /// [Selectors 4 § 5.3](https://www.w3.org/TR/selectors-4/#type-nmsp)
    /// "if the namespace prefix has not been previously declared, the
    /// selector is invalid."
    #[error("undeclared namespace prefix '{0}'")]
    UndeclaredNamespace(String),

    /// A malformed `An+B` argument to an `:nth-*()` pseudo-class.
    #[error("invalid An+B expression '{0}'")]
    InvalidNth(String),

    /// A malformed `[...]` attribute selector.
    #[error("invalid attribute selector: {0}")]
    InvalidAttribute(String),
}
