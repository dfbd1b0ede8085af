//! Selector tokens, a subset of [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Selectors never contain url, at-keyword, CDO/CDC or block tokens, so the
//! code points that would start them are emitted as `<delim-token>`s and the
//! parser rejects them where they do not belong.

use core::fmt;

/// A selector token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// "`<ident-token>`"
    Ident(String),
    /// "`<function-token>`", name without the parenthesis
    Function(String),
    /// "`<hash-token>`"
    Hash {
        /// Value without the `#`.
        value: String,
        /// "type flag set to 'id'" - only these can be ID selectors.
        is_id: bool,
    },
    /// "`<string-token>`"
    String(String),
    /// "`<bad-string-token>`"
    BadString,
    /// "`<number-token>`". `repr` is kept as written so `An+B` arguments can
    /// be reassembled from their tokens.
    Number { repr: String },
    /// "`<percentage-token>`"
    Percentage { repr: String },
    /// "`<dimension-token>`" (`2n`, `-3n-1`, ...)
    Dimension { repr: String, unit: String },
    /// "`<whitespace-token>`"
    Whitespace,
    /// "`<colon-token>`"
    Colon,
    /// "`<comma-token>`"
    Comma,
    /// "`<[-token>`"
    LeftBracket,
    /// "`<]-token>`"
    RightBracket,
    /// "`<(-token>`"
    LeftParen,
    /// "`<)-token>`"
    RightParen,
    /// "`<delim-token>`"
    Delim(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(value) => f.write_str(value),
            Self::Function(name) => write!(f, "{name}("),
            Self::Hash { value, .. } => write!(f, "#{value}"),
            Self::String(value) => write!(f, "\"{value}\""),
            Self::BadString => f.write_str("<bad-string>"),
            Self::Number { repr } => f.write_str(repr),
            Self::Percentage { repr } => write!(f, "{repr}%"),
            Self::Dimension { repr, unit } => write!(f, "{repr}{unit}"),
            Self::Whitespace => f.write_str(" "),
            Self::Colon => f.write_str(":"),
            Self::Comma => f.write_str(","),
            Self::LeftBracket => f.write_str("["),
            Self::RightBracket => f.write_str("]"),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::Delim(c) => write!(f, "{c}"),
        }
    }
}
