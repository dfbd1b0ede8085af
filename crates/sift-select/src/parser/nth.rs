//! [`An+B`](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax) arguments.

use super::ast::Nth;
use super::token::Token;
use crate::error::SelectorError;

impl Nth {
    /// `odd`, i.e. `2n+1`.
    pub const ODD: Self = Self { a: 2, b: 1 };
    /// `even`, i.e. `2n`.
    pub const EVEN: Self = Self { a: 2, b: 0 };

    /// Parse the argument tokens of an `:nth-*()` function.
    ///
    /// The tokenizer splits `An+B` in awkward places (`2n-1` is a single
    /// dimension token, `2n+1` is a dimension and a number), so the argument
    /// is put back together as text and read from there.
    pub(crate) fn parse(tokens: &[Token]) -> Result<Self, SelectorError> {
        let text: String = tokens.iter().map(ToString::to_string).collect();
        Self::parse_str(&text).ok_or_else(|| SelectorError::InvalidNth(text.trim().to_string()))
    }

    fn parse_str(text: &str) -> Option<Self> {
        let text = text.trim().to_ascii_lowercase();
        match text.as_str() {
            "odd" => return Some(Self::ODD),
            "even" => return Some(Self::EVEN),
            "" => return None,
            _ => {}
        }

        if let Ok(b) = text.parse::<i32>() {
            return Some(Self { a: 0, b });
        }

        let (a_part, rest) = text.split_once('n')?;
        let a = match a_part {
            "" | "+" => 1,
            "-" => -1,
            _ => a_part.parse().ok()?,
        };

        // Whitespace is allowed around the sign only: `2n + 1`, not `2 n`.
        let rest = rest.trim();
        let b = if rest.is_empty() {
            0
        } else {
            let (sign, digits) = rest.split_at(1);
            let digits = digits.trim_start();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let value: i32 = digits.parse().ok()?;
            match sign {
                "+" => value,
                "-" => -value,
                _ => return None,
            }
        };
        Some(Self { a, b })
    }

    /// Whether the 1-based `index` is `An+B` for some `n >= 0`.
    ///
    /// Computed in `i64`: `A` and `B` span all of `i32`, so `index - B` may
    /// not fit.
    #[must_use]
    pub fn matches(self, index: i32) -> bool {
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        let diff = i64::from(index) - b;
        match a {
            0 => diff == 0,
            a if a > 0 => diff >= 0 && diff % a == 0,
            a => diff <= 0 && diff % a == 0,
        }
    }
}
