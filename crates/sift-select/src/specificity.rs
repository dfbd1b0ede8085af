//! Selector specificity.

use core::fmt;
use core::ops::{Add, AddAssign};

use serde::Serialize;

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
///
/// The derived `Ord` is exactly that lexicographic comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl AddAssign for Specificity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_order() {
        assert!(Specificity(1, 0, 0) > Specificity(0, 10, 10));
        assert!(Specificity(0, 1, 0) > Specificity(0, 0, 99));
        assert!(Specificity(0, 1, 2) < Specificity(0, 1, 3));
        assert_eq!(Specificity::new(0, 0, 0), Specificity::default());
    }

    #[test]
    fn test_add_and_display() {
        let mut spec = Specificity(1, 0, 1);
        spec += Specificity(0, 2, 1);
        assert_eq!(spec, Specificity(1, 2, 2));
        assert_eq!(spec.to_string(), "(1, 2, 2)");
    }
}
