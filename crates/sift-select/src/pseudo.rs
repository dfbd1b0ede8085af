//! Pseudo-elements.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
///
/// "Pseudo-elements represent abstract elements of the document beyond those
/// elements explicitly created by the document language."
///
/// The matcher never interprets this value; it is handed back with each match
/// so the caller can route declarations to the right generated box.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, Serialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum PseudoElement {
    /// `::before` - generated content before the element's content
    Before,
    /// `::after` - generated content after the element's content
    After,
    /// `::first-line` - the first formatted line
    FirstLine,
    /// `::first-letter` - the first typographic letter unit
    FirstLetter,
    /// `::marker` - a list item's marker box
    Marker,
    /// `::placeholder` - placeholder text of an input
    Placeholder,
    /// `::selection` - the selected portion of the document
    Selection,
    /// `::backdrop` - the box behind a top-layer element
    Backdrop,
}

impl PseudoElement {
    /// [§ 3.6.1](https://www.w3.org/TR/selectors-4/#pseudo-element-syntax)
    ///
    /// "For compatibility with existing style sheets, user agents must also
    /// accept the previous one-colon notation for pseudo-elements introduced in
    /// CSS levels 1 and 2 (namely, :first-line, :first-letter, :before, and
    /// :after)."
    #[must_use]
    pub const fn allows_single_colon(self) -> bool {
        matches!(
            self,
            Self::Before | Self::After | Self::FirstLine | Self::FirstLetter
        )
    }
}
