//! Selector handles as seen by the cascade.
//!
//! Matching and specificity computation belong to the selector subsystem; the
//! cascade only keeps the selector text for diagnostics and the number it
//! reported.

use core::fmt;
use std::sync::Arc;

/// Packed selector specificity. Higher outranks lower.
/// Selectors-3 §9 — Calculating a selector's specificity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(u64);

/// Bits reserved for each of the (a, b, c) components when packing.
const COMPONENT_BITS: u32 = 16;
const COMPONENT_MASK: u64 = (1 << COMPONENT_BITS) - 1;

impl Specificity {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Pack an (ids, classes, types) triple so that numeric order is the
    /// lexicographic order of the triple.
    #[inline]
    pub const fn from_components(ids: u16, classes: u16, types: u16) -> Self {
        Self(
            ((ids as u64) << (COMPONENT_BITS * 2))
                | ((classes as u64) << COMPONENT_BITS)
                | (types as u64),
        )
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Unpack into (ids, classes, types).
    #[inline]
    pub const fn components(self) -> (u64, u64, u64) {
        (
            self.0 >> (COMPONENT_BITS * 2),
            (self.0 >> COMPONENT_BITS) & COMPONENT_MASK,
            self.0 & COMPONENT_MASK,
        )
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ids, classes, types) = self.components();
        write!(formatter, "({ids}, {classes}, {types})")
    }
}

/// An opaque selector: its source text and the specificity the selector
/// subsystem computed for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Selector {
    text: Arc<str>,
    specificity: Specificity,
}

impl Selector {
    #[inline]
    pub fn new(text: &str, specificity: Specificity) -> Self {
        Self {
            text: Arc::from(text),
            specificity,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.text, self.specificity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_order_is_lexicographic() {
        let one_id = Specificity::from_components(1, 0, 0);
        let many_classes = Specificity::from_components(0, 300, 900);
        assert!(one_id > many_classes);
        assert_eq!(one_id.components(), (1, 0, 0));
        assert_eq!(many_classes.to_string(), "(0, 300, 900)");
    }
}
