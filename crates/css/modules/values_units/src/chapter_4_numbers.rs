//! CSS Values & Units Level 3 — §4 Numbers
//! Reference: <https://www.w3.org/TR/css-values-3/#numeric-types>

/// A CSS <number>
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Number(pub f32);
