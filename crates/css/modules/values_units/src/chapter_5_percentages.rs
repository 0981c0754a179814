//! CSS Values & Units Level 3 — §5 Percentages
//! Reference: <https://www.w3.org/TR/css-values-3/#percentages>

/// A CSS <percentage>
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Percentage(pub f32); // stored as 0.0..=1.0

impl Percentage {
    /// Build from the authored number, so `50.0` is `50%`.
    #[inline]
    pub fn from_percent(percent: f32) -> Self {
        Self(percent / 100.0)
    }

    /// Resolve against a basis in pixels.
    #[inline]
    pub fn of(self, basis_px: f32) -> f32 {
        self.0 * basis_px
    }
}
