//! The five derivation stages of an attribute value.

use core::fmt;

/// One step of the value pipeline, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// The raw declaration that won the cascade.
    Assigned,
    /// CSS-wide keywords resolved.
    Specified,
    /// Made as absolute as possible without layout.
    Computed,
    /// Layout-time resolution applied.
    Used,
    /// Device restrictions applied.
    Actual,
}

impl Stage {
    /// The stages a cell derives from `Assigned`, in order.
    pub const DERIVED: [Self; 4] = [Self::Specified, Self::Computed, Self::Used, Self::Actual];

    /// Slot of a derived stage inside a cell; `None` for `Assigned`.
    #[inline]
    pub const fn derived_index(self) -> Option<usize> {
        match self {
            Self::Assigned => None,
            Self::Specified => Some(0),
            Self::Computed => Some(1),
            Self::Used => Some(2),
            Self::Actual => Some(3),
        }
    }

    /// The stage this one reads its input from. `Assigned` has none and
    /// returns itself.
    #[inline]
    pub const fn previous(self) -> Self {
        match self {
            Self::Assigned | Self::Specified => Self::Assigned,
            Self::Computed => Self::Specified,
            Self::Used => Self::Computed,
            Self::Actual => Self::Used,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Specified => "specified",
            Self::Computed => "computed",
            Self::Used => "used",
            Self::Actual => "actual",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
