//! Revision counting for inherited stages.
//!
//! Every assigned-value change bumps the counter shared by all sets reporting
//! to the same [`crate::ChangeQueue`]. A cell that copied a stage from its
//! parent remembers the revision it read at, and re-derives once the counter
//! has moved past it.

use core::sync::atomic::{AtomicU64, Ordering};

/// A point in the history of assigned-value writes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Revision(u64);

impl Revision {
    pub const INITIAL: Self = Self(0);

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_newer_than(self, other: Self) -> bool {
        self.0 > other.0
    }
}

/// Atomic, monotonically increasing [`Revision`] source.
#[derive(Debug, Default)]
pub struct RevisionCounter {
    current: AtomicU64,
}

impl RevisionCounter {
    #[inline]
    pub const fn new() -> Self {
        Self {
            current: AtomicU64::new(Revision::INITIAL.0),
        }
    }

    #[inline]
    pub fn current(&self) -> Revision {
        Revision(self.current.load(Ordering::Acquire))
    }

    /// Record a write and return the revision it produced.
    #[inline]
    pub fn increment(&self) -> Revision {
        Revision(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }
}
