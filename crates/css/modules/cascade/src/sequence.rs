//! Declaration-age sequence numbers.
//!
//! Every Property Set takes the next id when it is created, so a higher id
//! always means a newer rule block and wins cascade ties.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identity and age of a Property Set.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct SetId(u64);

impl SetId {
    /// Create an id from a raw value.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw id value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Check if this id was allocated after another.
    #[inline]
    pub const fn is_newer_than(self, other: Self) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Atomic counter handing out monotonically increasing set ids.
#[derive(Debug)]
pub struct SetIdCounter {
    next: AtomicU64,
}

/// Process-wide counter used by Property Sets.
static GLOBAL: SetIdCounter = SetIdCounter::new();

impl SetIdCounter {
    /// Create a counter whose first id is 1.
    #[inline]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// The shared counter every Property Set draws from.
    #[inline]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Allocate the next id.
    #[inline]
    pub fn allocate(&self) -> SetId {
        SetId(self.next.fetch_add(1, Ordering::AcqRel))
    }
}

impl Default for SetIdCounter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
