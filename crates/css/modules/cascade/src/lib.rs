//! CSS Cascading and Inheritance Level 4 — ordering of competing rule blocks.
//! Reference: <https://www.w3.org/TR/css-cascade-4/>
//!
//! The orchestrator ranks every Property Set (or every Cell competing for one
//! attribute) with [`compare_priority`] and applies them lowest first, so the
//! winner is whatever gets cascaded last.

#![forbid(unsafe_code)]

mod selector;
mod sequence;

use core::cmp::Ordering;

pub use selector::{Selector, Specificity};
pub use sequence::{SetId, SetIdCounter};

/// Precedence tier of a rule block's source.
/// css-cascade-4 §6.2 — Cascading origins
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Origin {
    UserAgent,
    User,
    Author,
}

/// Priority tuple used to order declarations in the cascade.
/// css-cascade-4 §6.1 — Cascade sorting order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CascadePriority {
    /// css-cascade-4 §6.2 — Origins
    pub origin: Origin,
    /// Selector specificity; zero for blocks without a selector.
    pub specificity: Specificity,
    /// Creation order of the declaring block, increasing with age.
    pub id: SetId,
}

impl CascadePriority {
    /// Construct a priority value from inputs.
    #[inline]
    pub const fn new(origin: Origin, specificity: Specificity, id: SetId) -> Self {
        Self {
            origin,
            specificity,
            id,
        }
    }
}

impl PartialOrd for CascadePriority {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CascadePriority {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        compare_priority(self, other)
    }
}

/// Compare two `CascadePriority` values according to the cascade rules.
/// Lower comes first; return `Ordering::Greater` if `left` should win over `right`.
/// css-cascade-4 §6.1 — Sorting the cascade
pub fn compare_priority(left: &CascadePriority, right: &CascadePriority) -> Ordering {
    // `!important` would be the most significant key, ahead of origin. It is
    // not tracked by rule blocks yet.

    // Origin order: UA < User < Author. Higher origin wins.
    let left_rank = origin_rank(left.origin);
    let right_rank = origin_rank(right.origin);
    if left_rank != right_rank {
        return left_rank.cmp(&right_rank);
    }

    // Specificity: higher wins
    if left.specificity != right.specificity {
        return left.specificity.cmp(&right.specificity);
    }

    // Declaration age: newer wins
    left.id.cmp(&right.id)
}

/// Rank origins: UA < User < Author.
const fn origin_rank(origin: Origin) -> u8 {
    match origin {
        Origin::UserAgent => 0,
        Origin::User => 1,
        Origin::Author => 2,
    }
}

/// Anything that competes in the cascade: whole rule blocks or single cells.
pub trait Ranked {
    fn cascade_priority(&self) -> CascadePriority;
}

impl Ranked for CascadePriority {
    #[inline]
    fn cascade_priority(&self) -> CascadePriority {
        *self
    }
}

impl<T: Ranked + ?Sized> Ranked for &T {
    #[inline]
    fn cascade_priority(&self) -> CascadePriority {
        (**self).cascade_priority()
    }
}

/// Order two ranked entities. `Greater` means `left` wins.
#[inline]
pub fn cascade_order<T: Ranked + ?Sized>(left: &T, right: &T) -> Ordering {
    compare_priority(&left.cascade_priority(), &right.cascade_priority())
}

/// Sort ascending by priority, lowest first, keeping the caller's order for ties.
pub fn sort_by_cascade_order<T: Ranked>(entries: &mut [T]) {
    entries.sort_by(cascade_order);
    log::trace!(target: "css_cascade", "sorted {} entries into cascade order", entries.len());
}
