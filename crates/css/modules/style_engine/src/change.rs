//! Change notifications drained by the orchestrator.
//!
//! Cells never call back into their owner. Every observable change becomes a
//! [`StyleChange`] on a shared [`ChangeQueue`], and whoever drives the cascade
//! drains it once the cascade has settled.

use std::sync::Arc;

use crossbeam::queue::SegQueue;
use css_cascade::SetId;
use css_properties::{DirtyFlags, PropertyId};

use crate::{ElementId, Revision, RevisionCounter, Stage};

/// One attribute of one Property Set produced a different value for `stage`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleChange {
    /// The set holding the cell that changed.
    pub set: SetId,
    /// The element the set styles; `None` for rule blocks.
    pub owner: Option<ElementId>,
    pub property: PropertyId,
    pub name: Arc<str>,
    /// The stage whose value moved.
    pub stage: Stage,
    /// What the owning element has to redo.
    pub dirty: DirtyFlags,
}

/// Lock-free multi-producer queue of [`StyleChange`]s.
///
/// The queue also counts assigned-value changes. Sets sharing a queue share
/// that revision, which is how a cell notices that an ancestor it inherited
/// from was written.
#[derive(Debug, Default)]
pub struct ChangeQueue {
    pending: SegQueue<StyleChange>,
    revisions: RevisionCounter,
}

impl ChangeQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a change. `Assigned` changes also advance the revision.
    #[inline]
    pub fn push(&self, change: StyleChange) {
        if change.stage == Stage::Assigned {
            self.revisions.increment();
        }
        self.pending.push(change);
    }

    /// How many assigned-value changes were pushed so far.
    #[inline]
    pub fn revision(&self) -> Revision {
        self.revisions.current()
    }

    /// Take the oldest queued change.
    #[inline]
    pub fn pop(&self) -> Option<StyleChange> {
        self.pending.pop()
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<StyleChange> {
        let mut changes = Vec::with_capacity(self.pending.len());
        while let Some(change) = self.pending.pop() {
            changes.push(change);
        }
        changes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(name: &str, stage: Stage) -> StyleChange {
        StyleChange {
            set: SetId::new(1),
            owner: None,
            property: PropertyId::new(0),
            name: Arc::from(name),
            stage,
            dirty: DirtyFlags::VISUAL,
        }
    }

    #[test]
    fn drain_keeps_push_order() {
        let queue = ChangeQueue::new();
        queue.push(change("color", Stage::Assigned));
        queue.push(change("color", Stage::Specified));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.revision().get(), 1);
        let drained = queue.drain();
        assert_eq!(drained[0].stage, Stage::Assigned);
        assert_eq!(drained[1].stage, Stage::Specified);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }
}
