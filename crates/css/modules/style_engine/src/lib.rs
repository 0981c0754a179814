//! CSS style resolution: cascaded declarations to actual values.
//!
//! Each attribute of each rule block lives in a [`PropertyCell`] that derives
//! its Specified, Computed, Used and Actual values from the assigned one, on
//! demand and in order. A [`PropertySet`] bundles one cell per attribute of a
//! [`css_properties::DefinitionRegistry`]; competing sets are ranked with the
//! comparator from [`css_cascade`] and merged cell by cell into an element's
//! working set with [`PropertySet::cascade_from`] or replaced wholesale with
//! [`PropertySet::overwrite_from`].
//!
//! Changes are not delivered through callbacks. They queue up on a
//! [`ChangeQueue`] as [`StyleChange`]s for the orchestrator to drain.

#![forbid(unsafe_code)]

mod cell;
mod change;
mod config;
mod error;
mod revision;
mod runtime;
mod set;
mod stage;
mod tree;

pub use cell::{PropertyCell, SourceRef};
pub use change::{ChangeQueue, StyleChange};
pub use config::{RecomputeMode, StyleConfig};
pub use error::StyleError;
pub use revision::{Revision, RevisionCounter};
pub use runtime::ParallelRuntime;
pub use set::{PropertySet, PropertySetBuilder};
pub use stage::Stage;
pub use tree::{Detached, Document, ElementId, StyleTree};
