//! One attribute of one Property Set.
//!
//! A [`PropertyCell`] holds the assigned value plus four lazily derived stages.
//! Derived slots fill left to right on read and are cleared together whenever
//! the assigned value is written, so a later stage is never present without
//! every earlier one.

mod derivation;

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use css_cascade::{CascadePriority, Origin, Ranked, Selector, SetId, Specificity};
use css_properties::{Definition, ValidationError};
use css_values_units::{Value, ValueList};
use log::trace;
use parking_lot::Mutex;

use crate::set::SetLedger;
use crate::{Revision, Stage, StyleChange, StyleError, StyleTree};

/// Which Property Set a cell's assigned value was declared in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceRef {
    /// Identity and age of the declaring set.
    pub id: SetId,
    pub origin: Origin,
}

/// What `cascade` and `overwrite` copy out of another cell.
#[derive(Clone, Debug)]
pub(crate) struct Declaration {
    pub(crate) assigned: ValueList,
    pub(crate) source: SourceRef,
    pub(crate) selector: Option<Selector>,
}

#[derive(Debug)]
struct CellState {
    assigned: ValueList,
    derived: [Option<ValueList>; 4],
    /// Last value published per derived stage, for change detection only.
    observed: [Option<ValueList>; 4],
    source: SourceRef,
    selector: Option<Selector>,
    /// Revision at which the first stage was copied from the parent.
    inherited_at: Option<Revision>,
}

/// One attribute of one Property Set: the assigned value and its four
/// derived stages, guarded by a per-cell lock.
#[derive(Debug)]
pub struct PropertyCell {
    definition: Arc<Definition>,
    ledger: Arc<SetLedger>,
    locked: AtomicBool,
    state: Mutex<CellState>,
}

impl PropertyCell {
    pub(crate) fn new(definition: Arc<Definition>, ledger: Arc<SetLedger>) -> Self {
        let state = CellState {
            assigned: ValueList::no_declaration(),
            derived: Default::default(),
            observed: Default::default(),
            source: ledger.source(),
            selector: ledger.selector().cloned(),
            inherited_at: None,
        };
        Self {
            definition,
            ledger,
            locked: AtomicBool::new(false),
            state: Mutex::new(state),
        }
    }

    /// The attribute name, as registered.
    #[inline]
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// Initial value, options and resolvers of the attribute.
    #[inline]
    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    /// The raw winning declaration; the no-declaration sentinel when nothing
    /// was declared.
    pub fn assigned(&self) -> ValueList {
        self.state.lock().assigned.clone()
    }

    /// The set the assigned value came from. Starts out as the owning set.
    pub fn source(&self) -> SourceRef {
        self.state.lock().source
    }

    /// Selector of the rule block that declared the assigned value.
    pub fn selector(&self) -> Option<Selector> {
        self.state.lock().selector.clone()
    }

    /// Refuse further `set_assigned` calls. Cascades still write through.
    #[inline]
    pub fn lock(&self) {
        self.locked.store(true, Ordering::Release);
    }

    /// True when the cell or its set is locked.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire) || self.ledger.is_locked()
    }

    /// Store a new assigned value and drop every derived stage.
    ///
    /// An empty list stores the no-declaration sentinel. Returns whether the
    /// assigned value changed.
    ///
    /// # Errors
    /// Returns `ValidationError::Locked` for locked cells, and whatever the
    /// definition's validation reports. Nothing is written on error.
    pub fn set_assigned(&self, values: impl Into<ValueList>) -> Result<bool, ValidationError> {
        let mut values = values.into();
        if values.is_empty() {
            values = ValueList::no_declaration();
        }
        if self.is_locked() {
            return Err(ValidationError::Locked {
                property: self.name().into(),
            });
        }
        self.definition.validate(&values)?;
        let mut state = self.state.lock();
        Ok(self.store(&mut state, values))
    }

    /// `set_assigned`, then settle every stage through `Actual`.
    ///
    /// # Errors
    /// Validation failures, and any resolver failure on the way to `Actual`.
    pub fn set_assigned_immediate(
        &self,
        values: impl Into<ValueList>,
        tree: &dyn StyleTree,
    ) -> Result<ValueList, StyleError> {
        self.set_assigned(values)?;
        self.actual(tree)
    }

    /// Forget the assigned value.
    ///
    /// # Errors
    /// Returns `ValidationError::Locked` for locked cells.
    pub fn clear(&self) -> Result<bool, ValidationError> {
        self.set_assigned(Value::NoDeclaration)
    }

    /// Read one stage, deriving it and any missing earlier stage first.
    ///
    /// # Errors
    /// Returns `StyleError::Resolver` when a stage resolver fails, leaving that
    /// slot empty, and `StyleError::Lookup` when the parent's set lacks the
    /// attribute during inheritance.
    pub fn stage(&self, stage: Stage, tree: &dyn StyleTree) -> Result<ValueList, StyleError> {
        let mut state = self.state.lock();
        self.drop_stale_inheritance(&mut state);
        self.resolve(&mut state, stage, tree)
    }

    /// # Errors
    /// See [`PropertyCell::stage`].
    #[inline]
    pub fn specified(&self, tree: &dyn StyleTree) -> Result<ValueList, StyleError> {
        self.stage(Stage::Specified, tree)
    }

    /// # Errors
    /// See [`PropertyCell::stage`].
    #[inline]
    pub fn computed(&self, tree: &dyn StyleTree) -> Result<ValueList, StyleError> {
        self.stage(Stage::Computed, tree)
    }

    /// # Errors
    /// See [`PropertyCell::stage`].
    #[inline]
    pub fn used(&self, tree: &dyn StyleTree) -> Result<ValueList, StyleError> {
        self.stage(Stage::Used, tree)
    }

    /// # Errors
    /// See [`PropertyCell::stage`].
    #[inline]
    pub fn actual(&self, tree: &dyn StyleTree) -> Result<ValueList, StyleError> {
        self.stage(Stage::Actual, tree)
    }

    /// The stored slot for `stage`, without deriving anything.
    pub fn peek(&self, stage: Stage) -> Option<ValueList> {
        let state = self.state.lock();
        match stage.derived_index() {
            None => Some(state.assigned.clone()),
            Some(slot) => state.derived[slot].clone(),
        }
    }

    /// Additive merge: take `other`'s declaration when it has one.
    ///
    /// Bypasses the lock flag. Returns whether the assigned value changed.
    pub fn cascade(&self, other: &Self) -> bool {
        let incoming = other.declaration();
        if incoming.assigned.is_no_declaration() {
            return false;
        }
        let mut state = self.state.lock();
        self.adopt(&mut state, incoming)
    }

    /// Layer replacement: take `other`'s declaration whenever it differs,
    /// including when `other` declares nothing.
    pub fn overwrite(&self, other: &Self) -> bool {
        self.overwrite_with(other.declaration())
    }

    /// Drop the derived stages but keep the change-detection snapshots, so
    /// only values that really moved are republished on the next read.
    pub fn invalidate(&self) {
        let mut state = self.state.lock();
        state.derived = Default::default();
        state.inherited_at = None;
    }

    pub(crate) fn declaration(&self) -> Declaration {
        let state = self.state.lock();
        Declaration {
            assigned: state.assigned.clone(),
            source: state.source,
            selector: state.selector.clone(),
        }
    }

    pub(crate) fn overwrite_with(&self, incoming: Declaration) -> bool {
        let mut state = self.state.lock();
        if state.assigned == incoming.assigned {
            return false;
        }
        self.adopt(&mut state, incoming)
    }

    fn adopt(&self, state: &mut CellState, incoming: Declaration) -> bool {
        state.source = incoming.source;
        state.selector = incoming.selector;
        self.store(state, incoming.assigned)
    }

    fn store(&self, state: &mut CellState, values: ValueList) -> bool {
        let changed = state.assigned != values;
        state.assigned = values;
        state.derived = Default::default();
        state.inherited_at = None;
        if !changed {
            return false;
        }
        if self.definition.options().unset_all_stages {
            state.observed = Default::default();
        }
        if state.assigned.is_no_declaration() {
            self.ledger.forget(self.definition.name());
        } else {
            self.ledger.remember(self.definition.shared_name());
        }
        trace!(
            target: "style_engine",
            "{} {}: assigned {}",
            self.ledger.id(),
            self.name(),
            state.assigned
        );
        self.notify(Stage::Assigned);
        true
    }

    fn notify(&self, stage: Stage) {
        self.ledger.publish(StyleChange {
            set: self.ledger.id(),
            owner: self.ledger.owner(),
            property: self.definition.id(),
            name: self.definition.shared_name(),
            stage,
            dirty: self.definition.dirty(),
        });
    }
}

impl Ranked for PropertyCell {
    fn cascade_priority(&self) -> CascadePriority {
        let state = self.state.lock();
        let specificity = state
            .selector
            .as_ref()
            .map_or(Specificity::ZERO, Selector::specificity);
        CascadePriority::new(state.source.origin, specificity, state.source.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Detached, PropertySet};
    use css_properties::{
        DefinitionRegistry, LookupError, OptionSet, ResolveContext, Resolver, ResolverError,
    };

    fn at_most_one(value: &Value, _: &ResolveContext) -> Result<Value, ResolverError> {
        match value {
            Value::Number(number) => Ok(Value::number(number.0.min(1.0))),
            other => Ok(other.clone()),
        }
    }

    fn registry() -> Result<Arc<DefinitionRegistry>, LookupError> {
        let mut registry = DefinitionRegistry::new();
        registry.define(Definition::builder("width", Value::AUTO))?;
        registry.define(
            Definition::builder("opacity", Value::number(1.0))
                .options(OptionSet::PERMISSIVE.unsetting_all_stages())
                .computed(Resolver::Formula(at_most_one)),
        )?;
        Ok(Arc::new(registry))
    }

    #[test]
    fn stages_fill_left_to_right() -> Result<(), StyleError> {
        let set = PropertySet::builder(registry()?, Origin::Author).build();
        let cell = set.get("width")?;
        cell.set_assigned(Value::px(10.0))?;
        assert_eq!(cell.peek(Stage::Specified), None);

        cell.computed(&Detached)?;
        assert!(cell.peek(Stage::Specified).is_some());
        assert!(cell.peek(Stage::Computed).is_some());
        assert_eq!(cell.peek(Stage::Used), None);

        cell.set_assigned(Value::px(20.0))?;
        for stage in Stage::DERIVED {
            assert_eq!(cell.peek(stage), None, "{stage} survived a write");
        }
        Ok(())
    }

    #[test]
    fn only_real_changes_are_published() -> Result<(), StyleError> {
        let set = PropertySet::builder(registry()?, Origin::Author).build();
        let cell = set.get("width")?;
        cell.set_assigned(Value::px(10.0))?;
        cell.actual(&Detached)?;
        let first = set.queue().drain();
        assert_eq!(first.len(), 5);

        cell.invalidate();
        cell.actual(&Detached)?;
        assert!(set.queue().is_empty());

        assert!(!cell.set_assigned(Value::px(10.0))?);
        cell.actual(&Detached)?;
        assert!(set.queue().is_empty());
        Ok(())
    }

    #[test]
    fn unset_all_stages_republishes_everything() -> Result<(), StyleError> {
        let set = PropertySet::builder(registry()?, Origin::Author).build();
        let cell = set.get("opacity")?;
        cell.set_assigned(Value::number(1.5))?;
        cell.actual(&Detached)?;
        set.queue().drain();

        // Computed onwards stay at 1, but the snapshots were forgotten.
        cell.set_assigned(Value::number(2.0))?;
        cell.actual(&Detached)?;
        let stages: Vec<_> = set.queue().drain().into_iter().map(|change| change.stage).collect();
        assert_eq!(
            stages,
            [
                Stage::Assigned,
                Stage::Specified,
                Stage::Computed,
                Stage::Used,
                Stage::Actual
            ]
        );
        Ok(())
    }

    #[test]
    fn nan_is_refused_before_change_detection() -> Result<(), StyleError> {
        let set = PropertySet::builder(registry()?, Origin::Author).build();
        let cell = set.get("opacity")?;
        cell.set_assigned(Value::number(0.5))?;
        set.queue().drain();

        for _ in 0..2 {
            assert!(matches!(
                cell.set_assigned(Value::number(f32::NAN)),
                Err(ValidationError::NotFinite { .. })
            ));
        }
        assert_eq!(cell.assigned(), ValueList::single(Value::number(0.5)));
        assert!(set.queue().is_empty());
        Ok(())
    }

    #[test]
    fn cascade_ignores_the_lock_but_assignment_does_not() -> Result<(), StyleError> {
        let registry = registry()?;
        let target = PropertySet::builder(Arc::clone(&registry), Origin::Author).build();
        let source = PropertySet::builder(registry, Origin::User).build();
        source.assign("width", Value::px(4.0))?;
        target.lock();

        assert!(matches!(
            target.assign("width", Value::px(1.0)),
            Err(StyleError::Validation(ValidationError::Locked { .. }))
        ));
        let cell = target.get("width")?;
        assert!(cell.cascade(source.get("width")?));
        assert_eq!(cell.assigned(), ValueList::single(Value::px(4.0)));
        assert_eq!(cell.source().id, source.id());
        assert_eq!(cell.source().origin, Origin::User);
        Ok(())
    }
}
