//! Stage derivation for a single cell.

use css_properties::{ResolveContext, Resolver};
use css_values_units::{GlobalKeyword, ValueList};
use log::trace;

use super::{CellState, PropertyCell};
use crate::{Stage, StyleError, StyleTree};

/// How the assigned value feeds the derived stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Every stage copies the parent's same stage.
    Inherit,
    /// Specified is the initial value; later stages derive from it.
    Initial,
    /// Every stage applies its resolver to the previous stage.
    Declared,
}

impl PropertyCell {
    fn mode(&self, assigned: &ValueList) -> Mode {
        let inherits = self.definition.inherited();
        if assigned.is_no_declaration() {
            return if inherits { Mode::Inherit } else { Mode::Initial };
        }
        match assigned.global_keyword() {
            Some(GlobalKeyword::Inherit) => Mode::Inherit,
            Some(GlobalKeyword::Initial) => Mode::Initial,
            Some(GlobalKeyword::Unset) if inherits => Mode::Inherit,
            Some(GlobalKeyword::Unset) => Mode::Initial,
            None => Mode::Declared,
        }
    }

    /// Forget stages copied from the parent once any assigned value sharing
    /// this cell's queue has changed since.
    pub(super) fn drop_stale_inheritance(&self, state: &mut CellState) {
        let Some(seen) = state.inherited_at else {
            return;
        };
        if self.ledger.revision().is_newer_than(seen) {
            state.derived = Default::default();
            state.inherited_at = None;
        }
    }

    pub(super) fn resolve(
        &self,
        state: &mut CellState,
        stage: Stage,
        tree: &dyn StyleTree,
    ) -> Result<ValueList, StyleError> {
        let Some(slot) = stage.derived_index() else {
            return Ok(state.assigned.clone());
        };
        if let Some(present) = &state.derived[slot] {
            return Ok(present.clone());
        }

        // Earlier stages settle first, even when this one ends up inherited.
        let input = match stage.previous() {
            Stage::Assigned => state.assigned.clone(),
            previous => self.resolve(state, previous, tree)?,
        };

        let mode = self.mode(&state.assigned);
        let inherited = match mode {
            Mode::Inherit => self.parent_cell(tree)?,
            Mode::Initial | Mode::Declared => None,
        };
        let value = match (inherited, mode, stage) {
            (Some(parent), _, _) => {
                let seen = self.ledger.revision();
                let value = parent.stage(stage, tree)?;
                state.inherited_at.get_or_insert(seen);
                value
            }
            (None, Mode::Inherit | Mode::Initial, Stage::Specified) => {
                ValueList::single(self.definition.initial().clone())
            }
            (None, _, _) => self.apply(stage, &input, tree)?,
        };

        trace!(
            target: "style_engine",
            "{} {}: {stage} {value} ({mode:?})",
            self.ledger.id(),
            self.name()
        );
        self.publish(state, stage, slot, &value);
        Ok(value)
    }

    /// The same attribute on the owner's parent, if the owner has one.
    fn parent_cell<'tree>(
        &self,
        tree: &'tree dyn StyleTree,
    ) -> Result<Option<&'tree PropertyCell>, StyleError> {
        let Some(parent) = self.ledger.owner().and_then(|owner| tree.parent(owner)) else {
            return Ok(None);
        };
        let Some(set) = tree.cascaded(parent) else {
            return Ok(None);
        };
        Ok(Some(set.get(self.name())?))
    }

    fn resolver(&self, stage: Stage) -> Resolver {
        let derivations = self.definition.derivations();
        match stage {
            Stage::Assigned => Resolver::PassThrough,
            Stage::Specified => derivations.specified,
            Stage::Computed => derivations.computed,
            Stage::Used => derivations.used.unwrap_or_default(),
            Stage::Actual => derivations.actual.unwrap_or_default(),
        }
    }

    /// Derive every element positionally; a failure leaves the slot empty.
    fn apply(
        &self,
        stage: Stage,
        input: &ValueList,
        tree: &dyn StyleTree,
    ) -> Result<ValueList, StyleError> {
        let resolver = self.resolver(stage);
        let context = self
            .ledger
            .owner()
            .map_or_else(ResolveContext::default, |owner| tree.resolve_context(owner));
        input
            .iter()
            .map(|value| resolver.resolve(value, &context))
            .collect::<Result<ValueList, _>>()
            .map_err(|source| StyleError::Resolver {
                property: self.definition.shared_name(),
                stage,
                source,
            })
    }

    fn publish(&self, state: &mut CellState, stage: Stage, slot: usize, value: &ValueList) {
        state.derived[slot] = Some(value.clone());
        if state.observed[slot].as_ref() == Some(value) {
            return;
        }
        state.observed[slot] = Some(value.clone());
        for later in &mut state.derived[slot + 1..] {
            *later = None;
        }
        self.notify(stage);
    }
}
