//! Property Sets: one cell per defined attribute for one rule block or layer.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use css_cascade::{CascadePriority, Origin, Ranked, Selector, SetId, SetIdCounter, Specificity};
use css_properties::{DefinitionRegistry, LookupError, PropertyId};
use css_values_units::ValueList;
use dashmap::DashSet;
use log::debug;
use rayon::prelude::*;

use crate::cell::{Declaration, SourceRef};
use crate::{
    ChangeQueue, ElementId, PropertyCell, Revision, StyleChange, StyleError, StyleTree,
};

/// State a set shares with its cells: identity, lock flag, the names with an
/// assigned value, and where change notifications go.
#[derive(Debug)]
pub(crate) struct SetLedger {
    id: SetId,
    origin: Origin,
    selector: Option<Selector>,
    owner: Option<ElementId>,
    locked: AtomicBool,
    set_names: DashSet<Arc<str>>,
    queue: Arc<ChangeQueue>,
}

impl SetLedger {
    #[inline]
    pub(crate) const fn id(&self) -> SetId {
        self.id
    }

    #[inline]
    pub(crate) const fn owner(&self) -> Option<ElementId> {
        self.owner
    }

    #[inline]
    pub(crate) const fn selector(&self) -> Option<&Selector> {
        self.selector.as_ref()
    }

    #[inline]
    pub(crate) const fn source(&self) -> SourceRef {
        SourceRef {
            id: self.id,
            origin: self.origin,
        }
    }

    #[inline]
    pub(crate) fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    pub(crate) fn remember(&self, name: Arc<str>) {
        self.set_names.insert(name);
    }

    pub(crate) fn forget(&self, name: &str) {
        self.set_names.remove(name);
    }

    #[inline]
    pub(crate) fn revision(&self) -> Revision {
        self.queue.revision()
    }

    #[inline]
    pub(crate) fn publish(&self, change: StyleChange) {
        self.queue.push(change);
    }
}

/// Builder for [`PropertySet`].
#[derive(Debug)]
pub struct PropertySetBuilder {
    registry: Arc<DefinitionRegistry>,
    origin: Origin,
    id: Option<SetId>,
    selector: Option<Selector>,
    owner: Option<ElementId>,
    queue: Option<Arc<ChangeQueue>>,
}

impl PropertySetBuilder {
    /// Fix the declaration age instead of drawing the next global id.
    #[must_use]
    pub fn id(mut self, id: SetId) -> Self {
        self.id = Some(id);
        self
    }

    /// Selector of the rule block; its specificity ranks the set.
    #[must_use]
    pub fn selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }

    /// The element this set styles, used for inheritance and resolve contexts.
    #[must_use]
    pub fn owner(mut self, element: ElementId) -> Self {
        self.owner = Some(element);
        self
    }

    /// Report changes to a shared queue instead of a private one. Sets whose
    /// cells inherit from each other must share a queue.
    #[must_use]
    pub fn queue(mut self, queue: Arc<ChangeQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Create the set. No cell exists until it is first accessed.
    pub fn build(self) -> PropertySet {
        let id = self
            .id
            .unwrap_or_else(|| SetIdCounter::global().allocate());
        let cells = (0..self.registry.len()).map(|_| OnceLock::new()).collect();
        PropertySet {
            registry: self.registry,
            cells,
            ledger: Arc::new(SetLedger {
                id,
                origin: self.origin,
                selector: self.selector,
                owner: self.owner,
                locked: AtomicBool::new(false),
                set_names: DashSet::new(),
                queue: self.queue.unwrap_or_default(),
            }),
        }
    }
}

/// One Property Cell per registry entry, created on first access.
#[derive(Debug)]
pub struct PropertySet {
    registry: Arc<DefinitionRegistry>,
    cells: Box<[OnceLock<PropertyCell>]>,
    ledger: Arc<SetLedger>,
}

impl PropertySet {
    /// Start a set with one cell slot per definition in `registry`.
    pub fn builder(registry: Arc<DefinitionRegistry>, origin: Origin) -> PropertySetBuilder {
        PropertySetBuilder {
            registry,
            origin,
            id: None,
            selector: None,
            owner: None,
            queue: None,
        }
    }

    /// Identity and declaration age.
    #[inline]
    pub fn id(&self) -> SetId {
        self.ledger.id
    }

    #[inline]
    pub fn origin(&self) -> Origin {
        self.ledger.origin
    }

    #[inline]
    pub fn selector(&self) -> Option<&Selector> {
        self.ledger.selector.as_ref()
    }

    /// The element this set styles; `None` for rule blocks.
    #[inline]
    pub fn owner(&self) -> Option<ElementId> {
        self.ledger.owner
    }

    #[inline]
    pub fn registry(&self) -> &Arc<DefinitionRegistry> {
        &self.registry
    }

    #[inline]
    pub fn queue(&self) -> &Arc<ChangeQueue> {
        &self.ledger.queue
    }

    /// Number of defined attributes, instantiated or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Names whose cell holds an assigned value, sorted.
    pub fn set_names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<_> = self
            .ledger
            .set_names
            .iter()
            .map(|name| Arc::clone(name.key()))
            .collect();
        names.sort_unstable();
        names
    }

    #[inline]
    pub fn has_assigned(&self, name: &str) -> bool {
        self.ledger.set_names.contains(name)
    }

    /// Refuse `set_assigned` on every cell of this set.
    #[inline]
    pub fn lock(&self) {
        self.ledger.locked.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.ledger.is_locked()
    }

    /// The cell for `name`, created on first access. Names match
    /// case-insensitively when no exact match exists.
    ///
    /// # Errors
    /// Returns `LookupError::UnknownProperty` for names the registry lacks.
    pub fn get(&self, name: &str) -> Result<&PropertyCell, LookupError> {
        self.get_by_index(self.registry.id_of(name)?)
    }

    /// The cell for a registry index, created on first access.
    ///
    /// # Errors
    /// Returns `LookupError::UnknownId` for indices past the registry.
    pub fn get_by_index(&self, id: PropertyId) -> Result<&PropertyCell, LookupError> {
        let slot = self.cells.get(id.index()).ok_or(LookupError::UnknownId(id))?;
        if let Some(cell) = slot.get() {
            return Ok(cell);
        }
        let definition = self.registry.by_id(id)?;
        Ok(slot.get_or_init(|| PropertyCell::new(Arc::clone(definition), Arc::clone(&self.ledger))))
    }

    /// Cells created so far.
    pub fn instantiated(&self) -> impl Iterator<Item = &PropertyCell> {
        self.cells.iter().filter_map(OnceLock::get)
    }

    /// Assign a value to the named attribute.
    ///
    /// # Errors
    /// Lookup and validation failures.
    pub fn assign(&self, name: &str, values: impl Into<ValueList>) -> Result<bool, StyleError> {
        Ok(self.get(name)?.set_assigned(values)?)
    }

    /// Overwrite the named cell from `source`.
    ///
    /// # Errors
    /// Returns `LookupError::UnknownProperty` for names the registry lacks.
    pub fn set(&self, name: &str, source: &PropertyCell) -> Result<bool, LookupError> {
        Ok(self.get(name)?.overwrite(source))
    }

    /// Additive merge: cascade every attribute `other` assigns. Attributes
    /// `other` leaves undeclared are not touched. Returns how many cells
    /// changed.
    ///
    /// # Errors
    /// Returns `LookupError::UnknownProperty` when `other` assigns an attribute
    /// this set's registry does not define.
    pub fn cascade_from(&self, other: &Self) -> Result<usize, LookupError> {
        let names = other.set_names();
        let changed = names
            .par_iter()
            .map(|name| -> Result<bool, LookupError> {
                Ok(self.get(name)?.cascade(other.get(name)?))
            })
            .collect::<Result<Vec<bool>, LookupError>>()?;
        let count = changed.into_iter().filter(|changed_cell| *changed_cell).count();
        debug!(
            target: "style_engine",
            "cascaded {} of {} attributes from {} into {}",
            count,
            names.len(),
            other.id(),
            self.id()
        );
        Ok(count)
    }

    /// Layer replacement: overwrite every attribute by index, including ones
    /// neither set has touched. Returns how many cells changed.
    ///
    /// # Errors
    /// Returns `LookupError::UnknownId` when `other` defines fewer attributes.
    pub fn overwrite_from(&self, other: &Self) -> Result<usize, LookupError> {
        let ids: Vec<PropertyId> = self.registry.iter().map(|definition| definition.id()).collect();
        let changed = ids
            .par_iter()
            .map(|id| self.overwrite_one(other, *id))
            .collect::<Result<Vec<bool>, LookupError>>()?;
        let count = changed.into_iter().filter(|changed_cell| *changed_cell).count();
        debug!(
            target: "style_engine",
            "overwrote {} of {} attributes from {} into {}",
            count,
            self.cells.len(),
            other.id(),
            self.id()
        );
        Ok(count)
    }

    fn overwrite_one(&self, other: &Self, id: PropertyId) -> Result<bool, LookupError> {
        let theirs = other.cells.get(id.index()).ok_or(LookupError::UnknownId(id))?;
        let incoming = match theirs.get() {
            Some(cell) => cell.declaration(),
            // Neither side has touched this attribute.
            None if self.cells.get(id.index()).and_then(OnceLock::get).is_none() => {
                return Ok(false);
            }
            None => Declaration {
                assigned: ValueList::no_declaration(),
                source: other.ledger.source(),
                selector: other.ledger.selector.clone(),
            },
        };
        Ok(self.get_by_index(id)?.overwrite_with(incoming))
    }

    /// Drop derived stages of every created cell.
    pub fn invalidate(&self) {
        self.instantiated().for_each(PropertyCell::invalidate);
    }

    /// Derive every assigned attribute through `Actual`.
    ///
    /// # Errors
    /// The first resolver failure.
    pub fn settle(&self, tree: &dyn StyleTree) -> Result<(), StyleError> {
        for name in self.set_names() {
            self.get(&name)?.actual(tree)?;
        }
        Ok(())
    }
}

impl Ranked for PropertySet {
    fn cascade_priority(&self) -> CascadePriority {
        let specificity = self
            .selector()
            .map_or(Specificity::ZERO, Selector::specificity);
        CascadePriority::new(self.origin(), specificity, self.id())
    }
}
