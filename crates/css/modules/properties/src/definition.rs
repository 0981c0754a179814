//! Immutable per-attribute records.

use std::sync::Arc;

use bitflags::bitflags;
use css_values_units::{Value, ValueList};

use crate::{OptionSet, Resolver, ValidationError};

/// Dense index of a definition inside its registry. Property Sets use it as
/// the cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u32);

impl PropertyId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// What an owning element has to redo when the attribute changes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// Repaint only.
        const VISUAL = 1;
        /// Box geometry of the element itself.
        const BOX = 1 << 1;
        /// Text shaping.
        const TEXT = 1 << 2;
        /// Layout of the surrounding flow.
        const FLOW = 1 << 3;
    }
}

/// The resolver each derivation stage applies to declared values.
///
/// Used and actual default to handing the previous stage through; a
/// definition only overrides them for attributes that need layout or device
/// information.
#[derive(Clone, Copy, Debug, Default)]
pub struct Derivations {
    pub specified: Resolver,
    pub computed: Resolver,
    pub used: Option<Resolver>,
    pub actual: Option<Resolver>,
}

/// Everything the engine knows about one attribute.
#[derive(Debug)]
pub struct Definition {
    id: PropertyId,
    name: Arc<str>,
    initial: Value,
    inherited: bool,
    list_valued: bool,
    options: OptionSet,
    derivations: Derivations,
    dirty: DirtyFlags,
}

impl Definition {
    /// Start describing an attribute.
    pub fn builder(name: &str, initial: Value) -> DefinitionBuilder {
        DefinitionBuilder {
            name: Arc::from(name.to_ascii_lowercase()),
            initial,
            inherited: false,
            list_valued: false,
            options: OptionSet::default(),
            derivations: Derivations::default(),
            dirty: DirtyFlags::VISUAL,
        }
    }

    #[inline]
    pub const fn id(&self) -> PropertyId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, for change notifications.
    #[inline]
    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    #[inline]
    pub const fn initial(&self) -> &Value {
        &self.initial
    }

    #[inline]
    pub const fn inherited(&self) -> bool {
        self.inherited
    }

    #[inline]
    pub const fn list_valued(&self) -> bool {
        self.list_valued
    }

    #[inline]
    pub const fn options(&self) -> &OptionSet {
        &self.options
    }

    #[inline]
    pub const fn derivations(&self) -> &Derivations {
        &self.derivations
    }

    #[inline]
    pub const fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Check a whole assignment before anything is stored.
    ///
    /// # Errors
    /// Returns `ValidationError::TooManyValues` for lists on single-valued
    /// attributes, `ValidationError::KeywordInList` when a CSS-wide keyword or the
    /// sentinel shares a list with other values, and `ValidationError::Disallowed`
    /// when an element's type is switched off in the option set.
    pub fn validate(&self, values: &ValueList) -> Result<(), ValidationError> {
        if values.len() > 1 {
            if !self.list_valued {
                return Err(ValidationError::TooManyValues {
                    property: self.name().into(),
                    count: values.len(),
                });
            }
            if values
                .iter()
                .any(|value| value.is_no_declaration() || value.global_keyword().is_some())
            {
                return Err(ValidationError::KeywordInList {
                    property: self.name().into(),
                });
            }
        }
        values
            .iter()
            .try_for_each(|value| self.options.validate(self.name(), value))
    }
}

/// Builder for [`Definition`]; the registry assigns the id.
#[derive(Debug)]
pub struct DefinitionBuilder {
    name: Arc<str>,
    initial: Value,
    inherited: bool,
    list_valued: bool,
    options: OptionSet,
    derivations: Derivations,
    dirty: DirtyFlags,
}

impl DefinitionBuilder {
    #[must_use]
    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    #[must_use]
    pub fn list_valued(mut self) -> Self {
        self.list_valued = true;
        self
    }

    #[must_use]
    pub fn options(mut self, options: OptionSet) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn specified(mut self, resolver: Resolver) -> Self {
        self.derivations.specified = resolver;
        self
    }

    #[must_use]
    pub fn computed(mut self, resolver: Resolver) -> Self {
        self.derivations.computed = resolver;
        self
    }

    #[must_use]
    pub fn used(mut self, resolver: Resolver) -> Self {
        self.derivations.used = Some(resolver);
        self
    }

    #[must_use]
    pub fn actual(mut self, resolver: Resolver) -> Self {
        self.derivations.actual = Some(resolver);
        self
    }

    #[must_use]
    pub fn dirty(mut self, dirty: DirtyFlags) -> Self {
        self.dirty = dirty;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn build(self, id: PropertyId) -> Definition {
        Definition {
            id,
            name: self.name,
            initial: self.initial,
            inherited: self.inherited,
            list_valued: self.list_valued,
            options: self.options,
            derivations: self.derivations,
            dirty: self.dirty,
        }
    }
}
