//! Name-indexed collection of definitions.

use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashMap;

use crate::{Definition, DefinitionBuilder, LookupError, PropertyId};

/// Every attribute the engine can style, in definition order.
///
/// Built once, then shared read-only by every Property Set through an `Arc`.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    definitions: Vec<Arc<Definition>>,
    by_name: FxHashMap<Arc<str>, PropertyId>,
}

impl DefinitionRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition and return its id.
    ///
    /// # Errors
    /// Returns `LookupError::DuplicateProperty` when the name is taken.
    pub fn define(&mut self, builder: DefinitionBuilder) -> Result<PropertyId, LookupError> {
        if self.by_name.contains_key(builder.name()) {
            return Err(LookupError::DuplicateProperty(builder.name().into()));
        }
        let index = u32::try_from(self.definitions.len())
            .map_err(|_| LookupError::DuplicateProperty(builder.name().into()))?;
        let id = PropertyId::new(index);
        let definition = builder.build(id);
        debug!(target: "css_properties", "defined `{}` as {id:?}", definition.name());
        self.by_name.insert(definition.shared_name(), id);
        self.definitions.push(Arc::new(definition));
        Ok(id)
    }

    /// Look a definition up by attribute name (ASCII case-insensitive).
    ///
    /// # Errors
    /// Returns `LookupError::UnknownProperty` for names the registry lacks.
    pub fn lookup(&self, name: &str) -> Result<&Arc<Definition>, LookupError> {
        let id = self.id_of(name)?;
        self.by_id(id)
    }

    /// Resolve a name to its id.
    ///
    /// # Errors
    /// Returns `LookupError::UnknownProperty` for names the registry lacks.
    pub fn id_of(&self, name: &str) -> Result<PropertyId, LookupError> {
        if let Some(id) = self.by_name.get(name) {
            return Ok(*id);
        }
        self.by_name
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| LookupError::UnknownProperty(name.into()))
    }

    /// Look a definition up by id.
    ///
    /// # Errors
    /// Returns `LookupError::UnknownId` for ids from another registry.
    pub fn by_id(&self, id: PropertyId) -> Result<&Arc<Definition>, LookupError> {
        self.definitions
            .get(id.index())
            .ok_or(LookupError::UnknownId(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Definition>> {
        self.definitions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_values_units::Value;

    #[test]
    fn names_are_case_insensitive() -> Result<(), LookupError> {
        let mut registry = DefinitionRegistry::new();
        let id = registry.define(Definition::builder("Width", Value::AUTO))?;
        assert_eq!(registry.id_of("WIDTH")?, id);
        assert_eq!(registry.lookup("width")?.name(), "width");
        Ok(())
    }

    #[test]
    fn unknown_and_duplicate_names_fail() -> Result<(), LookupError> {
        let mut registry = DefinitionRegistry::new();
        registry.define(Definition::builder("color", Value::NONE))?;
        assert_eq!(
            registry.define(Definition::builder("color", Value::NONE)),
            Err(LookupError::DuplicateProperty("color".into()))
        );
        assert!(matches!(
            registry.lookup("colour"),
            Err(LookupError::UnknownProperty(_))
        ));
        assert!(matches!(
            registry.by_id(PropertyId::new(7)),
            Err(LookupError::UnknownId(_))
        ));
        Ok(())
    }
}
