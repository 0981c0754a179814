//! Per-attribute constraints on assignable values.

use css_values_units::{Value, ValueType};

use crate::ValidationError;

/// Which value types an attribute accepts, plus how it invalidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OptionSet {
    /// Whether the `auto` keyword may be assigned.
    pub allow_auto: bool,
    /// Whether the `inherit` keyword may be assigned.
    pub allow_inherited: bool,
    /// Whether percentages may be assigned.
    pub allow_percentage: bool,
    /// Also forget the change-detection snapshots when the assigned value
    /// changes, so every stage republishes on its next read.
    pub unset_all_stages: bool,
}

impl OptionSet {
    /// Every value type allowed, snapshots kept.
    pub const PERMISSIVE: Self = Self {
        allow_auto: true,
        allow_inherited: true,
        allow_percentage: true,
        unset_all_stages: false,
    };

    #[inline]
    #[must_use]
    pub const fn without_auto(mut self) -> Self {
        self.allow_auto = false;
        self
    }

    #[inline]
    #[must_use]
    pub const fn without_inherit(mut self) -> Self {
        self.allow_inherited = false;
        self
    }

    #[inline]
    #[must_use]
    pub const fn without_percentage(mut self) -> Self {
        self.allow_percentage = false;
        self
    }

    #[inline]
    #[must_use]
    pub const fn unsetting_all_stages(mut self) -> Self {
        self.unset_all_stages = true;
        self
    }

    /// Check one value against the flags.
    ///
    /// # Errors
    /// Returns `ValidationError::Disallowed` when the value's type is switched
    /// off and `ValidationError::NotFinite` for NaN or infinite numbers.
    pub fn validate(&self, property: &str, value: &Value) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                property: property.into(),
            });
        }
        let value_type = value.value_type();
        let allowed = match value_type {
            ValueType::Auto => self.allow_auto,
            ValueType::Inherit => self.allow_inherited,
            ValueType::Percentage => self.allow_percentage,
            ValueType::NoDeclaration
            | ValueType::None
            | ValueType::Initial
            | ValueType::Unset
            | ValueType::Keyword
            | ValueType::Length
            | ValueType::Number
            | ValueType::Color
            | ValueType::String => true,
        };
        if allowed {
            Ok(())
        } else {
            Err(ValidationError::Disallowed {
                property: property.into(),
                value_type,
            })
        }
    }
}

impl Default for OptionSet {
    #[inline]
    fn default() -> Self {
        Self::PERMISSIVE
    }
}
