//! Errors raised while validating, looking up and resolving attributes.

use css_values_units::ValueType;
use thiserror::Error;

use crate::PropertyId;

/// An assignment the attribute does not accept. Nothing was written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cannot assign to locked attribute `{property}`")]
    Locked { property: Box<str> },

    #[error("`{property}` does not accept {value_type:?} values")]
    Disallowed {
        property: Box<str>,
        value_type: ValueType,
    },

    /// NaN never equals itself, so it would defeat change detection.
    #[error("`{property}` only accepts finite numbers")]
    NotFinite { property: Box<str> },

    #[error("`{property}` takes a single value, got {count}")]
    TooManyValues { property: Box<str>, count: usize },

    #[error("CSS-wide keywords must stand alone in `{property}`")]
    KeywordInList { property: Box<str> },
}

/// A name or index the registry does not define.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown attribute `{0}`")]
    UnknownProperty(Box<str>),

    #[error("unknown attribute index {0:?}")]
    UnknownId(PropertyId),

    #[error("attribute `{0}` is already defined")]
    DuplicateProperty(Box<str>),
}

/// A stage resolver that could not produce a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    #[error("{resolver} needs {missing} from the element context")]
    MissingContext {
        resolver: &'static str,
        missing: &'static str,
    },

    #[error("{resolver} produced an unresolvable {value_type:?} value")]
    InvalidResult {
        resolver: &'static str,
        value_type: ValueType,
    },

    #[error("formula failed: {0}")]
    Failed(String),
}
