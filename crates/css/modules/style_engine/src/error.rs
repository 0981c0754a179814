//! Umbrella error for style engine entry points.

use std::sync::Arc;

use css_properties::{LookupError, ResolverError, ValidationError};
use thiserror::Error;

use crate::{ElementId, Stage};

/// Everything a cell, set or document operation can fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A stage resolver failed. The stage slot stays empty, so reading it
    /// again after fixing the cause retries the derivation.
    #[error("cannot resolve the {stage} value of `{property}`")]
    Resolver {
        property: Arc<str>,
        stage: Stage,
        #[source]
        source: ResolverError,
    },

    #[error("element {0} is not part of this document")]
    UnknownElement(ElementId),

    #[error("a document holds at most {} elements", u32::MAX)]
    TooManyElements,
}
