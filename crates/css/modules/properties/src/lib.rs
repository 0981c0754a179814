//! Attribute definitions consumed by the style engine.
//!
//! A [`DefinitionRegistry`] maps every attribute name to an immutable
//! [`Definition`]: its initial value, whether it inherits, which value types it
//! accepts, and the [`Resolver`] strategy each derivation stage applies. Cells
//! look definitions up by name or [`PropertyId`] and never own them.

#![forbid(unsafe_code)]

mod defaults;
mod definition;
mod error;
mod options;
mod registry;
mod resolver;

pub use definition::{Definition, DefinitionBuilder, Derivations, DirtyFlags, PropertyId};
pub use error::{LookupError, ResolverError, ValidationError};
pub use options::OptionSet;
pub use registry::DefinitionRegistry;
pub use resolver::{PercentageBasis, ResolveContext, ResolveFn, Resolver};
