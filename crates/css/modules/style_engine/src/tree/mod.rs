//! The element layer as the engine sees it.
//!
//! Cells only ever look at elements through [`StyleTree`]: to find the parent
//! of the element a set styles, that parent's working Property Set for
//! inheritance, and the layout facts its resolvers need. Nothing here owns or
//! mutates elements.

mod document;

use core::fmt;

use css_properties::ResolveContext;

use crate::PropertySet;

pub use document::Document;

/// Non-owning handle to an element, an index into its document's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<{}>", self.0)
    }
}

/// An adapter that abstracts element access for style resolution.
/// Implement this for your DOM layer.
pub trait StyleTree: Sync {
    /// Parent element if any; `None` for the document root.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// The set holding the element's cascaded values, read for inheritance.
    fn cascaded(&self, element: ElementId) -> Option<&PropertySet>;

    /// Layout facts resolvers may need for this element.
    fn resolve_context(&self, element: ElementId) -> ResolveContext;
}

/// The tree of a set that styles no element: rule blocks and layers.
/// Everything resolves as if at the root.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl StyleTree for Detached {
    #[inline]
    fn parent(&self, _element: ElementId) -> Option<ElementId> {
        None
    }

    #[inline]
    fn cascaded(&self, _element: ElementId) -> Option<&PropertySet> {
        None
    }

    #[inline]
    fn resolve_context(&self, _element: ElementId) -> ResolveContext {
        ResolveContext::default()
    }
}
