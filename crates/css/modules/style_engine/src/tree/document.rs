//! Element arena driving the cascade for a whole document.

use std::sync::Arc;

use css_cascade::{Origin, Selector, sort_by_cascade_order};
use css_properties::{DefinitionRegistry, ResolveContext};
use log::debug;

use super::{ElementId, StyleTree};
use crate::{
    ChangeQueue, ParallelRuntime, PropertySet, RecomputeMode, StyleChange, StyleConfig, StyleError,
};

#[derive(Debug)]
struct Element {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// Working set the winning declarations are cascaded into.
    style: PropertySet,
    context: ResolveContext,
}

/// Owns every element's working Property Set and the queue they report to.
#[derive(Debug)]
pub struct Document {
    registry: Arc<DefinitionRegistry>,
    queue: Arc<ChangeQueue>,
    elements: Vec<Element>,
    config: StyleConfig,
    runtime: Option<ParallelRuntime>,
}

impl Document {
    /// # Errors
    /// Returns an error if a dedicated thread pool was configured and cannot be
    /// created.
    pub fn new(registry: Arc<DefinitionRegistry>, config: StyleConfig) -> anyhow::Result<Self> {
        let runtime = config.threads.map(|threads| ParallelRuntime::new(Some(threads))).transpose()?;
        Ok(Self {
            registry,
            queue: Arc::new(ChangeQueue::new()),
            elements: Vec::new(),
            config,
            runtime,
        })
    }

    #[inline]
    pub fn registry(&self) -> &Arc<DefinitionRegistry> {
        &self.registry
    }

    #[inline]
    pub fn queue(&self) -> &Arc<ChangeQueue> {
        &self.queue
    }

    #[inline]
    pub const fn config(&self) -> &StyleConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add an element with no parent.
    ///
    /// # Errors
    /// Returns `StyleError::TooManyElements` once ids run out.
    pub fn create_root(&mut self) -> Result<ElementId, StyleError> {
        self.push(None)
    }

    /// Add an element under `parent`.
    ///
    /// # Errors
    /// Returns `StyleError::UnknownElement` for a parent outside this document
    /// and `StyleError::TooManyElements` once ids run out.
    pub fn append_child(&mut self, parent: ElementId) -> Result<ElementId, StyleError> {
        self.element(parent)?;
        let child = self.push(Some(parent))?;
        if let Some(node) = self.elements.get_mut(parent.index()) {
            node.children.push(child);
        }
        Ok(child)
    }

    fn push(&mut self, parent: Option<ElementId>) -> Result<ElementId, StyleError> {
        let id = element_id(self.elements.len())?;
        let style = PropertySet::builder(Arc::clone(&self.registry), Origin::Author)
            .owner(id)
            .queue(Arc::clone(&self.queue))
            .build();
        self.elements.push(Element {
            parent,
            children: Vec::new(),
            style,
            context: ResolveContext::default(),
        });
        Ok(id)
    }

    fn element(&self, element: ElementId) -> Result<&Element, StyleError> {
        self.elements
            .get(element.index())
            .ok_or(StyleError::UnknownElement(element))
    }

    /// A rule block sharing this document's registry and change queue.
    pub fn rule_set(&self, origin: Origin, selector: Option<Selector>) -> PropertySet {
        let builder =
            PropertySet::builder(Arc::clone(&self.registry), origin).queue(Arc::clone(&self.queue));
        match selector {
            Some(selector) => builder.selector(selector).build(),
            None => builder.build(),
        }
    }

    /// The element's working Property Set.
    ///
    /// # Errors
    /// Returns `StyleError::UnknownElement` for elements outside this document.
    pub fn style(&self, element: ElementId) -> Result<&PropertySet, StyleError> {
        Ok(&self.element(element)?.style)
    }

    /// # Errors
    /// Returns `StyleError::UnknownElement` for elements outside this document.
    pub fn children(&self, element: ElementId) -> Result<&[ElementId], StyleError> {
        Ok(&self.element(element)?.children)
    }

    /// # Errors
    /// Returns `StyleError::UnknownElement` for elements outside this document.
    pub fn context(&self, element: ElementId) -> Result<ResolveContext, StyleError> {
        Ok(self.element(element)?.context)
    }

    /// Replace the layout facts of an element. Derived stages of the element
    /// and its descendants are dropped.
    ///
    /// # Errors
    /// Returns `StyleError::UnknownElement` for elements outside this document.
    pub fn set_context(
        &mut self,
        element: ElementId,
        context: ResolveContext,
    ) -> Result<(), StyleError> {
        let node = self
            .elements
            .get_mut(element.index())
            .ok_or(StyleError::UnknownElement(element))?;
        node.context = context;
        self.invalidate_subtree(element)
    }

    /// Cascade matching rule blocks into an element, lowest priority first so
    /// the winner is applied last. Returns how many attribute writes changed
    /// a value.
    ///
    /// # Errors
    /// Unknown elements, attributes the document's registry lacks, and in
    /// immediate mode any resolver failure while settling.
    pub fn apply_cascade(
        &self,
        element: ElementId,
        sets: &[&PropertySet],
    ) -> Result<usize, StyleError> {
        let style = self.style(element)?;
        let mut ordered = sets.to_vec();
        sort_by_cascade_order(&mut ordered);

        let mut changed = 0;
        for set in ordered {
            changed += self.run(|| style.cascade_from(set))?;
        }
        debug!(
            target: "style_engine",
            "{element}: {} rule blocks, {changed} changes",
            sets.len()
        );
        self.after_write(element, changed)?;
        Ok(changed)
    }

    /// Replace the element's whole working set with `layer`.
    ///
    /// # Errors
    /// As for [`Document::apply_cascade`].
    pub fn replace_layer(&self, element: ElementId, layer: &PropertySet) -> Result<usize, StyleError> {
        let style = self.style(element)?;
        let changed = self.run(|| style.overwrite_from(layer))?;
        self.after_write(element, changed)?;
        Ok(changed)
    }

    fn run<R, F>(&self, operation: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.runtime {
            Some(runtime) => runtime.install(operation),
            None => operation(),
        }
    }

    fn after_write(&self, element: ElementId, changed: usize) -> Result<(), StyleError> {
        if changed == 0 {
            return Ok(());
        }
        // Descendants may inherit what just changed.
        for child in self.children(element)? {
            self.invalidate_subtree(*child)?;
        }
        if self.config.recompute == RecomputeMode::Immediate {
            self.style(element)?.settle(self)?;
        }
        Ok(())
    }

    /// Drop derived stages of an element and all its descendants, so the next
    /// read re-resolves inheritance and context.
    ///
    /// # Errors
    /// Returns `StyleError::UnknownElement` for elements outside this document.
    pub fn invalidate_subtree(&self, element: ElementId) -> Result<(), StyleError> {
        let mut pending = vec![element];
        while let Some(next) = pending.pop() {
            let node = self.element(next)?;
            node.style.invalidate();
            pending.extend_from_slice(&node.children);
        }
        Ok(())
    }

    /// Take every change reported since the last drain.
    pub fn drain_changes(&self) -> Vec<StyleChange> {
        self.queue.drain()
    }
}

fn element_id(index: usize) -> Result<ElementId, StyleError> {
    u32::try_from(index)
        .map(ElementId::new)
        .map_err(|_| StyleError::TooManyElements)
}

impl StyleTree for Document {
    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.elements.get(element.index()).and_then(|node| node.parent)
    }

    fn cascaded(&self, element: ElementId) -> Option<&PropertySet> {
        self.elements.get(element.index()).map(|node| &node.style)
    }

    fn resolve_context(&self, element: ElementId) -> ResolveContext {
        self.elements
            .get(element.index())
            .map_or_else(ResolveContext::default, |node| node.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_do_not_wrap() {
        assert_eq!(element_id(7), Ok(ElementId::new(7)));
        let past_the_end = usize::try_from(u64::from(u32::MAX) + 1).unwrap_or(usize::MAX);
        assert_eq!(element_id(past_the_end), Err(StyleError::TooManyElements));
    }
}
