//! Ancestor chain walking.

use crate::hierarchy::Hierarchy;
use crate::model::{Element, ElementId};

/// Iterator over the strict ancestors of an element, nearest first.
///
/// Created by [`Hierarchy::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    hierarchy: &'a Hierarchy,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

impl Hierarchy {
    /// Iterates over the strict ancestors of `id`, nearest first. The element
    /// itself is not included.
    #[must_use]
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            next: self.parent(id),
        }
    }

    /// Returns the nearest strict ancestor of `id` for which
    /// `has_relevant_children` holds, skipping every ancestor in between.
    ///
    /// Returns `None` when the root is passed without a match. There is no
    /// depth limit; termination follows from the acyclic check in
    /// [`HierarchyBuilder::build`](crate::HierarchyBuilder::build).
    ///
    /// ```
    /// use cfgdoc_model::HierarchyBuilder;
    ///
    /// let mut b = HierarchyBuilder::new();
    /// b.element("Root", None).attribute("name");
    /// b.element("Mid", Some("Root"));
    /// b.element("Leaf", Some("Mid"));
    /// let h = b.build().expect("valid hierarchy");
    ///
    /// let leaf = h.find("Leaf").expect("Leaf");
    /// let with_attributes = |e: &cfgdoc_model::Element| !e.attributes.is_empty();
    /// assert_eq!(h.next_ancestor_with_children(leaf, with_attributes), h.find("Root"));
    /// ```
    pub fn next_ancestor_with_children<P>(
        &self,
        id: ElementId,
        has_relevant_children: P,
    ) -> Option<ElementId>
    where
        P: Fn(&Element) -> bool,
    {
        self.ancestors(id)
            .find(|&ancestor| has_relevant_children(&self[ancestor]))
    }
}
