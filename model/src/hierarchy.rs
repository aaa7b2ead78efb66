//! The element arena and its builder.

use std::collections::{HashMap, HashSet};
use std::ops::Index;

use crate::definition::{ChildDef, ElementDef, HierarchyDef};
use crate::error::HierarchyError;
use crate::model::{ChildKind, Element, ElementChild, ElementId};

/// An immutable, acyclic, single-parent element hierarchy.
///
/// Elements are stored in a flat `Vec` in definition order and link to their
/// parent by [`ElementId`]. A `Hierarchy` can only be obtained from
/// [`HierarchyBuilder::build`], which rejects cycles, so every parent chain
/// ends at a root.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    elements: Vec<Element>,
    by_name: HashMap<String, ElementId>,
}

impl Hierarchy {
    /// Builds a hierarchy from declarative definitions.
    ///
    /// # Errors
    ///
    /// Returns the first [`HierarchyError`] found in the definitions.
    pub fn from_defs(defs: HierarchyDef) -> Result<Self, HierarchyError> {
        let mut builder = HierarchyBuilder::new();
        for def in defs.elements {
            builder.push(def);
        }
        builder.build()
    }

    /// Parses JSON element definitions and builds the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Definitions`] if the JSON is malformed, or
    /// any linking error from [`HierarchyBuilder::build`].
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, HierarchyError> {
        let defs: HierarchyDef = serde_json::from_str(json)?;
        Self::from_defs(defs)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the hierarchy holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Looks up an element by id. Returns `None` for an id from another arena
    /// that is out of range.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Looks up an element id by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.by_name.get(name).copied()
    }

    /// Iterates over all elements in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter()
    }

    /// Iterates over all element ids in arena order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().map(|e| e.id)
    }

    /// Returns the direct parent of `id`.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Returns every element without a parent.
    pub fn roots(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().filter(|e| e.is_root()).map(|e| e.id)
    }

    /// Returns the direct descendants of `id`, in arena order.
    pub fn subclasses(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .filter(move |e| e.parent == Some(id))
            .map(|e| e.id)
    }

    /// Number of parent links between `id` and its root.
    #[must_use]
    pub fn depth(&self, id: ElementId) -> usize {
        self.ancestors(id).count()
    }
}

impl Index<ElementId> for Hierarchy {
    type Output = Element;

    /// Panics if `id` does not belong to this hierarchy.
    fn index(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }
}

impl<'a> IntoIterator for &'a Hierarchy {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Collects element definitions and links them into a [`Hierarchy`].
///
/// ```
/// use cfgdoc_model::{ChildDef, HierarchyBuilder};
///
/// let mut builder = HierarchyBuilder::new();
/// builder.element("Pipe", None).abstract_element().attribute("name");
/// builder
///     .element("EchoPipe", Some("Pipe"))
///     .attribute(ChildDef::new("timeout").deprecated());
/// let hierarchy = builder.build().expect("valid hierarchy");
///
/// let echo = hierarchy.find("EchoPipe").expect("defined");
/// assert_eq!(hierarchy.parent(echo), hierarchy.find("Pipe"));
/// ```
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    pending: Vec<ElementDef>,
}

impl HierarchyBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element and returns a handle for declaring its children.
    pub fn element(&mut self, name: &str, parent: Option<&str>) -> ElementBuilder<'_> {
        self.pending.push(ElementDef {
            name: name.to_owned(),
            parent: parent.map(str::to_owned),
            ..ElementDef::default()
        });
        let index = self.pending.len() - 1;
        ElementBuilder {
            def: &mut self.pending[index],
        }
    }

    /// Adds a complete element definition.
    pub fn push(&mut self, def: ElementDef) -> &mut Self {
        self.pending.push(def);
        self
    }

    /// Links parents by name and validates the result.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::DuplicateElement`] if two definitions share a name
    /// - [`HierarchyError::UnknownParent`] if a parent name is not defined
    /// - [`HierarchyError::CyclicHierarchy`] if a parent chain loops
    /// - [`HierarchyError::DuplicateChild`] if an element repeats a child name
    pub fn build(self) -> Result<Hierarchy, HierarchyError> {
        let mut by_name = HashMap::with_capacity(self.pending.len());
        for (index, def) in self.pending.iter().enumerate() {
            if by_name
                .insert(def.name.clone(), ElementId::new(index))
                .is_some()
            {
                return Err(HierarchyError::DuplicateElement(def.name.clone()));
            }
        }

        let mut parents = Vec::with_capacity(self.pending.len());
        for def in &self.pending {
            let parent = match &def.parent {
                None => None,
                Some(name) => match by_name.get(name) {
                    Some(id) => Some(*id),
                    None => {
                        return Err(HierarchyError::UnknownParent {
                            element: def.name.clone(),
                            parent: name.clone(),
                        })
                    }
                },
            };
            parents.push(parent);
        }

        check_acyclic(&self.pending, &parents)?;

        let mut elements = Vec::with_capacity(self.pending.len());
        for (index, (def, parent)) in self.pending.into_iter().zip(parents).enumerate() {
            let id = ElementId::new(index);
            let attributes = link_children(&def.name, id, ChildKind::Attribute, def.attributes)?;
            let config_children =
                link_children(&def.name, id, ChildKind::ConfigChild, def.config_children)?;
            elements.push(Element {
                id,
                name: def.name,
                parent,
                is_abstract: def.is_abstract,
                attributes,
                config_children,
            });
        }

        Ok(Hierarchy { elements, by_name })
    }
}

/// Declares the children of an element added with [`HierarchyBuilder::element`].
#[derive(Debug)]
pub struct ElementBuilder<'a> {
    def: &'a mut ElementDef,
}

impl ElementBuilder<'_> {
    /// Marks the element abstract.
    pub fn abstract_element(self) -> Self {
        self.def.is_abstract = true;
        self
    }

    /// Declares an attribute.
    pub fn attribute(self, child: impl Into<ChildDef>) -> Self {
        self.def.attributes.push(child.into());
        self
    }

    /// Declares a config child.
    pub fn config_child(self, child: impl Into<ChildDef>) -> Self {
        self.def.config_children.push(child.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    ReachesRoot,
}

/// Walks every parent chain once. Each node is visited at most once and
/// membership on the current path is a state lookup, so the check is linear
/// in the number of elements whatever the definition order.
fn check_acyclic(
    defs: &[ElementDef],
    parents: &[Option<ElementId>],
) -> Result<(), HierarchyError> {
    let mut state = vec![Visit::Unvisited; defs.len()];
    let mut path: Vec<usize> = Vec::new();
    for start in 0..defs.len() {
        path.clear();
        let mut current = Some(start);
        while let Some(index) = current {
            match state[index] {
                Visit::ReachesRoot => break,
                Visit::OnPath => {
                    let pos = path.iter().rposition(|&p| p == index).unwrap_or_default();
                    let mut chain: Vec<String> =
                        path[pos..].iter().map(|&p| defs[p].name.clone()).collect();
                    chain.push(defs[index].name.clone());
                    return Err(HierarchyError::CyclicHierarchy { chain });
                }
                Visit::Unvisited => {
                    state[index] = Visit::OnPath;
                    path.push(index);
                    current = parents[index].map(ElementId::index);
                }
            }
        }
        for &index in &path {
            state[index] = Visit::ReachesRoot;
        }
    }
    Ok(())
}

fn link_children(
    element: &str,
    owner: ElementId,
    kind: ChildKind,
    defs: Vec<ChildDef>,
) -> Result<Vec<ElementChild>, HierarchyError> {
    let mut seen = HashSet::new();
    let mut children = Vec::with_capacity(defs.len());
    for def in defs {
        if !seen.insert(def.name.clone()) {
            return Err(HierarchyError::DuplicateChild {
                element: element.to_owned(),
                kind,
                child: def.name,
            });
        }
        children.push(ElementChild {
            name: def.name,
            kind,
            owner,
            deprecated: def.deprecated,
            excluded: def.excluded,
            mandatory: def.mandatory,
        });
    }
    Ok(children)
}
