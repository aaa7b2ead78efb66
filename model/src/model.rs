//! Core element model types.
//!
//! These types represent a hierarchy of configuration-capable elements as
//! typed Rust data. Elements live in a flat arena owned by
//! [`Hierarchy`](crate::Hierarchy) and refer to each other by [`ElementId`];
//! nothing in this module holds a borrow of another element.

use std::fmt;

/// Index of an element inside its [`Hierarchy`](crate::Hierarchy) arena.
///
/// Ids are only handed out by the hierarchy that owns the element. Using an
/// id with a different hierarchy is a logic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementId(usize);

impl ElementId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena position of this element.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of declarable unit a resolution pass looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ChildKind {
    /// An attribute set directly on the element.
    Attribute,
    /// A nested configuration slot (a child element).
    ConfigChild,
}

impl ChildKind {
    /// Returns the lowercase identifier used in options files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChildKind::Attribute => "attribute",
            ChildKind::ConfigChild => "config_child",
        }
    }

    /// Returns the capitalized form used inside generated group names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ChildKind::Attribute => "Attribute",
            ChildKind::ConfigChild => "ConfigChild",
        }
    }
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declarable unit attached to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementChild {
    /// Name of the attribute or configuration slot.
    pub name: String,
    /// Whether this is an attribute or a config child.
    pub kind: ChildKind,
    /// The element that declares this child. A back-reference, not ownership.
    pub owner: ElementId,
    /// Marked deprecated; left out of strict output.
    pub deprecated: bool,
    /// Excluded from every output, e.g. a technical setter.
    pub excluded: bool,
    /// Must be set in a configuration.
    pub mandatory: bool,
}

/// A node in the element hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Position of this element in the arena.
    pub id: ElementId,
    /// Unique element name.
    pub name: String,
    /// Direct parent, `None` at a root.
    pub parent: Option<ElementId>,
    /// Abstract elements never appear in a configuration themselves.
    pub is_abstract: bool,
    /// Attributes declared by this element, in declaration order.
    pub attributes: Vec<ElementChild>,
    /// Config children declared by this element, in declaration order.
    pub config_children: Vec<ElementChild>,
}

impl Element {
    /// Returns the declared children of one kind, in declaration order.
    #[must_use]
    pub fn children(&self, kind: ChildKind) -> &[ElementChild] {
        match kind {
            ChildKind::Attribute => &self.attributes,
            ChildKind::ConfigChild => &self.config_children,
        }
    }

    /// Returns true if the element has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
