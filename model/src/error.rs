//! Errors raised while assembling a [`Hierarchy`](crate::Hierarchy).

use crate::model::ChildKind;

/// A defect in the element definitions handed to the builder.
///
/// Every variant is detected once, in
/// [`HierarchyBuilder::build`](crate::HierarchyBuilder::build). A hierarchy
/// that built successfully is acyclic and fully linked.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    /// Two elements share a name.
    #[error("duplicate element [{0}]")]
    DuplicateElement(String),

    /// An element names a parent that was never defined.
    #[error("element [{element}] has unknown parent [{parent}]")]
    UnknownParent {
        /// The element whose parent is missing.
        element: String,
        /// The parent name that could not be resolved.
        parent: String,
    },

    /// Following parent links returns to an element already on the path.
    #[error("cyclic hierarchy: {}", .chain.join(" -> "))]
    CyclicHierarchy {
        /// Element names along the cycle; the first name is repeated at the end.
        chain: Vec<String>,
    },

    /// One element declares the same child name twice for one kind.
    #[error("element [{element}] declares {kind} [{child}] more than once")]
    DuplicateChild {
        /// The declaring element.
        element: String,
        /// The kind of the duplicated child.
        kind: ChildKind,
        /// The duplicated child name.
        child: String,
    },

    /// The JSON element definitions could not be parsed.
    #[cfg(feature = "serde")]
    #[error("invalid element definitions: {0}")]
    Definitions(#[from] serde_json::Error),
}
