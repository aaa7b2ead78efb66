//! The group resolution decision.
//!
//! For one element, [`resolve`] combines the element's own relevance with the
//! nearest relevant ancestor (and, when needed, the one above that) and picks
//! exactly one [`GroupOutcome`]. The function is pure: it reads the hierarchy
//! and the predicate and nothing else.

use cfgdoc_model::{Element, ElementId, Hierarchy};

/// How an element's children of one kind are exposed.
///
/// The variants partition the `(has relevant children, nearest relevant
/// ancestor)` state space; every element gets exactly one of them per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupOutcome {
    /// No relevant children here or in any ancestor.
    NoChildren,
    /// No relevant children here; reuse the declared group of the given
    /// ancestor, which is the only relevant level above.
    ReferenceDeclaredGroup(ElementId),
    /// No relevant children here; reuse the cumulative group of the given
    /// ancestor, which itself inherits from a further relevant level.
    ReferenceCumulativeGroup(ElementId),
    /// Relevant children here and none above: declare a group and reference it.
    TopLevelDeclaredGroup,
    /// Relevant children here and above: declare a group, reference the
    /// element's cumulative group and fold the ancestor levels into it.
    DeclaredGroupWithCumulativeAggregation {
        /// Nearest ancestor with relevant children.
        ancestor: ElementId,
    },
}

/// One handler callback, in the order a consumer receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupStep {
    /// The element contributes no group.
    NoChildren,
    /// Declare a group with the element's own children.
    DeclaredGroup,
    /// Declare a group with the element's own children; no ancestor group exists.
    TopLevelDeclaredGroup,
    /// Open the element's cumulative group.
    CumulativeGroup,
    /// Reference the declared group of the given element.
    DeclaredGroupRef(ElementId),
    /// Reference the cumulative group of the given element.
    CumulativeGroupRef(ElementId),
    /// Hand over to the cumulative trigger to fold the levels.
    FoldAncestors,
}

impl GroupOutcome {
    /// Expands the outcome into its callback sequence for `element`.
    ///
    /// Declarations always precede references to them; the fold comes last.
    #[must_use]
    pub fn steps(self, element: ElementId) -> Vec<GroupStep> {
        match self {
            GroupOutcome::NoChildren => vec![GroupStep::NoChildren],
            GroupOutcome::ReferenceDeclaredGroup(referee) => {
                vec![GroupStep::DeclaredGroupRef(referee)]
            }
            GroupOutcome::ReferenceCumulativeGroup(referee) => {
                vec![GroupStep::CumulativeGroupRef(referee)]
            }
            GroupOutcome::TopLevelDeclaredGroup => vec![
                GroupStep::TopLevelDeclaredGroup,
                GroupStep::DeclaredGroupRef(element),
            ],
            GroupOutcome::DeclaredGroupWithCumulativeAggregation { .. } => vec![
                GroupStep::DeclaredGroup,
                GroupStep::CumulativeGroupRef(element),
                GroupStep::CumulativeGroup,
                GroupStep::FoldAncestors,
            ],
        }
    }

    /// Returns true if the element declares a group of its own.
    #[must_use]
    pub fn declares_group(self) -> bool {
        matches!(
            self,
            GroupOutcome::TopLevelDeclaredGroup
                | GroupOutcome::DeclaredGroupWithCumulativeAggregation { .. }
        )
    }

    /// Short identifier used in logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GroupOutcome::NoChildren => "no-children",
            GroupOutcome::ReferenceDeclaredGroup(_) => "reference-declared-group",
            GroupOutcome::ReferenceCumulativeGroup(_) => "reference-cumulative-group",
            GroupOutcome::TopLevelDeclaredGroup => "top-level-declared-group",
            GroupOutcome::DeclaredGroupWithCumulativeAggregation { .. } => {
                "declared-group-with-cumulative-aggregation"
            }
        }
    }
}

/// Decides how `element` exposes its relevant children.
///
/// `has_relevant_children` answers "does this element declare at least one
/// child that belongs in the output of this pass". It is evaluated on the
/// element and on ancestors only; siblings and descendants are never read.
///
/// ```
/// use cfgdoc_groups::{resolve, GroupOutcome};
/// use cfgdoc_model::HierarchyBuilder;
///
/// let mut b = HierarchyBuilder::new();
/// b.element("Root", None).attribute("name");
/// b.element("Mid", Some("Root"));
/// b.element("Leaf", Some("Mid")).attribute("timeout");
/// let h = b.build().expect("valid hierarchy");
///
/// let relevant = |e: &cfgdoc_model::Element| !e.attributes.is_empty();
/// let root = h.find("Root").expect("Root");
/// let leaf = h.find("Leaf").expect("Leaf");
/// assert_eq!(resolve(&h, root, relevant), GroupOutcome::TopLevelDeclaredGroup);
/// assert_eq!(
///     resolve(&h, leaf, relevant),
///     GroupOutcome::DeclaredGroupWithCumulativeAggregation { ancestor: root }
/// );
/// ```
pub fn resolve<P>(
    hierarchy: &Hierarchy,
    element: ElementId,
    has_relevant_children: P,
) -> GroupOutcome
where
    P: Fn(&Element) -> bool,
{
    let has_own = has_relevant_children(&hierarchy[element]);
    let ancestor = hierarchy.next_ancestor_with_children(element, &has_relevant_children);
    match (has_own, ancestor) {
        (false, None) => GroupOutcome::NoChildren,
        (false, Some(ancestor)) => {
            match hierarchy.next_ancestor_with_children(ancestor, &has_relevant_children) {
                None => GroupOutcome::ReferenceDeclaredGroup(ancestor),
                Some(_) => GroupOutcome::ReferenceCumulativeGroup(ancestor),
            }
        }
        (true, None) => GroupOutcome::TopLevelDeclaredGroup,
        (true, Some(ancestor)) => {
            GroupOutcome::DeclaredGroupWithCumulativeAggregation { ancestor }
        }
    }
}
