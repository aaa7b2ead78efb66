//! Group plan: the schema-group view of a resolution pass.
//!
//! [`GroupPlanBuilder`] records, per element, the group it declares, the
//! cumulative group it folds, and the group its type uses. A schema writer
//! walks the resulting [`GroupPlan`] to emit one named group per declaration
//! and one group reference per element.

use std::collections::BTreeMap;

use cfgdoc_model::{ChildKind, Element, ElementChild, ElementId};
use serde::Serialize;

use crate::cumulative::{CumulativeMembers, Member};
use crate::error::HandlerError;
use crate::handler::{CumulativeChildHandler, GroupHandler};
use crate::naming::{cumulative_group_name, declared_group_name};
use crate::options::{PassOptions, SchemaVersion};

/// A group holding one element's own selected children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredGroup {
    /// Group name.
    pub name: String,
    /// True if no ancestor declares a group of this kind.
    pub top_level: bool,
    /// Child names in declaration order.
    pub members: Vec<String>,
}

/// A group folding an element's own level with its relevant ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumulativeGroup {
    /// Group name.
    pub name: String,
    /// Names of the folded levels, nearest first.
    pub levels: Vec<String>,
    /// De-duplicated members, ordered by first appearance.
    pub members: Vec<Member>,
}

/// The group an element's type uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRef {
    /// Name of the referenced group.
    pub group: String,
    /// Element that owns the referenced group.
    pub referee: String,
    /// True for a cumulative group, false for a declared group.
    pub cumulative: bool,
}

/// All groups of one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementGroups {
    /// Element name.
    pub element: String,
    /// The group declared by the element, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_group: Option<DeclaredGroup>,
    /// The cumulative group folded for the element, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_group: Option<CumulativeGroup>,
    /// The group the element uses; `None` when it contributes no group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_ref: Option<GroupRef>,
}

impl ElementGroups {
    fn new(element: &Element) -> Self {
        Self {
            element: element.name.clone(),
            declared_group: None,
            cumulative_group: None,
            group_ref: None,
        }
    }
}

/// The outcome of a pass as named groups, in arena order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPlan {
    /// Child kind of the pass.
    pub kind: ChildKind,
    /// Schema version of the pass.
    pub version: SchemaVersion,
    /// Per-element groups, in arena order.
    pub elements: Vec<ElementGroups>,
}

impl GroupPlan {
    /// Looks up the groups of an element by name.
    #[must_use]
    pub fn find(&self, element: &str) -> Option<&ElementGroups> {
        self.elements.iter().find(|e| e.element == element)
    }

    /// Number of declared groups.
    #[must_use]
    pub fn declared_group_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.declared_group.is_some())
            .count()
    }

    /// Number of cumulative groups.
    #[must_use]
    pub fn cumulative_group_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.cumulative_group.is_some())
            .count()
    }

    /// References whose target group is not part of the plan.
    ///
    /// Empty after a full pass: the resolver only references groups that the
    /// referee's own outcome declares.
    #[must_use]
    pub fn unresolved_refs(&self) -> Vec<&GroupRef> {
        self.elements
            .iter()
            .filter_map(|e| e.group_ref.as_ref())
            .filter(|r| {
                let target = self.find(&r.referee);
                let found = if r.cumulative {
                    target
                        .and_then(|t| t.cumulative_group.as_ref())
                        .map(|g| &g.name)
                } else {
                    target
                        .and_then(|t| t.declared_group.as_ref())
                        .map(|g| &g.name)
                };
                found != Some(&r.group)
            })
            .collect()
    }

    /// Serializes the plan to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug)]
struct OpenCumulative {
    element: ElementId,
    levels: Vec<String>,
    members: CumulativeMembers,
}

/// Handler that builds a [`GroupPlan`].
#[derive(Debug)]
pub struct GroupPlanBuilder {
    options: PassOptions,
    elements: BTreeMap<ElementId, ElementGroups>,
    open: Option<OpenCumulative>,
}

impl GroupPlanBuilder {
    /// Creates a builder for a pass with `options`.
    #[must_use]
    pub fn new(options: PassOptions) -> Self {
        Self {
            options,
            elements: BTreeMap::new(),
            open: None,
        }
    }

    /// Closes any open cumulative group and returns the plan.
    #[must_use]
    pub fn finish(mut self) -> GroupPlan {
        self.close_cumulative();
        GroupPlan {
            kind: self.options.kind,
            version: self.options.version,
            elements: self.elements.into_values().collect(),
        }
    }

    fn entry(&mut self, element: &Element) -> &mut ElementGroups {
        self.elements
            .entry(element.id)
            .or_insert_with(|| ElementGroups::new(element))
    }

    fn close_cumulative(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let kind = self.options.kind;
        if let Some(groups) = self.elements.get_mut(&open.element) {
            groups.cumulative_group = Some(CumulativeGroup {
                name: cumulative_group_name(&groups.element, kind),
                levels: open.levels,
                members: open.members.into_members(),
            });
        }
    }

    fn declare(&mut self, element: &Element, children: &[&ElementChild], top_level: bool) {
        self.close_cumulative();
        let name = declared_group_name(&element.name, self.options.kind);
        self.entry(element).declared_group = Some(DeclaredGroup {
            name,
            top_level,
            members: children.iter().map(|c| c.name.clone()).collect(),
        });
    }

    fn reference(&mut self, element: &Element, referee: &Element, cumulative: bool) {
        self.close_cumulative();
        let group = if cumulative {
            cumulative_group_name(&referee.name, self.options.kind)
        } else {
            declared_group_name(&referee.name, self.options.kind)
        };
        self.entry(element).group_ref = Some(GroupRef {
            group,
            referee: referee.name.clone(),
            cumulative,
        });
    }
}

impl CumulativeChildHandler for GroupPlanBuilder {
    type Error = HandlerError;

    fn fold_level(
        &mut self,
        level: &Element,
        children: &[&ElementChild],
    ) -> Result<(), HandlerError> {
        let Some(open) = self.open.as_mut() else {
            return Err(HandlerError::FoldOutsideCumulativeGroup {
                level: level.name.clone(),
            });
        };
        open.levels.push(level.name.clone());
        open.members.fold(level, children);
        Ok(())
    }
}

impl GroupHandler for GroupPlanBuilder {
    fn no_children(&mut self, element: &Element) -> Result<(), HandlerError> {
        self.close_cumulative();
        self.entry(element);
        Ok(())
    }

    fn declared_group(
        &mut self,
        element: &Element,
        children: &[&ElementChild],
    ) -> Result<(), HandlerError> {
        self.declare(element, children, false);
        Ok(())
    }

    fn top_level_declared_group(
        &mut self,
        element: &Element,
        children: &[&ElementChild],
    ) -> Result<(), HandlerError> {
        self.declare(element, children, true);
        Ok(())
    }

    fn cumulative_group(&mut self, element: &Element) -> Result<(), HandlerError> {
        self.close_cumulative();
        self.entry(element);
        self.open = Some(OpenCumulative {
            element: element.id,
            levels: Vec::new(),
            members: CumulativeMembers::new(self.options.collision),
        });
        Ok(())
    }

    fn declared_group_ref(
        &mut self,
        element: &Element,
        referee: &Element,
    ) -> Result<(), HandlerError> {
        self.reference(element, referee, false);
        Ok(())
    }

    fn cumulative_group_ref(
        &mut self,
        element: &Element,
        referee: &Element,
    ) -> Result<(), HandlerError> {
        self.reference(element, referee, true);
        Ok(())
    }
}
