//! Pass report types: outcome counts per resolution pass.

use cfgdoc_model::ChildKind;
use serde::Serialize;

use crate::options::SchemaVersion;
use crate::outcome::GroupOutcome;

/// Report of what a resolution pass decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Child kind of the pass.
    pub kind: ChildKind,
    /// Schema version of the pass.
    pub version: SchemaVersion,
    /// Elements without any group.
    pub no_children: usize,
    /// Elements reusing an ancestor's declared group.
    pub declared_group_refs: usize,
    /// Elements reusing an ancestor's cumulative group.
    pub cumulative_group_refs: usize,
    /// Elements declaring a top-level group.
    pub top_level_groups: usize,
    /// Elements declaring a group and folding a cumulative group.
    pub cumulative_groups: usize,
}

impl PassReport {
    /// Creates an empty report.
    pub fn new(kind: ChildKind, version: SchemaVersion) -> Self {
        Self {
            kind,
            version,
            no_children: 0,
            declared_group_refs: 0,
            cumulative_group_refs: 0,
            top_level_groups: 0,
            cumulative_groups: 0,
        }
    }

    /// Counts one outcome.
    pub fn record(&mut self, outcome: GroupOutcome) {
        match outcome {
            GroupOutcome::NoChildren => self.no_children += 1,
            GroupOutcome::ReferenceDeclaredGroup(_) => self.declared_group_refs += 1,
            GroupOutcome::ReferenceCumulativeGroup(_) => self.cumulative_group_refs += 1,
            GroupOutcome::TopLevelDeclaredGroup => self.top_level_groups += 1,
            GroupOutcome::DeclaredGroupWithCumulativeAggregation { .. } => {
                self.cumulative_groups += 1;
            }
        }
    }

    /// Number of elements resolved.
    pub fn element_count(&self) -> usize {
        self.no_children
            + self.declared_group_refs
            + self.cumulative_group_refs
            + self.top_level_groups
            + self.cumulative_groups
    }

    /// Number of groups declared (declared groups, not counting cumulative ones).
    pub fn declared_group_count(&self) -> usize {
        self.top_level_groups + self.cumulative_groups
    }
}
