//! Cumulative group aggregation.
//!
//! When an element with relevant children sits below another relevant level,
//! its cumulative group folds its own children together with those of every
//! relevant ancestor. The resolver only decides *that* a fold happens; a
//! [`CumulativeTrigger`] decides how far it goes, and a [`CollisionPolicy`]
//! decides which declaration of a repeated name survives.

use cfgdoc_model::{Element, ElementChild};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::handler::{FoldScope, GroupHandler};

/// Strategy that fills a freshly opened cumulative group.
///
/// Implemented by [`FoldAncestorLevels`] and by any closure with the matching
/// signature, so an output format can fold differently while sharing the
/// decision tree.
pub trait CumulativeTrigger<H: GroupHandler> {
    /// Folds levels into the cumulative group of `scope.element`.
    ///
    /// # Errors
    ///
    /// Returns the handler's error unchanged.
    fn trigger(&self, scope: FoldScope<'_>, handler: &mut H) -> Result<(), H::Error>;
}

impl<H, F> CumulativeTrigger<H> for F
where
    H: GroupHandler,
    F: Fn(FoldScope<'_>, &mut H) -> Result<(), H::Error>,
{
    fn trigger(&self, scope: FoldScope<'_>, handler: &mut H) -> Result<(), H::Error> {
        self(scope, handler)
    }
}

/// The default trigger: folds the element's own level, then every relevant
/// ancestor, nearest first, until the ancestor chain walker finds no more.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldAncestorLevels;

impl<H: GroupHandler> CumulativeTrigger<H> for FoldAncestorLevels {
    fn trigger(&self, scope: FoldScope<'_>, handler: &mut H) -> Result<(), H::Error> {
        let hierarchy = scope.hierarchy;
        let filter = scope.filter;
        let mut level = Some(scope.element);
        while let Some(id) = level {
            let element = &hierarchy[id];
            let children = filter.selected_children(element);
            debug!(
                "folding {} {} children of [{}] into cumulative group of [{}]",
                children.len(),
                filter.kind(),
                element.name,
                hierarchy[scope.element].name
            );
            handler.fold_level(element, &children)?;
            level = hierarchy.next_ancestor_with_children(id, |e| filter.has_relevant_children(e));
        }
        Ok(())
    }
}

/// Which declaration wins when folded levels repeat a child name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The declaration nearest to the folding element is kept; ancestors'
    /// declarations of the same name are dropped. Matches override semantics.
    #[default]
    NearestWins,
    /// The declaration farthest up the chain is kept.
    FarthestWins,
}

/// One member of a cumulative group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Child name.
    pub name: String,
    /// Name of the element whose declaration was kept.
    pub owner: String,
    /// Must be set in a configuration.
    pub mandatory: bool,
    /// Marked deprecated.
    pub deprecated: bool,
}

impl Member {
    fn from_child(owner: &Element, child: &ElementChild) -> Self {
        Self {
            name: child.name.clone(),
            owner: owner.name.clone(),
            mandatory: child.mandatory,
            deprecated: child.deprecated,
        }
    }
}

/// Accumulates folded levels into a de-duplicated member list.
///
/// Members keep the position of the first level that declared their name;
/// the policy only decides whose declaration fills that position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeMembers {
    policy: CollisionPolicy,
    members: Vec<Member>,
}

impl CumulativeMembers {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            members: Vec::new(),
        }
    }

    /// Folds one level. Levels must be passed nearest first.
    pub fn fold(&mut self, level: &Element, children: &[&ElementChild]) {
        for child in children {
            let member = Member::from_child(level, child);
            match self.members.iter().position(|m| m.name == child.name) {
                None => self.members.push(member),
                Some(existing) => match self.policy {
                    CollisionPolicy::NearestWins => {}
                    CollisionPolicy::FarthestWins => self.members[existing] = member,
                },
            }
        }
    }

    /// The members folded so far.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Consumes the accumulator.
    #[must_use]
    pub fn into_members(self) -> Vec<Member> {
        self.members
    }
}
