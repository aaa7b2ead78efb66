//! Resolution pass options and child selection.
//!
//! A pass is fixed by three choices: which kind of child it looks at, which
//! schema version it targets, and how cumulative groups resolve repeated
//! names. Options load from TOML:
//!
//! ```toml
//! kind = "config_child"
//! version = "compatibility"
//! collision = "nearest_wins"
//! ```

use cfgdoc_model::{ChildKind, Element, ElementChild};
use serde::{Deserialize, Serialize};

use crate::cumulative::CollisionPolicy;
use crate::error::PassError;

/// The schema flavor a pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// Deprecated children are left out.
    #[default]
    Strict,
    /// Deprecated children stay in so older configurations keep validating.
    Compatibility,
}

impl SchemaVersion {
    /// Returns the lowercase identifier used in options files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::Strict => "strict",
            SchemaVersion::Compatibility => "compatibility",
        }
    }
}

/// Decides which children of an element belong in a pass's output.
///
/// The relevance predicate of a pass is derived from it: an element is
/// relevant when at least one of its children of [`kind`](ChildFilter::kind)
/// is selected.
pub trait ChildFilter {
    /// The child kind this filter looks at.
    fn kind(&self) -> ChildKind;

    /// Returns true if `child` appears in the output.
    fn selects(&self, child: &ElementChild) -> bool;

    /// The selected children of `element`, in declaration order.
    fn selected_children<'e>(&self, element: &'e Element) -> Vec<&'e ElementChild> {
        element
            .children(self.kind())
            .iter()
            .filter(|child| self.selects(child))
            .collect()
    }

    /// The relevance predicate: at least one child of `element` is selected.
    fn has_relevant_children(&self, element: &Element) -> bool {
        element
            .children(self.kind())
            .iter()
            .any(|child| self.selects(child))
    }
}

/// The standard filter: one child kind, filtered by schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSelection {
    /// Child kind of the pass.
    pub kind: ChildKind,
    /// Schema version of the pass.
    pub version: SchemaVersion,
}

impl ChildFilter for ChildSelection {
    fn kind(&self) -> ChildKind {
        self.kind
    }

    fn selects(&self, child: &ElementChild) -> bool {
        if child.kind != self.kind || child.excluded {
            return false;
        }
        match self.version {
            SchemaVersion::Strict => !child.deprecated,
            SchemaVersion::Compatibility => true,
        }
    }
}

/// Options of one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassOptions {
    /// Child kind the pass resolves.
    pub kind: ChildKind,
    /// Schema version the pass targets.
    pub version: SchemaVersion,
    /// Name collision policy for cumulative groups.
    pub collision: CollisionPolicy,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            kind: ChildKind::Attribute,
            version: SchemaVersion::Strict,
            collision: CollisionPolicy::NearestWins,
        }
    }
}

impl PassOptions {
    /// Options for `kind` with the remaining settings at their defaults.
    #[must_use]
    pub fn for_kind(kind: ChildKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Returns a copy targeting `version`.
    #[must_use]
    pub fn with_version(mut self, version: SchemaVersion) -> Self {
        self.version = version;
        self
    }

    /// Returns a copy using `collision`.
    #[must_use]
    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    /// Parses options from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PassError::Options`] on malformed TOML, unknown keys or
    /// unknown values.
    pub fn from_toml_str(text: &str) -> Result<Self, PassError> {
        Ok(toml::from_str(text)?)
    }

    /// The child filter of this pass.
    #[must_use]
    pub fn selection(&self) -> ChildSelection {
        ChildSelection {
            kind: self.kind,
            version: self.version,
        }
    }

    /// The four passes a complete schema needs: attributes and config
    /// children, each for the strict and the compatibility version.
    #[must_use]
    pub fn standard_passes() -> [PassOptions; 4] {
        [
            PassOptions::for_kind(ChildKind::Attribute),
            PassOptions::for_kind(ChildKind::ConfigChild),
            PassOptions::for_kind(ChildKind::Attribute).with_version(SchemaVersion::Compatibility),
            PassOptions::for_kind(ChildKind::ConfigChild).with_version(SchemaVersion::Compatibility),
        ]
    }
}
