//! Element name → group name mapping.
//!
//! Deterministic names for the groups a pass declares. Consumers that
//! serialize groups use these names as identifiers, so they must be stable
//! across runs.

use cfgdoc_model::ChildKind;

/// Extracts the simple name from a qualified element name (after the last `.`).
pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Name of the group holding an element's own children,
/// e.g. `"EchoPipeDeclaredAttributeGroup"`.
pub fn declared_group_name(element: &str, kind: ChildKind) -> String {
    format!("{}Declared{}Group", simple_name(element), kind.label())
}

/// Name of the group holding an element's own and inherited children,
/// e.g. `"EchoPipeCumulativeAttributeGroup"`.
pub fn cumulative_group_name(element: &str, kind: ChildKind) -> String {
    format!("{}Cumulative{}Group", simple_name(element), kind.label())
}
