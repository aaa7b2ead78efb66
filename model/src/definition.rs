//! Declarative element definitions.
//!
//! Upstream model builders (annotation scanners, hand-written fixtures) hand
//! their results over as plain definitions. The builder links them into a
//! [`Hierarchy`](crate::Hierarchy). With the `serde` feature the same
//! definitions load from JSON:
//!
//! ```json
//! {
//!   "elements": [
//!     { "name": "Pipe", "abstract": true, "attributes": ["name", "active"] },
//!     { "name": "EchoPipe", "parent": "Pipe",
//!       "attributes": [{ "name": "timeout", "deprecated": true }] }
//!   ]
//! }
//! ```

/// Definition of one child before it is attached to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(from = "ChildEntry"))]
pub struct ChildDef {
    /// Child name.
    pub name: String,
    /// Marked deprecated.
    pub deprecated: bool,
    /// Excluded from every output.
    pub excluded: bool,
    /// Must be set in a configuration.
    pub mandatory: bool,
}

impl ChildDef {
    /// A plain child: not deprecated, not excluded, optional.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deprecated: false,
            excluded: false,
            mandatory: false,
        }
    }

    /// Marks the child deprecated.
    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Marks the child excluded.
    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Marks the child mandatory.
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

impl From<&str> for ChildDef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ChildDef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A child is written either as a bare name or as a table of flags.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ChildEntry {
    Name(String),
    Full(ChildFields),
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ChildFields {
    name: String,
    #[serde(default)]
    deprecated: bool,
    #[serde(default)]
    excluded: bool,
    #[serde(default)]
    mandatory: bool,
}

#[cfg(feature = "serde")]
impl From<ChildEntry> for ChildDef {
    fn from(entry: ChildEntry) -> Self {
        match entry {
            ChildEntry::Name(name) => ChildDef::new(name),
            ChildEntry::Full(f) => ChildDef {
                name: f.name,
                deprecated: f.deprecated,
                excluded: f.excluded,
                mandatory: f.mandatory,
            },
        }
    }
}

/// Definition of one element, parent given by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(deny_unknown_fields)
)]
pub struct ElementDef {
    /// Unique element name.
    pub name: String,
    /// Name of the direct parent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<String>,
    /// Abstract elements never appear in a configuration themselves.
    #[cfg_attr(feature = "serde", serde(default, rename = "abstract"))]
    pub is_abstract: bool,
    /// Declared attributes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Vec<ChildDef>,
    /// Declared config children.
    #[cfg_attr(feature = "serde", serde(default))]
    pub config_children: Vec<ChildDef>,
}

/// A full set of element definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(deny_unknown_fields)
)]
pub struct HierarchyDef {
    /// Element definitions in arena order.
    pub elements: Vec<ElementDef>,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn child_entries_accept_names_and_tables() {
        let def: HierarchyDef = serde_json::from_str(
            r#"{ "elements": [
                { "name": "Pipe", "abstract": true, "attributes": ["name"] },
                { "name": "EchoPipe", "parent": "Pipe",
                  "attributes": [{ "name": "timeout", "deprecated": true }],
                  "config_children": ["param"] }
            ] }"#,
        )
        .expect("valid definitions");

        assert_eq!(def.elements.len(), 2);
        assert!(def.elements[0].is_abstract);
        assert_eq!(def.elements[0].attributes, vec![ChildDef::new("name")]);
        assert_eq!(def.elements[1].parent.as_deref(), Some("Pipe"));
        assert_eq!(
            def.elements[1].attributes,
            vec![ChildDef::new("timeout").deprecated()]
        );
        assert_eq!(def.elements[1].config_children[0].name, "param");
    }

    #[test]
    fn unknown_element_keys_are_rejected() {
        let result: Result<HierarchyDef, _> =
            serde_json::from_str(r#"{ "elements": [ { "name": "A", "parnet": "B" } ] }"#);
        assert!(result.is_err());
    }
}
