//! Flattened JSON member lists.
//!
//! Where a schema keeps inheritance visible through group references, the
//! JSON view flattens it: every element lists all the members it accepts,
//! own and inherited, with the element that declares each one. References
//! are followed when the document is built, so elements may be resolved in
//! any order.

use std::collections::BTreeMap;

use cfgdoc_model::{ChildKind, Element, ElementChild, ElementId};
use serde_json::{json, Value};

use crate::cumulative::{CollisionPolicy, CumulativeMembers, Member};
use crate::error::HandlerError;
use crate::handler::{CumulativeChildHandler, GroupHandler};
use crate::options::PassOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Uses {
    Declared(ElementId),
    Cumulative(ElementId),
}

#[derive(Debug)]
struct Entry {
    name: String,
    declared: Option<Vec<Member>>,
    cumulative: Option<CumulativeMembers>,
    uses: Option<Uses>,
}

/// Handler that builds a flattened JSON member list per element.
#[derive(Debug)]
pub struct JsonMemberList {
    kind: ChildKind,
    collision: CollisionPolicy,
    entries: BTreeMap<ElementId, Entry>,
    open: Option<ElementId>,
}

impl JsonMemberList {
    /// Creates an empty list for a pass with `options`.
    #[must_use]
    pub fn new(options: PassOptions) -> Self {
        Self {
            kind: options.kind,
            collision: options.collision,
            entries: BTreeMap::new(),
            open: None,
        }
    }

    fn entry(&mut self, element: &Element) -> &mut Entry {
        self.entries.entry(element.id).or_insert_with(|| Entry {
            name: element.name.clone(),
            declared: None,
            cumulative: None,
            uses: None,
        })
    }

    /// The flattened members of one element, following its group reference.
    fn members_of(&self, id: ElementId) -> &[Member] {
        let target = match self.entries.get(&id).and_then(|e| e.uses) {
            Some(uses) => uses,
            None => return &[],
        };
        match target {
            Uses::Declared(referee) => self
                .entries
                .get(&referee)
                .and_then(|e| e.declared.as_deref())
                .unwrap_or_default(),
            Uses::Cumulative(referee) => self
                .entries
                .get(&referee)
                .and_then(|e| e.cumulative.as_ref())
                .map(CumulativeMembers::members)
                .unwrap_or_default(),
        }
    }

    /// Builds the JSON document: one object per element, in arena order.
    ///
    /// ```json
    /// { "kind": "attribute",
    ///   "elements": [ { "name": "EchoPipe",
    ///                   "members": [ { "name": "timeout", "declaredBy": "EchoPipe" } ] } ] }
    /// ```
    #[must_use]
    pub fn to_json(&self) -> Value {
        let elements: Vec<Value> = self
            .entries
            .iter()
            .map(|(id, entry)| {
                let members: Vec<Value> =
                    self.members_of(*id).iter().map(member_to_json).collect();
                json!({
                    "name": entry.name,
                    "members": members
                })
            })
            .collect();
        json!({
            "kind": self.kind.as_str(),
            "elements": elements
        })
    }
}

fn member_to_json(member: &Member) -> Value {
    let mut node = json!({
        "name": member.name,
        "declaredBy": member.owner
    });
    if member.mandatory {
        node["mandatory"] = Value::Bool(true);
    }
    if member.deprecated {
        node["deprecated"] = Value::Bool(true);
    }
    node
}

fn own_members(element: &Element, children: &[&ElementChild]) -> Vec<Member> {
    let mut members = CumulativeMembers::new(CollisionPolicy::NearestWins);
    members.fold(element, children);
    members.into_members()
}

impl CumulativeChildHandler for JsonMemberList {
    type Error = HandlerError;

    fn fold_level(
        &mut self,
        level: &Element,
        children: &[&ElementChild],
    ) -> Result<(), HandlerError> {
        let open = self
            .open
            .and_then(|id| self.entries.get_mut(&id))
            .and_then(|e| e.cumulative.as_mut());
        match open {
            Some(members) => {
                members.fold(level, children);
                Ok(())
            }
            None => Err(HandlerError::FoldOutsideCumulativeGroup {
                level: level.name.clone(),
            }),
        }
    }
}

impl GroupHandler for JsonMemberList {
    fn no_children(&mut self, element: &Element) -> Result<(), HandlerError> {
        self.open = None;
        self.entry(element);
        Ok(())
    }

    fn declared_group(
        &mut self,
        element: &Element,
        children: &[&ElementChild],
    ) -> Result<(), HandlerError> {
        self.open = None;
        self.entry(element).declared = Some(own_members(element, children));
        Ok(())
    }

    fn top_level_declared_group(
        &mut self,
        element: &Element,
        children: &[&ElementChild],
    ) -> Result<(), HandlerError> {
        self.declared_group(element, children)
    }

    fn cumulative_group(&mut self, element: &Element) -> Result<(), HandlerError> {
        let collision = self.collision;
        self.entry(element).cumulative = Some(CumulativeMembers::new(collision));
        self.open = Some(element.id);
        Ok(())
    }

    fn declared_group_ref(
        &mut self,
        element: &Element,
        referee: &Element,
    ) -> Result<(), HandlerError> {
        self.open = None;
        self.entry(element).uses = Some(Uses::Declared(referee.id));
        Ok(())
    }

    fn cumulative_group_ref(
        &mut self,
        element: &Element,
        referee: &Element,
    ) -> Result<(), HandlerError> {
        self.open = None;
        self.entry(element).uses = Some(Uses::Cumulative(referee.id));
        Ok(())
    }
}
