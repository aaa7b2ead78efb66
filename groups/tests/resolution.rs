//! End-to-end resolution passes over small hierarchies.

#![allow(clippy::expect_used, clippy::panic)]

use std::cell::Cell;
use std::convert::Infallible;

use cfgdoc_groups::{
    CumulativeTrigger, EventLog, FoldAncestorLevels, FoldScope, GroupEvent, GroupOutcome,
    GroupPlanBuilder, JsonMemberList, PassOptions, ResolutionPass, SchemaVersion,
};
use cfgdoc_model::{ChildKind, Hierarchy, HierarchyBuilder};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Root -> Mid -> Leaf; each `true` level declares one attribute.
fn three_levels(root: bool, mid: bool, leaf: bool) -> Hierarchy {
    let mut b = HierarchyBuilder::new();
    let levels = [("Root", None, root), ("Mid", Some("Root"), mid), ("Leaf", Some("Mid"), leaf)];
    for (name, parent, relevant) in levels {
        let e = b.element(name, parent);
        if relevant {
            e.attribute(format!("{}Attr", name.to_lowercase()));
        }
    }
    b.build().expect("valid hierarchy")
}

fn run_log(h: &Hierarchy, options: PassOptions) -> EventLog {
    let mut log = EventLog::new();
    ResolutionPass::new(h, options)
        .run(&mut log)
        .expect("event log never fails");
    log
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn gap_in_chain_aggregates_over_nearest_relevant_ancestor() {
    let h = three_levels(true, false, true);
    let pass = ResolutionPass::new(&h, PassOptions::default());
    let root = h.find("Root").expect("Root");

    assert_eq!(
        pass.outcome(h.find("Mid").expect("Mid")),
        GroupOutcome::ReferenceDeclaredGroup(root)
    );
    assert_eq!(
        pass.outcome(h.find("Leaf").expect("Leaf")),
        GroupOutcome::DeclaredGroupWithCumulativeAggregation { ancestor: root }
    );

    let log = run_log(&h, PassOptions::default());
    let leaf: Vec<&GroupEvent> = log.for_element("Leaf").collect();
    assert_eq!(
        leaf,
        [
            &GroupEvent::DeclaredGroup {
                element: "Leaf".into(),
                children: names(&["leafAttr"]),
            },
            &GroupEvent::CumulativeGroupRef {
                element: "Leaf".into(),
                referee: "Leaf".into(),
            },
            &GroupEvent::CumulativeGroup {
                element: "Leaf".into(),
            },
            &GroupEvent::FoldLevel {
                into: Some("Leaf".into()),
                level: "Leaf".into(),
                children: names(&["leafAttr"]),
            },
            &GroupEvent::FoldLevel {
                into: Some("Leaf".into()),
                level: "Root".into(),
                children: names(&["rootAttr"]),
            },
        ]
    );
}

#[test]
fn fully_relevant_chain_emits_callbacks_in_fixed_order() {
    let h = three_levels(true, true, true);
    let log = run_log(&h, PassOptions::default());

    let fold = |into: &str, level: &str| GroupEvent::FoldLevel {
        into: Some(into.into()),
        level: level.into(),
        children: vec![format!("{}Attr", level.to_lowercase())],
    };
    let declared = |element: &str| GroupEvent::DeclaredGroup {
        element: element.into(),
        children: vec![format!("{}Attr", element.to_lowercase())],
    };
    let self_ref = |element: &str| GroupEvent::CumulativeGroupRef {
        element: element.into(),
        referee: element.into(),
    };
    let open = |element: &str| GroupEvent::CumulativeGroup {
        element: element.into(),
    };

    assert_eq!(
        log.events(),
        [
            GroupEvent::TopLevelDeclaredGroup {
                element: "Root".into(),
                children: names(&["rootAttr"]),
            },
            GroupEvent::DeclaredGroupRef {
                element: "Root".into(),
                referee: "Root".into(),
            },
            declared("Mid"),
            self_ref("Mid"),
            open("Mid"),
            fold("Mid", "Mid"),
            fold("Mid", "Root"),
            declared("Leaf"),
            self_ref("Leaf"),
            open("Leaf"),
            fold("Leaf", "Leaf"),
            fold("Leaf", "Mid"),
            fold("Leaf", "Root"),
        ]
    );
}

#[test]
fn element_without_children_gets_single_callback() {
    let h = three_levels(false, false, false);
    let log = run_log(&h, PassOptions::default());
    assert_eq!(
        log.events(),
        [
            GroupEvent::NoChildren {
                element: "Root".into()
            },
            GroupEvent::NoChildren {
                element: "Mid".into()
            },
            GroupEvent::NoChildren {
                element: "Leaf".into()
            },
        ]
    );
}

struct CountingTrigger {
    calls: Cell<usize>,
}

impl CumulativeTrigger<EventLog> for CountingTrigger {
    fn trigger(&self, scope: FoldScope<'_>, handler: &mut EventLog) -> Result<(), Infallible> {
        self.calls.set(self.calls.get() + 1);
        FoldAncestorLevels.trigger(scope, handler)
    }
}

#[test]
fn references_never_invoke_the_trigger() {
    let h = three_levels(true, true, false);
    let pass = ResolutionPass::new(&h, PassOptions::default());
    let leaf = h.find("Leaf").expect("Leaf");
    let mid = h.find("Mid").expect("Mid");

    let trigger = CountingTrigger {
        calls: Cell::new(0),
    };
    let mut log = EventLog::new();
    let outcome = pass
        .resolve_element(leaf, &trigger, &mut log)
        .expect("event log never fails");

    assert_eq!(outcome, GroupOutcome::ReferenceCumulativeGroup(mid));
    assert_eq!(trigger.calls.get(), 0);
    assert_eq!(
        log.events(),
        [GroupEvent::CumulativeGroupRef {
            element: "Leaf".into(),
            referee: "Mid".into(),
        }]
    );

    pass.resolve_element(mid, &trigger, &mut log)
        .expect("event log never fails");
    assert_eq!(trigger.calls.get(), 1);
}

#[test]
fn resolving_twice_repeats_the_same_callbacks() {
    let h = three_levels(true, false, true);
    let pass = ResolutionPass::new(&h, PassOptions::default());
    let leaf = h.find("Leaf").expect("Leaf");

    let mut first = EventLog::new();
    let mut second = EventLog::new();
    pass.resolve_element(leaf, &FoldAncestorLevels, &mut first)
        .expect("event log never fails");
    pass.resolve_element(leaf, &FoldAncestorLevels, &mut second)
        .expect("event log never fails");
    assert_eq!(first.events(), second.events());
}

#[test]
fn attribute_and_config_child_passes_are_independent() {
    let mut b = HierarchyBuilder::new();
    b.element("Pipe", None).attribute("name");
    b.element("Sender", Some("Pipe")).config_child("sender");
    let h = b.build().expect("valid hierarchy");
    let pipe = h.find("Pipe").expect("Pipe");
    let sender = h.find("Sender").expect("Sender");

    let attributes = ResolutionPass::new(&h, PassOptions::for_kind(ChildKind::Attribute));
    assert_eq!(attributes.outcome(pipe), GroupOutcome::TopLevelDeclaredGroup);
    assert_eq!(
        attributes.outcome(sender),
        GroupOutcome::ReferenceDeclaredGroup(pipe)
    );

    let children = ResolutionPass::new(&h, PassOptions::for_kind(ChildKind::ConfigChild));
    assert_eq!(children.outcome(pipe), GroupOutcome::NoChildren);
    assert_eq!(children.outcome(sender), GroupOutcome::TopLevelDeclaredGroup);
}

#[test]
fn plan_names_groups_and_leaves_no_dangling_reference() {
    let h = three_levels(true, true, false);
    let options = PassOptions::default();
    let mut builder = GroupPlanBuilder::new(options);
    ResolutionPass::new(&h, options)
        .run(&mut builder)
        .expect("plan handler");
    let plan = builder.finish();

    assert!(plan.unresolved_refs().is_empty());
    assert_eq!(plan.declared_group_count(), 2);
    assert_eq!(plan.cumulative_group_count(), 1);

    let leaf = plan.find("Leaf").expect("Leaf");
    let group_ref = leaf.group_ref.as_ref().expect("reference");
    assert_eq!(group_ref.group, "MidCumulativeAttributeGroup");
    assert!(group_ref.cumulative);

    let mid = plan.find("Mid").expect("Mid");
    let cumulative = mid.cumulative_group.as_ref().expect("cumulative group");
    assert_eq!(cumulative.levels, ["Mid", "Root"]);
}

#[test]
fn json_list_flattens_inherited_members() {
    let h = three_levels(true, false, true);
    let options = PassOptions::default();
    let mut list = JsonMemberList::new(options);
    ResolutionPass::new(&h, options)
        .run(&mut list)
        .expect("json handler");

    assert_eq!(
        list.to_json(),
        json!({
            "kind": "attribute",
            "elements": [
                { "name": "Root", "members": [
                    { "name": "rootAttr", "declaredBy": "Root" }
                ] },
                { "name": "Mid", "members": [
                    { "name": "rootAttr", "declaredBy": "Root" }
                ] },
                { "name": "Leaf", "members": [
                    { "name": "leafAttr", "declaredBy": "Leaf" },
                    { "name": "rootAttr", "declaredBy": "Root" }
                ] }
            ]
        })
    );
}

#[test]
fn strict_pass_ignores_deprecated_only_levels() {
    let mut b = HierarchyBuilder::new();
    b.element("Root", None).attribute("name");
    b.element("Mid", Some("Root"))
        .attribute(cfgdoc_model::ChildDef::new("old").deprecated());
    b.element("Leaf", Some("Mid"));
    let h = b.build().expect("valid hierarchy");
    let root = h.find("Root").expect("Root");
    let mid = h.find("Mid").expect("Mid");
    let leaf = h.find("Leaf").expect("Leaf");

    let strict = ResolutionPass::new(&h, PassOptions::default());
    assert_eq!(strict.outcome(leaf), GroupOutcome::ReferenceDeclaredGroup(root));

    let compat = ResolutionPass::new(
        &h,
        PassOptions::default().with_version(SchemaVersion::Compatibility),
    );
    assert_eq!(compat.outcome(leaf), GroupOutcome::ReferenceCumulativeGroup(mid));
}
