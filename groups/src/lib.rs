//! Schema group resolution for configuration element hierarchies.
//!
//! For every element, and separately for attributes and config children,
//! this crate decides how the element's children become reusable schema
//! building blocks without repeating what an ancestor already declares:
//!
//! | Own children | Relevant ancestors | Outcome |
//! |--------------|--------------------|---------|
//! | no  | none | [`GroupOutcome::NoChildren`] |
//! | no  | one level | [`GroupOutcome::ReferenceDeclaredGroup`] |
//! | no  | two or more levels | [`GroupOutcome::ReferenceCumulativeGroup`] |
//! | yes | none | [`GroupOutcome::TopLevelDeclaredGroup`] |
//! | yes | one or more levels | [`GroupOutcome::DeclaredGroupWithCumulativeAggregation`] |
//!
//! The decision is a pure function ([`resolve`]). Output formats implement
//! [`GroupHandler`] and, when they fold cumulative groups differently,
//! supply their own [`CumulativeTrigger`].
//!
//! # Entry Point
//!
//! ```
//! use cfgdoc_groups::{GroupPlanBuilder, PassOptions, ResolutionPass};
//! use cfgdoc_model::HierarchyBuilder;
//!
//! let mut b = HierarchyBuilder::new();
//! b.element("Pipe", None).attribute("name");
//! b.element("EchoPipe", Some("Pipe"));
//! let hierarchy = b.build().expect("valid hierarchy");
//!
//! let options = PassOptions::default();
//! let mut plan = GroupPlanBuilder::new(options);
//! ResolutionPass::new(&hierarchy, options)
//!     .run(&mut plan)
//!     .expect("plan handler");
//! let plan = plan.finish();
//!
//! let echo = plan.find("EchoPipe").expect("resolved");
//! let group_ref = echo.group_ref.as_ref().expect("reference");
//! assert_eq!(group_ref.group, "PipeDeclaredAttributeGroup");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::panic))]

pub mod cumulative;
pub mod error;
pub mod events;
pub mod handler;
pub mod json;
pub mod naming;
pub mod options;
pub mod outcome;
pub mod pass;
pub mod plan;
pub mod report;

pub use cumulative::{
    CollisionPolicy, CumulativeMembers, CumulativeTrigger, FoldAncestorLevels, Member,
};
pub use error::{HandlerError, PassError};
pub use events::{EventLog, GroupEvent};
pub use handler::{apply, CumulativeChildHandler, FoldScope, GroupHandler};
pub use json::JsonMemberList;
pub use options::{ChildFilter, ChildSelection, PassOptions, SchemaVersion};
pub use outcome::{resolve, GroupOutcome, GroupStep};
pub use pass::{run_pass, ResolutionPass};
pub use plan::{CumulativeGroup, DeclaredGroup, ElementGroups, GroupPlan, GroupPlanBuilder, GroupRef};
pub use report::PassReport;
