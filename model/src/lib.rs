//! Configuration element hierarchy encoded as typed Rust data.
//!
//! The `cfgdoc-model` crate holds the read-only input of a schema group
//! resolution pass: configuration elements arranged by single inheritance,
//! each declaring attributes and config children. Elements live in an
//! index-based arena so the acyclic invariant is checked once, when the
//! hierarchy is built.
//!
//! # Entry Point
//!
//! ```
//! use cfgdoc_model::{ChildKind, HierarchyBuilder};
//!
//! let mut builder = HierarchyBuilder::new();
//! builder.element("Pipe", None).attribute("name");
//! builder.element("FixedResultPipe", Some("Pipe")).attribute("returnString");
//! let hierarchy = builder.build().expect("valid hierarchy");
//!
//! let fixed = hierarchy.find("FixedResultPipe").expect("defined");
//! assert_eq!(hierarchy[fixed].children(ChildKind::Attribute)[0].name, "returnString");
//! ```
//!
//! # Loading
//!
//! With the default `serde` feature, definitions load from JSON through
//! [`Hierarchy::from_json`].

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::panic))]

pub mod definition;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod walker;

pub use definition::{ChildDef, ElementDef, HierarchyDef};
pub use error::HierarchyError;
pub use hierarchy::{ElementBuilder, Hierarchy, HierarchyBuilder};
pub use model::{ChildKind, Element, ElementChild, ElementId};
pub use walker::Ancestors;
