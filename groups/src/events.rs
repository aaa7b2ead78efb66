//! A handler that records every callback.

use std::convert::Infallible;

use cfgdoc_model::{Element, ElementChild};
use serde::Serialize;

use crate::handler::{CumulativeChildHandler, GroupHandler};

/// One recorded handler callback, with element names instead of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GroupEvent {
    /// `no_children` was called.
    NoChildren {
        /// The resolved element.
        element: String,
    },
    /// `declared_group` was called.
    DeclaredGroup {
        /// The resolved element.
        element: String,
        /// Names of the declared children.
        children: Vec<String>,
    },
    /// `top_level_declared_group` was called.
    TopLevelDeclaredGroup {
        /// The resolved element.
        element: String,
        /// Names of the declared children.
        children: Vec<String>,
    },
    /// `cumulative_group` was called.
    CumulativeGroup {
        /// The resolved element.
        element: String,
    },
    /// `declared_group_ref` was called.
    DeclaredGroupRef {
        /// The resolved element.
        element: String,
        /// The element whose declared group is used.
        referee: String,
    },
    /// `cumulative_group_ref` was called.
    CumulativeGroupRef {
        /// The resolved element.
        element: String,
        /// The element whose cumulative group is used.
        referee: String,
    },
    /// `fold_level` was called.
    FoldLevel {
        /// The element whose cumulative group was open, if any.
        into: Option<String>,
        /// The folded level.
        level: String,
        /// Names of the folded children.
        children: Vec<String>,
    },
}

impl GroupEvent {
    /// The element the event is attributed to: the resolved element, or the
    /// owner of the open cumulative group for a fold.
    #[must_use]
    pub fn element(&self) -> Option<&str> {
        match self {
            GroupEvent::NoChildren { element }
            | GroupEvent::DeclaredGroup { element, .. }
            | GroupEvent::TopLevelDeclaredGroup { element, .. }
            | GroupEvent::CumulativeGroup { element }
            | GroupEvent::DeclaredGroupRef { element, .. }
            | GroupEvent::CumulativeGroupRef { element, .. } => Some(element),
            GroupEvent::FoldLevel { into, .. } => into.as_deref(),
        }
    }
}

/// Records callbacks in arrival order. Never fails.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GroupEvent>,
    open: Option<String>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[GroupEvent] {
        &self.events
    }

    /// Consumes the log.
    #[must_use]
    pub fn into_events(self) -> Vec<GroupEvent> {
        self.events
    }

    /// The events attributed to one element, in order.
    pub fn for_element<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a GroupEvent> + 'a {
        self.events
            .iter()
            .filter(move |event| event.element() == Some(name))
    }

    fn record(&mut self, event: GroupEvent) -> Result<(), Infallible> {
        self.events.push(event);
        Ok(())
    }
}

fn names(children: &[&ElementChild]) -> Vec<String> {
    children.iter().map(|c| c.name.clone()).collect()
}

impl CumulativeChildHandler for EventLog {
    type Error = Infallible;

    fn fold_level(&mut self, level: &Element, children: &[&ElementChild]) -> Result<(), Infallible> {
        let into = self.open.clone();
        self.record(GroupEvent::FoldLevel {
            into,
            level: level.name.clone(),
            children: names(children),
        })
    }
}

impl GroupHandler for EventLog {
    fn no_children(&mut self, element: &Element) -> Result<(), Infallible> {
        self.open = None;
        self.record(GroupEvent::NoChildren {
            element: element.name.clone(),
        })
    }

    fn declared_group(
        &mut self,
        element: &Element,
        children: &[&ElementChild],
    ) -> Result<(), Infallible> {
        self.open = None;
        self.record(GroupEvent::DeclaredGroup {
            element: element.name.clone(),
            children: names(children),
        })
    }

    fn top_level_declared_group(
        &mut self,
        element: &Element,
        children: &[&ElementChild],
    ) -> Result<(), Infallible> {
        self.open = None;
        self.record(GroupEvent::TopLevelDeclaredGroup {
            element: element.name.clone(),
            children: names(children),
        })
    }

    fn cumulative_group(&mut self, element: &Element) -> Result<(), Infallible> {
        self.open = Some(element.name.clone());
        self.record(GroupEvent::CumulativeGroup {
            element: element.name.clone(),
        })
    }

    fn declared_group_ref(&mut self, element: &Element, referee: &Element) -> Result<(), Infallible> {
        self.open = None;
        self.record(GroupEvent::DeclaredGroupRef {
            element: element.name.clone(),
            referee: referee.name.clone(),
        })
    }

    fn cumulative_group_ref(
        &mut self,
        element: &Element,
        referee: &Element,
    ) -> Result<(), Infallible> {
        self.open = None;
        self.record(GroupEvent::CumulativeGroupRef {
            element: element.name.clone(),
            referee: referee.name.clone(),
        })
    }
}
