//! The resolution pass driver.

use cfgdoc_model::{ElementId, Hierarchy};
use tracing::{debug, info};

use crate::cumulative::{CumulativeTrigger, FoldAncestorLevels};
use crate::handler::{apply, FoldScope, GroupHandler};
use crate::options::{ChildFilter, ChildSelection, PassOptions};
use crate::outcome::{resolve, GroupOutcome};
use crate::report::PassReport;

/// One traversal of a hierarchy under one fixed child selection.
///
/// The pass holds no state between elements: each element is resolved on its
/// own, so resolving the same element twice yields the same callbacks.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionPass<'h> {
    hierarchy: &'h Hierarchy,
    options: PassOptions,
    selection: ChildSelection,
}

impl<'h> ResolutionPass<'h> {
    /// Creates a pass over `hierarchy`.
    #[must_use]
    pub fn new(hierarchy: &'h Hierarchy, options: PassOptions) -> Self {
        Self {
            hierarchy,
            options,
            selection: options.selection(),
        }
    }

    /// The options of this pass.
    #[must_use]
    pub fn options(&self) -> PassOptions {
        self.options
    }

    /// The child filter of this pass.
    #[must_use]
    pub fn selection(&self) -> ChildSelection {
        self.selection
    }

    /// Decides the outcome of one element without invoking any handler.
    #[must_use]
    pub fn outcome(&self, element: ElementId) -> GroupOutcome {
        let selection = self.selection;
        resolve(self.hierarchy, element, |e| selection.has_relevant_children(e))
    }

    /// Decides the outcome of every element, in arena order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<(ElementId, GroupOutcome)> {
        self.hierarchy
            .ids()
            .map(|id| (id, self.outcome(id)))
            .collect()
    }

    /// Resolves one element and feeds its callbacks to `handler`, folding
    /// cumulative groups with `trigger`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the handler or the trigger.
    pub fn resolve_element<H, T>(
        &self,
        element: ElementId,
        trigger: &T,
        handler: &mut H,
    ) -> Result<GroupOutcome, H::Error>
    where
        H: GroupHandler,
        T: CumulativeTrigger<H> + ?Sized,
    {
        let outcome = self.outcome(element);
        debug!(
            "{} pass: [{}] -> {}",
            self.selection.kind,
            self.hierarchy[element].name,
            outcome.as_str()
        );
        let scope = FoldScope {
            hierarchy: self.hierarchy,
            element,
            filter: &self.selection,
        };
        apply(scope, outcome, trigger, handler)?;
        Ok(outcome)
    }

    /// Resolves every element in arena order with the default
    /// [`FoldAncestorLevels`] trigger.
    ///
    /// # Errors
    ///
    /// Returns the first handler error; the pass stops at that element.
    pub fn run<H: GroupHandler>(&self, handler: &mut H) -> Result<PassReport, H::Error> {
        self.run_with(&FoldAncestorLevels, handler)
    }

    /// Resolves every element in arena order with a caller-supplied trigger.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the handler or the trigger; the
    /// pass stops at that element.
    pub fn run_with<H, T>(&self, trigger: &T, handler: &mut H) -> Result<PassReport, H::Error>
    where
        H: GroupHandler,
        T: CumulativeTrigger<H> + ?Sized,
    {
        let mut report = PassReport::new(self.options.kind, self.options.version);
        for id in self.hierarchy.ids() {
            let outcome = self.resolve_element(id, trigger, handler)?;
            report.record(outcome);
        }
        info!(
            "{} {} pass resolved {} elements: {} declared groups, {} cumulative groups",
            self.options.version.as_str(),
            self.options.kind,
            report.element_count(),
            report.declared_group_count(),
            report.cumulative_groups
        );
        Ok(report)
    }
}

/// Runs one default pass over `hierarchy`.
///
/// Shorthand for `ResolutionPass::new(hierarchy, options).run(handler)`.
///
/// # Errors
///
/// Returns the first handler error.
pub fn run_pass<H: GroupHandler>(
    hierarchy: &Hierarchy,
    options: PassOptions,
    handler: &mut H,
) -> Result<PassReport, H::Error> {
    ResolutionPass::new(hierarchy, options).run(handler)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use cfgdoc_model::{ChildKind, HierarchyBuilder};

    use super::*;
    use crate::events::{EventLog, GroupEvent};
    use crate::handler::CumulativeChildHandler;

    #[test]
    fn report_counts_every_element_once() {
        let mut b = HierarchyBuilder::new();
        b.element("Root", None).attribute("name");
        b.element("Mid", Some("Root")).attribute("mode");
        b.element("Leaf", Some("Mid"));
        b.element("Side", Some("Root"));
        b.element("Bare", None);
        let h = b.build().expect("valid hierarchy");

        let pass = ResolutionPass::new(&h, PassOptions::for_kind(ChildKind::Attribute));
        let mut log = EventLog::new();
        let report = pass.run(&mut log).expect("infallible");

        assert_eq!(report.element_count(), 5);
        assert_eq!(report.top_level_groups, 1);
        assert_eq!(report.cumulative_groups, 1);
        assert_eq!(report.cumulative_group_refs, 1);
        assert_eq!(report.declared_group_refs, 1);
        assert_eq!(report.no_children, 1);
    }

    fn own_level_only(scope: FoldScope<'_>, log: &mut EventLog) -> Result<(), Infallible> {
        let element = &scope.hierarchy[scope.element];
        let children = scope.filter.selected_children(element);
        log.fold_level(element, &children)
    }

    #[test]
    fn custom_trigger_replaces_default_fold() {
        let mut b = HierarchyBuilder::new();
        b.element("Root", None).attribute("name");
        b.element("Leaf", Some("Root")).attribute("timeout");
        let h = b.build().expect("valid hierarchy");
        let pass = ResolutionPass::new(&h, PassOptions::default());

        let mut log = EventLog::new();
        pass.run_with(&own_level_only, &mut log).expect("infallible");

        let folds: Vec<&GroupEvent> = log
            .events()
            .iter()
            .filter(|e| matches!(e, GroupEvent::FoldLevel { .. }))
            .collect();
        assert_eq!(folds.len(), 1);
    }

    #[test]
    fn passes_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResolutionPass<'static>>();
    }

    #[test]
    fn run_pass_matches_driver() {
        let mut b = HierarchyBuilder::new();
        b.element("Root", None).config_child("forward");
        b.element("Leaf", Some("Root"));
        let h = b.build().expect("valid hierarchy");
        let options = PassOptions::for_kind(ChildKind::ConfigChild);

        let mut direct = EventLog::new();
        let report = run_pass(&h, options, &mut direct).expect("infallible");
        let mut driven = EventLog::new();
        ResolutionPass::new(&h, options)
            .run(&mut driven)
            .expect("infallible");

        assert_eq!(direct.events(), driven.events());
        assert_eq!(report.declared_group_refs, 1);
    }
}
