//! The handler contract and the step dispatcher.
//!
//! A [`GroupHandler`] turns resolution outcomes into output: schema groups,
//! JSON member lists, or a recorded event log. The resolver owns the decision
//! tree; the handler owns the representation.

use cfgdoc_model::{Element, ElementChild, ElementId, Hierarchy};

use crate::cumulative::CumulativeTrigger;
use crate::options::ChildFilter;
use crate::outcome::{GroupOutcome, GroupStep};

/// Receives the levels folded into an open cumulative group.
pub trait CumulativeChildHandler {
    /// Error raised by the handler. Propagated unchanged by the resolver.
    type Error;

    /// Folds the selected children of one level into the open cumulative
    /// group. Levels arrive nearest first.
    ///
    /// # Errors
    ///
    /// Returns the handler's own error; the pass aborts with it.
    fn fold_level(
        &mut self,
        level: &Element,
        children: &[&ElementChild],
    ) -> Result<(), Self::Error>;
}

/// One callback per [`GroupStep`].
///
/// Every callback receives the element being resolved. For one element the
/// callbacks arrive in the order given by [`GroupOutcome::steps`].
pub trait GroupHandler: CumulativeChildHandler {
    /// The element contributes no group.
    ///
    /// # Errors
    ///
    /// Returns the handler's own error; the pass aborts with it.
    fn no_children(&mut self, element: &Element) -> Result<(), Self::Error>;

    /// Declare a group with the element's own selected children.
    ///
    /// # Errors
    ///
    /// Returns the handler's own error; the pass aborts with it.
    fn declared_group(
        &mut self,
        element: &Element,
        children: &[&ElementChild],
    ) -> Result<(), Self::Error>;

    /// Declare a group with the element's own selected children; the element
    /// is the topmost relevant level of its chain.
    ///
    /// # Errors
    ///
    /// Returns the handler's own error; the pass aborts with it.
    fn top_level_declared_group(
        &mut self,
        element: &Element,
        children: &[&ElementChild],
    ) -> Result<(), Self::Error>;

    /// Open the element's cumulative group. [`fold_level`] calls follow.
    ///
    /// [`fold_level`]: CumulativeChildHandler::fold_level
    ///
    /// # Errors
    ///
    /// Returns the handler's own error; the pass aborts with it.
    fn cumulative_group(&mut self, element: &Element) -> Result<(), Self::Error>;

    /// The element uses the declared group of `referee`. `referee` is the
    /// element itself after a top-level declaration.
    ///
    /// # Errors
    ///
    /// Returns the handler's own error; the pass aborts with it.
    fn declared_group_ref(
        &mut self,
        element: &Element,
        referee: &Element,
    ) -> Result<(), Self::Error>;

    /// The element uses the cumulative group of `referee`. `referee` is the
    /// element itself when it aggregates its own levels.
    ///
    /// # Errors
    ///
    /// Returns the handler's own error; the pass aborts with it.
    fn cumulative_group_ref(
        &mut self,
        element: &Element,
        referee: &Element,
    ) -> Result<(), Self::Error>;
}

/// Everything a step needs besides the handler.
#[derive(Clone, Copy)]
pub struct FoldScope<'a> {
    /// The hierarchy being resolved.
    pub hierarchy: &'a Hierarchy,
    /// The element being resolved.
    pub element: ElementId,
    /// Child selection of the current pass.
    pub filter: &'a dyn ChildFilter,
}

impl std::fmt::Debug for FoldScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoldScope")
            .field("element", &self.hierarchy[self.element].name)
            .field("kind", &self.filter.kind())
            .finish()
    }
}

/// Invokes the handler callbacks for `outcome` in their fixed order.
///
/// # Errors
///
/// Returns the first error raised by the handler or the trigger; remaining
/// steps for the element are skipped.
pub fn apply<H, T>(
    scope: FoldScope<'_>,
    outcome: GroupOutcome,
    trigger: &T,
    handler: &mut H,
) -> Result<(), H::Error>
where
    H: GroupHandler,
    T: CumulativeTrigger<H> + ?Sized,
{
    let hierarchy = scope.hierarchy;
    let element = &hierarchy[scope.element];
    for step in outcome.steps(scope.element) {
        match step {
            GroupStep::NoChildren => handler.no_children(element)?,
            GroupStep::DeclaredGroup => {
                let children = scope.filter.selected_children(element);
                handler.declared_group(element, &children)?;
            }
            GroupStep::TopLevelDeclaredGroup => {
                let children = scope.filter.selected_children(element);
                handler.top_level_declared_group(element, &children)?;
            }
            GroupStep::CumulativeGroup => handler.cumulative_group(element)?,
            GroupStep::DeclaredGroupRef(referee) => {
                handler.declared_group_ref(element, &hierarchy[referee])?;
            }
            GroupStep::CumulativeGroupRef(referee) => {
                handler.cumulative_group_ref(element, &hierarchy[referee])?;
            }
            GroupStep::FoldAncestors => trigger.trigger(scope, handler)?,
        }
    }
    Ok(())
}
