//! Errors raised by resolution passes and the bundled handlers.

use cfgdoc_model::HierarchyError;

/// Failure to set up a resolution pass.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    /// The element definitions could not be linked.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    /// The pass options could not be parsed.
    #[error("invalid pass options: {0}")]
    Options(#[from] toml::de::Error),
}

/// A callback sequence that breaks the handler contract.
///
/// The resolver never produces these sequences. They surface when a custom
/// [`CumulativeTrigger`](crate::CumulativeTrigger) folds levels outside the
/// cumulative group it was handed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// A level was folded while no cumulative group was open.
    #[error("level [{level}] folded outside an open cumulative group")]
    FoldOutsideCumulativeGroup {
        /// Name of the element whose children were folded.
        level: String,
    },
}

#[cfg(test)]
mod tests {
    use cfgdoc_model::Hierarchy;

    use super::*;

    fn load(json: &str) -> Result<Hierarchy, PassError> {
        Ok(Hierarchy::from_json(json)?)
    }

    #[test]
    fn hierarchy_errors_pass_through_unchanged() {
        let err = load(r#"{ "elements": [ { "name": "EchoPipe", "parent": "Pipe" } ] }"#)
            .expect_err("unknown parent");
        assert!(matches!(
            err,
            PassError::Hierarchy(HierarchyError::UnknownParent { .. })
        ));
        assert_eq!(err.to_string(), "element [EchoPipe] has unknown parent [Pipe]");
    }
}
