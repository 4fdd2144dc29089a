//! Selection failures surfaced to the deploy run.

use thiserror::Error;

use crate::types::Dimension;

/// Prefix the host puts in front of every operator-facing message.
pub const MESSAGE_PREFIX: &str = "Select: ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The explicitly requested function is not eligible for this run.
    #[error("{unit} not selected for deployment in {requested} {dimension}.")]
    Mismatch {
        unit: String,
        dimension: Dimension,
        requested: String,
    },

    /// The explicitly requested function does not exist in the registry.
    #[error("{unit} is not defined in the service.")]
    UnknownUnit { unit: String },

    /// A single-function hook ran without a function name in the run options.
    #[error("no function name given for a single function deployment.")]
    MissingFunction,
}

impl SelectionError {
    /// Message shown verbatim to the operator.
    pub fn operator_message(&self) -> String {
        format!("{MESSAGE_PREFIX}{self}")
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            SelectionError::Mismatch { unit, .. } | SelectionError::UnknownUnit { unit } => {
                Some(unit)
            }
            SelectionError::MissingFunction => None,
        }
    }
}
