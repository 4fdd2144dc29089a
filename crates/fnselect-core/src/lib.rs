//! fnselect Core Library
//!
//! Decides which functions of a service are eligible for a deployment run
//! based on their declared regions and stages, and prunes the rest from the
//! service's function registry before the deploy proceeds.

pub mod config;
pub mod hooks;
pub mod registry;
pub mod selection;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{FunctionEntry, ProviderConfig, ServiceConfig, ServiceStore};

    // Registry
    pub use crate::registry::{FunctionRegistry, UnitDescriptor, UnitRegistry};

    // Selection
    pub use crate::selection::{
        Decision, Exclusion, RemovedUnit, SelectionError, SelectionReport, apply_selection,
        evaluate_unit,
    };

    // Hooks
    pub use crate::hooks::{HookOutcome, HookPoint, RunOptions, SelectPlugin};

    // Shared types
    pub use crate::types::{Dimension, SelectionRequest};
}
