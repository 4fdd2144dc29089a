//! Function selection: per-unit eligibility decisions and registry pruning.

pub mod apply;
pub mod error;
pub mod policy;

pub use apply::{RemovedUnit, SelectionReport, apply_selection};
pub use error::SelectionError;
pub use policy::{Decision, Exclusion, evaluate_unit};
