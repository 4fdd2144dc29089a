//! Eligibility decision for a single unit.
//!
//! Both checks are evaluated independently, region first and then stage.
//! Only exact membership counts; values are never normalised.

use serde::Serialize;

use crate::registry::UnitDescriptor;
use crate::types::Dimension;

use super::SelectionError;

/// One reason a unit was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub dimension: Dimension,
    pub requested: String,
}

/// Outcome of evaluating one unit against the requested context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub included: bool,
    /// Every failing check, region before stage.
    pub exclusions: Vec<Exclusion>,
    /// Exclusion of an explicitly requested unit is a failure, not a skip.
    pub fatal: bool,
}

impl Decision {
    /// The reported exclusion reason: the first failing check.
    pub fn reason(&self) -> Option<&Exclusion> {
        self.exclusions.first()
    }

    /// The mismatch this decision amounts to for `unit`, if it was excluded.
    pub fn mismatch(&self, unit: &str) -> Option<SelectionError> {
        self.reason().map(|exclusion| SelectionError::Mismatch {
            unit: unit.to_string(),
            dimension: exclusion.dimension,
            requested: exclusion.requested.clone(),
        })
    }

    /// Human message for an excluded unit, if any.
    pub fn message(&self, unit: &str) -> Option<String> {
        self.mismatch(unit).map(|err| err.to_string())
    }

    /// Turn a fatal exclusion into a [`SelectionError::Mismatch`].
    pub fn into_result(self, unit: &str) -> Result<Decision, SelectionError> {
        match self.mismatch(unit) {
            Some(err) if self.fatal => Err(err),
            _ => Ok(self),
        }
    }
}

/// Decide whether `unit` is eligible for the requested region and stage.
///
/// Pure: the registry is not touched.
pub fn evaluate_unit(
    unit: &UnitDescriptor,
    requested_region: Option<&str>,
    requested_stage: Option<&str>,
    single_unit: bool,
) -> Decision {
    let mut exclusions = Vec::new();

    if let Some(exclusion) = check(unit.restricted_regions(), requested_region, Dimension::Region)
    {
        exclusions.push(exclusion);
    }
    if let Some(exclusion) = check(unit.restricted_stages(), requested_stage, Dimension::Stage) {
        exclusions.push(exclusion);
    }

    let included = exclusions.is_empty();
    Decision {
        included,
        fatal: single_unit && !included,
        exclusions,
    }
}

fn check(
    allowed: Option<&[String]>,
    requested: Option<&str>,
    dimension: Dimension,
) -> Option<Exclusion> {
    let (allowed, requested) = (allowed?, requested?);
    if allowed.iter().any(|value| value == requested) {
        return None;
    }
    Some(Exclusion {
        dimension,
        requested: requested.to_string(),
    })
}
