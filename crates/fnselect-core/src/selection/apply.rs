//! Apply selection across a registry, pruning ineligible units in place.

use serde::Serialize;
use tracing::{debug, warn};

use crate::registry::UnitRegistry;
use crate::types::{Dimension, SelectionRequest};

use super::{SelectionError, evaluate_unit};

/// A unit removed from the registry during a selection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedUnit {
    pub name: String,
    pub dimension: Dimension,
    pub requested: String,
}

/// What a successful selection pass did to the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    pub kept: Vec<String>,
    pub removed: Vec<RemovedUnit>,
}

impl SelectionReport {
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Evaluate every unit in listing order and remove the ineligible ones.
///
/// With `request.function` set only that unit is visited; if it is excluded it
/// is still removed and the pass fails with [`SelectionError::Mismatch`].
/// The full-set pass never fails, even when it empties the registry.
pub fn apply_selection<R>(
    registry: &mut R,
    request: &SelectionRequest,
) -> Result<SelectionReport, SelectionError>
where
    R: UnitRegistry + ?Sized,
{
    // Snapshot the listing so removals never disturb the iteration.
    let names = match &request.function {
        Some(name) => vec![name.clone()],
        None => registry.unit_names(),
    };

    let mut report = SelectionReport::default();

    for name in names {
        let single_unit = request.is_single_unit(&name);

        let Some(unit) = registry.get_unit(&name) else {
            if single_unit {
                return Err(SelectionError::UnknownUnit { unit: name });
            }
            warn!(function = %name, "function vanished from registry before selection");
            continue;
        };

        let decision = evaluate_unit(
            unit,
            request.region.as_deref(),
            request.stage.as_deref(),
            single_unit,
        );

        let Some(reason) = decision.reason().cloned() else {
            debug!(function = %name, "selected for deployment");
            report.kept.push(name);
            continue;
        };

        // Removal happens before the failure surfaces.
        registry.remove_unit(&name);
        debug!(
            function = %name,
            dimension = %reason.dimension,
            requested = %reason.requested,
            "removed from deployment"
        );
        decision.into_result(&name)?;

        report.removed.push(RemovedUnit {
            name,
            dimension: reason.dimension,
            requested: reason.requested,
        });
    }

    Ok(report)
}
