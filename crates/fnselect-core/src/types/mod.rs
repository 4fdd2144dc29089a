//! Shared core types used across the selection and hook layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Eligibility dimension a function can be restricted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Deployment target location.
    Region,
    /// Deployment environment (e.g. dev, prod).
    Stage,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Region => "region",
            Dimension::Stage => "stage",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Targeting context of a deployment run.
///
/// Absent `region` or `stage` disables that check entirely. A present
/// `function` narrows the run to exactly that unit and turns an exclusion
/// into a hard failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub region: Option<String>,
    pub stage: Option<String>,
    pub function: Option<String>,
}

impl SelectionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn for_function(mut self, name: impl Into<String>) -> Self {
        self.function = Some(name.into());
        self
    }

    /// Whether `name` is the unit explicitly requested by this run.
    pub fn is_single_unit(&self, name: &str) -> bool {
        self.function.as_deref() == Some(name)
    }
}
