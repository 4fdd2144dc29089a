//! Unit descriptor: eligibility metadata for a single deployable function.

use std::collections::BTreeMap;

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitDescriptor {
    /// Unique name within the registry.
    pub name: String,

    /// Regions the unit may be deployed to. Absent or empty means unrestricted.
    pub regions: Option<Vec<String>>,

    /// Stages the unit may be deployed to. Absent or empty means unrestricted.
    pub stages: Option<Vec<String>>,

    /// Remaining function settings (handler, memory, ...), carried untouched.
    pub settings: BTreeMap<String, Value>,
}

impl UnitDescriptor {
    /// A unit with no region or stage restrictions.
    pub fn unrestricted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_stages<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stages = Some(stages.into_iter().map(Into::into).collect());
        self
    }

    /// Declared regions, or `None` when the unit is unrestricted by region.
    pub fn restricted_regions(&self) -> Option<&[String]> {
        non_empty(self.regions.as_deref())
    }

    /// Declared stages, or `None` when the unit is unrestricted by stage.
    pub fn restricted_stages(&self) -> Option<&[String]> {
        non_empty(self.stages.as_deref())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.restricted_regions().is_none() && self.restricted_stages().is_none()
    }
}

fn non_empty(list: Option<&[String]>) -> Option<&[String]> {
    list.filter(|items| !items.is_empty())
}
