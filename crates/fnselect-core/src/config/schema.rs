//! Service file schema.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::registry::{FunctionRegistry, UnitDescriptor};

/// Root structure of a service file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// Provider defaults. Informational only: selection never falls back to these.
    #[serde(default, skip_serializing_if = "ProviderConfig::is_empty")]
    pub provider: ProviderConfig,

    /// Functions in document order
    #[serde(default)]
    pub functions: FunctionTable,

    /// Any other top-level keys, carried through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl ProviderConfig {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.region.is_none() && self.stage.is_none()
    }
}

/// Function definition as written in the service file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntry {
    /// Regions this function may be deployed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,

    /// Stages this function may be deployed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<String>>,

    /// handler, memorySize, events, ...
    #[serde(flatten)]
    pub settings: BTreeMap<String, Value>,
}

impl FunctionEntry {
    pub fn to_descriptor(&self, name: &str) -> UnitDescriptor {
        UnitDescriptor {
            name: name.to_string(),
            regions: self.regions.clone(),
            stages: self.stages.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl From<UnitDescriptor> for FunctionEntry {
    fn from(unit: UnitDescriptor) -> Self {
        Self {
            regions: unit.regions,
            stages: unit.stages,
            settings: unit.settings,
        }
    }
}

/// Name-keyed function table that keeps the order functions were declared in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionTable(Vec<(String, FunctionEntry)>);

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: FunctionEntry) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = entry,
            None => self.0.push((name, entry)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionEntry)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|(name, _)| keep(name));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FunctionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FunctionTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = FunctionTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of function definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = FunctionTable::new();
                while let Some((name, entry)) = access.next_entry::<String, FunctionEntry>()? {
                    if table.get(&name).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate function '{name}'"
                        )));
                    }
                    table.0.push((name, entry));
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

impl ServiceConfig {
    /// Create an empty service configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    ///
    /// Region and stage values are taken as written; only exact membership
    /// matters to selection.
    pub fn validate(&self) -> anyhow::Result<()> {
        for name in self.functions.names() {
            if name.trim().is_empty() {
                anyhow::bail!("Function name cannot be empty");
            }
        }
        Ok(())
    }

    /// Build the registry the selector operates on, in declaration order.
    pub fn to_registry(&self) -> FunctionRegistry {
        self.functions
            .iter()
            .map(|(name, entry)| entry.to_descriptor(name))
            .collect()
    }

    /// Drop every function no longer present in `registry`.
    pub fn retain_registry(&mut self, registry: &FunctionRegistry) {
        self.functions.retain(|name| registry.contains(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::UnitRegistry;

    fn entry(regions: Option<&[&str]>, stages: Option<&[&str]>) -> FunctionEntry {
        let list = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
        FunctionEntry {
            regions: regions.map(list),
            stages: stages.map(list),
            settings: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_config() {
        let config = ServiceConfig::new();
        assert!(config.functions.is_empty());
        assert!(config.to_registry().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_function_table_insert_replaces() {
        let mut table = FunctionTable::new();
        table.insert("b", entry(None, None));
        table.insert("a", entry(None, None));
        table.insert("b", entry(None, Some(&["prod"])));

        assert_eq!(table.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(table.get("b").unwrap().stages.is_some());
    }

    #[test]
    fn test_to_registry_preserves_order_and_settings() {
        let mut config = ServiceConfig::new();
        let mut api = entry(Some(&["us-east-1"]), None);
        api.settings
            .insert("handler".to_string(), Value::String("api.handler".to_string()));
        config.functions.insert("worker", entry(None, None));
        config.functions.insert("api", api);

        let registry = config.to_registry();
        assert_eq!(registry.unit_names(), vec!["worker", "api"]);
        let unit = registry.get_unit("api").unwrap();
        assert_eq!(unit.settings["handler"], "api.handler");
    }

    #[test]
    fn test_retain_registry() {
        let mut config = ServiceConfig::new();
        config.functions.insert("a", entry(None, None));
        config.functions.insert("b", entry(None, None));

        let mut registry = config.to_registry();
        registry.remove_unit("a");
        config.retain_registry(&registry);

        assert_eq!(config.functions.names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_validate_invalid_config() {
        let mut config = ServiceConfig::new();
        config.functions.insert(" ", entry(None, None));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Function name cannot be empty"));
    }

    #[test]
    fn test_validate_accepts_values_as_written() {
        let mut config = ServiceConfig::new();
        config.functions.insert("api", entry(Some(&[""]), Some(&["prod", " "])));

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_is_empty() {
        assert!(ProviderConfig::default().is_empty());
        let provider = ProviderConfig {
            stage: Some("dev".to_string()),
            ..ProviderConfig::default()
        };
        assert!(!provider.is_empty());
    }
}
