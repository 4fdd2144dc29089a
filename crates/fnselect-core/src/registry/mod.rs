//! Function registry: the set of units under consideration for a deploy run.
//!
//! The selector only ever reads descriptors and removes entries; it never
//! inserts or edits them. Callers own the registry and lend it out mutably
//! for the duration of a selection pass.

pub mod descriptor;

pub use descriptor::UnitDescriptor;

/// Registry collaborator consumed by the selector.
pub trait UnitRegistry {
    /// Names of all units, in listing order.
    fn unit_names(&self) -> Vec<String>;

    /// Look up a unit by name.
    fn get_unit(&self, name: &str) -> Option<&UnitDescriptor>;

    /// Remove a unit by name. Removing an absent unit is a no-op.
    fn remove_unit(&mut self, name: &str);
}

/// In-memory registry that preserves insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionRegistry {
    units: Vec<UnitDescriptor>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a unit, replacing any existing unit with the same name in place.
    pub fn insert(&mut self, unit: UnitDescriptor) {
        match self.position(&unit.name) {
            Some(idx) => self.units[idx] = unit,
            None => self.units.push(unit),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitDescriptor> {
        self.units.iter()
    }

    pub fn into_units(self) -> Vec<UnitDescriptor> {
        self.units
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.units.iter().position(|unit| unit.name == name)
    }
}

impl FromIterator<UnitDescriptor> for FunctionRegistry {
    fn from_iter<I: IntoIterator<Item = UnitDescriptor>>(iter: I) -> Self {
        let mut registry = FunctionRegistry::new();
        for unit in iter {
            registry.insert(unit);
        }
        registry
    }
}

impl UnitRegistry for FunctionRegistry {
    fn unit_names(&self) -> Vec<String> {
        self.units.iter().map(|unit| unit.name.clone()).collect()
    }

    fn get_unit(&self, name: &str) -> Option<&UnitDescriptor> {
        self.units.iter().find(|unit| unit.name == name)
    }

    fn remove_unit(&mut self, name: &str) {
        if let Some(idx) = self.position(name) {
            self.units.remove(idx);
        }
    }
}
