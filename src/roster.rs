use rust_decimal::Decimal;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A billing professional declared in the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct Timekeeper {
    pub name: String,
    pub id: i64,
    pub classification: String,
    pub rate: Option<Decimal>,
}

/// Timekeepers keyed case-insensitively by name.
///
/// Lookups fold case only. Callers collapse runs of whitespace in the
/// looked-up name before calling [`Roster::get`].
#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_name: HashMap<String, Timekeeper>,
}

impl Roster {
    /// Adds a timekeeper, refusing names already present under any casing.
    /// On conflict the rejected entry is handed back to the caller.
    pub fn insert(&mut self, timekeeper: Timekeeper) -> Result<(), Timekeeper> {
        match self.by_name.entry(timekeeper.name.to_lowercase()) {
            Entry::Occupied(_) => Err(timekeeper),
            Entry::Vacant(slot) => {
                slot.insert(timekeeper);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Timekeeper> {
        self.by_name.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
