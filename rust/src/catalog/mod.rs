//! Read-only catalog containers and their JSON loader.

mod loader;

pub use loader::{CatalogError, CatalogLoader, DocumentCache, DocumentSource, FsSource};

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use crate::models::UnitRecord;
use crate::program::{Program, ProgramRecord};

/// Units by code, iterated in a stable order.
///
/// Built once per catalog load and never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    units: Vec<UnitRecord>,
    index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog keeping the given order. A later record with a
    /// duplicate code replaces the earlier one in place.
    pub fn new<I>(units: I) -> Self
    where
        I: IntoIterator<Item = UnitRecord>,
    {
        let mut catalog = Self::default();
        for unit in units {
            match catalog.index.get(&unit.code) {
                Some(&pos) => catalog.units[pos] = unit,
                None => {
                    catalog.index.insert(unit.code.clone(), catalog.units.len());
                    catalog.units.push(unit);
                }
            }
        }
        catalog
    }

    /// Parse a catalog document: a JSON object of code -> unit record.
    ///
    /// Records without a `code` take it from their key. Units iterate in
    /// ascending code order.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, UnitRecord> = serde_json::from_str(text)?;
        Ok(Self::new(raw.into_iter().map(|(key, mut unit)| {
            if unit.code.is_empty() {
                unit.code = key;
            }
            unit
        })))
    }

    pub fn get(&self, code: &str) -> Option<&UnitRecord> {
        self.index.get(code).map(|&pos| &self.units[pos])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitRecord> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Courses, majors, minors and other areas of study by code.
#[derive(Clone, Debug, Default)]
pub struct ProgramCatalog {
    programs: BTreeMap<String, Program>,
}

impl ProgramCatalog {
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ProgramRecord>,
    {
        Self {
            programs: records
                .into_iter()
                .map(|record| {
                    let program = Program::from_record(record);
                    (program.code.clone(), program)
                })
                .collect(),
        }
    }

    /// Parse a program document: a JSON object of code -> program record.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, ProgramRecord> = serde_json::from_str(text)?;
        Ok(Self::new(raw.into_iter().map(|(key, mut record)| {
            if record.code.is_empty() {
                record.code = key;
            }
            record
        })))
    }

    pub fn get(&self, code: &str) -> Option<&Program> {
        self.programs.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.programs.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.values()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
