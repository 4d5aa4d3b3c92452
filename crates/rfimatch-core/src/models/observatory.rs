use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, RfiMatchError};

const BUILTIN_REGISTRY: &str = include_str!("../../data/observatories.csv");

/// Static reference entry for a radio observatory
///
/// Column names follow the ITU radio-astronomy station list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservatoryRecord {
    #[serde(rename = "stn_name")]
    pub name: String,

    /// Geodetic latitude in degrees (north positive)
    #[serde(rename = "lat_dec")]
    pub latitude: f64,

    /// Geodetic longitude in degrees (east positive)
    #[serde(rename = "long_dec")]
    pub longitude: f64,

    /// Elevation above sea level in meters
    #[serde(default)]
    pub elevation: f64,

    /// Lowest observable frequency in MHz
    #[serde(rename = "freq_from")]
    pub min_freq: f64,

    /// Highest observable frequency in MHz
    #[serde(rename = "freq_to")]
    pub max_freq: f64,
}

/// Read-only observatory registry, loaded once and shared between readers
#[derive(Debug, Clone, Default)]
pub struct ObservatoryRegistry {
    records: Vec<ObservatoryRecord>,
}

impl ObservatoryRegistry {
    /// Build a registry from already-loaded records
    pub fn from_records(records: Vec<ObservatoryRecord>) -> Self {
        Self { records }
    }

    /// Registry bundled with the crate (HCRO, MEERKAT, EVLA, ALMA)
    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_REGISTRY.as_bytes())
    }

    /// Load a registry CSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| RfiMatchError::RegistryUnavailable {
            reason: format!("Failed to open {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_reader(file)
    }

    /// Parse registry CSV
    ///
    /// Whitespace around headers and values is ignored. Rows with a blank
    /// station name are dropped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut records = Vec::new();
        for (line, row) in csv_reader.deserialize::<ObservatoryRecord>().enumerate() {
            let record = row.map_err(|e| RfiMatchError::RegistryUnavailable {
                reason: format!("Malformed registry row {}: {}", line + 1, e),
            })?;
            if record.name.is_empty() {
                tracing::debug!(row = line + 1, "Skipping registry row without station name");
                continue;
            }
            records.push(record);
        }

        tracing::debug!(entries = records.len(), "Loaded observatory registry");
        Ok(Self { records })
    }

    /// All entries in file order
    pub fn records(&self) -> &[ObservatoryRecord] {
        &self.records
    }

    /// First entry with the given station name
    pub fn get(&self, name: &str) -> Option<&ObservatoryRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
