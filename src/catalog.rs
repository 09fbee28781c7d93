//! City → dataset mapping.
//!
//! The default catalog knows the three bundled cities. A JSON file can
//! replace it:
//! ```json
//! {
//!   "chicago":    { "file": "chicago.csv", "demographics": true },
//!   "washington": { "file": "/data/washington.csv" }
//! }
//! ```
//! Relative file names resolve against the data directory.

use crate::error::CatalogError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Built-in cities: (key, file name, carries gender/birth year columns).
const DEFAULT_CITIES: &[(&str, &str, bool)] = &[
    ("chicago", "chicago.csv", true),
    ("new york city", "new_york_city.csv", true),
    ("washington", "washington.csv", false),
];

/// Backing source for a single city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub source: PathBuf,
    pub demographics: bool,
}

#[derive(Debug, Deserialize)]
struct EntryFile {
    file: PathBuf,
    #[serde(default)]
    demographics: bool,
}

/// Immutable mapping from normalized city key to its dataset.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// The bundled cities with their files resolved under `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let entries = DEFAULT_CITIES
            .iter()
            .map(|&(city, file, demographics)| {
                (
                    city.to_string(),
                    CatalogEntry {
                        source: data_dir.join(file),
                        demographics,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Loads a catalog from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, EntryFile> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if raw.is_empty() {
            return Err(CatalogError::Empty {
                path: path.to_path_buf(),
            });
        }

        let data_dir = data_dir.as_ref();
        let entries: BTreeMap<_, _> = raw
            .into_iter()
            .map(|(city, entry)| {
                (
                    normalize_key(&city),
                    CatalogEntry {
                        source: data_dir.join(entry.file),
                        demographics: entry.demographics,
                    },
                )
            })
            .collect();

        debug!(path = %path.display(), cities = entries.len(), "Catalog loaded");
        Ok(Self { entries })
    }

    /// Returns the entry for an already-normalized city key.
    pub fn get(&self, city: &str) -> Option<&CatalogEntry> {
        self.entries.get(city)
    }

    pub fn contains(&self, city: &str) -> bool {
        self.entries.contains_key(city)
    }

    /// Whether the city's dataset carries gender and birth year columns.
    pub fn has_demographics(&self, city: &str) -> bool {
        self.get(city).is_some_and(|e| e.demographics)
    }

    /// City keys in sorted order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Lowercases and trims a city name into catalog key form.
pub fn normalize_key(city: &str) -> String {
    city.trim().to_lowercase()
}
