use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::DataSourceError;

/// Built-in cities and the CSV file backing each one.
static DEFAULT_CITIES: &[(&str, &str)] = &[
    ("chicago", "chicago.csv"),
    ("new york city", "new_york_city.csv"),
    ("washington", "washington.csv"),
];

/// Months (by number) a trip table can be filtered to.
pub const FILTER_MONTHS: RangeInclusive<u32> = 1..=6;

/// Maps city names to their trip data files.
///
/// Can be stored as JSON on disk to add or relocate datasets:
/// ```json
/// {
///   "data_dir": "/srv/bikeshare",
///   "cities": {
///     "chicago": "chicago.csv",
///     "boston": "boston_2017.csv"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityConfig {
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    cities: BTreeMap<String, String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn normalize(city: &str) -> String {
    city.trim().to_lowercase()
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cities: DEFAULT_CITIES
                .iter()
                .map(|(city, file)| (city.to_string(), file.to_string()))
                .collect(),
        }
    }
}

impl CityConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read city config {}", path.display()))?;
        let raw: CityConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid city config {}", path.display()))?;

        Ok(Self {
            data_dir: raw.data_dir,
            cities: raw
                .cities
                .into_iter()
                .map(|(city, file)| (normalize(&city), file))
                .collect(),
        })
    }

    /// Replaces the directory that city files are resolved against.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns `true` if `city` (case-insensitive) is configured.
    pub fn contains(&self, city: &str) -> bool {
        self.cities.contains_key(&normalize(city))
    }

    /// Resolves `city` (case-insensitive) to the path of its data file.
    pub fn resolve(&self, city: &str) -> Result<PathBuf, DataSourceError> {
        self.cities
            .get(&normalize(city))
            .map(|file| self.data_dir.join(file))
            .ok_or_else(|| DataSourceError::UnknownCity {
                city: city.to_string(),
            })
    }

    /// Iterates over all `(city, file)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cities.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
