//! Error types for loading trip data and computing statistics.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure to produce a trip table for a city.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("unknown city '{city}'")]
    UnknownCity { city: String },

    #[error("failed to open data file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}, line {line}: cannot parse start time '{value}'")]
    StartTime {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("{path}, line {line}: trip duration {value} is not a finite number")]
    TripDuration { path: PathBuf, line: u64, value: f64 },
}

impl DataSourceError {
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Non-fatal conditions raised while computing a single metric.
///
/// These never leave a statistics module; they are folded into the report as
/// [`Metric::NoData`](crate::stats::Metric::NoData) or
/// [`Metric::NotAvailable`](crate::stats::Metric::NotAvailable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("no rows to compute {metric}")]
    EmptyResult { metric: &'static str },

    #[error("column '{column}' is not present in this dataset")]
    SchemaAbsent { column: &'static str },
}
