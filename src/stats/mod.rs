//! Descriptive statistics over a (filtered) trip table.
//!
//! Four independent modules each turn a [`TripTable`](crate::loader::TripTable)
//! into a small report: [`time`], [`station`], [`duration`] and [`user`].
//! None of them fail. An empty table or a column the dataset does not carry
//! becomes an explicit [`Metric::NoData`] or [`Metric::NotAvailable`] entry.
//!
//! Every mode-style metric breaks ties by picking the lowest tied value.

pub mod duration;
pub mod station;
pub mod time;
pub mod user;

pub use duration::{TripDurationStats, trip_duration_stats};
pub use station::{STATION_PAIR_SEPARATOR, StationStats, station_stats};
pub use time::{TimeStats, time_stats};
pub use user::{BirthYearStats, UserStats, user_stats};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::StatsError;

/// A value together with how many rows carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counted<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Counted<T> {
    pub fn new(value: T, count: usize) -> Self {
        Counted { value, count }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Counted<U> {
        Counted {
            value: f(self.value),
            count: self.count,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Counted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Count: {}", self.value, self.count)
    }
}

/// One named entry of a statistics report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Metric<T> {
    Value(T),
    /// The filtered table had no rows to compute this from.
    NoData,
    /// The dataset does not have the column this metric needs.
    NotAvailable,
}

impl<T> Metric<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Metric::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Metric::Value(_))
    }
}

impl<T> From<Result<T, StatsError>> for Metric<T> {
    fn from(result: Result<T, StatsError>) -> Self {
        match result {
            Ok(v) => Metric::Value(v),
            Err(StatsError::EmptyResult { .. }) => Metric::NoData,
            Err(StatsError::SchemaAbsent { .. }) => Metric::NotAvailable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Metric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => v.fmt(f),
            Metric::NoData => f.write_str("no data"),
            Metric::NotAvailable => f.write_str("not available"),
        }
    }
}

/// Counts occurrences of each distinct value, ordered by value.
pub fn tally<T: Ord>(values: impl IntoIterator<Item = T>) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value and its count; the lowest value wins a tie.
pub fn mode<T: Ord>(
    values: impl IntoIterator<Item = T>,
    metric: &'static str,
) -> Result<Counted<T>, StatsError> {
    let mut best: Option<Counted<T>> = None;
    for (value, count) in tally(values) {
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(Counted::new(value, count));
        }
    }
    best.ok_or(StatsError::EmptyResult { metric })
}

/// Every distinct value with its count, most frequent first. Equal counts
/// are ordered by value.
pub fn value_counts<T: Ord>(
    values: impl IntoIterator<Item = T>,
    metric: &'static str,
) -> Result<Vec<Counted<T>>, StatsError> {
    let mut counts: Vec<_> = tally(values)
        .into_iter()
        .map(|(value, count)| Counted::new(value, count))
        .collect();
    if counts.is_empty() {
        return Err(StatsError::EmptyResult { metric });
    }
    // stable sort keeps value order within equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

/// Computes the arithmetic mean of a slice of values.
pub fn mean(values: &[f64], metric: &'static str) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyResult { metric });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}
