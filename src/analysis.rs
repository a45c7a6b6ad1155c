//! One analysis pass: load a city, apply the filter, compute every report.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::calendar::{month_name, weekday_name};
use crate::config::CityConfig;
use crate::filter::FilterSpec;
use crate::loader::{TripTable, load_city};
use crate::stats::{
    StationStats, TimeStats, TripDurationStats, UserStats, station_stats, time_stats,
    trip_duration_stats, user_stats,
};

/// The four statistics reports for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub city: String,
    pub month: Option<String>,
    pub day: Option<String>,
    pub loaded_rows: usize,
    pub filtered_rows: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub trip_duration: TripDurationStats,
    pub users: UserStats,
}

/// Filters an already loaded `table` by `spec` and computes every report.
pub fn analyze(table: &TripTable, spec: &FilterSpec) -> AnalysisReport {
    let filtered = spec.apply(table);
    if filtered.is_empty() {
        warn!(filter = %spec, "No trips match the filter");
    }

    AnalysisReport {
        city: table.city().to_string(),
        month: spec.month.and_then(month_name).map(str::to_string),
        day: spec.day.map(|d| weekday_name(d).to_string()),
        loaded_rows: table.len(),
        filtered_rows: filtered.len(),
        time: time_stats(&filtered),
        stations: station_stats(&filtered),
        trip_duration: trip_duration_stats(&filtered),
        users: user_stats(&filtered),
    }
}

/// Loads the city named by `spec` and analyzes it.
///
/// # Errors
///
/// Returns an error if the city's data cannot be loaded.
#[tracing::instrument(skip(config), fields(filter = %spec))]
pub fn run_analysis(config: &CityConfig, spec: &FilterSpec) -> Result<AnalysisReport> {
    let table = load_city(config, &spec.city)
        .with_context(|| format!("failed to load trip data for '{}'", spec.city))?;
    let report = analyze(&table, spec);
    info!(
        loaded = report.loaded_rows,
        filtered = report.filtered_rows,
        "Analysis complete"
    );
    Ok(report)
}
