use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use super::{Metric, mean};
use crate::loader::TripTable;

/// Total and average trip duration, in seconds.
///
/// An empty table has a total of zero and no mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripDurationStats {
    pub trip_count: usize,
    pub total_duration: f64,
    pub mean_duration: Metric<f64>,
    pub elapsed_secs: f64,
}

#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn trip_duration_stats(table: &TripTable) -> TripDurationStats {
    let start = Instant::now();
    let durations: Vec<f64> = table.records().iter().map(|r| r.trip_duration).collect();

    let stats = TripDurationStats {
        trip_count: durations.len(),
        total_duration: durations.iter().sum(),
        mean_duration: mean(&durations, "mean trip duration").into(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    debug!(?stats, "Trip duration stats computed");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn trip(duration: f64) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, 2, 14)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        TripRecord::new(start, "A", "B", duration)
    }

    #[test]
    fn test_sum_and_mean() {
        let table = TripTable::new("chicago", Schema::default(), vec![trip(300.0), trip(700.0)]);
        let stats = trip_duration_stats(&table);

        assert_eq!(stats.trip_count, 2);
        assert_eq!(stats.total_duration, 1000.0);
        assert_eq!(stats.mean_duration, Metric::Value(500.0));
    }

    #[test]
    fn test_empty_table() {
        let table = TripTable::new("chicago", Schema::default(), vec![]);
        let stats = trip_duration_stats(&table);

        assert_eq!(stats.trip_count, 0);
        assert_eq!(stats.total_duration, 0.0);
        assert_eq!(stats.mean_duration, Metric::NoData);
    }
}
