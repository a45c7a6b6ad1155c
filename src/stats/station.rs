use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use super::{Counted, Metric, mode};
use crate::loader::TripTable;

/// Joins start and end station names into a trip label.
pub const STATION_PAIR_SEPARATOR: &str = " and ";

/// The most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub popular_start_station: Metric<Counted<String>>,
    pub popular_end_station: Metric<Counted<String>>,
    pub popular_trip: Metric<Counted<String>>,
    pub elapsed_secs: f64,
}

#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn station_stats(table: &TripTable) -> StationStats {
    let start = Instant::now();
    let records = table.records();

    let popular_start = mode(
        records.iter().map(|r| r.start_station.as_str()),
        "start station",
    );
    let popular_end = mode(
        records.iter().map(|r| r.end_station.as_str()),
        "end station",
    );
    let popular_trip = mode(
        records
            .iter()
            .map(|r| format!("{}{}{}", r.start_station, STATION_PAIR_SEPARATOR, r.end_station)),
        "station pair",
    );

    let stats = StationStats {
        popular_start_station: popular_start.map(|c| c.map(str::to_string)).into(),
        popular_end_station: popular_end.map(|c| c.map(str::to_string)).into(),
        popular_trip: popular_trip.into(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    debug!(?stats, "Station stats computed");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn trip(from: &str, to: &str) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, 4, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        TripRecord::new(start, from, to, 60.0)
    }

    fn table(records: Vec<TripRecord>) -> TripTable {
        TripTable::new("chicago", Schema::default(), records)
    }

    #[test]
    fn test_most_frequent_start_station() {
        let stats = station_stats(&table(vec![trip("A", "X"), trip("A", "Y"), trip("B", "Y")]));

        assert_eq!(
            stats.popular_start_station,
            Metric::Value(Counted::new("A".to_string(), 2))
        );
        assert_eq!(
            stats.popular_end_station,
            Metric::Value(Counted::new("Y".to_string(), 2))
        );
    }

    #[test]
    fn test_most_frequent_trip_pair() {
        let stats = station_stats(&table(vec![
            trip("A", "B"),
            trip("B", "A"),
            trip("B", "A"),
            trip("A", "A"),
        ]));

        assert_eq!(
            stats.popular_trip,
            Metric::Value(Counted::new("B and A".to_string(), 2))
        );
    }

    #[test]
    fn test_pair_tie_picks_lowest() {
        let stats = station_stats(&table(vec![trip("Clark", "Lake"), trip("Adams", "Wells")]));
        assert_eq!(stats.popular_trip.value().unwrap().value, "Adams and Wells");
        assert_eq!(stats.popular_start_station.value().unwrap().value, "Adams");
    }

    #[test]
    fn test_station_stats_empty_table() {
        let stats = station_stats(&table(vec![]));
        assert_eq!(stats.popular_start_station, Metric::NoData);
        assert_eq!(stats.popular_end_station, Metric::NoData);
        assert_eq!(stats.popular_trip, Metric::NoData);
    }
}
