use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use super::{Counted, Metric, mode};
use crate::calendar::{month_name, weekday_name};
use crate::loader::TripTable;

/// The most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub popular_month: Metric<Counted<String>>,
    pub popular_day: Metric<Counted<String>>,
    pub popular_hour: Metric<Counted<u32>>,
    pub elapsed_secs: f64,
}

#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn time_stats(table: &TripTable) -> TimeStats {
    let start = Instant::now();
    let records = table.records();

    let popular_month = mode(records.iter().map(|r| r.month()), "month").map(|c| {
        c.map(|m| month_name(m).map_or_else(|| m.to_string(), str::to_string))
    });

    // keyed by weekday number so ties resolve Monday-first
    let popular_day = mode(
        records
            .iter()
            .map(|r| (r.day_of_week().num_days_from_monday(), weekday_name(r.day_of_week()))),
        "day of week",
    )
    .map(|c| c.map(|(_, name)| name.to_string()));

    let popular_hour = mode(records.iter().map(|r| r.start_hour()), "start hour");

    let stats = TimeStats {
        popular_month: popular_month.into(),
        popular_day: popular_day.into(),
        popular_hour: popular_hour.into(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    debug!(?stats, "Time stats computed");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn trip(m: u32, d: u32, hour: u32) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, m, d)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap();
        TripRecord::new(start, "A", "B", 60.0)
    }

    fn table(records: Vec<TripRecord>) -> TripTable {
        TripTable::new("chicago", Schema::default(), records)
    }

    #[test]
    fn test_time_stats_modes() {
        let stats = time_stats(&table(vec![
            trip(3, 6, 8), // Monday
            trip(3, 7, 8), // Tuesday
            trip(3, 13, 17), // Monday
            trip(5, 2, 8), // Tuesday
            trip(5, 8, 17), // Monday
        ]));

        assert_eq!(stats.popular_month, Metric::Value(Counted::new("March".to_string(), 3)));
        assert_eq!(stats.popular_day, Metric::Value(Counted::new("Monday".to_string(), 3)));
        assert_eq!(stats.popular_hour, Metric::Value(Counted::new(8, 3)));
        assert!(stats.elapsed_secs >= 0.0);
    }

    #[test]
    fn test_time_stats_ties_pick_lowest() {
        // Sunday 2017-01-01 vs Saturday 2017-06-03: one each
        let stats = time_stats(&table(vec![trip(6, 3, 23), trip(1, 1, 4)]));

        assert_eq!(stats.popular_month.value().unwrap().value, "January");
        assert_eq!(stats.popular_day.value().unwrap().value, "Saturday");
        assert_eq!(stats.popular_hour.value().unwrap().value, 4);
    }

    #[test]
    fn test_time_stats_empty_table() {
        let stats = time_stats(&table(vec![]));
        assert_eq!(stats.popular_month, Metric::NoData);
        assert_eq!(stats.popular_day, Metric::NoData);
        assert_eq!(stats.popular_hour, Metric::NoData);
    }
}
