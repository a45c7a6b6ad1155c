use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use super::{Counted, Metric, mode, value_counts};
use crate::error::StatsError;
use crate::loader::{BIRTH_YEAR, GENDER, TripTable};

/// Earliest, most recent and most common year of birth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: Counted<i32>,
}

/// Breakdown of riders by type, gender and birth year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Metric<Vec<Counted<String>>>,
    pub genders: Metric<Vec<Counted<String>>>,
    pub birth_years: Metric<BirthYearStats>,
    pub elapsed_secs: f64,
}

fn gender_counts(table: &TripTable) -> Result<Vec<Counted<String>>, StatsError> {
    if !table.has_gender() {
        return Err(StatsError::SchemaAbsent { column: GENDER });
    }
    let counts = value_counts(
        table.records().iter().filter_map(|r| r.gender.as_deref()),
        "gender",
    )?;
    Ok(counts.into_iter().map(|c| c.map(str::to_string)).collect())
}

fn birth_year_stats(table: &TripTable) -> Result<BirthYearStats, StatsError> {
    if !table.has_birth_year() {
        return Err(StatsError::SchemaAbsent { column: BIRTH_YEAR });
    }
    let years: Vec<i32> = table.records().iter().filter_map(|r| r.birth_year).collect();
    let most_common = mode(years.iter().copied(), "birth year")?;

    Ok(BirthYearStats {
        // non-empty once a mode exists
        earliest: years.iter().copied().min().unwrap_or(most_common.value),
        most_recent: years.iter().copied().max().unwrap_or(most_common.value),
        most_common,
    })
}

#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn user_stats(table: &TripTable) -> UserStats {
    let start = Instant::now();

    let user_types = value_counts(
        table.records().iter().filter_map(|r| r.user_type.as_deref()),
        "user type",
    )
    .map(|counts| {
        counts
            .into_iter()
            .map(|c| c.map(str::to_string))
            .collect::<Vec<_>>()
    });

    let stats = UserStats {
        user_types: user_types.into(),
        genders: gender_counts(table).into(),
        birth_years: birth_year_stats(table).into(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    debug!(?stats, "User stats computed");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn trip(user_type: &str) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, 5, 20)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        TripRecord::new(start, "A", "B", 120.0).with_user_type(user_type)
    }

    const FULL: Schema = Schema {
        has_gender: true,
        has_birth_year: true,
    };

    #[test]
    fn test_user_type_counts_descending() {
        let table = TripTable::new(
            "chicago",
            FULL,
            vec![trip("Customer"), trip("Subscriber"), trip("Subscriber")],
        );
        let stats = user_stats(&table);

        assert_eq!(
            stats.user_types,
            Metric::Value(vec![
                Counted::new("Subscriber".to_string(), 2),
                Counted::new("Customer".to_string(), 1),
            ])
        );
    }

    #[test]
    fn test_gender_and_birth_years() {
        let table = TripTable::new(
            "chicago",
            FULL,
            vec![
                trip("Subscriber").with_gender("Male").with_birth_year(1989),
                trip("Subscriber").with_gender("Female").with_birth_year(1992),
                trip("Subscriber").with_gender("Male").with_birth_year(1975),
                trip("Customer").with_birth_year(1992),
                trip("Customer"),
            ],
        );
        let stats = user_stats(&table);

        assert_eq!(
            stats.genders,
            Metric::Value(vec![
                Counted::new("Male".to_string(), 2),
                Counted::new("Female".to_string(), 1),
            ])
        );
        assert_eq!(
            stats.birth_years,
            Metric::Value(BirthYearStats {
                earliest: 1975,
                most_recent: 1992,
                most_common: Counted::new(1992, 2),
            })
        );
    }

    #[test]
    fn test_missing_columns_not_available() {
        let table = TripTable::new("washington", Schema::default(), vec![trip("Subscriber")]);
        let stats = user_stats(&table);

        assert!(stats.user_types.is_value());
        assert_eq!(stats.genders, Metric::NotAvailable);
        assert_eq!(stats.birth_years, Metric::NotAvailable);
    }

    #[test]
    fn test_empty_table_no_data() {
        let stats = user_stats(&TripTable::new("chicago", FULL, vec![]));

        assert_eq!(stats.user_types, Metric::NoData);
        assert_eq!(stats.genders, Metric::NoData);
        assert_eq!(stats.birth_years, Metric::NoData);
    }

    #[test]
    fn test_empty_table_without_columns_still_not_available() {
        let stats = user_stats(&TripTable::new("washington", Schema::default(), vec![]));

        assert_eq!(stats.user_types, Metric::NoData);
        assert_eq!(stats.genders, Metric::NotAvailable);
    }
}
