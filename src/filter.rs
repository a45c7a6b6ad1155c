//! Filter specs and the filter engine.
//!
//! A [`FilterSpec`] names a city plus optional month and weekday constraints.
//! [`filter_trips`] narrows a loaded [`TripTable`] to the matching rows
//! without touching the input.

use chrono::Weekday;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::calendar::{month_name, weekday_name};
use crate::config::FILTER_MONTHS;
use crate::loader::TripTable;

/// Input that is not a recognised month or weekday.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("'{input}' is not a valid month")]
    InvalidMonth { input: String },

    #[error("'{input}' is not a valid day of week")]
    InvalidDay { input: String },
}

fn is_all(input: &str) -> bool {
    input.eq_ignore_ascii_case("all")
}

/// Parses a month filter: `all`, a month name or abbreviation (`jun`,
/// `June`), or its number. Only months in [`FILTER_MONTHS`] are accepted.
pub fn parse_month(input: &str) -> Result<Option<u32>, FilterError> {
    let input = input.trim();
    if is_all(input) {
        return Ok(None);
    }

    let invalid = || FilterError::InvalidMonth {
        input: input.to_string(),
    };

    let month = match input.parse::<u32>() {
        Ok(n) => n,
        Err(_) => input.parse::<chrono::Month>().map_err(|_| invalid())?.number_from_month(),
    };

    if FILTER_MONTHS.contains(&month) {
        Ok(Some(month))
    } else {
        Err(invalid())
    }
}

/// Parses a day filter: `all`, or a weekday name or abbreviation.
pub fn parse_day(input: &str) -> Result<Option<Weekday>, FilterError> {
    let input = input.trim();
    if is_all(input) {
        return Ok(None);
    }
    input
        .parse::<Weekday>()
        .map(Some)
        .map_err(|_| FilterError::InvalidDay {
            input: input.to_string(),
        })
}

/// The city to analyze and how to narrow its trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub city: String,
    pub month: Option<u32>,
    pub day: Option<Weekday>,
}

impl FilterSpec {
    /// A spec with no month or day constraint.
    pub fn all(city: &str) -> Self {
        FilterSpec {
            city: city.to_string(),
            month: None,
            day: None,
        }
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_day(mut self, day: Weekday) -> Self {
        self.day = Some(day);
        self
    }

    /// Parses the month and day from user input; `all` disables either axis.
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self, FilterError> {
        Ok(FilterSpec {
            city: city.trim().to_lowercase(),
            month: parse_month(month)?,
            day: parse_day(day)?,
        })
    }

    /// Applies this spec's month and day constraints to `table`.
    pub fn apply(&self, table: &TripTable) -> TripTable {
        filter_trips(table, self.month, self.day)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.month.and_then(month_name).unwrap_or("all");
        let day = self.day.map(weekday_name).unwrap_or("all");
        write!(f, "city: {}, month: {}, day: {}", self.city, month, day)
    }
}

/// Returns the rows of `table` whose month equals `month` and whose weekday
/// equals `day`. `None` on either axis matches every row. Row order and the
/// table's schema are preserved.
#[tracing::instrument(skip(table), fields(city = table.city(), rows = table.len()))]
pub fn filter_trips(table: &TripTable, month: Option<u32>, day: Option<Weekday>) -> TripTable {
    let records: Vec<_> = table
        .records()
        .iter()
        .filter(|r| month.is_none_or(|m| r.month() == m))
        .filter(|r| day.is_none_or(|d| r.day_of_week() == d))
        .cloned()
        .collect();

    debug!(matched = records.len(), "Filter applied");
    table.with_records(records)
}
