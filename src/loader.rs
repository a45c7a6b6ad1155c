//! Dataset loader: reads one city's trip CSV into a [`TripTable`].
//!
//! The start time of every row is parsed into a real timestamp and the
//! `month` and `day_of_week` columns are derived from it once, here.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::CityConfig;
use crate::error::DataSourceError;

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

static REQUIRED_COLUMNS: &[&str] = &[
    START_TIME,
    END_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

static TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a source timestamp such as `2017-01-01 00:07:57`.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Which optional columns a dataset carries.
///
/// This is a property of the source file, so a filtered table keeps the
/// schema of the table it was cut from even when no row has a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    fn from_headers(headers: &StringRecord) -> Self {
        Schema {
            has_gender: headers.iter().any(|h| h == GENDER),
            has_birth_year: headers.iter().any(|h| h == BIRTH_YEAR),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    // Stored as a float ("1989.0") in the source files.
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// One trip, with its calendar fields derived from the start time.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    month: u32,
    day_of_week: Weekday,
    pub end_time: Option<NaiveDateTime>,
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        start_station: &str,
        end_station: &str,
        trip_duration: f64,
    ) -> Self {
        TripRecord {
            start_time,
            month: start_time.month(),
            day_of_week: start_time.weekday(),
            end_time: None,
            trip_duration,
            start_station: start_station.to_string(),
            end_station: end_station.to_string(),
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    pub fn with_user_type(mut self, user_type: &str) -> Self {
        self.user_type = Some(user_type.to_string());
        self
    }

    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    pub fn with_birth_year(mut self, birth_year: i32) -> Self {
        self.birth_year = Some(birth_year);
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Calendar month of the start time, 1 = January.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    /// Hour of day (0-23) the trip started.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// All (or a filtered subset of) the trips for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    city: String,
    schema: Schema,
    records: Vec<TripRecord>,
}

impl TripTable {
    pub fn new(city: &str, schema: Schema, records: Vec<TripRecord>) -> Self {
        TripTable {
            city: city.to_string(),
            schema,
            records,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn has_gender(&self) -> bool {
        self.schema.has_gender
    }

    pub fn has_birth_year(&self) -> bool {
        self.schema.has_birth_year
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds a table over `records` sharing this table's city and schema.
    pub(crate) fn with_records(&self, records: Vec<TripRecord>) -> Self {
        TripTable {
            city: self.city.clone(),
            schema: self.schema,
            records,
        }
    }
}

/// Loads the trip table for `city` using the configured file mapping.
///
/// # Errors
///
/// Returns [`DataSourceError`] if the city is unknown or its file is missing,
/// unreadable, malformed, or lacks a required column.
#[tracing::instrument(skip(config))]
pub fn load_city(config: &CityConfig, city: &str) -> Result<TripTable, DataSourceError> {
    let path = config.resolve(city)?;
    load_path(&path, city)
}

/// Loads a trip table from the CSV file at `path`.
pub fn load_path(path: &Path, city: &str) -> Result<TripTable, DataSourceError> {
    let file = File::open(path).map_err(|e| DataSourceError::open(path, e))?;
    let table = load_reader(file, path, city)?;
    info!(
        city,
        path = %path.display(),
        rows = table.len(),
        has_gender = table.has_gender(),
        has_birth_year = table.has_birth_year(),
        "Trip data loaded"
    );
    Ok(table)
}

/// Loads a trip table from any CSV source; `source` is used in error messages.
pub fn load_reader<R: Read>(
    reader: R,
    source: &Path,
    city: &str,
) -> Result<TripTable, DataSourceError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| DataSourceError::csv(source, e))?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataSourceError::MissingColumn {
                path: source.to_path_buf(),
                column: column.to_string(),
            });
        }
    }
    let schema = Schema::from_headers(&headers);
    debug!(?schema, columns = headers.len(), "Parsed header row");

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| DataSourceError::csv(source, e))?;
        let raw: RawTrip = row
            .deserialize(Some(&headers))
            .map_err(|e| DataSourceError::csv(source, e))?;

        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let start_time =
            parse_timestamp(&raw.start_time).ok_or_else(|| DataSourceError::StartTime {
                path: source.to_path_buf(),
                line,
                value: raw.start_time.clone(),
            })?;
        if !raw.trip_duration.is_finite() {
            return Err(DataSourceError::TripDuration {
                path: source.to_path_buf(),
                line,
                value: raw.trip_duration,
            });
        }

        let mut record = TripRecord::new(
            start_time,
            &raw.start_station,
            &raw.end_station,
            raw.trip_duration,
        );
        record.end_time = parse_timestamp(&raw.end_time);
        record.user_type = raw.user_type.filter(|s| !s.trim().is_empty());
        record.gender = raw.gender.filter(|s| !s.trim().is_empty());
        // pandas writes missing floats as "nan"
        record.birth_year = raw.birth_year.filter(|y| y.is_finite()).map(|y| y as i32);
        records.push(record);
    }

    Ok(TripTable::new(city, schema, records))
}
