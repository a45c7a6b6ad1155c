//! Output formatting for analysis reports and raw rows.
//!
//! Supports the human-readable console layout and JSON serialization.

use anyhow::Result;
use std::fmt::{self, Write};

use crate::analysis::AnalysisReport;
use crate::raw::RawRow;
use crate::stats::{Counted, Metric, StationStats, TimeStats, TripDurationStats, UserStats};

const RULE_WIDTH: usize = 40;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn write_footer(out: &mut String, elapsed_secs: f64) -> fmt::Result {
    writeln!(out, "\nThis took {elapsed_secs} seconds.")?;
    writeln!(out, "{}", rule())
}

fn write_counts(
    out: &mut String,
    heading: &str,
    label: &str,
    counts: &Metric<Vec<Counted<String>>>,
) -> fmt::Result {
    match counts {
        Metric::Value(counts) => {
            writeln!(out, "\nNumber of each {label}:\n")?;
            for c in counts {
                writeln!(out, "{}: {}", c.value, c.count)?;
            }
            Ok(())
        }
        Metric::NoData => writeln!(out, "\n{heading}: no data"),
        Metric::NotAvailable => writeln!(out, "\n{heading} data not available"),
    }
}

fn write_time_stats(out: &mut String, stats: &TimeStats) -> fmt::Result {
    writeln!(out, "\nCalculating The Most Frequent Times of Travel...\n")?;
    writeln!(out, "Most common month: {}", stats.popular_month)?;
    writeln!(out, "Most common day of week: {}", stats.popular_day)?;
    writeln!(out, "Most common start hour: {}", stats.popular_hour)?;
    write_footer(out, stats.elapsed_secs)
}

fn write_station_stats(out: &mut String, stats: &StationStats) -> fmt::Result {
    writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n")?;
    writeln!(out, "Most common starting station: {}", stats.popular_start_station)?;
    writeln!(out, "Most common ending station: {}", stats.popular_end_station)?;
    writeln!(out, "Most common station combination: {}", stats.popular_trip)?;
    write_footer(out, stats.elapsed_secs)
}

fn write_trip_duration_stats(out: &mut String, stats: &TripDurationStats) -> fmt::Result {
    writeln!(out, "\nCalculating Trip Duration...\n")?;
    writeln!(out, "Total trip duration: {}", stats.total_duration)?;
    writeln!(out, "Mean travel time: {}", stats.mean_duration)?;
    write_footer(out, stats.elapsed_secs)
}

fn write_user_stats(out: &mut String, stats: &UserStats) -> fmt::Result {
    writeln!(out, "\nCalculating User Stats...")?;
    write_counts(out, "User type", "user type", &stats.user_types)?;
    write_counts(out, "Gender", "gender", &stats.genders)?;

    match &stats.birth_years {
        Metric::Value(years) => {
            writeln!(out, "\nEarliest birth year: {}", years.earliest)?;
            writeln!(out, "Most recent birth year: {}", years.most_recent)?;
            writeln!(out, "Most common birth year: {}", years.most_common)?;
        }
        Metric::NoData => writeln!(out, "\nBirth year: no data")?,
        Metric::NotAvailable => writeln!(out, "\nBirth year data not available")?,
    }
    write_footer(out, stats.elapsed_secs)
}

pub fn render_time_stats(stats: &TimeStats) -> Result<String> {
    let mut out = String::new();
    write_time_stats(&mut out, stats)?;
    Ok(out)
}

pub fn render_station_stats(stats: &StationStats) -> Result<String> {
    let mut out = String::new();
    write_station_stats(&mut out, stats)?;
    Ok(out)
}

pub fn render_trip_duration_stats(stats: &TripDurationStats) -> Result<String> {
    let mut out = String::new();
    write_trip_duration_stats(&mut out, stats)?;
    Ok(out)
}

pub fn render_user_stats(stats: &UserStats) -> Result<String> {
    let mut out = String::new();
    write_user_stats(&mut out, stats)?;
    Ok(out)
}

/// Renders all four reports in the order they are displayed.
pub fn render_report(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "\n{} of {} trips in {} match (month: {}, day: {})\n{}",
        report.filtered_rows,
        report.loaded_rows,
        report.city,
        report.month.as_deref().unwrap_or("all"),
        report.day.as_deref().unwrap_or("all"),
        rule(),
    )?;
    write_time_stats(&mut out, &report.time)?;
    write_station_stats(&mut out, &report.stations)?;
    write_trip_duration_stats(&mut out, &report.trip_duration)?;
    write_user_stats(&mut out, &report.users)?;
    Ok(out)
}

/// Serializes a report as pretty-printed JSON.
pub fn report_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders raw rows as `column: value` lines, one blank line between rows.
pub fn render_raw_page(page: &[RawRow]) -> Result<String> {
    let mut out = String::new();
    for row in page {
        for (name, value) in row {
            writeln!(out, "{name}: {value}")?;
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::BirthYearStats;

    fn time() -> TimeStats {
        TimeStats {
            popular_month: Metric::Value(Counted::new("June".to_string(), 12)),
            popular_day: Metric::Value(Counted::new("Friday".to_string(), 4)),
            popular_hour: Metric::NoData,
            elapsed_secs: 0.5,
        }
    }

    #[test]
    fn test_render_time_stats() {
        let text = render_time_stats(&time()).unwrap();
        assert!(text.contains("Most common month: June, Count: 12"));
        assert!(text.contains("Most common day of week: Friday, Count: 4"));
        assert!(text.contains("Most common start hour: no data"));
        assert!(text.contains("This took 0.5 seconds."));
        assert!(text.ends_with(&format!("{}\n", "-".repeat(40))));
    }

    #[test]
    fn test_render_duration() {
        let text = render_trip_duration_stats(&TripDurationStats {
            trip_count: 2,
            total_duration: 1000.0,
            mean_duration: Metric::Value(500.0),
            elapsed_secs: 0.0,
        })
        .unwrap();
        assert!(text.contains("Total trip duration: 1000"));
        assert!(text.contains("Mean travel time: 500"));
    }

    #[test]
    fn test_render_user_stats_sections() {
        let text = render_user_stats(&UserStats {
            user_types: Metric::Value(vec![
                Counted::new("Subscriber".to_string(), 2),
                Counted::new("Customer".to_string(), 1),
            ]),
            genders: Metric::NotAvailable,
            birth_years: Metric::Value(BirthYearStats {
                earliest: 1940,
                most_recent: 2001,
                most_common: Counted::new(1989, 7),
            }),
            elapsed_secs: 0.0,
        })
        .unwrap();

        let subscriber = text.find("Subscriber: 2").unwrap();
        let customer = text.find("Customer: 1").unwrap();
        assert!(subscriber < customer);
        assert!(text.contains("Gender data not available"));
        assert!(text.contains("Earliest birth year: 1940"));
        assert!(text.contains("Most common birth year: 1989, Count: 7"));
    }

    #[test]
    fn test_render_raw_page() {
        let page = vec![vec![
            ("Start Station".to_string(), "A".to_string()),
            ("End Station".to_string(), "B".to_string()),
        ]];
        assert_eq!(
            render_raw_page(&page).unwrap(),
            "Start Station: A\nEnd Station: B\n\n"
        );
    }
}
