//! CLI entry point for the bikeshare statistics tool.
//!
//! Runs the interactive explorer by default, or a single analysis, raw data
//! dump or city listing through subcommands.

mod interactive;

use crate::interactive::{Prompter, run_session};
use anyhow::Result;
use bikeshare_stats::{
    analysis::run_analysis,
    config::CityConfig,
    filter::FilterSpec,
    output::{render_raw_page, render_report, report_json},
    raw::RawPager,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory containing the city CSV files
    #[arg(long, global = true, env = "BIKESHARE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON file mapping city names to CSV files
    #[arg(long, global = true, env = "BIKESHARE_CITIES")]
    cities: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick filters and browse statistics (default)
    Explore,
    /// Print statistics for one city and filter
    Analyze {
        /// City to analyze
        #[arg(short, long)]
        city: String,

        /// Month to filter by (jan..jun, 1..6) or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Day of week to filter by (mon..sun) or "all"
        #[arg(short, long, default_value = "all")]
        day: String,

        /// Print the reports as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print raw, unfiltered trip records
    Raw {
        /// City whose records to print
        #[arg(short, long)]
        city: String,

        /// Number of five-row pages to print
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// List configured cities and their data files
    Cities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: stderr (warnings by default) + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = city_config(cli.cities.as_deref(), cli.data_dir)?;
    debug!(data_dir = %config.data_dir().display(), "City config ready");

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
            run_session(&mut prompter, &config)?;
        }
        Commands::Analyze {
            city,
            month,
            day,
            json,
        } => {
            let spec = FilterSpec::parse(&city, &month, &day)?;
            let report = run_analysis(&config, &spec)?;
            if json {
                println!("{}", report_json(&report)?);
            } else {
                print!("{}", render_report(&report)?);
            }
        }
        Commands::Raw { city, pages } => {
            let mut pager = RawPager::open(&config, &city)?;
            for _ in 0..pages {
                match pager.next_page()? {
                    Some(page) => print!("{}", render_raw_page(&page)?),
                    None => break,
                }
            }
            info!(city = %city, rows = pager.served(), "Raw rows printed");
        }
        Commands::Cities => {
            for (city, file) in config.iter() {
                println!("{city}: {}", config.data_dir().join(file).display());
            }
        }
    }

    Ok(())
}

/// Builds the city mapping from an optional JSON file and data directory.
fn city_config(cities: Option<&Path>, data_dir: Option<PathBuf>) -> Result<CityConfig> {
    let config = match cities {
        Some(path) => CityConfig::load(path)?,
        None => CityConfig::default(),
    };
    Ok(match data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    })
}
