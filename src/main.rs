//! CLI entry point for the bike-share trip tool.
//!
//! Provides subcommands for cleaning a raw trip file and for building a
//! ridership report from it.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gobike_trips::analyzers::groups::TripFilter;
use gobike_trips::analyzers::report::{DEFAULT_TOP_STATIONS, analyze_file};
use gobike_trips::analyzers::writejson::write_json;
use gobike_trips::{
    cleaner::TripCleaner,
    config::CleanerConfig,
    output::{append_record, print_json, print_pretty, write_trips},
    trip::{DayOfWeek, DayPeriod, Gender, UserType},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gobike_trips")]
#[command(about = "Clean and summarise bike-share trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw trip CSV (optionally gzipped)
    Clean {
        /// Path to the raw trip file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// CSV file to write the cleaned trips to
        #[arg(short, long, default_value = "clean_trips.csv")]
        output: String,

        /// CSV file to append the run statistics to
        #[arg(long)]
        summary: Option<String>,

        /// JSON file overriding cleaner settings
        #[arg(long)]
        config: Option<String>,
    },
    /// Build a ridership report from a raw trip CSV
    Report {
        /// Path to the raw trip file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Number of busiest start stations to break down
        #[arg(short, long, default_value_t = DEFAULT_TOP_STATIONS)]
        top: usize,

        /// How to log the report
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,

        /// Optional: JSON file to write the report to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only include riders of this gender (Male, Female, Other)
        #[arg(long)]
        gender: Option<Gender>,

        /// Only include riders of this type (Subscriber, Customer)
        #[arg(long)]
        user_type: Option<UserType>,

        /// Only include trips starting on this weekday (e.g. Monday)
        #[arg(long)]
        start_day: Option<DayOfWeek>,

        /// Only include trips starting in this part of the day (morning, afternoon, night)
        #[arg(long)]
        day_period: Option<DayPeriod>,

        /// JSON file overriding cleaner settings
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gobike_trips.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gobike_trips.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

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

    match cli.command {
        Commands::Clean {
            input,
            output,
            summary,
            config,
        } => {
            let cleaner = TripCleaner::new(load_config(config.as_deref())?);
            let outcome = cleaner.clean_file(&input)?;

            write_trips(&output, &outcome.trips)?;
            info!(output = %output, rows = outcome.trips.len(), "Cleaned trips written");

            if let Some(summary) = summary {
                append_record(&summary, &outcome.stats)?;
            }
            print_pretty(&outcome.stats);
        }
        Commands::Report {
            input,
            top,
            format,
            output,
            gender,
            user_type,
            start_day,
            day_period,
            config,
        } => {
            let cleaner = TripCleaner::new(load_config(config.as_deref())?);
            let filter = TripFilter {
                member_gender: gender,
                user_type,
                start_day,
                day_period,
                ..TripFilter::default()
            };

            let report = analyze_file(&cleaner, &input, &filter, top)?;

            match format {
                Format::Pretty => print_pretty(&report),
                Format::Json => print_json(&report)?,
            }
            if let Some(path) = output {
                write_json(&path, &report)?;
                info!(path = %path.display(), "Report written");
            }
        }
    }

    Ok(())
}

/// Loads cleaner settings from `path`, or the dataset defaults when absent.
fn load_config(path: Option<&str>) -> Result<CleanerConfig> {
    match path {
        Some(path) => {
            let config = CleanerConfig::load(path)?;
            info!(path, ?config, "Cleaner config loaded");
            Ok(config)
        }
        None => Ok(CleanerConfig::default()),
    }
}
