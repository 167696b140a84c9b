//! Output formatting and persistence for cleaned trips and run statistics.
//!
//! Supports pretty-printing, JSON serialization, cleaned CSV export and CSV
//! append of per-run counters.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::stats::CleaningStats;
use crate::trip::CleanedTripRecord;
use csv::WriterBuilder;
use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    info!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`CleaningStats`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, stats: &CleaningStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(stats)?;
    writer.flush()?;

    Ok(())
}

/// Writes cleaned trips to a new CSV file at `path`, replacing any existing one.
pub fn write_trips(path: &str, trips: &[CleanedTripRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(File::create(path)?);

    for trip in trips {
        writer.serialize(trip)?;
    }
    writer.flush()?;

    debug!(path, rows = trips.len(), "Cleaned trips written");
    Ok(())
}
