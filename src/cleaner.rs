//! Turns raw trip rows into typed, enriched [`CleanedTripRecord`]s.
//!
//! Each record is validated in a single pass. The first failing field decides
//! the discard reason, and a discarded record never contributes a partial row.

use std::path::Path;

use chrono::{Datelike, Timelike};
use tracing::{debug, info, warn};

use crate::config::{CleanerConfig, MAX_DURATION_DECIMALS};
use crate::error::{CleanError, RowError};
use crate::parser::{RawTable, parse_integral, parse_timestamp, read_trip_file};
use crate::stats::CleaningStats;
use crate::trip::{CleanedTripRecord, DayOfWeek, DayPeriod, Gender, RawTripRecord, UserType};

/// Cleaned trips together with the counters of the run that produced them.
#[derive(Debug)]
pub struct CleanOutcome {
    pub trips: Vec<CleanedTripRecord>,
    pub stats: CleaningStats,
}

#[derive(Debug, Clone, Default)]
pub struct TripCleaner {
    config: CleanerConfig,
}

impl TripCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    /// Reads and cleans the trip file at `path`.
    pub fn clean_file(&self, path: &Path) -> Result<CleanOutcome, CleanError> {
        let table = read_trip_file(path)?;
        let outcome = self.clean_table(table)?;
        Ok(CleanOutcome {
            stats: outcome.stats.with_source(&path.display().to_string()),
            ..outcome
        })
    }

    /// Cleans a [`RawTable`], counting its undecodable rows as discards.
    pub fn clean_table(&self, table: RawTable) -> Result<CleanOutcome, CleanError> {
        let mut stats = CleaningStats::new();
        for err in &table.unreadable {
            stats.record_discard(err);
        }
        self.clean_into(table.records, stats)
    }

    /// Cleans a sequence of raw records.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::DegenerateResult`] when the input had rows but none
    /// survived. An input with no rows at all yields an empty outcome.
    pub fn clean<I>(&self, records: I) -> Result<CleanOutcome, CleanError>
    where
        I: IntoIterator<Item = RawTripRecord>,
    {
        self.clean_into(records, CleaningStats::new())
    }

    fn clean_into<I>(&self, records: I, mut stats: CleaningStats) -> Result<CleanOutcome, CleanError>
    where
        I: IntoIterator<Item = RawTripRecord>,
    {
        let mut trips = Vec::new();

        for raw in records {
            match clean_record(&raw, &self.config) {
                Ok(trip) => {
                    stats.record_kept();
                    trips.push(trip);
                }
                Err(e) => {
                    debug!(error = %e, "Discarding trip record");
                    stats.record_discard(&e);
                }
            }
        }

        if stats.input_rows == 0 {
            warn!("Trip input contained no rows");
        } else if stats.is_degenerate() {
            return Err(CleanError::DegenerateResult {
                input_rows: stats.input_rows,
            });
        }

        info!(
            input_rows = stats.input_rows,
            cleaned_rows = stats.cleaned_rows,
            discarded_rows = stats.discarded_rows,
            malformed_timestamp = stats.malformed_timestamp,
            malformed_numeric = stats.malformed_numeric,
            null_field = stats.null_field,
            unknown_category = stats.unknown_category,
            malformed_record = stats.malformed_record,
            "Trip cleaning finished"
        );
        if stats.discard_pct() > 50.0 {
            let dominant = stats
                .discards_by_reason()
                .into_iter()
                .max_by_key(|(_, count)| *count);
            if let Some((reason, count)) = dominant {
                warn!(
                    discard_pct = stats.discard_pct(),
                    ?reason,
                    count,
                    "More than half of the trip rows were discarded"
                );
            }
        }

        Ok(CleanOutcome { trips, stats })
    }
}

/// Validates one raw record and derives its cleaned form.
pub fn clean_record(
    raw: &RawTripRecord,
    config: &CleanerConfig,
) -> Result<CleanedTripRecord, RowError> {
    let duration_sec = parse_integral("duration_sec", required(&raw.duration_sec, "duration_sec")?)?;
    if duration_sec < 0 {
        return Err(RowError::MalformedNumeric {
            field: "duration_sec",
            value: duration_sec.to_string(),
        });
    }

    let start_time = parse_timestamp("start_time", required(&raw.start_time, "start_time")?)?;
    let end_time = parse_timestamp("end_time", required(&raw.end_time, "end_time")?)?;

    let start_station_id =
        normalize_station_id("start_station_id", required(&raw.start_station_id, "start_station_id")?)?;
    let start_station_name = required(&raw.start_station_name, "start_station_name")?.to_string();
    let end_station_id =
        normalize_station_id("end_station_id", required(&raw.end_station_id, "end_station_id")?)?;
    let end_station_name = required(&raw.end_station_name, "end_station_name")?.to_string();

    let bike_id = required(&raw.bike_id, "bike_id")?.to_string();
    let user_type: UserType = required(&raw.user_type, "user_type")?.parse()?;

    let birth_year = parse_integral(
        "member_birth_year",
        required(&raw.member_birth_year, "member_birth_year")?,
    )?;
    let age = rider_age(birth_year, config.age_baseline_year).ok_or_else(|| {
        RowError::MalformedNumeric {
            field: "member_birth_year",
            value: birth_year.to_string(),
        }
    })?;

    let member_gender: Gender = required(&raw.member_gender, "member_gender")?.parse()?;

    Ok(CleanedTripRecord {
        duration_mins: duration_mins(duration_sec as u64, config.duration_decimals),
        start_time,
        start_day: DayOfWeek::from(start_time.weekday()),
        end_time,
        end_day: DayOfWeek::from(end_time.weekday()),
        start_station_id,
        start_station_name,
        end_station_id,
        end_station_name,
        bike_id,
        user_type,
        member_gender,
        age,
        day_period: DayPeriod::from_hour(start_time.hour()),
    })
}

/// Returns the trimmed cell, or [`RowError::NullField`] if it is blank.
fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, RowError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(RowError::NullField(field))
}

/// Age in the baseline year. Not clamped: implausible ages are kept as outliers.
/// `None` only if the result does not fit an `i32`.
pub fn rider_age(birth_year: i64, baseline_year: i32) -> Option<i32> {
    i64::from(baseline_year)
        .checked_sub(birth_year)
        .and_then(|age| i32::try_from(age).ok())
}

/// Trip length in minutes, rounded half away from zero to `decimals` places.
pub fn duration_mins(duration_sec: u64, decimals: u32) -> f64 {
    round_half_away(duration_sec as f64 / 60.0, decimals)
}

/// Rounds half away from zero. `decimals` is capped at
/// [`MAX_DURATION_DECIMALS`], past which an `f64` has no precision left.
pub fn round_half_away(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_DURATION_DECIMALS) as i32);
    (value * factor).round() / factor
}

/// Re-serializes a numeric station id without its fractional part:
/// `"141.0"` becomes `"141"`, `"141"` stays `"141"`.
pub fn normalize_station_id(field: &'static str, value: &str) -> Result<String, RowError> {
    Ok(parse_integral(field, value)?.to_string())
}
