use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::analyzers::aggregate::{column, crosstab_medians, describe, group_medians};
use crate::analyzers::groups::{
    TripFilter, crosstab, distinct_start_stations, ordered_counts, to_category_counts,
    to_crosstab_cells, top_stations,
};
use crate::analyzers::types::{RidershipReport, StationBreakdown, TripBreakdown};
use crate::analyzers::utility::pearson;
use crate::cleaner::TripCleaner;
use crate::trip::{CleanedTripRecord, DayOfWeek, DayPeriod, Gender, UserType};

/// Number of busiest start stations the station breakdown covers by default.
pub const DEFAULT_TOP_STATIONS: usize = 10;

/// Cleans the trip file at `input`, keeps the trips `filter` accepts, and
/// builds a [`RidershipReport`] over them.
#[tracing::instrument(skip(cleaner, filter), fields(input = %input.display()))]
pub fn analyze_file(
    cleaner: &TripCleaner,
    input: &Path,
    filter: &TripFilter,
    top_n: usize,
) -> Result<RidershipReport> {
    let outcome = cleaner.clean_file(input)?;
    let trips = filter.apply(&outcome.trips);

    info!(
        cleaned = outcome.trips.len(),
        selected = trips.len(),
        "Building ridership report"
    );

    let mut report = build_report(&trips, top_n);
    report.source = outcome.stats.source;
    Ok(report)
}

/// Summarises all trips, then the subset starting at the `top_n` busiest stations.
pub fn build_report(trips: &[CleanedTripRecord], top_n: usize) -> RidershipReport {
    let stations = top_stations(trips, top_n);
    let busiest = TripFilter::default()
        .start_stations(stations.iter().map(|(name, _)| name.clone()))
        .apply(trips);

    RidershipReport {
        schema_version: 1,
        generated_at: Utc::now(),
        source: None,
        distinct_start_stations: distinct_start_stations(trips),
        all_trips: breakdown(trips),
        top_stations: StationBreakdown {
            stations: to_category_counts(stations),
            median_age_by_station: group_medians(
                &busiest,
                |t| t.start_station_name.clone(),
                |t| t.age as f64,
            ),
            median_duration_by_station: group_medians(
                &busiest,
                |t| t.start_station_name.clone(),
                |t| t.duration_mins,
            ),
            station_by_start_day: to_crosstab_cells(crosstab(
                &busiest,
                |t| t.start_station_name.clone(),
                |t| t.start_day,
            )),
            station_by_day_period: to_crosstab_cells(crosstab(
                &busiest,
                |t| t.start_station_name.clone(),
                |t| t.day_period,
            )),
            overall: breakdown(&busiest),
        },
    }
}

/// Summaries, category counts and group medians for one set of trips.
pub fn breakdown(trips: &[CleanedTripRecord]) -> TripBreakdown {
    let durations = column(trips, |t| t.duration_mins);
    let ages = column(trips, |t| t.age as f64);

    let duration_summary = describe(&durations);
    let age_summary = describe(&ages);

    TripBreakdown {
        trips: trips.len(),
        duration_mins_log10: duration_summary.as_ref().map(|s| s.log10()),
        age_log10: age_summary.as_ref().map(|s| s.log10()),
        duration_mins: duration_summary,
        age: age_summary,
        start_day: to_category_counts(ordered_counts(trips, &DayOfWeek::ALL, |t| t.start_day)),
        end_day: to_category_counts(ordered_counts(trips, &DayOfWeek::ALL, |t| t.end_day)),
        day_period: to_category_counts(ordered_counts(trips, &DayPeriod::ALL, |t| t.day_period)),
        member_gender: to_category_counts(ordered_counts(trips, &Gender::ALL, |t| t.member_gender)),
        user_type: to_category_counts(ordered_counts(trips, &UserType::ALL, |t| t.user_type)),
        age_duration_correlation: pearson(&ages, &durations),
        median_duration_by_period: group_medians(trips, |t| t.day_period, |t| t.duration_mins),
        median_duration_by_day: group_medians(trips, |t| t.start_day, |t| t.duration_mins),
        median_age_by_day: group_medians(trips, |t| t.start_day, |t| t.age as f64),
        median_duration_by_user_type_and_period: crosstab_medians(
            trips,
            |t| t.user_type,
            |t| t.day_period,
            |t| t.duration_mins,
        ),
        median_duration_by_user_type_and_day: crosstab_medians(
            trips,
            |t| t.user_type,
            |t| t.start_day,
            |t| t.duration_mins,
        ),
    }
}
