//! Data types produced by the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

/// `log10` of a [`Summary`]. A statistic that is zero or negative has no
/// logarithm and is `None`, e.g. the `std` of a single trip or a `min` of 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Number of trips for one category value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Number of trips for one (row, column) pair of a cross tabulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosstabCell {
    pub row: String,
    pub column: String,
    pub count: usize,
}

/// Median of a numeric column within one category value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMedian {
    pub value: String,
    pub median: f64,
}

/// Median of a numeric column within one (row, column) pair of categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosstabMedian {
    pub row: String,
    pub column: String,
    pub median: f64,
}

/// Statistics over one set of trips.
#[derive(Debug, Serialize)]
pub struct TripBreakdown {
    pub trips: usize,
    pub duration_mins: Option<Summary>,
    pub age: Option<Summary>,
    /// Durations and ages are right-skewed, so their log scale is reported too.
    pub duration_mins_log10: Option<LogSummary>,
    pub age_log10: Option<LogSummary>,
    pub start_day: Vec<CategoryCount>,
    pub end_day: Vec<CategoryCount>,
    pub day_period: Vec<CategoryCount>,
    pub member_gender: Vec<CategoryCount>,
    pub user_type: Vec<CategoryCount>,
    pub age_duration_correlation: Option<f64>,
    pub median_duration_by_period: Vec<GroupMedian>,
    pub median_duration_by_day: Vec<GroupMedian>,
    pub median_age_by_day: Vec<GroupMedian>,
    pub median_duration_by_user_type_and_period: Vec<CrosstabMedian>,
    pub median_duration_by_user_type_and_day: Vec<CrosstabMedian>,
}

/// Statistics over the trips starting at the busiest stations.
#[derive(Debug, Serialize)]
pub struct StationBreakdown {
    pub stations: Vec<CategoryCount>,
    pub overall: TripBreakdown,
    pub median_age_by_station: Vec<GroupMedian>,
    pub median_duration_by_station: Vec<GroupMedian>,
    pub station_by_start_day: Vec<CrosstabCell>,
    pub station_by_day_period: Vec<CrosstabCell>,
}

/// Complete ridership report for one cleaned dataset.
#[derive(Debug, Serialize)]
pub struct RidershipReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub source: Option<String>,
    pub distinct_start_stations: usize,
    pub all_trips: TripBreakdown,
    pub top_stations: StationBreakdown,
}
