//! Grouping and filtering over cleaned trips.

use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;

use crate::analyzers::types::{CategoryCount, CrosstabCell};
use crate::trip::{CleanedTripRecord, DayOfWeek, DayPeriod, Gender, UserType};

/// Trips per key, most frequent first. Equal counts keep key order.
pub fn value_counts<K, F>(trips: &[CleanedTripRecord], key: F) -> Vec<(K, usize)>
where
    K: Ord,
    F: Fn(&CleanedTripRecord) -> K,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for trip in trips {
        *counts.entry(key(trip)).or_default() += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Trips per value of an ordered category, in `domain` order, zeros included.
pub fn ordered_counts<K, F>(trips: &[CleanedTripRecord], domain: &[K], key: F) -> Vec<(K, usize)>
where
    K: Copy + PartialEq,
    F: Fn(&CleanedTripRecord) -> K,
{
    domain
        .iter()
        .map(|&value| (value, trips.iter().filter(|&t| key(t) == value).count()))
        .collect()
}

pub fn to_category_counts<K: ToString>(counts: Vec<(K, usize)>) -> Vec<CategoryCount> {
    counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// The `n` start stations with the most trips.
pub fn top_stations(trips: &[CleanedTripRecord], n: usize) -> Vec<(String, usize)> {
    let mut counts = value_counts(trips, |t| t.start_station_name.clone());
    counts.truncate(n);
    counts
}

pub fn distinct_start_stations(trips: &[CleanedTripRecord]) -> usize {
    trips
        .iter()
        .map(|t| t.start_station_name.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Trips per (row key, column key) pair, ordered by row then column.
pub fn crosstab<R, C, RF, CF>(
    trips: &[CleanedTripRecord],
    row: RF,
    column: CF,
) -> BTreeMap<(R, C), usize>
where
    R: Ord,
    C: Ord,
    RF: Fn(&CleanedTripRecord) -> R,
    CF: Fn(&CleanedTripRecord) -> C,
{
    let mut cells = BTreeMap::new();
    for trip in trips {
        *cells.entry((row(trip), column(trip))).or_default() += 1;
    }
    cells
}

pub fn to_crosstab_cells<R: ToString, C: ToString>(
    cells: BTreeMap<(R, C), usize>,
) -> Vec<CrosstabCell> {
    cells
        .into_iter()
        .map(|((row, column), count)| CrosstabCell {
            row: row.to_string(),
            column: column.to_string(),
            count,
        })
        .collect()
}

/// Criteria a trip must meet to be kept. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    pub member_gender: Option<Gender>,
    pub user_type: Option<UserType>,
    pub start_stations: Option<HashSet<String>>,
    pub start_day: Option<DayOfWeek>,
    pub end_day: Option<DayOfWeek>,
    pub day_period: Option<DayPeriod>,
    pub age: Option<RangeInclusive<i32>>,
    pub duration_mins: Option<RangeInclusive<f64>>,
}

impl TripFilter {
    pub fn gender(mut self, gender: Gender) -> Self {
        self.member_gender = Some(gender);
        self
    }

    pub fn user_type(mut self, user_type: UserType) -> Self {
        self.user_type = Some(user_type);
        self
    }

    pub fn start_stations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.start_stations = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn start_day(mut self, day: DayOfWeek) -> Self {
        self.start_day = Some(day);
        self
    }

    pub fn end_day(mut self, day: DayOfWeek) -> Self {
        self.end_day = Some(day);
        self
    }

    pub fn day_period(mut self, period: DayPeriod) -> Self {
        self.day_period = Some(period);
        self
    }

    pub fn age(mut self, range: RangeInclusive<i32>) -> Self {
        self.age = Some(range);
        self
    }

    pub fn duration_mins(mut self, range: RangeInclusive<f64>) -> Self {
        self.duration_mins = Some(range);
        self
    }

    pub fn matches(&self, trip: &CleanedTripRecord) -> bool {
        self.member_gender.is_none_or(|g| trip.member_gender == g)
            && self.user_type.is_none_or(|u| trip.user_type == u)
            && self
                .start_stations
                .as_ref()
                .is_none_or(|s| s.contains(&trip.start_station_name))
            && self.start_day.is_none_or(|d| trip.start_day == d)
            && self.end_day.is_none_or(|d| trip.end_day == d)
            && self.day_period.is_none_or(|p| trip.day_period == p)
            && self.age.as_ref().is_none_or(|r| r.contains(&trip.age))
            && self
                .duration_mins
                .as_ref()
                .is_none_or(|r| r.contains(&trip.duration_mins))
    }

    pub fn apply(&self, trips: &[CleanedTripRecord]) -> Vec<CleanedTripRecord> {
        trips.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}
