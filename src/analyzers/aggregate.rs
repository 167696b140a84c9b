use std::collections::BTreeMap;

use crate::analyzers::types::{CrosstabMedian, GroupMedian, LogSummary, Summary};
use crate::analyzers::utility::{mean, median, quantile, stddev};
use crate::trip::CleanedTripRecord;

/// Count, mean, sample standard deviation, min, quartiles and max of `values`.
///
/// Returns `None` for empty input.
pub fn describe(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let avg = mean(&sorted);
    Some(Summary {
        count: sorted.len(),
        mean: avg,
        std: stddev(&sorted, avg),
        min: sorted[0],
        p25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        p75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

impl Summary {
    /// Applies `log10` to every statistic except `count`.
    ///
    /// Statistics that are not positive map to `None` rather than `-inf` or
    /// `NaN`. A constant series always has a `None` std.
    pub fn log10(&self) -> LogSummary {
        LogSummary {
            count: self.count,
            mean: positive_log10(self.mean),
            std: positive_log10(self.std),
            min: positive_log10(self.min),
            p25: positive_log10(self.p25),
            median: positive_log10(self.median),
            p75: positive_log10(self.p75),
            max: positive_log10(self.max),
        }
    }
}

fn positive_log10(value: f64) -> Option<f64> {
    (value > 0.0).then(|| value.log10())
}

/// Extracts one numeric column.
pub fn column<F>(trips: &[CleanedTripRecord], value: F) -> Vec<f64>
where
    F: Fn(&CleanedTripRecord) -> f64,
{
    trips.iter().map(value).collect()
}

/// Median of `value` per `key`, in key order.
pub fn median_by<K, KF, VF>(trips: &[CleanedTripRecord], key: KF, value: VF) -> Vec<(K, f64)>
where
    K: Ord,
    KF: Fn(&CleanedTripRecord) -> K,
    VF: Fn(&CleanedTripRecord) -> f64,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for trip in trips {
        groups.entry(key(trip)).or_default().push(value(trip));
    }

    groups
        .into_iter()
        .map(|(k, values)| (k, median(&values)))
        .collect()
}

/// [`median_by`] with the keys rendered for a report.
pub fn group_medians<K, KF, VF>(trips: &[CleanedTripRecord], key: KF, value: VF) -> Vec<GroupMedian>
where
    K: Ord + ToString,
    KF: Fn(&CleanedTripRecord) -> K,
    VF: Fn(&CleanedTripRecord) -> f64,
{
    median_by(trips, key, value)
        .into_iter()
        .map(|(k, median)| GroupMedian {
            value: k.to_string(),
            median,
        })
        .collect()
}

/// Median of `value` per (`row`, `column`) pair, ordered by row then column.
pub fn crosstab_medians<R, C, RF, CF, VF>(
    trips: &[CleanedTripRecord],
    row: RF,
    column: CF,
    value: VF,
) -> Vec<CrosstabMedian>
where
    R: Ord + ToString,
    C: Ord + ToString,
    RF: Fn(&CleanedTripRecord) -> R,
    CF: Fn(&CleanedTripRecord) -> C,
    VF: Fn(&CleanedTripRecord) -> f64,
{
    median_by(trips, |t| (row(t), column(t)), value)
        .into_iter()
        .map(|((r, c), median)| CrosstabMedian {
            row: r.to_string(),
            column: c.to_string(),
            median,
        })
        .collect()
}
