use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DiscardReason, RowError};

/// Counters for one cleaning run. Flat so it can be appended as a CSV row.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningStats {
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,
    pub input_rows: usize,
    pub cleaned_rows: usize,
    pub discarded_rows: usize,

    // discard reasons
    pub malformed_timestamp: usize,
    pub malformed_numeric: usize,
    pub null_field: usize,
    pub unknown_category: usize,
    pub malformed_record: usize,
}

impl CleaningStats {
    pub fn new() -> Self {
        CleaningStats {
            timestamp: Utc::now(),
            ..Default::default()
        }
    }

    pub fn record_kept(&mut self) {
        self.input_rows += 1;
        self.cleaned_rows += 1;
    }

    pub fn record_discard(&mut self, err: &RowError) {
        self.input_rows += 1;
        self.discarded_rows += 1;

        match err.reason() {
            DiscardReason::MalformedTimestamp => self.malformed_timestamp += 1,
            DiscardReason::MalformedNumeric => self.malformed_numeric += 1,
            DiscardReason::NullField => self.null_field += 1,
            DiscardReason::UnknownCategory => self.unknown_category += 1,
            DiscardReason::MalformedRecord => self.malformed_record += 1,
        }
    }

    /// Discard counts per reason, in [`DiscardReason`] order.
    pub fn discards_by_reason(&self) -> [(DiscardReason, usize); 5] {
        [
            (DiscardReason::MalformedTimestamp, self.malformed_timestamp),
            (DiscardReason::MalformedNumeric, self.malformed_numeric),
            (DiscardReason::NullField, self.null_field),
            (DiscardReason::UnknownCategory, self.unknown_category),
            (DiscardReason::MalformedRecord, self.malformed_record),
        ]
    }

    /// True when rows came in but none survived.
    pub fn is_degenerate(&self) -> bool {
        self.input_rows > 0 && self.cleaned_rows == 0
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn discard_pct(&self) -> f64 {
        Self::pct(self.discarded_rows, self.input_rows)
    }

    /// Set the input path the run read from
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}
