//! Error kinds raised while reading and cleaning trip records.
//!
//! [`CleanError`] is fatal and stops processing. [`RowError`] only excludes the
//! record it was raised for; the cleaner counts it and moves on.

use std::path::PathBuf;

use thiserror::Error;

/// A file- or schema-level failure.
#[derive(Error, Debug)]
pub enum CleanError {
    /// The input source could not be found or opened.
    #[error("cannot read input file '{}'", .path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A column the cleaner needs is absent from the header.
    #[error("input header is missing required column '{0}'")]
    SchemaMismatch(String),
    /// Every row of a non-empty input was discarded.
    #[error("all {input_rows} input rows were discarded; the input format has likely changed")]
    DegenerateResult { input_rows: usize },
    #[error("impossible to read csv input")]
    Csv(#[from] csv::Error),
}

/// Why a single record was excluded from the cleaned table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("'{value}' in column {field} is not a valid timestamp")]
    MalformedTimestamp { field: &'static str, value: String },
    #[error("'{value}' in column {field} is not a valid number")]
    MalformedNumeric { field: &'static str, value: String },
    #[error("column {0} is empty")]
    NullField(&'static str),
    #[error("'{value}' is not a known {field}")]
    UnknownCategory { field: &'static str, value: String },
    #[error("record could not be decoded: {0}")]
    MalformedRecord(String),
}

/// Discard-count bucket for a [`RowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiscardReason {
    MalformedTimestamp,
    MalformedNumeric,
    NullField,
    UnknownCategory,
    MalformedRecord,
}

impl RowError {
    pub fn reason(&self) -> DiscardReason {
        match self {
            RowError::MalformedTimestamp { .. } => DiscardReason::MalformedTimestamp,
            RowError::MalformedNumeric { .. } => DiscardReason::MalformedNumeric,
            RowError::NullField(_) => DiscardReason::NullField,
            RowError::UnknownCategory { .. } => DiscardReason::UnknownCategory,
            RowError::MalformedRecord(_) => DiscardReason::MalformedRecord,
        }
    }
}
