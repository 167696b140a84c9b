//! CSV reader for raw trip files, plus the cell parsers the cleaner types
//! fields with.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::error::{CleanError, RowError};
use crate::trip::RawTripRecord;

/// Columns that must be present in the header. Coordinates and
/// `bike_share_for_all_trip` are optional since nothing downstream reads them.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "duration_sec",
    "start_time",
    "end_time",
    "start_station_id",
    "start_station_name",
    "end_station_id",
    "end_station_name",
    "bike_id",
    "user_type",
    "member_birth_year",
    "member_gender",
];

const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Records read from one input, before cleaning.
#[derive(Debug, Default)]
pub struct RawTable {
    pub records: Vec<RawTripRecord>,
    /// Rows the CSV layer could not decode at all.
    pub unreadable: Vec<RowError>,
}

impl RawTable {
    /// Total data rows seen, decoded or not.
    pub fn len(&self) -> usize {
        self.records.len() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Opens `path` for reading, transparently gunzipping `.gz` files.
///
/// # Errors
///
/// Returns [`CleanError::MissingInputFile`] if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>, CleanError> {
    let file = File::open(path).map_err(|source| CleanError::MissingInputFile {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!(path = %path.display(), "Reading gzip-compressed input");
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads the trip file at `path`. The file handle is dropped before returning.
#[tracing::instrument(fields(path = %path.display()))]
pub fn read_trip_file(path: &Path) -> Result<RawTable, CleanError> {
    let input = open_input(path)?;
    read_trips(input)
}

/// Decodes every row of a comma-separated trip source.
///
/// # Errors
///
/// Fails with [`CleanError::SchemaMismatch`] if a required column is absent, or
/// [`CleanError::Csv`] on an I/O failure mid-read. Rows that merely fail to
/// decode are kept in [`RawTable::unreadable`].
pub fn read_trips<R: Read>(input: R) -> Result<RawTable, CleanError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(input);

    check_headers(rdr.headers()?)?;

    let mut table = RawTable::default();
    for result in rdr.deserialize::<RawTripRecord>() {
        match result {
            Ok(record) => table.records.push(record),
            Err(e) if e.is_io_error() => return Err(CleanError::Csv(e)),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable trip row");
                table.unreadable.push(RowError::MalformedRecord(e.to_string()));
            }
        }
    }

    debug!(
        records = table.records.len(),
        unreadable = table.unreadable.len(),
        "Trip file read"
    );
    Ok(table)
}

/// Checks that every column in [`REQUIRED_COLUMNS`] is in the header.
pub fn check_headers(headers: &StringRecord) -> Result<(), CleanError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CleanError::SchemaMismatch(column.to_string()));
        }
    }
    Ok(())
}

/// Parses an ISO-like timestamp such as `2019-02-28 17:32:10.1450`.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, RowError> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| RowError::MalformedTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Parses a whole number that may be written with a zero fraction (`"1984.0"`).
pub fn parse_integral(field: &'static str, value: &str) -> Result<i64, RowError> {
    let value = value.trim();
    let malformed = || RowError::MalformedNumeric {
        field,
        value: value.to_string(),
    };

    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }

    let n: f64 = value.parse().map_err(|_| malformed())?;
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Ok(n as i64)
    } else {
        Err(malformed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const HEADER: &str = "duration_sec,start_time,end_time,start_station_id,start_station_name,start_station_latitude,start_station_longitude,end_station_id,end_station_name,end_station_latitude,end_station_longitude,bike_id,user_type,member_birth_year,member_gender,bike_share_for_all_trip";

    #[test]
    fn test_read_trips_decodes_rows() {
        let data = format!(
            "{HEADER}\n\
             52185,2019-02-28 17:32:10.1450,2019-03-01 08:01:55.9750,21.0,Montgomery St BART Station (Market St at 2nd St),37.789625,-122.400811,13.0,Commercial St at Montgomery St,37.794231,-122.402923,4902,Customer,1984.0,Male,No\n"
        );
        let table = read_trips(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        let record = &table.records[0];
        assert_eq!(record.duration_sec.as_deref(), Some("52185"));
        assert_eq!(record.start_station_id.as_deref(), Some("21.0"));
        assert_eq!(record.member_gender.as_deref(), Some("Male"));
    }

    #[test]
    fn test_empty_cells_are_none() {
        let data = format!(
            "{HEADER}\n\
             61,2019-02-01 08:15:00,2019-02-01 08:16:01,,,,,,,,,4902,Subscriber,,,No\n"
        );
        let table = read_trips(data.as_bytes()).unwrap();
        let record = &table.records[0];

        assert!(record.start_station_id.is_none());
        assert!(record.member_birth_year.is_none());
        assert!(record.member_gender.is_none());
    }

    #[test]
    fn test_short_row_reads_as_nulls() {
        let data = format!("{HEADER}\n61,2019-02-01 08:15:00\n");
        let table = read_trips(data.as_bytes()).unwrap();

        assert_eq!(table.records.len(), 1);
        assert!(table.records[0].end_time.is_none());
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let data = format!(
            "{HEADER},rental_access_method\n\
             61,2019-02-01 08:15:00,2019-02-01 08:16:01,30.0,A,0,0,31.0,B,0,0,1,Subscriber,1989,Male,No,app\n"
        );
        let table = read_trips(data.as_bytes()).unwrap();
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let data = "duration_sec,start_time,end_time,start_station_id,start_station_name,end_station_id,end_station_name,bike_id,user_type,member_birth_year,member_gender\n\
                    61,2019-02-01 08:15:00,2019-02-01 08:16:01,30.0,A,31.0,B,1,Subscriber,1989,Male\n";
        let table = read_trips(data.as_bytes()).unwrap();

        assert_eq!(table.records.len(), 1);
        assert!(table.records[0].start_station_latitude.is_none());
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let data = "duration_sec,start_time\n61,2019-02-01 08:15:00\n";
        let err = read_trips(data.as_bytes()).unwrap_err();

        match err {
            CleanError::SchemaMismatch(column) => assert_eq!(column, "end_time"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = read_trips(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_invalid_utf8_row_is_unreadable() {
        let mut data = format!("{HEADER}\n").into_bytes();
        data.extend_from_slice(b"61,2019-02-01 08:15:00,2019-02-01 08:16:01,30.0,\xFF\xFE,0,0,31.0,B,0,0,1,Subscriber,1989,Male,No\n");

        let table = read_trips(data.as_slice()).unwrap();
        assert_eq!(table.records.len(), 0);
        assert_eq!(table.unreadable.len(), 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = read_trip_file(Path::new("/nonexistent/trips.csv")).unwrap_err();
        assert!(matches!(err, CleanError::MissingInputFile { .. }));
    }

    #[test]
    fn test_parse_timestamp_with_fraction() {
        let ts = parse_timestamp("start_time", "2019-02-28 17:32:10.1450").unwrap();
        assert_eq!(ts.hour(), 17);
        assert_eq!(ts.day(), 28);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("start_time", "2019-02-01 08:15:00").is_ok());
        assert!(parse_timestamp("start_time", "2019-02-01T08:15:00").is_ok());
        assert!(parse_timestamp("start_time", "2019-02-01 08:15").is_ok());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("end_time", "not a time").unwrap_err();
        assert_eq!(
            err,
            RowError::MalformedTimestamp {
                field: "end_time",
                value: "not a time".to_string()
            }
        );
        assert!(parse_timestamp("end_time", "2019-02-30 08:15:00").is_err());
    }

    #[test]
    fn test_parse_integral() {
        assert_eq!(parse_integral("member_birth_year", "1984"), Ok(1984));
        assert_eq!(parse_integral("member_birth_year", "1984.0"), Ok(1984));
        assert_eq!(parse_integral("start_station_id", " 141.0 "), Ok(141));
        assert!(parse_integral("start_station_id", "141.5").is_err());
        assert!(parse_integral("start_station_id", "abc").is_err());
        assert!(parse_integral("start_station_id", "NaN").is_err());
    }
}
