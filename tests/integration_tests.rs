use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use gobike_trips::analyzers::groups::TripFilter;
use gobike_trips::analyzers::report::analyze_file;
use gobike_trips::cleaner::TripCleaner;
use gobike_trips::error::CleanError;
use gobike_trips::trip::{DayOfWeek, DayPeriod, Gender, UserType};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/trips_sample.csv")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(name)
}

#[test]
fn test_full_pipeline() {
    let outcome = TripCleaner::default()
        .clean_file(&fixture())
        .expect("Failed to clean fixture");

    assert_eq!(outcome.stats.input_rows, 11);
    assert_eq!(outcome.trips.len(), 7);
    assert_eq!(outcome.stats.discarded_rows, 4);
    assert_eq!(outcome.stats.null_field, 2);
    assert_eq!(outcome.stats.malformed_timestamp, 1);
    assert_eq!(outcome.stats.malformed_numeric, 1);
    assert_eq!(
        outcome.trips.len() + outcome.stats.discarded_rows,
        outcome.stats.input_rows
    );
    assert!(outcome.stats.source.is_some());
}

#[test]
fn test_first_trip_is_derived() {
    let outcome = TripCleaner::default().clean_file(&fixture()).unwrap();
    let trip = &outcome.trips[0];

    assert_eq!(trip.duration_mins, 1.02);
    assert_eq!(trip.age, 30);
    assert_eq!(trip.start_day, DayOfWeek::Friday);
    assert_eq!(trip.day_period, DayPeriod::Morning);
    assert_eq!(trip.start_station_id, "30");
    assert_eq!(trip.end_station_id, "81");
    assert_eq!(trip.user_type, UserType::Subscriber);
    assert_eq!(trip.member_gender, Gender::Male);
}

#[test]
fn test_derived_fields_across_fixture() {
    let outcome = TripCleaner::default().clean_file(&fixture()).unwrap();
    let trips = &outcome.trips;

    let periods: Vec<_> = trips.iter().map(|t| t.day_period).collect();
    assert_eq!(
        periods,
        vec![
            DayPeriod::Morning,
            DayPeriod::Afternoon,
            DayPeriod::Afternoon,
            DayPeriod::Afternoon,
            DayPeriod::Night,
            DayPeriod::Night,
            DayPeriod::Night,
        ]
    );

    // Overnight trips end on the following day.
    assert_eq!(trips[1].start_day, DayOfWeek::Thursday);
    assert_eq!(trips[1].end_day, DayOfWeek::Friday);

    assert_eq!(trips[1].duration_mins, 869.75);
    assert_eq!(trips[3].duration_mins, 608.17);
    assert_eq!(trips[4].duration_mins, 26.42);
    assert_eq!(trips[4].start_station_id, "7");
    assert_eq!(trips[6].start_station_id, "300");

    assert!(trips.iter().all(|t| t.duration_mins >= 0.0));
    assert!(trips.iter().all(|t| !t.start_station_name.is_empty()));
}

#[test]
fn test_gzip_input_matches_plain() {
    let path = temp_path("gobike_trips_it_sample.csv.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&std::fs::read(fixture()).unwrap())
        .unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();

    let plain = TripCleaner::default().clean_file(&fixture()).unwrap();
    let gzipped = TripCleaner::default().clean_file(&path).unwrap();

    assert_eq!(plain.trips, gzipped.trips);
    assert_eq!(plain.stats.discarded_rows, gzipped.stats.discarded_rows);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_all_rows_discarded_is_degenerate() {
    let path = temp_path("gobike_trips_it_degenerate.csv");
    let content = std::fs::read_to_string(fixture()).unwrap();
    let header = content.lines().next().unwrap();
    std::fs::write(
        &path,
        format!(
            "{header}\n\
             600,not-a-time,2019-03-01 00:07:59,50.0,A,0,0,60.0,B,0,0,1,Subscriber,1990,Female,No\n\
             600,2019-03-01 00:00:00,2019-03-01 00:07:59,50.0,A,0,0,60.0,B,0,0,1,Subscriber,,,No\n"
        ),
    )
    .unwrap();

    let err = TripCleaner::default().clean_file(&path).unwrap_err();
    assert!(matches!(err, CleanError::DegenerateResult { input_rows: 2 }));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_column_is_fatal() {
    let path = temp_path("gobike_trips_it_schema.csv");
    std::fs::write(&path, "duration_sec,start_time,end_time\n61,a,b\n").unwrap();

    let err = TripCleaner::default().clean_file(&path).unwrap_err();
    assert!(matches!(err, CleanError::SchemaMismatch(ref c) if c == "start_station_id"));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_input_is_fatal() {
    let err = TripCleaner::default()
        .clean_file(Path::new("/nonexistent/201902-fordgobike-tripdata.csv"))
        .unwrap_err();
    assert!(matches!(err, CleanError::MissingInputFile { .. }));
}

#[test]
fn test_report_from_file() {
    let report = analyze_file(
        &TripCleaner::default(),
        &fixture(),
        &TripFilter::default(),
        3,
    )
    .unwrap();

    assert_eq!(report.all_trips.trips, 7);
    assert_eq!(report.distinct_start_stations, 7);
    assert_eq!(report.top_stations.stations.len(), 3);
    assert_eq!(report.top_stations.overall.trips, 3);

    let night = report
        .all_trips
        .day_period
        .iter()
        .find(|c| c.value == "night")
        .unwrap();
    assert_eq!(night.count, 3);
}

#[test]
fn test_report_with_rider_filter() {
    let filter = TripFilter::default().user_type(UserType::Customer);
    let report = analyze_file(&TripCleaner::default(), &fixture(), &filter, 10).unwrap();

    assert_eq!(report.all_trips.trips, 2);
    assert!(report.all_trips.user_type.iter().all(|c| {
        c.value == "Customer" || c.count == 0
    }));
}
