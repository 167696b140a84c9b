//! Shared builders for unit tests.

use chrono::NaiveDate;

use crate::trip::{CleanedTripRecord, DayOfWeek, DayPeriod, Gender, UserType};

/// A subscriber trip on 2019-02-04 (a Monday) with the given grouping fields.
/// Station id is derived from the name's length so equal names share an id.
pub fn trip(
    station: &str,
    start_day: DayOfWeek,
    day_period: DayPeriod,
    duration_mins: f64,
    age: i32,
) -> CleanedTripRecord {
    let start_time = NaiveDate::from_ymd_opt(2019, 2, 4)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid test timestamp");

    CleanedTripRecord {
        duration_mins,
        start_time,
        start_day,
        end_time: start_time,
        end_day: start_day,
        start_station_id: station.len().to_string(),
        start_station_name: station.to_string(),
        end_station_id: "1".to_string(),
        end_station_name: "Berry St at 4th St".to_string(),
        bike_id: "4902".to_string(),
        user_type: UserType::Subscriber,
        member_gender: Gender::Male,
        age,
        day_period,
    }
}
