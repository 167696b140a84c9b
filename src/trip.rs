//! Raw and cleaned trip records, and the ordered categorical domains derived
//! while cleaning.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::RowError;

/// One row of the source trip file.
///
/// Every cell is read as optional text; an empty cell is `None`. Typing happens
/// in the cleaner so that a bad cell excludes only its own row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTripRecord {
    pub duration_sec: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_station_id: Option<String>,
    pub start_station_name: Option<String>,
    pub start_station_latitude: Option<String>,
    pub start_station_longitude: Option<String>,
    pub end_station_id: Option<String>,
    pub end_station_name: Option<String>,
    pub end_station_latitude: Option<String>,
    pub end_station_longitude: Option<String>,
    pub bike_id: Option<String>,
    pub user_type: Option<String>,
    pub member_birth_year: Option<String>,
    pub member_gender: Option<String>,
    pub bike_share_for_all_trip: Option<String>,
}

/// A validated trip with its derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedTripRecord {
    pub duration_mins: f64,
    pub start_time: NaiveDateTime,
    pub start_day: DayOfWeek,
    pub end_time: NaiveDateTime,
    pub end_day: DayOfWeek,
    pub start_station_id: String,
    pub start_station_name: String,
    pub end_station_id: String,
    pub end_station_name: String,
    pub bike_id: String,
    pub user_type: UserType,
    pub member_gender: Gender,
    pub age: i32,
    pub day_period: DayPeriod,
}

/// Weekday name, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RowError::UnknownCategory {
                field: "weekday",
                value: s.to_string(),
            })
    }
}

/// Part of the day a trip started in, ordered morning < afternoon < night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Night,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 3] = [DayPeriod::Morning, DayPeriod::Afternoon, DayPeriod::Night];

    /// Buckets an hour of day: 0–11 morning, 12–17 afternoon, 18–23 night.
    /// Anything else falls back to morning.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            12..=17 => DayPeriod::Afternoon,
            18..=23 => DayPeriod::Night,
            _ => DayPeriod::Morning,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Night => "night",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayPeriod {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayPeriod::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RowError::UnknownCategory {
                field: "day_period",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UserType {
    Subscriber,
    Customer,
}

impl UserType {
    pub const ALL: [UserType; 2] = [UserType::Subscriber, UserType::Customer];

    pub fn name(self) -> &'static str {
        match self {
            UserType::Subscriber => "Subscriber",
            UserType::Customer => "Customer",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UserType {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserType::ALL
            .into_iter()
            .find(|u| u.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RowError::UnknownCategory {
                field: "user_type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn name(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gender {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RowError::UnknownCategory {
                field: "member_gender",
                value: s.to_string(),
            })
    }
}
