//! Record types shared across the trip-reporting pipeline.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the raw trip exports, e.g. `2024-06-03 08:15:00`.
/// A trailing fractional-second part is accepted when present.
pub const RAW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One row deserialized from a raw trip CSV.
///
/// Every field is optional: presence is an admission rule applied by the
/// cleaner, not a parse rule. A file whose header lacks one of these columns
/// entirely fails to deserialize and is skipped as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrip {
    pub ride_id: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub start_station_name: Option<String>,
    pub end_station_name: Option<String>,
    pub member_casual: Option<String>,
}

/// Rider category. `Casual` sorts before `Member` so grouped output follows
/// the lexical order of the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserCategory {
    #[serde(rename = "casual")]
    Casual,
    #[serde(rename = "member")]
    Member,
}

impl UserCategory {
    /// Parses the raw label. Anything other than the two known labels is
    /// rejected; such records never enter the canonical dataset.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "casual" => Some(UserCategory::Casual),
            "member" => Some(UserCategory::Member),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserCategory::Casual => "casual",
            UserCategory::Member => "member",
        }
    }

    /// Binary membership flag: 1 for members, 0 for casual riders.
    pub fn membership_indicator(&self) -> u8 {
        match self {
            UserCategory::Casual => 0,
            UserCategory::Member => 1,
        }
    }
}

/// Day labels in reporting order. The derived `Ord` is the fixed
/// Monday-to-Sunday ordering every daily aggregate is sorted by, so the
/// ordering lives here rather than as a string list at each use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
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

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }

    pub fn label(&self) -> &'static str {
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

    pub fn is_weekend(&self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

/// Month labels in calendar order, used as the sort key for the monthly
/// aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonthOfYear {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthOfYear {
    /// Maps a 1-based calendar month number to its label.
    pub fn from_month_number(month: u32) -> Self {
        match month {
            1 => MonthOfYear::January,
            2 => MonthOfYear::February,
            3 => MonthOfYear::March,
            4 => MonthOfYear::April,
            5 => MonthOfYear::May,
            6 => MonthOfYear::June,
            7 => MonthOfYear::July,
            8 => MonthOfYear::August,
            9 => MonthOfYear::September,
            10 => MonthOfYear::October,
            11 => MonthOfYear::November,
            12 => MonthOfYear::December,
            other => unreachable!("calendar months are 1-12, got {other}"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MonthOfYear::January => "January",
            MonthOfYear::February => "February",
            MonthOfYear::March => "March",
            MonthOfYear::April => "April",
            MonthOfYear::May => "May",
            MonthOfYear::June => "June",
            MonthOfYear::July => "July",
            MonthOfYear::August => "August",
            MonthOfYear::September => "September",
            MonthOfYear::October => "October",
            MonthOfYear::November => "November",
            MonthOfYear::December => "December",
        }
    }
}

/// A validated trip admitted into the canonical dataset.
///
/// Field order is the column order of the cached dataset CSV: the raw
/// columns first, then every derived column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanTrip {
    pub ride_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub start_station_name: String,
    pub end_station_name: String,
    pub member_casual: UserCategory,
    pub trip_duration_minutes: f64,
    pub membership_indicator: u8,
    pub start_hour: u32,
    pub day_of_week: DayOfWeek,
    pub month: MonthOfYear,
    pub date: NaiveDate,
}
