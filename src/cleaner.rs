//! Record validation: turns raw rows into canonical trips.
//!
//! Cleaning is a pure, record-at-a-time transformation. Rules are applied
//! in a fixed order per record: key presence, timestamp parse and duration
//! bounds, station-name sentinel fill, user-category check. Records failing
//! a rule are dropped and counted, never clamped or repaired.

use std::path::Path;

use anyhow::Result;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::info;

use crate::loader;
use crate::records::{CleanTrip, DayOfWeek, MonthOfYear, RAW_TIMESTAMP_FORMAT, RawTrip, UserCategory};

/// Longest admissible trip: 24 hours, in minutes.
const MAX_TRIP_MINUTES: f64 = 1440.0;

/// Sentinel station name standing in for missing or empty values.
pub const UNKNOWN_STATION: &str = "Unknown";

/// Per-file admission counts. Logged after each file and appendable to a
/// data-quality CSV via [`crate::output::append_record`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanCounts {
    pub file: String,
    pub rows_read: usize,
    pub admitted: usize,
    pub dropped_missing_key: usize,
    pub dropped_duration: usize,
    pub dropped_category: usize,
}

enum Reject {
    /// Identifier or timestamp missing, or a timestamp that fails to parse.
    MissingKey,
    /// Duration not in (0, 1440] minutes.
    Duration,
    /// User category is neither `member` nor `casual`.
    Category,
}

/// Applies the admission rules to one raw record. Pure and stateless.
pub fn clean_trip(raw: &RawTrip) -> Option<CleanTrip> {
    admit(raw).ok()
}

/// Reads and cleans one raw file, returning admitted trips in row order
/// together with the per-file counts.
pub fn clean_file(path: &Path) -> Result<(Vec<CleanTrip>, CleanCounts)> {
    let raws = loader::read_raw_trips(path)?;

    let mut counts = CleanCounts {
        file: path.display().to_string(),
        rows_read: raws.len(),
        ..Default::default()
    };

    let mut trips = Vec::with_capacity(raws.len());
    for raw in &raws {
        match admit(raw) {
            Ok(trip) => {
                trips.push(trip);
                counts.admitted += 1;
            }
            Err(Reject::MissingKey) => counts.dropped_missing_key += 1,
            Err(Reject::Duration) => counts.dropped_duration += 1,
            Err(Reject::Category) => counts.dropped_category += 1,
        }
    }

    info!(
        file = %path.display(),
        rows = counts.rows_read,
        admitted = counts.admitted,
        "Trip file cleaned"
    );

    Ok((trips, counts))
}

fn admit(raw: &RawTrip) -> Result<CleanTrip, Reject> {
    let ride_id = non_empty(raw.ride_id.as_deref())
        .ok_or(Reject::MissingKey)?
        .to_string();
    let started_at = parse_timestamp(raw.started_at.as_deref()).ok_or(Reject::MissingKey)?;
    let ended_at = parse_timestamp(raw.ended_at.as_deref()).ok_or(Reject::MissingKey)?;

    let trip_duration_minutes = (ended_at - started_at).num_seconds() as f64 / 60.0;
    if trip_duration_minutes <= 0.0 || trip_duration_minutes > MAX_TRIP_MINUTES {
        return Err(Reject::Duration);
    }

    let start_station_name = station_or_unknown(raw.start_station_name.as_deref());
    let end_station_name = station_or_unknown(raw.end_station_name.as_deref());

    let member_casual = raw
        .member_casual
        .as_deref()
        .and_then(UserCategory::parse)
        .ok_or(Reject::Category)?;

    Ok(CleanTrip {
        ride_id,
        started_at,
        ended_at,
        start_station_name,
        end_station_name,
        member_casual,
        trip_duration_minutes,
        membership_indicator: member_casual.membership_indicator(),
        start_hour: started_at.hour(),
        day_of_week: DayOfWeek::from_weekday(started_at.weekday()),
        month: MonthOfYear::from_month_number(started_at.month()),
        date: started_at.date(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(non_empty(value)?, RAW_TIMESTAMP_FORMAT).ok()
}

fn station_or_unknown(value: Option<&str>) -> String {
    match non_empty(value) {
        Some(name) => name.to_string(),
        None => UNKNOWN_STATION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{DayOfWeek, MonthOfYear};
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn raw(id: &str, started: &str, ended: &str, category: &str) -> RawTrip {
        RawTrip {
            ride_id: Some(id.to_string()),
            started_at: Some(started.to_string()),
            ended_at: Some(ended.to_string()),
            start_station_name: Some("Clark St & Lake St".to_string()),
            end_station_name: Some("State St & Harrison St".to_string()),
            member_casual: Some(category.to_string()),
        }
    }

    #[test]
    fn test_admitted_trip_derived_fields() {
        let trip = clean_trip(&raw(
            "R1",
            "2024-06-03 08:15:00",
            "2024-06-03 08:45:00",
            "member",
        ))
        .unwrap();

        assert_eq!(trip.trip_duration_minutes, 30.0);
        assert_eq!(trip.membership_indicator, 1);
        assert_eq!(trip.start_hour, 8);
        assert_eq!(trip.day_of_week, DayOfWeek::Monday);
        assert_eq!(trip.month, MonthOfYear::June);
        assert_eq!(trip.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(trip.start_station_name, "Clark St & Lake St");
    }

    #[test]
    fn test_casual_indicator_zero() {
        let trip = clean_trip(&raw(
            "R1",
            "2024-06-08 10:00:00",
            "2024-06-08 10:20:00",
            "casual",
        ))
        .unwrap();
        assert_eq!(trip.membership_indicator, 0);
        assert_eq!(trip.day_of_week, DayOfWeek::Saturday);
    }

    #[test]
    fn test_missing_keys_dropped() {
        let mut no_id = raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:30:00", "member");
        no_id.ride_id = None;
        assert!(clean_trip(&no_id).is_none());

        let mut empty_id = raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:30:00", "member");
        empty_id.ride_id = Some(String::new());
        assert!(clean_trip(&empty_id).is_none());

        let mut no_start = raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:30:00", "member");
        no_start.started_at = None;
        assert!(clean_trip(&no_start).is_none());

        let mut no_end = raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:30:00", "member");
        no_end.ended_at = None;
        assert!(clean_trip(&no_end).is_none());
    }

    #[test]
    fn test_unparseable_timestamp_dropped() {
        assert!(clean_trip(&raw("R1", "06/03/2024 08:00", "2024-06-03 08:30:00", "member")).is_none());
    }

    #[test]
    fn test_fractional_seconds_accepted() {
        let trip = clean_trip(&raw(
            "R1",
            "2024-06-03 08:00:00.123",
            "2024-06-03 08:30:00.123",
            "member",
        ));
        assert!(trip.is_some());
    }

    #[test]
    fn test_duration_bounds() {
        // Zero-length trip.
        assert!(clean_trip(&raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:00:00", "member")).is_none());
        // Negative duration.
        assert!(clean_trip(&raw("R1", "2024-06-03 09:00:00", "2024-06-03 08:00:00", "member")).is_none());
        // Exactly 24 hours is admitted.
        assert!(clean_trip(&raw("R1", "2024-06-03 08:00:00", "2024-06-04 08:00:00", "member")).is_some());
        // Over 24 hours is dropped, not clamped.
        assert!(clean_trip(&raw("R1", "2024-06-03 08:00:00", "2024-06-04 08:01:00", "member")).is_none());
    }

    #[test]
    fn test_over_long_trip_from_scenario_dropped() {
        // 1500 minutes.
        assert!(clean_trip(&raw("R1", "2024-06-03 08:00:00", "2024-06-04 09:00:00", "member")).is_none());
    }

    #[test]
    fn test_station_sentinel_fill() {
        let mut missing = raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:30:00", "member");
        missing.start_station_name = None;
        missing.end_station_name = Some(String::new());

        let trip = clean_trip(&missing).unwrap();
        assert_eq!(trip.start_station_name, UNKNOWN_STATION);
        assert_eq!(trip.end_station_name, UNKNOWN_STATION);
    }

    #[test]
    fn test_unknown_category_dropped() {
        assert!(clean_trip(&raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:30:00", "Member")).is_none());
        assert!(clean_trip(&raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:30:00", "subscriber")).is_none());

        let mut none = raw("R1", "2024-06-03 08:00:00", "2024-06-03 08:30:00", "member");
        none.member_casual = None;
        assert!(clean_trip(&none).is_none());
    }

    #[test]
    fn test_clean_file_counts() {
        let dir = env::temp_dir().join("bikeshare_report_cleaner_counts");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("trips.csv");

        let body = "\
ride_id,started_at,ended_at,start_station_name,end_station_name,member_casual
A1,2024-06-03 08:00:00,2024-06-03 08:10:00,Clark St,Dearborn St,member
A2,2024-06-03 09:00:00,2024-06-03 08:00:00,Clark St,,casual
,2024-06-03 08:00:00,2024-06-03 08:30:00,Clark St,Dearborn St,member
A4,2024-06-03 10:00:00,2024-06-03 10:30:00,,,casual
A5,2024-06-03 11:00:00,2024-06-03 11:30:00,Clark St,Dearborn St,day_pass
";
        fs::write(&path, body).unwrap();

        let (trips, counts) = clean_file(&path).unwrap();
        assert_eq!(counts.rows_read, 5);
        assert_eq!(counts.admitted, 2);
        assert_eq!(counts.dropped_duration, 1);
        assert_eq!(counts.dropped_missing_key, 1);
        assert_eq!(counts.dropped_category, 1);

        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].ride_id, "A1");
        assert_eq!(trips[1].ride_id, "A4");
        assert_eq!(trips[1].start_station_name, UNKNOWN_STATION);

        fs::remove_dir_all(&dir).unwrap();
    }
}
