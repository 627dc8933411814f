//! Row schemas for the aggregate tables.
//!
//! Field order is the column order of the emitted sheets; every row type
//! maps one-to-one onto a workbook sheet or chart payload.

use serde::Serialize;

use crate::records::{DayOfWeek, MonthOfYear, UserCategory};

/// Trips grouped by hour of day (sheet `Hourly_Analysis`).
#[derive(Debug, Clone, Serialize)]
pub struct HourlyRow {
    pub start_hour: u32,
    pub total_trips: usize,
    pub avg_duration_minutes: f64,
    /// Mean membership indicator for the hour, in 0.0-1.0.
    pub member_share: f64,
    pub member_percentage: f64,
    pub casual_percentage: f64,
}

/// Trips grouped by day of week, Monday first (sheet `Daily_Analysis`).
#[derive(Debug, Clone, Serialize)]
pub struct DailyRow {
    pub day_of_week: DayOfWeek,
    pub total_trips: usize,
    pub avg_duration_minutes: f64,
    pub member_share: f64,
    pub member_percentage: f64,
}

/// Trips grouped by calendar month, January first (sheet `Monthly_Analysis`).
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRow {
    pub month: MonthOfYear,
    pub total_trips: usize,
    pub avg_duration_minutes: f64,
    pub member_share: f64,
    pub member_percentage: f64,
}

/// Per-category breakdown (sheet `User_Analysis`).
#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub user_category: UserCategory,
    pub total_trips: usize,
    pub avg_duration_minutes: f64,
    pub median_duration_minutes: f64,
    pub total_duration_minutes: f64,
    pub total_hours: f64,
    /// Share of all trips in the dataset, in percent.
    pub percentage: f64,
}

/// Two-key hour x category counts (sheet `Hourly_by_User`).
#[derive(Debug, Clone, Serialize)]
pub struct HourlyByUserRow {
    pub start_hour: u32,
    pub user_category: UserCategory,
    pub total_trips: usize,
}

/// Member vs casual split per hour (sheet `Member_Proportion`).
#[derive(Debug, Clone, Serialize)]
pub struct MemberProportionRow {
    pub start_hour: u32,
    pub member_percentage: f64,
    pub casual_percentage: f64,
}

/// One station with its trip count (sheets `Top_Start_Stations` /
/// `Top_End_Stations`). Percentage is against all trips in the dataset,
/// not the top-N subset.
#[derive(Debug, Clone, Serialize)]
pub struct StationRow {
    pub station_name: String,
    pub total_trips: usize,
    pub percentage: f64,
}

/// Distinct-station split between real names and the Unknown sentinel
/// (sheet `Station_Types`).
#[derive(Debug, Clone, Serialize)]
pub struct StationTypesRow {
    pub station_type: String,
    pub count: usize,
    pub percentage: f64,
}

/// One hour row of the hour x day-of-week matrix (sheet `Temporal_Heatmap`).
/// A `None` cell means no trip was observed for that hour/day pair; it is
/// emitted as an empty field, not zero-filled.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapRow {
    pub start_hour: u32,
    pub monday: Option<usize>,
    pub tuesday: Option<usize>,
    pub wednesday: Option<usize>,
    pub thursday: Option<usize>,
    pub friday: Option<usize>,
    pub saturday: Option<usize>,
    pub sunday: Option<usize>,
}

/// One equal-width duration bin (sheet `Duration_Distribution`).
#[derive(Debug, Clone, Serialize)]
pub struct DurationBin {
    pub duration_range: String,
    pub frequency: usize,
    pub duration_midpoint: f64,
}

/// One formatted metric row (sheet `KPI_Dashboard`).
#[derive(Debug, Clone, Serialize)]
pub struct KpiRow {
    pub metric: String,
    pub value_numeric: f64,
    pub value_formatted: String,
    pub description: String,
}

/// One formatted metric row (sheet `Summary_Statistics`).
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub metric: String,
    pub value_numeric: f64,
    pub value_formatted: String,
}
