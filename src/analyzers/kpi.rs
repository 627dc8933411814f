//! Headline system metrics and the full summary-statistics table.

use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::stations::{self, StationEnd};
use crate::analyzers::types::{DailyRow, HourlyRow, KpiRow, SummaryRow};
use crate::analyzers::utility::{mean, median, pct};
use crate::dataset::Dataset;

/// Bounds of the "optimal" duration band behind the satisfaction rate,
/// inclusive on both ends.
const OPTIMAL_MIN_MINUTES: f64 = 5.0;
const OPTIMAL_MAX_MINUTES: f64 = 60.0;

/// Morning and evening peak hours reported in the summary table.
const MORNING_PEAK_HOUR: u32 = 8;
const EVENING_PEAK_HOUR: u32 = 18;

/// Headline metrics computed once per run and shared by the KPI dashboard,
/// the summary table, and the KPI chart payload.
#[derive(Debug, Clone, Serialize)]
pub struct Kpis {
    pub total_trips: usize,
    pub member_trips: usize,
    pub casual_trips: usize,
    pub member_percentage: f64,
    pub avg_duration_minutes: f64,
    pub median_duration_minutes: f64,
    pub total_usage_hours: f64,
    /// Fractional days between the earliest and latest start timestamps.
    pub analysis_period_days: f64,
    pub daily_efficiency: f64,
    pub real_start_stations: usize,
    pub real_end_stations: usize,
    pub station_efficiency: f64,
    pub optimal_duration_trips: usize,
    pub satisfaction_rate: f64,
}

/// Min/avg/max over a set of per-group trip counts, for the KPI chart.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolumeStats {
    pub min: usize,
    pub avg: f64,
    pub max: usize,
}

fn volume_stats(counts: impl IntoIterator<Item = usize>) -> Option<VolumeStats> {
    let counts: Vec<usize> = counts.into_iter().collect();
    let min = *counts.iter().min()?;
    let max = *counts.iter().max()?;
    let values: Vec<f64> = counts.iter().map(|c| *c as f64).collect();
    Some(VolumeStats {
        min,
        avg: mean(&values),
        max,
    })
}

/// Computes the headline metrics.
///
/// # Errors
///
/// Fails on an empty dataset, a zero-length analysis period, or when no
/// real (non-Unknown) start or end station exists: every reported ratio
/// must have a nonzero denominator.
pub fn kpis(dataset: &Dataset) -> Result<Kpis> {
    ensure!(!dataset.is_empty(), "cannot compute KPIs over an empty dataset");

    let total_trips = dataset.len();
    let durations: Vec<f64> = dataset
        .trips()
        .iter()
        .map(|t| t.trip_duration_minutes)
        .collect();

    let member_trips: usize = dataset
        .trips()
        .iter()
        .map(|t| t.membership_indicator as usize)
        .sum();

    let (min_start, max_start) = dataset
        .start_span()
        .context("dataset has no start timestamps")?;
    let analysis_period_days = (max_start - min_start).num_seconds() as f64 / 86_400.0;
    ensure!(
        analysis_period_days > 0.0,
        "analysis period spans zero days; daily efficiency is undefined"
    );

    let start_counts = stations::real_station_counts(dataset, StationEnd::Start);
    ensure!(
        !start_counts.is_empty(),
        "no real start stations; station efficiency is undefined"
    );
    let end_counts = stations::real_station_counts(dataset, StationEnd::End);
    ensure!(
        !end_counts.is_empty(),
        "no real end stations; per-station averages are undefined"
    );

    let optimal_duration_trips = durations
        .iter()
        .filter(|d| (OPTIMAL_MIN_MINUTES..=OPTIMAL_MAX_MINUTES).contains(*d))
        .count();

    Ok(Kpis {
        total_trips,
        member_trips,
        casual_trips: total_trips - member_trips,
        member_percentage: pct(member_trips, total_trips),
        avg_duration_minutes: mean(&durations),
        median_duration_minutes: median(&durations),
        total_usage_hours: durations.iter().sum::<f64>() / 60.0,
        analysis_period_days,
        daily_efficiency: total_trips as f64 / analysis_period_days,
        real_start_stations: start_counts.len(),
        real_end_stations: end_counts.len(),
        station_efficiency: total_trips as f64 / start_counts.len() as f64,
        optimal_duration_trips,
        satisfaction_rate: pct(optimal_duration_trips, total_trips),
    })
}

/// Min/avg/max trips per calendar day, for the KPI chart.
pub fn daily_volume(dataset: &Dataset) -> Result<VolumeStats> {
    let mut per_date: BTreeMap<chrono::NaiveDate, usize> = BTreeMap::new();
    for trip in dataset.trips() {
        *per_date.entry(trip.date).or_default() += 1;
    }
    volume_stats(per_date.into_values()).context("no calendar days observed in dataset")
}

/// Min/avg/max trips per real start station, for the KPI chart.
pub fn station_volume(dataset: &Dataset) -> Result<VolumeStats> {
    let counts = stations::real_station_counts(dataset, StationEnd::Start);
    volume_stats(counts.into_values()).context("no real start stations observed in dataset")
}

/// The seven-row dashboard table (sheet `KPI_Dashboard`).
pub fn kpi_dashboard_rows(kpis: &Kpis) -> Vec<KpiRow> {
    let row = |metric: &str, value: f64, formatted: String, description: &str| KpiRow {
        metric: metric.to_string(),
        value_numeric: value,
        value_formatted: formatted,
        description: description.to_string(),
    };

    vec![
        row(
            "Total Trips",
            kpis.total_trips as f64,
            format!("{}", kpis.total_trips),
            "Total number of completed trips",
        ),
        row(
            "Member Percentage",
            kpis.member_percentage,
            format!("{:.1}%", kpis.member_percentage),
            "Proportion of member users in the system",
        ),
        row(
            "Average Duration",
            kpis.avg_duration_minutes,
            format!("{:.1} min", kpis.avg_duration_minutes),
            "Average trip duration across all users",
        ),
        row(
            "Total Hours",
            kpis.total_usage_hours,
            format!("{:.1}K hours", kpis.total_usage_hours / 1000.0),
            "Total system usage time in hours",
        ),
        row(
            "Daily Efficiency",
            kpis.daily_efficiency,
            format!("{:.0} trips/day", kpis.daily_efficiency),
            "Average trips completed per day",
        ),
        row(
            "Station Efficiency",
            kpis.station_efficiency,
            format!("{:.0} trips/station", kpis.station_efficiency),
            "Average trips per active station",
        ),
        row(
            "Satisfaction Rate",
            kpis.satisfaction_rate,
            format!("{:.1}%", kpis.satisfaction_rate),
            "Percentage of trips with optimal duration (5-60 min)",
        ),
    ]
}

fn hourly_total(hourly: &[HourlyRow], hour: u32) -> Result<usize> {
    hourly
        .iter()
        .find(|r| r.start_hour == hour)
        .map(|r| r.total_trips)
        .with_context(|| format!("no trips recorded for hour {hour}"))
}

/// The twenty-row summary table (sheet `Summary_Statistics`).
///
/// # Errors
///
/// Fails when a peak hour has no trips: the row indexes that hour's group,
/// and an absent group is surfaced rather than defaulted to zero.
pub fn summary_statistics(
    kpis: &Kpis,
    hourly: &[HourlyRow],
    daily: &[DailyRow],
) -> Result<Vec<SummaryRow>> {
    let morning_peak = hourly_total(hourly, MORNING_PEAK_HOUR)?;
    let evening_peak = hourly_total(hourly, EVENING_PEAK_HOUR)?;

    let weekday_totals: Vec<f64> = daily
        .iter()
        .filter(|r| !r.day_of_week.is_weekend())
        .map(|r| r.total_trips as f64)
        .collect();
    let weekend_totals: Vec<f64> = daily
        .iter()
        .filter(|r| r.day_of_week.is_weekend())
        .map(|r| r.total_trips as f64)
        .collect();
    let weekday_avg = mean(&weekday_totals);
    let weekend_avg = mean(&weekend_totals);

    let trips_per_start_station = kpis.total_trips as f64 / kpis.real_start_stations as f64;
    let trips_per_end_station = kpis.total_trips as f64 / kpis.real_end_stations as f64;

    let row = |metric: &str, value: f64, formatted: String| SummaryRow {
        metric: metric.to_string(),
        value_numeric: value,
        value_formatted: formatted,
    };

    Ok(vec![
        row(
            "Total Trips",
            kpis.total_trips as f64,
            format!("{}", kpis.total_trips),
        ),
        row(
            "Member Trips",
            kpis.member_trips as f64,
            format!("{}", kpis.member_trips),
        ),
        row(
            "Casual Trips",
            kpis.casual_trips as f64,
            format!("{}", kpis.casual_trips),
        ),
        row(
            "Member Percentage",
            kpis.member_percentage,
            format!("{:.1}%", kpis.member_percentage),
        ),
        row(
            "Casual Percentage",
            100.0 - kpis.member_percentage,
            format!("{:.1}%", 100.0 - kpis.member_percentage),
        ),
        row(
            "Average Duration (minutes)",
            kpis.avg_duration_minutes,
            format!("{:.1}", kpis.avg_duration_minutes),
        ),
        row(
            "Median Duration (minutes)",
            kpis.median_duration_minutes,
            format!("{:.1}", kpis.median_duration_minutes),
        ),
        row(
            "Total Hours",
            kpis.total_usage_hours,
            format!("{:.1}", kpis.total_usage_hours),
        ),
        row(
            "Daily Efficiency (trips/day)",
            kpis.daily_efficiency,
            format!("{:.0}", kpis.daily_efficiency),
        ),
        row(
            "Real Start Stations",
            kpis.real_start_stations as f64,
            format!("{}", kpis.real_start_stations),
        ),
        row(
            "Real End Stations",
            kpis.real_end_stations as f64,
            format!("{}", kpis.real_end_stations),
        ),
        row(
            "Average Trips per Start Station",
            trips_per_start_station,
            format!("{trips_per_start_station:.0}"),
        ),
        row(
            "Average Trips per End Station",
            trips_per_end_station,
            format!("{trips_per_end_station:.0}"),
        ),
        row(
            "Optimal Duration Trips (5-60 min)",
            kpis.optimal_duration_trips as f64,
            format!("{}", kpis.optimal_duration_trips),
        ),
        row(
            "Satisfaction Rate (%)",
            kpis.satisfaction_rate,
            format!("{:.1}", kpis.satisfaction_rate),
        ),
        row(
            "Analysis Period (days)",
            kpis.analysis_period_days,
            format!("{:.1}", kpis.analysis_period_days),
        ),
        row(
            "Peak Hour (8 AM) Trips",
            morning_peak as f64,
            format!("{morning_peak}"),
        ),
        row(
            "Peak Hour (6 PM) Trips",
            evening_peak as f64,
            format!("{evening_peak}"),
        ),
        row("Weekday Average Trips", weekday_avg, format!("{weekday_avg:.0}")),
        row("Weekend Average Trips", weekend_avg, format!("{weekend_avg:.0}")),
    ])
}
