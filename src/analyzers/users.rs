//! User-segment aggregates: per-category breakdown, hour x category
//! counts, and the member-proportion-by-hour view.

use std::collections::BTreeMap;

use anyhow::{Result, ensure};

use crate::analyzers::types::{HourlyByUserRow, HourlyRow, MemberProportionRow, UserRow};
use crate::analyzers::utility::{mean, median, pct};
use crate::dataset::Dataset;
use crate::records::UserCategory;

/// Per-category breakdown over the whole dataset. Rows appear in label
/// order (casual, then member); percentages are shares of all trips.
pub fn user_breakdown(dataset: &Dataset) -> Result<Vec<UserRow>> {
    ensure!(
        !dataset.is_empty(),
        "cannot break down user categories over an empty dataset"
    );

    let mut durations: BTreeMap<UserCategory, Vec<f64>> = BTreeMap::new();
    for trip in dataset.trips() {
        durations
            .entry(trip.member_casual)
            .or_default()
            .push(trip.trip_duration_minutes);
    }

    let total = dataset.len();
    let rows = durations
        .into_iter()
        .map(|(user_category, group)| {
            let total_duration_minutes: f64 = group.iter().sum();
            UserRow {
                user_category,
                total_trips: group.len(),
                avg_duration_minutes: mean(&group),
                median_duration_minutes: median(&group),
                total_duration_minutes,
                total_hours: total_duration_minutes / 60.0,
                percentage: pct(group.len(), total),
            }
        })
        .collect();

    Ok(rows)
}

/// Trip counts keyed by (hour, category), rows ordered by hour then
/// category label.
pub fn hourly_by_user(dataset: &Dataset) -> Vec<HourlyByUserRow> {
    let mut groups: BTreeMap<(u32, UserCategory), usize> = BTreeMap::new();
    for trip in dataset.trips() {
        *groups
            .entry((trip.start_hour, trip.member_casual))
            .or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((start_hour, user_category), total_trips)| HourlyByUserRow {
            start_hour,
            user_category,
            total_trips,
        })
        .collect()
}

/// Member vs casual percentage per hour, derived from the hourly aggregate.
pub fn member_proportion(hourly: &[HourlyRow]) -> Vec<MemberProportionRow> {
    hourly
        .iter()
        .map(|row| MemberProportionRow {
            start_hour: row.start_hour,
            member_percentage: row.member_percentage,
            casual_percentage: row.casual_percentage,
        })
        .collect()
}
