//! Station aggregates: top-N frequency tables and the real/Unknown split.

use std::collections::{HashMap, HashSet};

use anyhow::{Result, ensure};

use crate::analyzers::types::{StationRow, StationTypesRow};
use crate::analyzers::utility::pct;
use crate::cleaner::UNKNOWN_STATION;
use crate::dataset::Dataset;
use crate::records::CleanTrip;

/// Which end of the trip a station aggregate is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationEnd {
    Start,
    End,
}

fn station_name(trip: &CleanTrip, end: StationEnd) -> &str {
    match end {
        StationEnd::Start => &trip.start_station_name,
        StationEnd::End => &trip.end_station_name,
    }
}

/// Per-station trip counts for real (non-Unknown) stations at the given
/// trip end.
pub fn real_station_counts(dataset: &Dataset, end: StationEnd) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for trip in dataset.trips() {
        let name = station_name(trip, end);
        if name != UNKNOWN_STATION {
            *counts.entry(name.to_string()).or_default() += 1;
        }
    }
    counts
}

/// The `n` busiest real stations at the given trip end, busiest first.
/// Ties break on station name so output is deterministic. Percentages are
/// against all trips in the dataset, including those at Unknown stations.
pub fn top_stations(dataset: &Dataset, end: StationEnd, n: usize) -> Vec<StationRow> {
    let mut rows: Vec<(String, usize)> = real_station_counts(dataset, end).into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(n);

    let total = dataset.len();
    rows.into_iter()
        .map(|(station_name, total_trips)| StationRow {
            station_name,
            total_trips,
            percentage: pct(total_trips, total),
        })
        .collect()
}

/// Distinct start stations split into real names and the Unknown sentinel.
/// Percentages are against the distinct-station total, which includes the
/// sentinel when present.
pub fn station_types(dataset: &Dataset) -> Result<Vec<StationTypesRow>> {
    let distinct: HashSet<&str> = dataset
        .trips()
        .iter()
        .map(|t| t.start_station_name.as_str())
        .collect();
    ensure!(
        !distinct.is_empty(),
        "no start stations observed; station split is undefined"
    );

    let total = distinct.len();
    let real = distinct
        .iter()
        .filter(|name| **name != UNKNOWN_STATION)
        .count();
    let unknown = total - real;

    Ok(vec![
        StationTypesRow {
            station_type: "Real Stations".to_string(),
            count: real,
            percentage: pct(real, total),
        },
        StationTypesRow {
            station_type: "Unknown Stations".to_string(),
            count: unknown,
            percentage: pct(unknown, total),
        },
    ])
}
