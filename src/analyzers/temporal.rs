//! Temporal aggregates: by hour, day of week, month, and hour x day.

use std::collections::BTreeMap;

use crate::analyzers::types::{DailyRow, HeatmapRow, HourlyRow, MonthlyRow};
use crate::dataset::Dataset;
use crate::records::{CleanTrip, DayOfWeek, MonthOfYear};

/// Running sums for one group; enough for count, mean duration, and mean
/// membership indicator without holding the group's trips.
#[derive(Debug, Default)]
struct GroupAcc {
    trips: usize,
    duration_sum: f64,
    member_sum: usize,
}

impl GroupAcc {
    fn push(&mut self, trip: &CleanTrip) {
        self.trips += 1;
        self.duration_sum += trip.trip_duration_minutes;
        self.member_sum += trip.membership_indicator as usize;
    }

    fn avg_duration(&self) -> f64 {
        self.duration_sum / self.trips as f64
    }

    fn member_share(&self) -> f64 {
        self.member_sum as f64 / self.trips as f64
    }
}

/// Trips grouped by hour of day. Only hours observed in the data appear;
/// absent hours produce no row.
pub fn hourly(dataset: &Dataset) -> Vec<HourlyRow> {
    let mut groups: BTreeMap<u32, GroupAcc> = BTreeMap::new();
    for trip in dataset.trips() {
        groups.entry(trip.start_hour).or_default().push(trip);
    }

    groups
        .into_iter()
        .map(|(start_hour, acc)| {
            let member_percentage = acc.member_share() * 100.0;
            HourlyRow {
                start_hour,
                total_trips: acc.trips,
                avg_duration_minutes: acc.avg_duration(),
                member_share: acc.member_share(),
                member_percentage,
                casual_percentage: 100.0 - member_percentage,
            }
        })
        .collect()
}

/// Trips grouped by day of week, rows in Monday-to-Sunday order regardless
/// of input order. The ordering comes from [`DayOfWeek`]'s `Ord`, not from
/// the order days appear in the data.
pub fn daily(dataset: &Dataset) -> Vec<DailyRow> {
    let mut groups: BTreeMap<DayOfWeek, GroupAcc> = BTreeMap::new();
    for trip in dataset.trips() {
        groups.entry(trip.day_of_week).or_default().push(trip);
    }

    groups
        .into_iter()
        .map(|(day_of_week, acc)| DailyRow {
            day_of_week,
            total_trips: acc.trips,
            avg_duration_minutes: acc.avg_duration(),
            member_share: acc.member_share(),
            member_percentage: acc.member_share() * 100.0,
        })
        .collect()
}

/// Trips grouped by calendar month, rows in January-to-December order.
pub fn monthly(dataset: &Dataset) -> Vec<MonthlyRow> {
    let mut groups: BTreeMap<MonthOfYear, GroupAcc> = BTreeMap::new();
    for trip in dataset.trips() {
        groups.entry(trip.month).or_default().push(trip);
    }

    groups
        .into_iter()
        .map(|(month, acc)| MonthlyRow {
            month,
            total_trips: acc.trips,
            avg_duration_minutes: acc.avg_duration(),
            member_share: acc.member_share(),
            member_percentage: acc.member_share() * 100.0,
        })
        .collect()
}

/// Hour x day-of-week trip counts pivoted into one row per observed hour,
/// day columns in Monday-to-Sunday order. Cells with no observed trips stay
/// absent rather than zero-filled.
pub fn heatmap(dataset: &Dataset) -> Vec<HeatmapRow> {
    let mut cells: BTreeMap<u32, BTreeMap<DayOfWeek, usize>> = BTreeMap::new();
    for trip in dataset.trips() {
        *cells
            .entry(trip.start_hour)
            .or_default()
            .entry(trip.day_of_week)
            .or_default() += 1;
    }

    cells
        .into_iter()
        .map(|(start_hour, days)| HeatmapRow {
            start_hour,
            monday: days.get(&DayOfWeek::Monday).copied(),
            tuesday: days.get(&DayOfWeek::Tuesday).copied(),
            wednesday: days.get(&DayOfWeek::Wednesday).copied(),
            thursday: days.get(&DayOfWeek::Thursday).copied(),
            friday: days.get(&DayOfWeek::Friday).copied(),
            saturday: days.get(&DayOfWeek::Saturday).copied(),
            sunday: days.get(&DayOfWeek::Sunday).copied(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testutil::{dataset, trip};
    use crate::records::UserCategory;

    #[test]
    fn test_hourly_observed_hours_only() {
        let data = dataset(vec![
            trip("2024-06-03 08:05:00", 10.0, UserCategory::Member),
            trip("2024-06-03 08:40:00", 20.0, UserCategory::Casual),
            trip("2024-06-03 17:10:00", 30.0, UserCategory::Member),
        ]);

        let rows = hourly(&data);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].start_hour, 8);
        assert_eq!(rows[0].total_trips, 2);
        assert_eq!(rows[0].avg_duration_minutes, 15.0);
        assert_eq!(rows[0].member_percentage, 50.0);
        assert_eq!(rows[0].casual_percentage, 50.0);

        assert_eq!(rows[1].start_hour, 17);
        assert_eq!(rows[1].total_trips, 1);
        assert_eq!(rows[1].member_share, 1.0);
    }

    #[test]
    fn test_daily_rows_monday_first() {
        // Input order: Sunday, Wednesday, Monday.
        let data = dataset(vec![
            trip("2024-06-09 10:00:00", 10.0, UserCategory::Casual),
            trip("2024-06-05 10:00:00", 10.0, UserCategory::Member),
            trip("2024-06-03 10:00:00", 10.0, UserCategory::Member),
            trip("2024-06-03 11:00:00", 30.0, UserCategory::Casual),
        ]);

        let rows = daily(&data);
        let days: Vec<_> = rows.iter().map(|r| r.day_of_week).collect();
        assert_eq!(
            days,
            vec![DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Sunday]
        );

        assert_eq!(rows[0].total_trips, 2);
        assert_eq!(rows[0].avg_duration_minutes, 20.0);
        assert_eq!(rows[0].member_percentage, 50.0);
    }

    #[test]
    fn test_daily_totals_preserve_count() {
        let data = dataset(vec![
            trip("2024-06-03 08:00:00", 10.0, UserCategory::Member),
            trip("2024-06-04 08:00:00", 10.0, UserCategory::Member),
            trip("2024-06-08 08:00:00", 10.0, UserCategory::Casual),
            trip("2024-06-09 08:00:00", 10.0, UserCategory::Casual),
            trip("2024-06-09 09:00:00", 10.0, UserCategory::Member),
        ]);

        let rows = daily(&data);
        let total: usize = rows.iter().map(|r| r.total_trips).sum();
        assert_eq!(total, data.len());
    }

    #[test]
    fn test_monthly_rows_calendar_order() {
        let data = dataset(vec![
            trip("2024-05-01 08:00:00", 10.0, UserCategory::Member),
            trip("2024-01-15 08:00:00", 10.0, UserCategory::Casual),
            trip("2024-05-20 08:00:00", 10.0, UserCategory::Member),
        ]);

        let rows = monthly(&data);
        let months: Vec<_> = rows.iter().map(|r| r.month).collect();
        assert_eq!(months, vec![MonthOfYear::January, MonthOfYear::May]);
        assert_eq!(rows[1].total_trips, 2);
    }

    #[test]
    fn test_heatmap_missing_cells_absent() {
        let data = dataset(vec![
            trip("2024-06-03 08:00:00", 10.0, UserCategory::Member), // Monday 8
            trip("2024-06-09 08:30:00", 10.0, UserCategory::Casual), // Sunday 8
            trip("2024-06-03 09:00:00", 10.0, UserCategory::Member), // Monday 9
            trip("2024-06-03 09:20:00", 10.0, UserCategory::Member), // Monday 9
        ]);

        let rows = heatmap(&data);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].start_hour, 8);
        assert_eq!(rows[0].monday, Some(1));
        assert_eq!(rows[0].sunday, Some(1));
        assert_eq!(rows[0].tuesday, None);

        assert_eq!(rows[1].start_hour, 9);
        assert_eq!(rows[1].monday, Some(2));
        assert_eq!(rows[1].sunday, None);
    }
}
