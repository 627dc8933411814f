//! Trip-duration distribution over the sub-two-hour subset.

use crate::analyzers::types::DurationBin;
use crate::dataset::Dataset;

/// Upper bound, in minutes, for trips included in the histogram.
const HISTOGRAM_MAX_MINUTES: f64 = 120.0;

/// Number of equal-width bins spanning the observed range.
const HISTOGRAM_BINS: usize = 50;

/// Frequency histogram of trip durations up to two hours, in 50 equal-width
/// bins over the observed range of the filtered subset. Bins with no trips
/// are kept, so frequencies always sum to the filtered trip count. Values
/// on a bin edge land in the lower-indexed bin's successor (left-closed
/// bins), with the maximum clamped into the last bin.
pub fn duration_histogram(dataset: &Dataset) -> Vec<DurationBin> {
    let durations: Vec<f64> = dataset
        .trips()
        .iter()
        .map(|t| t.trip_duration_minutes)
        .filter(|d| *d <= HISTOGRAM_MAX_MINUTES)
        .collect();

    if durations.is_empty() {
        return Vec::new();
    }

    let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        // Degenerate range: every filtered trip shares one duration.
        return vec![DurationBin {
            duration_range: format!("[{min:.2}, {max:.2}]"),
            frequency: durations.len(),
            duration_midpoint: min,
        }];
    }

    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut frequencies = vec![0usize; HISTOGRAM_BINS];
    for d in &durations {
        let idx = (((d - min) / width) as usize).min(HISTOGRAM_BINS - 1);
        frequencies[idx] += 1;
    }

    frequencies
        .into_iter()
        .enumerate()
        .map(|(i, frequency)| {
            let lo = min + width * i as f64;
            let hi = lo + width;
            DurationBin {
                duration_range: format!("[{lo:.2}, {hi:.2})"),
                frequency,
                duration_midpoint: (lo + hi) / 2.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testutil::{dataset, trip};
    use crate::records::UserCategory;

    fn data_with_durations(durations: &[f64]) -> Dataset {
        dataset(
            durations
                .iter()
                .map(|d| trip("2024-06-03 08:00:00", *d, UserCategory::Member))
                .collect(),
        )
    }

    #[test]
    fn test_frequencies_sum_to_filtered_count() {
        let data = data_with_durations(&[10.0, 50.0, 119.0, 120.0, 121.0, 600.0]);
        let bins = duration_histogram(&data);

        assert_eq!(bins.len(), HISTOGRAM_BINS);
        let total: usize = bins.iter().map(|b| b.frequency).sum();
        // 121.0 and 600.0 are over the two-hour bound.
        assert_eq!(total, 4);
    }

    #[test]
    fn test_extremes_land_in_first_and_last_bins() {
        let data = data_with_durations(&[10.0, 50.0, 110.0]);
        let bins = duration_histogram(&data);

        assert_eq!(bins[0].frequency, 1);
        assert_eq!(bins[HISTOGRAM_BINS - 1].frequency, 1);
    }

    #[test]
    fn test_bin_geometry() {
        let data = data_with_durations(&[10.0, 110.0]);
        let bins = duration_histogram(&data);

        // Range 10..110 in 50 bins of width 2.
        assert!((bins[0].duration_midpoint - 11.0).abs() < 1e-9);
        assert!((bins[49].duration_midpoint - 109.0).abs() < 1e-9);
        assert_eq!(bins[0].duration_range, "[10.00, 12.00)");
    }

    #[test]
    fn test_degenerate_range_single_bin() {
        let data = data_with_durations(&[30.0, 30.0, 30.0]);
        let bins = duration_histogram(&data);

        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].frequency, 3);
        assert_eq!(bins[0].duration_midpoint, 30.0);
    }

    #[test]
    fn test_no_filtered_trips() {
        let data = data_with_durations(&[300.0, 500.0]);
        assert!(duration_histogram(&data).is_empty());

        assert!(duration_histogram(&dataset(Vec::new())).is_empty());
    }
}
