//! The canonical dataset: combining cleaned files, caching, persistence.
//!
//! Cleaning is paid at most once per dataset version: `load_or_build` reads
//! the cache when it exists and otherwise builds, persists, then returns the
//! fresh dataset.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{error, info};

use crate::cleaner;
use crate::loader;
use crate::records::CleanTrip;

/// The validated trip set every aggregate is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    trips: Vec<CleanTrip>,
}

impl Dataset {
    pub fn new(trips: Vec<CleanTrip>) -> Self {
        Dataset { trips }
    }

    pub fn trips(&self) -> &[CleanTrip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Earliest and latest start timestamps across the dataset.
    pub fn start_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.trips.iter().map(|t| t.started_at).min()?;
        let max = self.trips.iter().map(|t| t.started_at).max()?;
        Some((min, max))
    }
}

/// Cleans every raw file under `raw_dir` in parallel and concatenates the
/// results in sorted-path order, so the combined dataset is deterministic
/// regardless of worker completion order.
///
/// A file that fails to parse is logged and skipped. The batch fails only
/// if not a single file was processed: there is nothing to report on.
pub fn build_from_raw(raw_dir: &Path) -> Result<Dataset> {
    let files = loader::discover_trip_files(raw_dir)?;
    info!(count = files.len(), dir = %raw_dir.display(), "Raw trip files discovered");

    let progress = progress_bar_for_count(files.len());
    let cleaned: Vec<Option<Vec<CleanTrip>>> = files
        .par_iter()
        .progress_with(progress)
        .map(|path| match cleaner::clean_file(path) {
            Ok((trips, _counts)) => Some(trips),
            Err(e) => {
                error!(file = %path.display(), error = %e, "Skipping unreadable trip file");
                None
            }
        })
        .collect();

    let mut trips = Vec::new();
    let mut processed = 0usize;
    for file_trips in cleaned.into_iter().flatten() {
        processed += 1;
        trips.extend(file_trips);
    }

    if processed == 0 {
        bail!(
            "no trip files were successfully processed under {}",
            raw_dir.display()
        );
    }

    info!(files = processed, trips = trips.len(), "Canonical dataset combined");
    Ok(Dataset::new(trips))
}

/// Loads the canonical dataset from `cache_path` when present; otherwise
/// invokes `build`, persists the result, and returns it.
pub fn load_or_build<F>(cache_path: &Path, build: F) -> Result<Dataset>
where
    F: FnOnce() -> Result<Dataset>,
{
    if cache_path.exists() {
        info!(cache = %cache_path.display(), "Loading cached canonical dataset");
        return load_cache(cache_path);
    }

    let dataset = build()?;
    persist(cache_path, &dataset)?;
    Ok(dataset)
}

/// Reads a previously persisted canonical dataset.
pub fn load_cache(path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("opening cache {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut trips = Vec::new();
    for result in rdr.deserialize() {
        let trip: CleanTrip = result.with_context(|| format!("parsing cache {}", path.display()))?;
        trips.push(trip);
    }

    info!(trips = trips.len(), cache = %path.display(), "Canonical dataset loaded from cache");
    Ok(Dataset::new(trips))
}

/// Writes the dataset to `path` as a headered CSV, creating parent
/// directories as needed.
pub fn persist(path: &Path, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating cache directory {}", parent.display()))?;
    }

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating cache {}", path.display()))?;
    for trip in dataset.trips() {
        writer.serialize(trip)?;
    }
    writer.flush()?;

    info!(trips = dataset.len(), cache = %path.display(), "Canonical dataset persisted");
    Ok(())
}

fn progress_bar_for_count(count: usize) -> ProgressBar {
    ProgressBar::new(count as u64).with_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {human_pos}/{human_len} ({per_sec}, {eta})",
        )
        .unwrap(),
    )
}
