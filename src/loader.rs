//! Raw trip-file discovery and parsing.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::records::RawTrip;

/// Lists the `.csv` files directly under `dir` in lexicographically sorted
/// order, so that combined output is reproducible across runs regardless of
/// directory-listing order.
pub fn discover_trip_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading raw trip directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Reads one raw trip CSV into memory, preserving row order.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row fails to
/// deserialize against the expected header. Callers treat this as a
/// per-file parse failure: the file is logged and skipped, the batch
/// continues.
pub fn read_raw_trips(path: &Path) -> Result<Vec<RawTrip>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: RawTrip = result.with_context(|| format!("parsing {}", path.display()))?;
        rows.push(record);
    }

    debug!(file = %path.display(), rows = rows.len(), "Raw trip file loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("bikeshare_report_loader_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const HEADER: &str =
        "ride_id,started_at,ended_at,start_station_name,end_station_name,member_casual\n";

    #[test]
    fn test_discover_sorted_csv_only() {
        let dir = temp_dir("discover");
        fs::write(dir.join("b.csv"), HEADER).unwrap();
        fs::write(dir.join("a.csv"), HEADER).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let files = discover_trip_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_discover_missing_dir_is_error() {
        let dir = env::temp_dir().join("bikeshare_report_loader_no_such_dir");
        let _ = fs::remove_dir_all(&dir);
        assert!(discover_trip_files(&dir).is_err());
    }

    #[test]
    fn test_read_preserves_row_order() {
        let dir = temp_dir("order");
        let path = dir.join("trips.csv");
        let body = format!(
            "{HEADER}\
             R1,2024-06-03 08:00:00,2024-06-03 08:10:00,A,B,member\n\
             R2,2024-06-03 09:00:00,2024-06-03 09:10:00,B,A,casual\n"
        );
        fs::write(&path, body).unwrap();

        let rows = read_raw_trips(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ride_id.as_deref(), Some("R1"));
        assert_eq!(rows[1].ride_id.as_deref(), Some("R2"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_fields_become_none() {
        let dir = temp_dir("empty_fields");
        let path = dir.join("trips.csv");
        let body = format!("{HEADER},2024-06-03 08:00:00,2024-06-03 08:10:00,,B,member\n");
        fs::write(&path, body).unwrap();

        let rows = read_raw_trips(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ride_id, None);
        assert_eq!(rows[0].start_station_name, None);
        assert_eq!(rows[0].end_station_name.as_deref(), Some("B"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_row_fails_file() {
        let dir = temp_dir("malformed");
        let path = dir.join("trips.csv");
        let body = format!("{HEADER}only,three,fields\n");
        fs::write(&path, body).unwrap();

        assert!(read_raw_trips(&path).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
