//! Report artifact writers: workbook sheets, chart-data documents, and the
//! append-only data-quality log.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

/// Writes one aggregate table as a headered delimited sheet in the workbook
/// directory, creating the directory as needed. The sheet name is fixed by
/// the downstream workbook consumer.
pub fn write_sheet<T: Serialize>(workbook_dir: &Path, sheet_name: &str, rows: &[T]) -> Result<()> {
    fs::create_dir_all(workbook_dir)
        .with_context(|| format!("creating workbook directory {}", workbook_dir.display()))?;
    let path = workbook_dir.join(format!("{sheet_name}.csv"));

    let file = File::create(&path).with_context(|| format!("creating sheet {}", path.display()))?;
    let mut writer = WriterBuilder::new().from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(sheet = sheet_name, rows = rows.len(), "Sheet written");
    Ok(())
}

/// Writes a chart payload as pretty-printed JSON for the external renderer.
pub fn write_chart_data<T: Serialize>(charts_dir: &Path, chart_name: &str, payload: &T) -> Result<()> {
    fs::create_dir_all(charts_dir)
        .with_context(|| format!("creating charts directory {}", charts_dir.display()))?;
    let path = charts_dir.join(format!("{chart_name}.json"));

    fs::write(&path, serde_json::to_string_pretty(payload)?)
        .with_context(|| format!("writing chart data {}", path.display()))?;

    debug!(chart = chart_name, "Chart data written");
    Ok(())
}

/// Appends a record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
