//! Full report generation: computes every aggregate once and fans the
//! results out to the workbook sheets and chart-data documents.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::analyzers::stations::StationEnd;
use crate::analyzers::{duration, kpi, stations, temporal, users};
use crate::dataset::Dataset;
use crate::output::{write_chart_data, write_sheet};

/// Station rows carried by the workbook sheets.
const WORKBOOK_TOP_STATIONS: usize = 20;
/// Station bars on the rendered charts.
const CHART_TOP_STATIONS: usize = 10;

/// Payload behind the strategic-KPI chart: the headline metrics plus the
/// min/avg/max volume panels.
#[derive(Serialize)]
struct KpiChart<'a> {
    kpis: &'a kpi::Kpis,
    daily_volume: kpi::VolumeStats,
    station_volume: kpi::VolumeStats,
}

/// Computes every aggregate from the canonical dataset and writes the
/// workbook directory and the chart-data directory under `output_dir`.
pub fn generate(dataset: &Dataset, output_dir: &Path) -> Result<()> {
    let workbook_dir = output_dir.join("workbook");
    let charts_dir = output_dir.join("charts");

    let hourly = temporal::hourly(dataset);
    let daily = temporal::daily(dataset);
    let monthly = temporal::monthly(dataset);
    let heatmap = temporal::heatmap(dataset);
    let user_rows = users::user_breakdown(dataset)?;
    let hourly_by_user = users::hourly_by_user(dataset);
    let member_proportion = users::member_proportion(&hourly);
    let top_start = stations::top_stations(dataset, StationEnd::Start, WORKBOOK_TOP_STATIONS);
    let top_end = stations::top_stations(dataset, StationEnd::End, WORKBOOK_TOP_STATIONS);
    let station_types = stations::station_types(dataset)?;
    let histogram = duration::duration_histogram(dataset);
    let kpis = kpi::kpis(dataset)?;
    let kpi_rows = kpi::kpi_dashboard_rows(&kpis);
    let summary = kpi::summary_statistics(&kpis, &hourly, &daily)?;

    write_sheet(&workbook_dir, "KPI_Dashboard", &kpi_rows)?;
    write_sheet(&workbook_dir, "Hourly_Analysis", &hourly)?;
    write_sheet(&workbook_dir, "Daily_Analysis", &daily)?;
    write_sheet(&workbook_dir, "Monthly_Analysis", &monthly)?;
    write_sheet(&workbook_dir, "User_Analysis", &user_rows)?;
    write_sheet(&workbook_dir, "Hourly_by_User", &hourly_by_user)?;
    write_sheet(&workbook_dir, "Member_Proportion", &member_proportion)?;
    write_sheet(&workbook_dir, "Top_Start_Stations", &top_start)?;
    write_sheet(&workbook_dir, "Top_End_Stations", &top_end)?;
    write_sheet(&workbook_dir, "Station_Types", &station_types)?;
    write_sheet(&workbook_dir, "Temporal_Heatmap", &heatmap)?;
    write_sheet(&workbook_dir, "Duration_Distribution", &histogram)?;
    write_sheet(&workbook_dir, "Summary_Statistics", &summary)?;

    let kpi_chart = KpiChart {
        kpis: &kpis,
        daily_volume: kpi::daily_volume(dataset)?,
        station_volume: kpi::station_volume(dataset)?,
    };
    write_chart_data(&charts_dir, "kpi_strategic", &kpi_chart)?;
    write_chart_data(&charts_dir, "hourly_analysis", &hourly)?;
    write_chart_data(&charts_dir, "daily_pattern", &daily)?;
    write_chart_data(&charts_dir, "monthly_analysis", &monthly)?;
    write_chart_data(&charts_dir, "user_distribution", &user_rows)?;
    write_chart_data(&charts_dir, "duration_comparison", &user_rows)?;
    write_chart_data(&charts_dir, "hourly_by_user", &hourly_by_user)?;
    write_chart_data(&charts_dir, "member_proportion", &member_proportion)?;
    write_chart_data(
        &charts_dir,
        "start_stations",
        &stations::top_stations(dataset, StationEnd::Start, CHART_TOP_STATIONS),
    )?;
    write_chart_data(
        &charts_dir,
        "end_stations",
        &stations::top_stations(dataset, StationEnd::End, CHART_TOP_STATIONS),
    )?;
    write_chart_data(&charts_dir, "station_types", &station_types)?;
    write_chart_data(&charts_dir, "heatmap", &heatmap)?;
    write_chart_data(&charts_dir, "duration_distribution", &histogram)?;

    info!(
        trips = dataset.len(),
        workbook = %workbook_dir.display(),
        charts = %charts_dir.display(),
        "Report artifacts written"
    );
    Ok(())
}
