//! CLI entry point for the bike-share trip reporting tool.
//!
//! Provides subcommands for generating the full report, building the
//! canonical dataset cache, and inspecting a single raw trip file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use bikeshare_report::{cleaner, dataset, output, report};

#[derive(Parser)]
#[command(name = "bikeshare_report")]
#[command(about = "Batch reporting over bike-share trip records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full report: workbook sheets plus chart data
    Report {
        /// Directory containing raw trip CSV files
        #[arg(long, default_value = "data/raw")]
        raw_dir: PathBuf,

        /// Canonical dataset cache file
        #[arg(long, default_value = "data/processed/combined_trips.csv")]
        cache: PathBuf,

        /// Directory to write report artifacts into
        #[arg(short, long, default_value = "outputs")]
        output_dir: PathBuf,
    },
    /// Build (or reuse) the canonical dataset cache without reporting
    Combine {
        /// Directory containing raw trip CSV files
        #[arg(long, default_value = "data/raw")]
        raw_dir: PathBuf,

        /// Canonical dataset cache file
        #[arg(long, default_value = "data/processed/combined_trips.csv")]
        cache: PathBuf,
    },
    /// Clean a single raw trip file and record its admission counts
    Inspect {
        /// Path to one raw trip CSV
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// CSV file to append per-file counts to
        #[arg(short, long, default_value = "data_quality.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Logging setup: colored stderr + JSON rolling log file
    std::fs::create_dir_all("logs")?;
    let file_appender = tracing_appender::rolling::daily("logs", "bikeshare_report.log");
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            raw_dir,
            cache,
            output_dir,
        } => {
            let data = dataset::load_or_build(&cache, || dataset::build_from_raw(&raw_dir))?;
            if let Some((min, max)) = data.start_span() {
                info!(
                    trips = data.len(),
                    from = %min.date(),
                    to = %max.date(),
                    "Canonical dataset ready"
                );
            }
            report::generate(&data, &output_dir)?;
        }
        Commands::Combine { raw_dir, cache } => {
            let data = dataset::load_or_build(&cache, || dataset::build_from_raw(&raw_dir))?;
            info!(trips = data.len(), cache = %cache.display(), "Canonical dataset ready");
        }
        Commands::Inspect { source, output } => {
            let (trips, counts) = cleaner::clean_file(&source)?;
            info!(
                file = %source.display(),
                admitted = trips.len(),
                dropped = counts.rows_read - counts.admitted,
                "Inspection complete"
            );
            output::append_record(&output, &counts)?;
        }
    }

    Ok(())
}
