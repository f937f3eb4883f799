//! Sales Insights - Sales CSV Cleaning, Statistics & Charts
//!
//! Loads a sales export, fills and drops missing values, prints descriptive
//! statistics and shows the monthly, per-month and top product charts.

mod analysis;
mod charts;
mod data;
mod gui;
mod pipeline;
mod stats;

use anyhow::{anyhow, Context, Result};
use charts::StaticChartRenderer;
use clap::Parser;
use gui::SalesViewerApp;
use pipeline::Pipeline;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean a sales CSV, summarise it, and chart sales over time and by product"
)]
struct Args {
    /// Sales CSV file (ISO-8859-1 encoded)
    #[arg(default_value = "Sales Data.csv")]
    input: PathBuf,

    /// Write the charts as PNG files into this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Do not open the interactive chart window
    #[arg(long)]
    no_window: bool,

    /// Open exported PNG files with the system viewer
    #[arg(long, requires = "output_dir")]
    open: bool,

    /// Write the statistics summary as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let report = Pipeline::run(&args.input)?;

    print!("\nStatistics for the data:\n\n{}", report.stats);

    if let Some(path) = &args.json {
        let json = report.stats.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Could not write {}", path.display()))?;
        info!("Wrote statistics to {}", path.display());
    }

    let charts = report.charts();
    for (view, column) in report.skipped_sections() {
        warn!("{} not drawn: missing {}", view, column);
    }

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create {}", dir.display()))?;
        for chart in &charts {
            let Some(path) = StaticChartRenderer::render_png(chart, dir)
                .with_context(|| format!("Rendering {} failed", chart.file_stem))?
            else {
                continue;
            };
            if args.open {
                if let Err(e) = open::that(&path) {
                    warn!("Could not open {}: {}", path.display(), e);
                }
            }
        }
    }

    if !args.no_window && !charts.is_empty() {
        let source = args.input.display().to_string();
        SalesViewerApp::new(source, &report, charts)
            .run()
            .map_err(|e| anyhow!("Chart window failed: {}", e))?;
    }

    Ok(())
}
