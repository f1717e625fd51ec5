//! Sales Dashboard - desktop window or headless report
//!
//! Without a subcommand the egui dashboard opens. `report` prints the same
//! dashboard as text or JSON and can export the charts as PNG files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use log::info;
use sales_dashboard::charts::ChartRenderer;
use sales_dashboard::config::DashboardConfig;
use sales_dashboard::data::DataLoader;
use sales_dashboard::gui::DashboardApp;
use sales_dashboard::view;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sales-dashboard", version, about = "Juice & smoothie sales dashboard")]
struct Args {
    /// JSON dashboard configuration (title, preview rows, column names)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the dashboard for FILE without opening a window
    Report {
        /// CSV or spreadsheet (xlsx, xlsm, xls, ods)
        input: PathBuf,

        /// Print the view model as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also write the charts as PNG files into DIR
        #[arg(long, value_name = "DIR")]
        charts: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    match args.command {
        Some(Command::Report {
            input,
            json,
            charts,
        }) => report(&config, &input, json, charts.as_deref()),
        None => run_gui(config),
    }
}

fn report(
    config: &DashboardConfig,
    input: &Path,
    json: bool,
    charts: Option<&Path>,
) -> Result<()> {
    let dataset = DataLoader::load_path(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let view = view::render(&dataset, config).context("Failed to build dashboard")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view);
    }

    if let Some(dir) = charts {
        let written = ChartRenderer::render_all(&view, dir)
            .with_context(|| format!("Failed to export charts to {}", dir.display()))?;
        info!("Wrote {} chart(s)", written.len());
    }
    Ok(())
}

fn run_gui(config: DashboardConfig) -> Result<()> {
    let title = config.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start GUI: {}", e))
}
