mod app;
mod color;
mod data;
mod format;
mod state;
mod summary;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::SalesDashboardApp;
use chrono::NaiveDate;
use clap::Parser;
use eframe::egui;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sales dashboard: KPIs, rankings and CSV exports", long_about = None)]
struct Cli {
    /// Sales file to open (.csv, .json, .parquet)
    #[arg(long, default_value = "vendas.csv")]
    source: PathBuf,

    /// Print the KPI summary and rankings instead of opening the window
    #[arg(long)]
    summary: bool,

    /// First day of the period (YYYY-MM-DD); summary mode only
    #[arg(long, requires = "summary")]
    from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD); summary mode only
    #[arg(long, requires = "summary")]
    to: Option<NaiveDate>,

    /// Restrict to a city (repeatable); summary mode only
    #[arg(long = "city", requires = "summary")]
    cities: Vec<String>,

    /// Restrict to a product (repeatable); summary mode only
    #[arg(long = "product", requires = "summary")]
    products: Vec<String>,

    /// Write dados_filtrados.csv and resumo_kpis.csv here; summary mode only
    #[arg(long, requires = "summary")]
    export_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.summary {
        let args = summary::SelectionArgs {
            from: cli.from,
            to: cli.to,
            cities: cli.cities,
            products: cli.products,
        };
        return summary::run(&cli.source, &args, cli.export_dir.as_deref());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let source = cli.source;
    eframe::run_native(
        "Dashboard de Vendas",
        options,
        Box::new(move |_cc| Ok(Box::new(SalesDashboardApp::new(source)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the dashboard window: {e}"))
}
