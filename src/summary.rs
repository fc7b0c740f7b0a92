use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::data::aggregate::{build_report, Report, Rollup};
use crate::data::cache::DatasetCache;
use crate::data::export::{
    kpi_rows, save_filtered_csv, save_summary_csv, FILTERED_FILE_NAME, SUMMARY_FILE_NAME,
};
use crate::data::filter::FilterSelection;
use crate::data::model::SalesDataset;
use crate::format::{brl, date_br, display_label};

/// Filter overrides given on the command line; unset fields keep the
/// "everything selected" default.
#[derive(Debug, Clone, Default)]
pub struct SelectionArgs {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub cities: Vec<String>,
    pub products: Vec<String>,
}

impl SelectionArgs {
    /// Apply the overrides to the full selection of `dataset`.
    pub fn resolve(&self, dataset: &SalesDataset) -> Option<FilterSelection> {
        let full = FilterSelection::full(dataset)?;
        let pick = |values: &[String], all: BTreeSet<String>| -> BTreeSet<String> {
            if values.is_empty() {
                all
            } else {
                values.iter().map(|v| v.trim().to_string()).collect()
            }
        };
        Some(
            FilterSelection {
                start: self.from.unwrap_or(full.start),
                end: self.to.unwrap_or(full.end),
                cities: pick(&self.cities, full.cities),
                products: pick(&self.products, full.products),
            }
            .clamped_to(dataset),
        )
    }
}

/// Load `source`, run the pipeline once, print it and optionally export.
pub fn run(source: &Path, args: &SelectionArgs, export_dir: Option<&Path>) -> Result<()> {
    let mut cache = DatasetCache::new();
    let loaded = cache
        .load(source)
        .with_context(|| format!("loading {}", source.display()))?;
    let dataset = &loaded.dataset;

    let selection = args
        .resolve(dataset)
        .context("dataset has no date extent")?;
    let report = build_report(dataset, &selection).context("building report")?;

    print!("{}", render(&report, loaded.cleaning.rows_dropped()));

    if let Some(dir) = export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        let filtered = dir.join(FILTERED_FILE_NAME);
        let summary = dir.join(SUMMARY_FILE_NAME);
        save_filtered_csv(&filtered, &report.rows)
            .with_context(|| format!("writing {}", filtered.display()))?;
        save_summary_csv(&summary, &report.kpis)
            .with_context(|| format!("writing {}", summary.display()))?;
        log::info!("Exported {} and {}", filtered.display(), summary.display());
    }
    Ok(())
}

/// Plain-text rendering of a report.
pub fn render(report: &Report<'_>, rows_dropped: usize) -> String {
    let mut out = String::new();
    let sel = &report.selection;
    let _ = writeln!(
        out,
        "Período: {} até {} • Registros: {}",
        date_br(sel.start),
        date_br(sel.end),
        report.kpis.records
    );
    if rows_dropped > 0 {
        let _ = writeln!(out, "({rows_dropped} linha(s) inválida(s) ignorada(s))");
    }
    out.push('\n');

    for (name, value) in kpi_rows(&report.kpis) {
        let _ = writeln!(out, "{name:<14}{value:>20}");
    }

    render_rollup(&mut out, "Faturamento por cidade", &report.by_city);
    render_rollup(&mut out, "Faturamento por produto", &report.by_product);

    let _ = writeln!(out, "\nFaturamento por dia");
    for (day, value) in &report.daily {
        let _ = writeln!(out, "  {:<12}{:>20}", date_br(*day), brl(*value));
    }
    out
}

fn render_rollup(out: &mut String, title: &str, rollup: &Rollup) {
    let _ = writeln!(out, "\n{title}");
    let width = rollup
        .entries
        .iter()
        .map(|(label, _)| display_label(label).chars().count())
        .max()
        .unwrap_or(0)
        .max(8);
    for (label, value) in &rollup.entries {
        let label = display_label(label);
        let _ = writeln!(out, "  {label:<width$}{:>20}", brl(*value));
    }
}
