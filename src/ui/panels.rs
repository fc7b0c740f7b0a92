use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::aggregate::{build_report, KpiSummary, Report};
use crate::data::error::{EmptyScope, LoadError};
use crate::data::export::{
    save_filtered_csv, save_summary_csv, FILTERED_FILE_NAME, SUMMARY_FILE_NAME,
};
use crate::data::filter::FilterSelection;
use crate::format::{brl, date_br, display_label};
use crate::state::{AppState, Dimension, SourceChoice, Status, Tab};
use crate::ui::charts;

// ---------------------------------------------------------------------------
// Left side panel – source and filter widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controles");
    ui.separator();

    // ---- Data source ----
    ui.strong("Fonte de dados");
    let default_name = state
        .default_source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| state.default_source.display().to_string());
    let on_default = state.source_choice == SourceChoice::DefaultFile;

    // Cheap to repeat: an unchanged file comes straight from the cache.
    if ui
        .radio(on_default, format!("Usar {default_name}"))
        .clicked()
    {
        state.load_default();
    }
    if ui.radio(!on_default, "Enviar meu arquivo").clicked() && on_default {
        state.clear_dataset();
        state.source_choice = SourceChoice::OpenedFile;
    }
    if state.source_choice == SourceChoice::OpenedFile && ui.button("Escolher arquivo…").clicked()
    {
        open_file_dialog(state);
    }
    ui.separator();

    let (Some(loaded), Some(selection)) = (state.loaded.clone(), state.selection.clone()) else {
        ui.label("Nenhum dataset carregado.");
        return;
    };

    // ---- Period ----
    ui.strong("Período");
    let mut start = selection.start;
    let mut end = selection.end;
    egui::Grid::new("period_grid").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("De");
        ui.add(DatePickerButton::new(&mut start).id_salt("period_start"));
        ui.end_row();
        ui.label("Até");
        ui.add(DatePickerButton::new(&mut end).id_salt("period_end"));
        ui.end_row();
    });
    if start != selection.start || end != selection.end {
        state.set_date_range(start, end);
    }
    if let Some((lo, hi)) = loaded.dataset.date_range() {
        ui.small(format!("Disponível: {} a {}", date_br(lo), date_br(hi)));
    }
    ui.separator();

    // ---- Per-dimension filter widgets (collapsible) ----
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            dimension_filter(ui, state, Dimension::City, "Cidades");
            dimension_filter(ui, state, Dimension::Product, "Produtos");
        });
}

fn dimension_filter(ui: &mut Ui, state: &mut AppState, dim: Dimension, title: &str) {
    let all_values = state.all_values(dim);

    // Show count of selected / total in the header
    let n_selected = all_values
        .iter()
        .filter(|v| state.is_selected(dim, v))
        .count();
    let header_text = format!("{title}  ({n_selected}/{})", all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Todos").clicked() {
                    state.select_all(dim);
                }
                if ui.small_button("Nenhum").clicked() {
                    state.select_none(dim);
                }
            });

            for val in &all_values {
                let text =
                    RichText::new(display_label(val)).color(state.colors(dim).color_for(val));

                let mut checked = state.is_selected(dim, val);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle(dim, val);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Recarregar arquivo padrão").clicked() {
                state.reload_default();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(loaded), Some(name)) = (&state.loaded, &state.source_label) {
            ui.label(format!("{name}: {} registros válidos", loaded.dataset.len()));
            ui.separator();
        }

        if let Some(status) = &state.status {
            let color = if status.is_error() {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(status.text()).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – header, KPI cards, tabs and downloads
// ---------------------------------------------------------------------------

/// Render the dashboard for the current selection.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let (Some(loaded), Some(selection)) = (state.loaded.clone(), state.selection.clone()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = match state.source_choice {
                SourceChoice::DefaultFile => "Seu dataset está vazio ou com colunas inválidas.",
                SourceChoice::OpenedFile => {
                    "Envie um arquivo com colunas: data, cidade, produto, quantidade, preco_unit"
                }
            };
            ui.heading(hint);
        });
        return;
    };

    // Recomputed from scratch on every frame; the selection is the only input.
    let report = match build_report(&loaded.dataset, &selection) {
        Ok(report) => report,
        Err(e) => {
            header(ui, &selection, 0);
            ui.separator();
            let message = match e {
                LoadError::EmptyDataset {
                    scope: EmptyScope::Filtered,
                } => "Nenhum registro corresponde aos filtros atuais.".to_string(),
                other => other.to_string(),
            };
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(RichText::new(message).color(Color32::LIGHT_RED));
            });
            return;
        }
    };

    header(ui, &selection, report.kpis.records);
    ui.separator();
    kpi_cards(ui, &report.kpis);
    ui.add_space(6.0);
    downloads(ui, &report, &mut state.status);
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.active_tab, Tab::Overview, "Visão geral");
        ui.selectable_value(&mut state.active_tab, Tab::Cities, "Cidades");
        ui.selectable_value(&mut state.active_tab, Tab::Products, "Produtos");
    });
    ui.separator();

    match state.active_tab {
        Tab::Overview => {
            ui.strong("Faturamento por dia");
            charts::daily_revenue_plot(ui, &report.daily);
            ui.add_space(6.0);
            ui.strong("Tabela (dados filtrados)");
            ui.push_id("records_table", |ui: &mut Ui| {
                charts::records_table(ui, &report.rows);
            });
        }
        Tab::Cities => {
            ui.strong(format!("Faturamento por cidade (Top {})", charts::TOP_N));
            charts::rollup_bar_chart(ui, "city_bars", &report.by_city, &state.city_colors);
            ui.add_space(6.0);
            ui.strong("Ranking completo");
            ui.push_id("city_table", |ui: &mut Ui| {
                charts::rollup_table(ui, "cidade", &report.by_city);
            });
        }
        Tab::Products => {
            ui.strong(format!("Faturamento por produto (Top {})", charts::TOP_N));
            charts::rollup_bar_chart(ui, "product_bars", &report.by_product, &state.product_colors);
            ui.add_space(6.0);
            ui.strong("Ranking completo");
            ui.push_id("product_table", |ui: &mut Ui| {
                charts::rollup_table(ui, "produto", &report.by_product);
            });
        }
    }
}

fn header(ui: &mut Ui, selection: &FilterSelection, records: usize) {
    ui.heading("Dashboard de Vendas");
    ui.label(format!(
        "Período filtrado: {} até {} • Registros: {records}",
        date_br(selection.start),
        date_br(selection.end)
    ));
}

fn kpi_cards(ui: &mut Ui, kpis: &KpiSummary) {
    let cards = [
        ("Faturamento", brl(kpis.revenue), "Soma de quantidade × preço no período"),
        ("Itens vendidos", kpis.units.to_string(), "Total de unidades vendidas"),
        ("Registros", kpis.records.to_string(), "Linhas do dataset filtrado"),
        ("Ticket médio", brl(kpis.average_order_value), "Faturamento / registros"),
    ];

    ui.columns(cards.len(), |columns: &mut [Ui]| {
        for (col, (label, value, hint)) in columns.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(label).weak());
                ui.label(RichText::new(value).size(22.0).strong());
                ui.small(hint);
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Downloads
// ---------------------------------------------------------------------------

fn downloads(ui: &mut Ui, report: &Report<'_>, status: &mut Option<Status>) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Baixar dados filtrados (CSV)").clicked() {
            if let Some(path) = save_file_dialog(FILTERED_FILE_NAME) {
                *status = Some(finish_export(save_filtered_csv(&path, &report.rows), &path));
            }
        }
        if ui.button("Baixar resumo (CSV)").clicked() {
            if let Some(path) = save_file_dialog(SUMMARY_FILE_NAME) {
                *status = Some(finish_export(save_summary_csv(&path, &report.kpis), &path));
            }
        }
    });
}

fn finish_export(result: csv::Result<()>, path: &Path) -> Status {
    match result {
        Ok(()) => {
            log::info!("Exported {}", path.display());
            Status::Info(format!("Arquivo salvo: {}", path.display()))
        }
        Err(e) => {
            log::error!("Export to {} failed: {e}", path.display());
            Status::Error(format!("Falha ao salvar {}: {e}", path.display()))
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir dados de vendas")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_opened(&path);
    }
}

fn save_file_dialog(file_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Salvar CSV")
        .set_file_name(file_name)
        .add_filter("CSV", &["csv"])
        .save_file()
}
