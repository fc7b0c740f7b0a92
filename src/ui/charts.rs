use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::color::ColorMap;
use crate::data::aggregate::Rollup;
use crate::data::model::SaleRecord;
use crate::format::{brl, brl_f64, date_br, display_label};

/// Bars shown per ranking chart.
pub const TOP_N: usize = 12;

const ROW_HEIGHT: f32 = 18.0;

fn day_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_day(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Plots are drawn in `f64`; only the drawing loses precision.
fn to_plot(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Daily revenue (line)
// ---------------------------------------------------------------------------

/// Revenue per day as a line with markers.
pub fn daily_revenue_plot(ui: &mut Ui, daily: &[(NaiveDate, Decimal)]) {
    let series: Vec<[f64; 2]> = daily
        .iter()
        .map(|&(d, v)| [day_to_x(d), to_plot(v)])
        .collect();

    Plot::new("daily_revenue")
        .height(280.0)
        .x_axis_label("Dia")
        .y_axis_label("Faturamento")
        .x_axis_formatter(|mark: GridMark, _range| {
            let x = mark.value;
            x_to_day(x)
                .filter(|_| x.fract() == 0.0)
                .map(|d| d.format("%d/%m").to_string())
                .unwrap_or_default()
        })
        .y_axis_formatter(|mark: GridMark, _range| brl_f64(mark.value))
        .label_formatter(|_name, point| match x_to_day(point.x) {
            Some(d) => format!("{}\n{}", date_br(d), brl_f64(point.y)),
            None => String::new(),
        })
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .name("Faturamento por dia")
                    .color(Color32::from_rgb(139, 92, 246))
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series))
                    .radius(3.0)
                    .color(Color32::from_rgb(34, 211, 238)),
            );
        });
}

// ---------------------------------------------------------------------------
// Rankings (bars)
// ---------------------------------------------------------------------------

/// Top-[`TOP_N`] bar chart of a rollup, one colour per label.
pub fn rollup_bar_chart(ui: &mut Ui, id: &str, rollup: &Rollup, colors: &ColorMap) {
    let top = rollup.top(TOP_N);
    let labels: Vec<String> = top
        .iter()
        .map(|(label, _)| display_label(label).to_string())
        .collect();

    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, to_plot(*value))
                .name(display_label(label))
                .fill(colors.color_for(label))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(320.0)
        .x_axis_formatter(move |mark: GridMark, _range| {
            if mark.value.fract() != 0.0 || mark.value < 0.0 {
                return String::new();
            }
            labels
                .get(mark.value as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_axis_formatter(|mark: GridMark, _range| brl_f64(mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).element_formatter(Box::new(
                |bar: &Bar, _chart: &BarChart| format!("{}\n{}", bar.name, brl_f64(bar.value)),
            )));
        });
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Full ranking: label and revenue.
pub fn rollup_table(ui: &mut Ui, dimension: &str, rollup: &Rollup) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(160.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(dimension);
            });
            header.col(|ui| {
                ui.strong("total");
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rollup.len(), |mut row| {
                let (label, value) = &rollup.entries[row.index()];
                row.col(|ui| {
                    ui.label(display_label(label));
                });
                row.col(|ui| {
                    ui.label(brl(*value));
                });
            });
        });
}

/// Filtered rows, newest first.
pub fn records_table(ui: &mut Ui, rows: &[&SaleRecord]) {
    let mut sorted: Vec<&SaleRecord> = rows.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(360.0)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["data", "cidade", "produto", "quantidade", "preco_unit", "total"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, sorted.len(), |mut row| {
                let rec = sorted[row.index()];
                row.col(|ui| {
                    ui.label(date_br(rec.date));
                });
                row.col(|ui| {
                    ui.label(display_label(&rec.city));
                });
                row.col(|ui| {
                    ui.label(display_label(&rec.product));
                });
                row.col(|ui| {
                    ui.label(rec.quantity.to_string());
                });
                row.col(|ui| {
                    ui.label(brl(rec.unit_price));
                });
                row.col(|ui| {
                    ui.label(brl(rec.total()));
                });
            });
        });
}
