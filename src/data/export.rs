use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::KpiSummary;
use super::model::SaleRecord;
use crate::format::brl;

/// Default file name for the filtered rows download.
pub const FILTERED_FILE_NAME: &str = "dados_filtrados.csv";
/// Default file name for the KPI summary download.
pub const SUMMARY_FILE_NAME: &str = "resumo_kpis.csv";

// ---------------------------------------------------------------------------
// Filtered rows
// ---------------------------------------------------------------------------

/// One exported row: the source columns plus the derived `total`.
/// Amounts are written as exact decimals, never through a float.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "data")]
    date: String,
    #[serde(rename = "cidade")]
    city: &'a str,
    #[serde(rename = "produto")]
    product: &'a str,
    #[serde(rename = "quantidade")]
    quantity: u64,
    #[serde(rename = "preco_unit")]
    unit_price: Decimal,
    total: Decimal,
}

impl<'a> From<&'a SaleRecord> for ExportRow<'a> {
    fn from(rec: &'a SaleRecord) -> Self {
        ExportRow {
            date: rec.date.format("%Y-%m-%d").to_string(),
            city: &rec.city,
            product: &rec.product,
            quantity: rec.quantity,
            unit_price: rec.unit_price,
            total: rec.total(),
        }
    }
}

/// Write the filtered rows as comma-delimited UTF-8 CSV with a header row.
pub fn write_filtered_csv<W: Write>(rows: &[&SaleRecord], out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for &rec in rows {
        writer.serialize(ExportRow::from(rec))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the filtered rows to a new file at `path`.
pub fn save_filtered_csv(path: &Path, rows: &[&SaleRecord]) -> csv::Result<()> {
    write_filtered_csv(rows, BufWriter::new(File::create(path)?))
}

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

/// `(kpi, valor)` pairs with currency values already formatted.
pub fn kpi_rows(kpis: &KpiSummary) -> [(&'static str, String); 4] {
    [
        ("Faturamento", brl(kpis.revenue)),
        ("Itens", kpis.units.to_string()),
        ("Registros", kpis.records.to_string()),
        ("Ticket médio", brl(kpis.average_order_value)),
    ]
}

/// Write the KPI summary table (`kpi,valor`).
pub fn write_summary_csv<W: Write>(kpis: &KpiSummary, out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["kpi", "valor"])?;
    for (name, value) in kpi_rows(kpis) {
        writer.write_record([name, value.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the KPI summary to a new file at `path`.
pub fn save_summary_csv(path: &Path, kpis: &KpiSummary) -> csv::Result<()> {
    write_summary_csv(kpis, BufWriter::new(File::create(path)?))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn rows() -> Vec<SaleRecord> {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        vec![
            SaleRecord {
                date: d(1),
                city: "SP".into(),
                product: "Caneca".into(),
                quantity: 2,
                unit_price: Decimal::new(1000, 2),
            },
            SaleRecord {
                date: d(2),
                city: "Rio de Janeiro, RJ".into(),
                product: "Copo".into(),
                quantity: 1,
                unit_price: Decimal::new(55, 1),
            },
        ]
    }

    #[test]
    fn filtered_export_has_total_column() {
        let data = rows();
        let refs: Vec<&SaleRecord> = data.iter().collect();
        let mut buf = Vec::new();
        write_filtered_csv(&refs, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "data,cidade,produto,quantidade,preco_unit,total");
        assert_eq!(lines[1], "2024-01-01,SP,Caneca,2,10.00,20.00");
        assert_eq!(lines[2], "2024-01-02,\"Rio de Janeiro, RJ\",Copo,1,5.5,5.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn filtered_export_reloads_through_the_loader() {
        let data = rows();
        let refs: Vec<&SaleRecord> = data.iter().collect();
        let mut buf = Vec::new();
        write_filtered_csv(&refs, &mut buf).unwrap();

        let reloaded = crate::data::loader::load_csv(buf.as_slice()).unwrap();
        assert_eq!(reloaded.dataset.records(), data.as_slice());
    }

    #[test]
    fn summary_export_formats_currency() {
        let kpis = KpiSummary {
            revenue: Decimal::new(123_456, 2),
            units: 42,
            records: 7,
            average_order_value: Decimal::new(176_365_714, 6),
        };
        let mut buf = Vec::new();
        write_summary_csv(&kpis, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "kpi,valor\n\
             Faturamento,\"R$ 1.234,56\"\n\
             Itens,42\n\
             Registros,7\n\
             Ticket médio,\"R$ 176,37\"\n"
        );
    }

    #[test]
    fn saves_both_exports_to_disk() {
        let data = rows();
        let refs: Vec<&SaleRecord> = data.iter().collect();
        let dir = tempfile::tempdir().unwrap();
        let filtered = dir.path().join(FILTERED_FILE_NAME);
        let summary = dir.path().join(SUMMARY_FILE_NAME);

        save_filtered_csv(&filtered, &refs).unwrap();
        save_summary_csv(&summary, &KpiSummary::from_records(&refs)).unwrap();

        let filtered_text = std::fs::read_to_string(&filtered).unwrap();
        assert_eq!(filtered_text.lines().count(), 3);
        let summary_text = std::fs::read_to_string(&summary).unwrap();
        assert!(summary_text.contains("Faturamento,\"R$ 25,50\""));
        assert!(summary_text.contains("Registros,2"));
    }
}
