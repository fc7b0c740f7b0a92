use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use super::error::{EmptyScope, FieldIssue, LoadError};
use super::model::{
    SaleRecord, SalesDataset, COL_CITY, COL_DATE, COL_PRODUCT, COL_QUANTITY, COL_UNIT_PRICE,
    REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Load results
// ---------------------------------------------------------------------------

/// Counters describing what cleaning did to the raw rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped_bad_date: usize,
    pub dropped_bad_price: usize,
    pub quantity_defaulted: usize,
}

impl CleaningReport {
    pub fn rows_dropped(&self) -> usize {
        self.dropped_bad_date + self.dropped_bad_price
    }
}

/// A cleaned dataset together with its cleaning statistics.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: SalesDataset,
    pub cleaning: CleaningReport,
}

/// One uncleaned row: the five required cells as text, `None` when absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub date: Option<String>,
    pub city: Option<String>,
    pub product: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// On-disk layouts a sales file can come in.
///
/// * `.csv`     – header row with `data,cidade,produto,quantidade,preco_unit`
/// * `.json`    – `[{ "data": "...", "cidade": "...", ... }, ...]`
/// * `.parquet` – any column types; cells are rendered to text and cleaned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    Parquet,
}

impl SourceFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "json" => Ok(SourceFormat::Json),
            "parquet" | "pq" => Ok(SourceFormat::Parquet),
            other => Err(LoadError::UnsupportedExtension(other.to_string())),
        }
    }
}

/// Load and clean a sales dataset from a file.  Dispatch by extension.
pub fn load_file(path: &Path) -> Result<LoadedDataset, LoadError> {
    let format = SourceFormat::from_path(path)?;
    load_bytes(format, Bytes::from(std::fs::read(path)?))
}

/// Load and clean a dataset from an in-memory copy of a file.
pub fn load_bytes(format: SourceFormat, bytes: Bytes) -> Result<LoadedDataset, LoadError> {
    match format {
        SourceFormat::Csv => load_csv(&bytes[..]),
        SourceFormat::Json => load_json(&bytes),
        SourceFormat::Parquet => load_parquet(bytes),
    }
}

/// Load CSV from any reader (an opened file or an ad-hoc upload).
pub fn load_csv<R: Read>(source: R) -> Result<LoadedDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = ColumnIndex::locate(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).map(str::to_string);
        rows.push(RawRow {
            date: cell(columns.date),
            city: cell(columns.city),
            product: cell(columns.product),
            quantity: cell(columns.quantity),
            unit_price: cell(columns.unit_price),
        });
    }

    clean_rows(rows)
}

/// Clean raw rows into a dataset.
///
/// Row policy: bad date or unit price drops the row, bad quantity becomes 0,
/// missing city/product becomes an empty label.  An empty result is an error.
pub fn clean_rows<I>(rows: I) -> Result<LoadedDataset, LoadError>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut cleaning = CleaningReport::default();
    let mut records = Vec::new();

    for (row_no, raw) in rows.into_iter().enumerate() {
        cleaning.rows_read += 1;
        match clean_row(raw) {
            Ok((record, issue)) => {
                if let Some(issue) = issue {
                    log::debug!("row {row_no}: {issue}");
                    cleaning.quantity_defaulted += 1;
                }
                records.push(record);
            }
            Err(issue) => {
                log::debug!("row {row_no}: {issue}");
                match issue {
                    FieldIssue::BadDate(_) => cleaning.dropped_bad_date += 1,
                    FieldIssue::BadUnitPrice(_) => cleaning.dropped_bad_price += 1,
                    FieldIssue::BadQuantity(_) => {}
                }
            }
        }
    }
    cleaning.rows_kept = records.len();

    if cleaning.rows_dropped() > 0 {
        log::warn!(
            "dropped {} of {} rows ({} bad date, {} bad unit price)",
            cleaning.rows_dropped(),
            cleaning.rows_read,
            cleaning.dropped_bad_date,
            cleaning.dropped_bad_price
        );
    }

    if records.is_empty() {
        return Err(LoadError::EmptyDataset {
            scope: EmptyScope::Loaded,
        });
    }

    Ok(LoadedDataset {
        dataset: SalesDataset::from_records(records),
        cleaning,
    })
}

/// Clean one row. `Err` means the row is dropped; `Ok` may carry the
/// non-fatal quantity issue.
fn clean_row(raw: RawRow) -> Result<(SaleRecord, Option<FieldIssue>), FieldIssue> {
    let date_text = raw.date.unwrap_or_default();
    let date = parse_date(&date_text).ok_or(FieldIssue::BadDate(date_text))?;

    let price_text = raw.unit_price.unwrap_or_default();
    let unit_price = parse_unit_price(&price_text).ok_or(FieldIssue::BadUnitPrice(price_text))?;

    let qty_text = raw.quantity.unwrap_or_default();
    let (quantity, issue) = match parse_quantity(&qty_text) {
        Some(q) => (q, None),
        None => (0, Some(FieldIssue::BadQuantity(qty_text))),
    };

    let record = SaleRecord {
        date,
        city: raw.city.as_deref().unwrap_or("").trim().to_string(),
        product: raw.product.as_deref().unwrap_or("").trim().to_string(),
        quantity,
        unit_price,
    };
    Ok((record, issue))
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a calendar date. Time-of-day and offsets are discarded.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Largest quantity accepted for a single row.
pub const MAX_QUANTITY: u64 = 1_000_000_000;

/// Parse a non-negative quantity. Decimals are truncated toward zero;
/// negative, non-numeric or out-of-range text yields `None`.
pub fn parse_quantity(s: &str) -> Option<u64> {
    let s = s.trim();
    let qty = match s.parse::<u64>() {
        Ok(n) => n,
        Err(_) => {
            let v = s.parse::<f64>().ok()?;
            if !v.is_finite() || v < 0.0 || v > MAX_QUANTITY as f64 {
                return None;
            }
            v.trunc() as u64
        }
    };
    (qty <= MAX_QUANTITY).then_some(qty)
}

/// Parse a unit price as an exact decimal. Plain (`10.50`) and scientific
/// (`1.05e1`) notation are accepted; `inf`, `NaN` and currency text are not.
pub fn parse_unit_price(s: &str) -> Option<Decimal> {
    let s = s.trim();
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

/// Positions of the required columns in a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    city: usize,
    product: usize,
    quantity: usize,
    unit_price: usize,
}

impl ColumnIndex {
    /// Find every required column, reporting all missing ones at once.
    fn locate(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        match (
            find(COL_DATE),
            find(COL_CITY),
            find(COL_PRODUCT),
            find(COL_QUANTITY),
            find(COL_UNIT_PRICE),
        ) {
            (Some(date), Some(city), Some(product), Some(quantity), Some(unit_price)) => {
                Ok(ColumnIndex {
                    date,
                    city,
                    product,
                    quantity,
                    unit_price,
                })
            }
            _ => Err(missing_columns(|name| find(name).is_some())),
        }
    }
}

fn missing_columns(has: impl Fn(&str) -> bool) -> LoadError {
    let missing = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !has(c))
        .map(|c| c.to_string())
        .collect();
    LoadError::MissingColumns { missing }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "data": "2024-01-01", "cidade": "SP", "produto": "Caneca",
///     "quantidade": 2, "preco_unit": 10.0 },
///   ...
/// ]
/// ```
fn load_json(bytes: &[u8]) -> Result<LoadedDataset, LoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::JsonLayout("expected top-level JSON array".into()))?;

    let mut objects = Vec::with_capacity(records.len());
    let mut keys: BTreeSet<&str> = BTreeSet::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::JsonLayout(format!("row {i} is not a JSON object")))?;
        keys.extend(obj.keys().map(String::as_str));
        objects.push(obj);
    }
    if REQUIRED_COLUMNS.iter().any(|c| !keys.contains(c)) {
        return Err(missing_columns(|name| keys.contains(name)));
    }

    let rows = objects.into_iter().map(|obj| {
        let cell = |name: &str| obj.get(name).and_then(json_to_text);
        RawRow {
            date: cell(COL_DATE),
            city: cell(COL_CITY),
            product: cell(COL_PRODUCT),
            quantity: cell(COL_QUANTITY),
            unit_price: cell(COL_UNIT_PRICE),
        }
    });
    clean_rows(rows)
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Column types are free-form (strings, ints, floats,
/// Date32, timestamps); every cell goes through the same text cleaning.
fn load_parquet(bytes: Bytes) -> Result<LoadedDataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;

    let schema = builder.schema().clone();
    let has = |name: &str| schema.index_of(name).is_ok();
    if REQUIRED_COLUMNS.iter().any(|c| !has(c)) {
        return Err(missing_columns(has));
    }

    let reader = builder.build()?;
    let options = FormatOptions::default();
    let mut rows = Vec::new();

    for batch in reader {
        let batch = batch?;
        let batch_schema = batch.schema();
        let column = |name: &str| -> Result<_, LoadError> {
            let idx = batch_schema.index_of(name)?;
            Ok(batch.column(idx).clone())
        };
        let cols = [
            column(COL_DATE)?,
            column(COL_CITY)?,
            column(COL_PRODUCT)?,
            column(COL_QUANTITY)?,
            column(COL_UNIT_PRICE)?,
        ];
        let formatters = cols
            .iter()
            .map(|c| ArrayFormatter::try_new(c.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()?;

        for row in 0..batch.num_rows() {
            let cell = |i: usize| {
                if cols[i].is_null(row) {
                    None
                } else {
                    Some(formatters[i].value(row).to_string())
                }
            };
            rows.push(RawRow {
                date: cell(0),
                city: cell(1),
                product: cell(2),
                quantity: cell(3),
                unit_price: cell(4),
            });
        }
    }

    clean_rows(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SCENARIO: &str = "\
data,cidade,produto,quantidade,preco_unit
2024-01-01,SP,Caneca,2,10.00
2024-01-02,RJ,Copo,1,5.00
2024-01-01,SP,Copo,0,5.00
";

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn cleans_example_scenario() {
        let loaded = load_csv(SCENARIO.as_bytes()).expect("scenario should load");
        let totals: Vec<String> = loaded
            .dataset
            .records()
            .iter()
            .map(|r| r.total().to_string())
            .collect();

        assert_eq!(loaded.dataset.len(), 3);
        assert_eq!(totals, vec!["20.00", "5.00", "0.00"]);
        assert_eq!(loaded.cleaning.rows_dropped(), 0);
    }

    #[test]
    fn drops_rows_with_bad_date_or_price() {
        let csv = "\
data,cidade,produto,quantidade,preco_unit
2024-01-01,SP,Caneca,2,10.00
not-a-date,SP,Caneca,2,10.00
2024-01-02,RJ,Copo,1,abc
2024-01-03,RJ,Copo,1,
2024-13-45,RJ,Copo,1,3.0
2024-01-04,BH,Prato,3,2.5
";
        let loaded = load_csv(csv.as_bytes()).unwrap();

        assert_eq!(loaded.cleaning.rows_read, 6);
        assert_eq!(loaded.dataset.len(), 2);
        assert_eq!(loaded.cleaning.dropped_bad_date, 2);
        assert_eq!(loaded.cleaning.dropped_bad_price, 2);
        let cities: Vec<&str> = loaded
            .dataset
            .records()
            .iter()
            .map(|r| r.city.as_str())
            .collect();
        assert_eq!(cities, vec!["SP", "BH"]);
    }

    #[test]
    fn bad_quantity_is_kept_as_zero() {
        let csv = "\
data,cidade,produto,quantidade,preco_unit
2024-01-01,SP,Caneca,dois,10.00
2024-01-01,SP,Caneca,-3,10.00
2024-01-01,SP,Caneca,2.0,10.00
";
        let loaded = load_csv(csv.as_bytes()).unwrap();
        let qty: Vec<u64> = loaded.dataset.records().iter().map(|r| r.quantity).collect();

        assert_eq!(qty, vec![0, 0, 2]);
        assert_eq!(loaded.cleaning.quantity_defaulted, 2);
        assert_eq!(loaded.dataset.records()[0].total(), Decimal::ZERO);
    }

    #[test]
    fn out_of_range_quantity_is_kept_as_zero() {
        let csv = "\
data,cidade,produto,quantidade,preco_unit
2024-01-01,SP,Caneca,1e20,10.00
2024-01-01,SP,Caneca,18446744073709551616,10.00
2024-01-01,SP,Caneca,1e20,10.00
2024-01-01,SP,Caneca,3,10.00
";
        let loaded = load_csv(csv.as_bytes()).unwrap();
        let qty: Vec<u64> = loaded.dataset.records().iter().map(|r| r.quantity).collect();

        assert_eq!(qty, vec![0, 0, 0, 3]);
        assert_eq!(loaded.cleaning.quantity_defaulted, 3);
    }

    #[test]
    fn trims_labels_and_defaults_missing_ones() {
        let csv = "\
data,cidade,produto,quantidade,preco_unit
2024-01-01,  Sao Paulo ,  Caneca  ,1,1.5
2024-01-02,,,1,1.5
";
        let loaded = load_csv(csv.as_bytes()).unwrap();
        let recs = loaded.dataset.records();

        assert_eq!(recs[0].city, "Sao Paulo");
        assert_eq!(recs[0].product, "Caneca");
        assert_eq!(recs[1].city, "");
        assert_eq!(recs[1].product, "");
    }

    #[test]
    fn short_rows_treat_absent_cells_as_missing() {
        let csv = "\
data,cidade,produto,quantidade,preco_unit
2024-01-01,SP,Caneca,1,2.0
2024-01-02,SP
";
        let loaded = load_csv(csv.as_bytes()).unwrap();
        assert_eq!(loaded.dataset.len(), 1);
        assert_eq!(loaded.cleaning.dropped_bad_price, 1);
    }

    #[test]
    fn reports_all_missing_columns_before_parsing() {
        let csv = "data,cidade,qtd\n2024-01-01,SP,1\n";
        match load_csv(csv.as_bytes()) {
            Err(LoadError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["produto", "quantidade", "preco_unit"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn header_whitespace_and_extra_columns_are_tolerated() {
        let csv = "id, data ,cidade,produto,quantidade,preco_unit,obs\n7,2024-01-01,SP,Copo,1,5.0,x\n";
        let loaded = load_csv(csv.as_bytes()).unwrap();
        assert_eq!(loaded.dataset.records()[0].product, "Copo");
    }

    #[test]
    fn all_rows_invalid_is_empty_dataset() {
        let csv = "data,cidade,produto,quantidade,preco_unit\nxx,SP,Copo,1,5.0\n";
        assert!(matches!(
            load_csv(csv.as_bytes()),
            Err(LoadError::EmptyDataset {
                scope: EmptyScope::Loaded
            })
        ));

        let header_only = "data,cidade,produto,quantidade,preco_unit\n";
        assert!(matches!(
            load_csv(header_only.as_bytes()),
            Err(LoadError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn parses_supported_date_forms() {
        assert_eq!(parse_date("2024-01-05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024/01/05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("05/01/2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 13:45:00"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:45:00"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:45:00Z"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date(" 2024-01-05 "), Some(d(2024, 1, 5)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn parses_quantities_and_prices() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity(" 4 "), Some(4));
        assert_eq!(parse_quantity("2.7"), Some(2));
        assert_eq!(parse_quantity("-1"), None);
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("1000000000"), Some(MAX_QUANTITY));
        assert_eq!(parse_quantity("1000000001"), None);
        assert_eq!(parse_quantity("1e20"), None);
        assert_eq!(parse_quantity("18446744073709551616"), None);

        assert_eq!(parse_unit_price("10.5"), Some(Decimal::new(105, 1)));
        assert_eq!(parse_unit_price(" 7 "), Some(Decimal::from(7)));
        assert_eq!(parse_unit_price("0.1"), Some(Decimal::new(1, 1)));
        assert_eq!(parse_unit_price("1.05e1"), Some(Decimal::new(105, 1)));
        assert_eq!(parse_unit_price("inf"), None);
        assert_eq!(parse_unit_price("NaN"), None);
        assert_eq!(parse_unit_price("R$ 3"), None);
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"data": "2024-01-01", "cidade": " SP ", "produto": "Caneca", "quantidade": 2, "preco_unit": 10.0},
            {"data": "2024-01-02", "cidade": "RJ", "produto": "Copo", "quantidade": null, "preco_unit": "5.5"},
            {"data": null, "cidade": "RJ", "produto": "Copo", "quantidade": 1, "preco_unit": 5.0}
        ]"#;
        let loaded = load_json(json.as_bytes()).unwrap();
        let recs = loaded.dataset.records();

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].city, "SP");
        assert_eq!(recs[0].total(), Decimal::from(20));
        assert_eq!(recs[1].quantity, 0);
        assert_eq!(recs[1].unit_price, Decimal::new(55, 1));
    }

    #[test]
    fn json_without_required_keys_is_rejected() {
        let json = r#"[{"data": "2024-01-01", "cidade": "SP"}]"#;
        assert!(matches!(
            load_json(json.as_bytes()),
            Err(LoadError::MissingColumns { .. })
        ));
        assert!(matches!(
            load_json(br#"{"data": []}"#),
            Err(LoadError::JsonLayout(_))
        ));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("vendas.CSV");
        std::fs::File::create(&csv_path)
            .unwrap()
            .write_all(SCENARIO.as_bytes())
            .unwrap();
        assert_eq!(load_file(&csv_path).unwrap().dataset.len(), 3);

        let txt_path = dir.path().join("vendas.txt");
        std::fs::write(&txt_path, SCENARIO).unwrap();
        assert!(matches!(
            load_file(&txt_path),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn loads_parquet_with_typed_columns() {
        use std::sync::Arc;

        use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("data", DataType::Date32, true),
            Field::new("cidade", DataType::Utf8, true),
            Field::new("produto", DataType::Utf8, true),
            Field::new("quantidade", DataType::Int64, true),
            Field::new("preco_unit", DataType::Float64, true),
        ]));
        // 19723 days after the epoch is 2024-01-01.
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![Some(19723), Some(19724), None])),
                Arc::new(StringArray::from(vec![Some("SP"), Some("RJ"), Some("SP")])),
                Arc::new(StringArray::from(vec![Some("Caneca"), None, Some("Copo")])),
                Arc::new(Int64Array::from(vec![Some(2), None, Some(1)])),
                Arc::new(Float64Array::from(vec![Some(10.0), Some(5.0), Some(5.0)])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendas.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let loaded = load_file(&path).unwrap();
        let from_memory = load_bytes(
            SourceFormat::Parquet,
            Bytes::from(std::fs::read(&path).unwrap()),
        )
        .unwrap();
        assert_eq!(from_memory.dataset.records(), loaded.dataset.records());
        let recs = loaded.dataset.records();

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].date, d(2024, 1, 1));
        assert_eq!(recs[0].total(), Decimal::from(20));
        assert_eq!(recs[1].product, "");
        assert_eq!(recs[1].quantity, 0);
        assert_eq!(loaded.cleaning.dropped_bad_date, 1);
    }
}
