use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Column names of the tabular source
// ---------------------------------------------------------------------------

pub const COL_DATE: &str = "data";
pub const COL_CITY: &str = "cidade";
pub const COL_PRODUCT: &str = "produto";
pub const COL_QUANTITY: &str = "quantidade";
pub const COL_UNIT_PRICE: &str = "preco_unit";
/// Derived column, only present in exports.
pub const COL_TOTAL: &str = "total";

/// Columns every source must provide, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_DATE,
    COL_CITY,
    COL_PRODUCT,
    COL_QUANTITY,
    COL_UNIT_PRICE,
];

// ---------------------------------------------------------------------------
// SaleRecord – one cleaned row
// ---------------------------------------------------------------------------

/// A single cleaned sale. `total` is derived on access so it can never
/// disagree with `quantity` and `unit_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub city: String,
    pub product: String,
    pub quantity: u64,
    pub unit_price: Decimal,
}

impl SaleRecord {
    /// `quantity * unit_price`, exact. Saturates at the `Decimal` bounds.
    pub fn total(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price)
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset with pre-computed dimension indices.
///
/// Immutable once built: filtering borrows records, it never edits them.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    records: Vec<SaleRecord>,
    cities: BTreeSet<String>,
    products: BTreeSet<String>,
    date_range: Option<(NaiveDate, NaiveDate)>,
}

impl SalesDataset {
    /// Build dimension indices from the cleaned records.
    pub fn from_records(records: Vec<SaleRecord>) -> Self {
        let mut cities = BTreeSet::new();
        let mut products = BTreeSet::new();
        let mut date_range: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            cities.insert(rec.city.clone());
            products.insert(rec.product.clone());
            date_range = Some(match date_range {
                None => (rec.date, rec.date),
                Some((lo, hi)) => (lo.min(rec.date), hi.max(rec.date)),
            });
        }

        SalesDataset {
            records,
            cities,
            products,
            date_range,
        }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    /// Sorted distinct city labels.
    pub fn cities(&self) -> &BTreeSet<String> {
        &self.cities
    }

    /// Sorted distinct product labels.
    pub fn products(&self) -> &BTreeSet<String> {
        &self.products
    }

    /// Earliest and latest sale date, `None` for an empty dataset.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
