use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::{EmptyScope, LoadError};
use super::filter::{filter_records, FilterSelection};
use super::model::{SaleRecord, SalesDataset};

/// Exact sum of record totals. Every money figure goes through here so that
/// KPIs and rollups agree to the cent.
fn sum_totals<'a, I>(records: I) -> Decimal
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    records
        .into_iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.total()))
}

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

/// Scalar KPIs of a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KpiSummary {
    /// Sum of `total` over the view.
    pub revenue: Decimal,
    /// Sum of `quantity` over the view, saturating at `u64::MAX`.
    pub units: u64,
    /// Number of rows in the view.
    pub records: usize,
    /// `revenue / records`, 0 for an empty view.
    pub average_order_value: Decimal,
}

impl KpiSummary {
    pub fn from_records(records: &[&SaleRecord]) -> Self {
        let revenue = sum_totals(records.iter().copied());
        let units = records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.quantity));
        let count = records.len();
        let average_order_value = if count == 0 {
            Decimal::ZERO
        } else {
            revenue / Decimal::from(count)
        };
        KpiSummary {
            revenue,
            units,
            records: count,
            average_order_value,
        }
    }
}

// ---------------------------------------------------------------------------
// Rollups
// ---------------------------------------------------------------------------

/// Revenue summed per dimension value, highest first.
///
/// Equal revenues keep the order in which the values first appear in the
/// view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rollup {
    pub entries: Vec<(String, Decimal)>,
}

impl Rollup {
    /// Group `records` by `key` and sum their totals.
    pub fn by<F>(records: &[&SaleRecord], key: F) -> Self
    where
        F: Fn(&SaleRecord) -> &str,
    {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<(String, Decimal)> = Vec::new();

        for &rec in records {
            let label = key(rec);
            let slot = *slots.entry(label).or_insert_with(|| {
                entries.push((label.to_string(), Decimal::ZERO));
                entries.len() - 1
            });
            entries[slot].1 = entries[slot].1.saturating_add(rec.total());
        }

        // `sort_by` is stable, so ties stay in first-appearance order.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Rollup { entries }
    }

    pub fn by_city(records: &[&SaleRecord]) -> Self {
        Self::by(records, |r| r.city.as_str())
    }

    pub fn by_product(records: &[&SaleRecord]) -> Self {
        Self::by(records, |r| r.product.as_str())
    }

    /// The `n` highest entries (charts show the top 12).
    pub fn top(&self, n: usize) -> &[(String, Decimal)] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entries.
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, (_, v)| acc.saturating_add(*v))
    }
}

/// Revenue summed per day, oldest first.
pub fn daily_rollup(records: &[&SaleRecord]) -> Vec<(NaiveDate, Decimal)> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for &rec in records {
        let day = days.entry(rec.date).or_default();
        *day = day.saturating_add(rec.total());
    }
    days.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Report – everything the dashboard shows for one selection
// ---------------------------------------------------------------------------

/// Output of one pipeline run over a dataset and a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<'a> {
    pub selection: FilterSelection,
    pub kpis: KpiSummary,
    pub by_city: Rollup,
    pub by_product: Rollup,
    pub daily: Vec<(NaiveDate, Decimal)>,
    pub rows: Vec<&'a SaleRecord>,
}

/// Filter the dataset and derive every KPI and rollup.
///
/// Invoked fresh on every selection change; nothing is cached between runs.
/// An empty filtered view is reported as [`LoadError::EmptyDataset`] so that
/// callers show a message instead of empty charts.
pub fn build_report<'a>(
    dataset: &'a SalesDataset,
    selection: &FilterSelection,
) -> Result<Report<'a>, LoadError> {
    let rows = filter_records(dataset, selection);
    if rows.is_empty() {
        return Err(LoadError::EmptyDataset {
            scope: EmptyScope::Filtered,
        });
    }

    Ok(Report {
        selection: selection.clone(),
        kpis: KpiSummary::from_records(&rows),
        by_city: Rollup::by_city(&rows),
        by_product: Rollup::by_product(&rows),
        daily: daily_rollup(&rows),
        rows,
    })
}
