use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{SaleRecord, SalesDataset};

// ---------------------------------------------------------------------------
// Filter selection: date window plus allowed cities / products
// ---------------------------------------------------------------------------

/// User-chosen constraints applied before aggregation.
///
/// An empty city or product set means "nothing selected" and matches no
/// rows; it is never read as "no filter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cities: BTreeSet<String>,
    pub products: BTreeSet<String>,
}

impl FilterSelection {
    /// Everything selected: full date extent, every city and product.
    /// `None` for an empty dataset, which has no extent.
    pub fn full(dataset: &SalesDataset) -> Option<Self> {
        let (start, end) = dataset.date_range()?;
        Some(FilterSelection {
            start,
            end,
            cities: dataset.cities().clone(),
            products: dataset.products().clone(),
        })
    }

    /// Order the date bounds and clamp them into the dataset's extent.
    pub fn clamped_to(mut self, dataset: &SalesDataset) -> Self {
        if self.start > self.end {
            std::mem::swap(&mut self.start, &mut self.end);
        }
        if let Some((lo, hi)) = dataset.date_range() {
            self.start = self.start.clamp(lo, hi);
            self.end = self.end.clamp(lo, hi);
        }
        self
    }

    /// Whether a single record passes every constraint.
    pub fn matches(&self, record: &SaleRecord) -> bool {
        record.date >= self.start
            && record.date <= self.end
            && self.cities.contains(&record.city)
            && self.products.contains(&record.product)
    }
}

/// Return the records passing the selection, in dataset order.
pub fn filter_records<'a>(
    dataset: &'a SalesDataset,
    selection: &FilterSelection,
) -> Vec<&'a SaleRecord> {
    dataset
        .records()
        .iter()
        .filter(|rec| selection.matches(rec))
        .collect()
}
