use std::fmt;

use thiserror::Error;

/// Which stage of the pipeline ran out of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyScope {
    /// Nothing survived cleaning.
    Loaded,
    /// The current filter selection matches no rows.
    Filtered,
}

impl fmt::Display for EmptyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyScope::Loaded => write!(f, "dataset is empty or has no valid rows"),
            EmptyScope::Filtered => write!(f, "no rows match the current filters"),
        }
    }
}

/// Errors that stop a load attempt or a report build.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("{scope}")]
    EmptyDataset { scope: EmptyScope },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON layout: {0}")]
    JsonLayout(String),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Row-level parse problem. Never fatal: each variant maps to a fixed
/// cleaning policy (drop the row or default the field).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldIssue {
    #[error("unparsable date {0:?}, row dropped")]
    BadDate(String),

    #[error("unparsable unit price {0:?}, row dropped")]
    BadUnitPrice(String),

    #[error("unparsable quantity {0:?}, defaulted to 0")]
    BadQuantity(String),
}
