/// Data layer: cleaning, caching, filtering, aggregation and exports.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐      ┌────────┐
///   │  loader   │◄─────│ cache  │  path + BLAKE3 fingerprint
///   └──────────┘      └────────┘
///        │  clean rows → SalesDataset
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → Vec<&SaleRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs, rollups by city / product / day → Report
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  dados_filtrados.csv, resumo_kpis.csv
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
