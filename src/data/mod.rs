/// Data layer: loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  LOGISTICA.csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawTable (index columns dropped)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  parse dates, exclude rows, derive minutes, fill sentinels
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ShipmentTable │  immutable, one per session load
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  four optional equality predicates → new ShipmentTable
///   └──────────┘
///        │
///        ├──► metrics  → MetricsSummary
///        ├──► charts   → ChartData
///        └──► export   → delimited file
/// ```

pub mod charts;
pub mod clean;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod testing;
