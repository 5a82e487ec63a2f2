//! Position-ranking table model
//!
//! ```text
//! RawPositionTable ──normalize──▶ NormalizedPositionTable ──stats──▶ AggregateStats
//!   (feed labels,                  (canonical columns,
//!    strings/nulls)                 Option<f64>, top N rows)
//! ```

mod normalizer;
mod raw;
mod stats;

pub use normalizer::{normalize, NormalizedPositionTable, Normalizer, PositionRow};
pub use raw::{
    canonical_column, columns, ExchangeTables, RawPositionRow, RawPositionTable, RawRecord,
    RawValue, COLUMN_ALIASES,
};
pub use stats::AggregateStats;
