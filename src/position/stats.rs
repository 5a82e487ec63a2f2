//! Aggregate statistics over a normalized ranking table

use serde::{Deserialize, Serialize};

use super::normalizer::{NormalizedPositionTable, PositionRow};

/// Column totals of a ranking table
///
/// Every total sums present values only; a column with no present values
/// sums to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_long: f64,
    pub total_short: f64,
    pub total_long_change: f64,
    pub total_short_change: f64,
    pub total_volume: f64,
    /// Rows in the table, present values or not
    pub seat_count: usize,
}

impl AggregateStats {
    pub fn from_table(table: &NormalizedPositionTable) -> Self {
        let sum = |field: fn(&PositionRow) -> Option<f64>| -> f64 {
            table.iter().filter_map(field).sum()
        };

        Self {
            total_long: sum(|r| r.long_open_interest),
            total_short: sum(|r| r.short_open_interest),
            total_long_change: sum(|r| r.long_open_interest_change),
            total_short_change: sum(|r| r.short_open_interest_change),
            total_volume: sum(|r| r.traded_volume),
            seat_count: table.len(),
        }
    }

    /// True when every total is a finite number
    pub fn is_finite(&self) -> bool {
        [
            self.total_long,
            self.total_short,
            self.total_long_change,
            self.total_short_change,
            self.total_volume,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Long plus short open interest, the position-based price proxy
    pub fn open_interest(&self) -> f64 {
        self.total_long + self.total_short
    }
}
