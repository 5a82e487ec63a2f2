//! Turns a raw ranking table into a typed, truncated table

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::raw::{canonical_column, columns, RawPositionTable, RawRecord, RawValue};
use super::stats::AggregateStats;
use crate::common::errors::{AnalysisError, Result};
use crate::config::types::DEFAULT_TOP_N_SEATS;

/// One ranked seat entry with numeric fields coerced
///
/// `None` means the cell was absent, empty or unparseable. Missing values are
/// never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionRow {
    pub long_seat_name: Option<String>,
    pub long_open_interest: Option<f64>,
    pub long_open_interest_change: Option<f64>,
    pub short_seat_name: Option<String>,
    pub short_open_interest: Option<f64>,
    pub short_open_interest_change: Option<f64>,
    pub traded_volume: Option<f64>,
}

/// Ranking table after alias resolution, coercion and top-N truncation
///
/// Row order is the exchange's rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPositionTable {
    pub rows: Vec<PositionRow>,
}

impl NormalizedPositionTable {
    pub fn new(rows: Vec<PositionRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PositionRow> {
        self.rows.iter()
    }

    /// Column sums over present values
    pub fn stats(&self) -> AggregateStats {
        AggregateStats::from_table(self)
    }
}

impl<'a> IntoIterator for &'a NormalizedPositionTable {
    type Item = &'a PositionRow;
    type IntoIter = std::slice::Iter<'a, PositionRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Normalizer with an overridable seat cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    top_n: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N_SEATS)
    }
}

impl Normalizer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Normalize a raw table
    ///
    /// Fails with [`AnalysisError::Schema`] when a required column is absent
    /// from the header after alias resolution. Cells that merely hold
    /// missing values are kept as `None`.
    pub fn normalize(&self, raw: &RawPositionTable) -> Result<NormalizedPositionTable> {
        let source = resolve_columns(&raw.header())?;

        let rows: Vec<PositionRow> = raw
            .rows
            .iter()
            .take(self.top_n)
            .map(|record| source.read(record))
            .collect();

        if raw.len() > self.top_n {
            debug!(
                input_rows = raw.len(),
                kept_rows = rows.len(),
                "truncated ranking table to top seats"
            );
        }

        Ok(NormalizedPositionTable { rows })
    }
}

/// Normalize with the default 20-seat cap
pub fn normalize(raw: &RawPositionTable) -> Result<NormalizedPositionTable> {
    Normalizer::default().normalize(raw)
}

/// Source label chosen for each canonical column
struct ColumnSource {
    labels: [String; 7],
}

impl ColumnSource {
    fn read(&self, record: &RawRecord) -> PositionRow {
        let text = |idx: usize| record.get(&self.labels[idx]).and_then(RawValue::as_text);
        let number = |idx: usize| record.get(&self.labels[idx]).and_then(RawValue::as_number);

        PositionRow {
            long_seat_name: text(0),
            long_open_interest: number(1),
            long_open_interest_change: number(2),
            short_seat_name: text(3),
            short_open_interest: number(4),
            short_open_interest_change: number(5),
            traded_volume: number(6),
        }
    }
}

/// Pick a source label per required column; canonical labels beat aliases
fn resolve_columns(header: &[String]) -> Result<ColumnSource> {
    let mut missing = Vec::new();
    let mut labels: [String; 7] = Default::default();

    for (slot, required) in columns::REQUIRED.iter().enumerate() {
        let label = header
            .iter()
            .find(|h| h.as_str() == *required)
            .or_else(|| header.iter().find(|h| canonical_column(h) == *required));

        match label {
            Some(label) => {
                if label != required {
                    debug!(alias = %label, canonical = *required, "resolved column alias");
                }
                labels[slot] = label.clone();
            }
            None => missing.push(required.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(AnalysisError::Schema { missing });
    }
    Ok(ColumnSource { labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::raw::RawPositionRow;
    use pretty_assertions::assert_eq;

    fn czce_record(name: &str, long: &str, short: &str) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("g_party_n".into(), RawValue::from(name));
        record.insert("open_inten".into(), RawValue::from(long));
        record.insert("inten_intert".into(), RawValue::from("10"));
        record.insert("t_party_n".into(), RawValue::from(name));
        record.insert("open_inten.1".into(), RawValue::from(short));
        record.insert("inten_intert.1".into(), RawValue::from("-5"));
        record.insert("vol".into(), RawValue::from("2,000"));
        record
    }

    #[test]
    fn test_czce_aliases_resolve() {
        let raw = RawPositionTable::from_rows(vec![czce_record("中信期货", "1,500", " 900 ")]);
        let table = normalize(&raw).unwrap();

        assert_eq!(
            table.rows[0],
            PositionRow {
                long_seat_name: Some("中信期货".into()),
                long_open_interest: Some(1500.0),
                long_open_interest_change: Some(10.0),
                short_seat_name: Some("中信期货".into()),
                short_open_interest: Some(900.0),
                short_open_interest_change: Some(-5.0),
                traded_volume: Some(2000.0),
            }
        );
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let mut record = czce_record("a", "1", "2");
        record.remove("vol");
        let raw = RawPositionTable::from_rows(vec![record]);

        match normalize(&raw) {
            Err(AnalysisError::Schema { missing }) => {
                assert_eq!(missing, vec![columns::TRADED_VOLUME.to_string()])
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_null_cells_are_not_schema_errors() {
        let raw: RawPositionTable = vec![RawPositionRow {
            long_seat_name: Some("a".into()),
            ..Default::default()
        }]
        .into_iter()
        .collect();

        let table = normalize(&raw).unwrap();
        assert_eq!(table.rows[0].traded_volume, None);
        assert_eq!(table.rows[0].long_open_interest, None);
    }

    #[test]
    fn test_non_scalar_cell_normalizes_to_missing() {
        let raw: RawPositionTable = serde_json::from_str(
            r#"{"rows": [
                {"long_party_name": "中信期货", "open_inten": 1200, "inten_intert": 30,
                 "short_party_name": "国泰君安", "open_inten.1": 900, "inten_intert.1": -10,
                 "traded_volume": true},
                {"long_party_name": "永安期货", "open_inten": 800, "inten_intert": 5,
                 "short_party_name": "银河期货", "open_inten.1": 700, "inten_intert.1": 0,
                 "traded_volume": 5000}
            ]}"#,
        )
        .unwrap();

        let table = normalize(&raw).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].traded_volume, None);
        assert_eq!(table.rows[0].long_open_interest, Some(1200.0));
        assert_eq!(table.rows[1].traded_volume, Some(5000.0));
    }

    #[test]
    fn test_truncates_to_top_n_in_rank_order() {
        let raw = RawPositionTable::from_rows(
            (0..25)
                .map(|i| czce_record(&format!("seat{i}"), "1", "1"))
                .collect(),
        );

        let table = normalize(&raw).unwrap();
        assert_eq!(table.len(), 20);
        assert_eq!(table.rows[0].long_seat_name.as_deref(), Some("seat0"));
        assert_eq!(table.rows[19].long_seat_name.as_deref(), Some("seat19"));

        let small = Normalizer::new(5).normalize(&raw).unwrap();
        assert_eq!(small.len(), 5);
    }

    #[test]
    fn test_empty_table_with_header_normalizes() {
        let raw = RawPositionTable::new(
            columns::REQUIRED.iter().map(|c| c.to_string()).collect(),
            Vec::new(),
        );
        assert!(normalize(&raw).unwrap().is_empty());
    }

    #[test]
    fn test_headerless_empty_table_is_schema_error() {
        let err = normalize(&RawPositionTable::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Schema { ref missing } if missing.len() == 7));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = RawPositionTable::from_rows(vec![
            czce_record("a", "1,000", "bad"),
            czce_record("b", "", "300"),
        ]);
        assert_eq!(normalize(&raw).unwrap(), normalize(&raw).unwrap());
    }
}
