//! Raw position-ranking tables as delivered by exchange feeds

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical column names every normalized table exposes
pub mod columns {
    pub const LONG_SEAT_NAME: &str = "long_seat_name";
    pub const LONG_OPEN_INTEREST: &str = "long_open_interest";
    pub const LONG_OPEN_INTEREST_CHANGE: &str = "long_open_interest_change";
    pub const SHORT_SEAT_NAME: &str = "short_seat_name";
    pub const SHORT_OPEN_INTEREST: &str = "short_open_interest";
    pub const SHORT_OPEN_INTEREST_CHANGE: &str = "short_open_interest_change";
    pub const TRADED_VOLUME: &str = "traded_volume";

    /// Columns that must be present (structurally) after alias resolution
    pub const REQUIRED: [&str; 7] = [
        LONG_SEAT_NAME,
        LONG_OPEN_INTEREST,
        LONG_OPEN_INTEREST_CHANGE,
        SHORT_SEAT_NAME,
        SHORT_OPEN_INTEREST,
        SHORT_OPEN_INTEREST_CHANGE,
        TRADED_VOLUME,
    ];
}

/// Exchange-specific column labels mapped onto canonical names
///
/// - `long_party_name`, `short_party_name`, `*_chg`, `vol`: the common
///   ranking-table labels used by DCE, SHFE, CFFEX and GFEX feeds.
/// - `g_party_n`, `open_inten`, `inten_intert`, `t_party_n` and their `.1`
///   duplicates: the CZCE label scheme, where the short block repeats the
///   long block's headers with a `.1` suffix.
/// - `volume`: alternate spelling seen in re-exported files.
pub const COLUMN_ALIASES: [(&str, &str); 12] = [
    ("long_party_name", columns::LONG_SEAT_NAME),
    ("g_party_n", columns::LONG_SEAT_NAME),
    ("open_inten", columns::LONG_OPEN_INTEREST),
    ("long_open_interest_chg", columns::LONG_OPEN_INTEREST_CHANGE),
    ("inten_intert", columns::LONG_OPEN_INTEREST_CHANGE),
    ("short_party_name", columns::SHORT_SEAT_NAME),
    ("t_party_n", columns::SHORT_SEAT_NAME),
    ("open_inten.1", columns::SHORT_OPEN_INTEREST),
    ("short_open_interest_chg", columns::SHORT_OPEN_INTEREST_CHANGE),
    ("inten_intert.1", columns::SHORT_OPEN_INTEREST_CHANGE),
    ("vol", columns::TRADED_VOLUME),
    ("volume", columns::TRADED_VOLUME),
];

/// Resolve a column label to its canonical name (identity when unaliased)
pub fn canonical_column(label: &str) -> &str {
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(label)
}

/// A single cell of a raw ranking table
///
/// Feeds deliver numbers as JSON numbers, as strings with thousands
/// separators (`"1,234"`), or leave the cell empty. Any other JSON shape
/// (bool, array, object) is kept as `Other` and reads as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
    Other(serde_json::Value),
}

impl RawValue {
    /// Numeric view of the cell; `None` means missing
    ///
    /// Strings are trimmed and stripped of `,` separators (ASCII and
    /// full-width) and embedded spaces before parsing. Non-finite values are
    /// missing.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| !matches!(c, ',' | '，') && !c.is_whitespace())
                    .collect();
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse::<f64>().ok()?
            }
            RawValue::Null | RawValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Text view of the cell; blank strings are missing
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawValue::Number(n) if n.is_finite() => Some(n.to_string()),
            _ => None,
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Null
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Null)
    }
}

/// One raw seat record keyed by the feed's column labels
pub type RawRecord = BTreeMap<String, RawValue>;

/// A raw per-contract ranking table
///
/// `columns` is the table header. Feeds that only ship row objects may leave
/// it empty, in which case the header is the union of row keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPositionTable {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<RawRecord>,
}

impl RawPositionTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRecord>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from row objects only
    pub fn from_rows(rows: Vec<RawRecord>) -> Self {
        Self {
            columns: Vec::new(),
            rows,
        }
    }

    /// Effective header in first-seen order
    pub fn header(&self) -> Vec<String> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }
        let mut header: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !header.iter().any(|h| h == key) {
                    header.push(key.clone());
                }
            }
        }
        header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All contract tables one exchange published for a trade date, keyed by symbol
pub type ExchangeTables = BTreeMap<String, RawPositionTable>;

/// Typed constructor for a raw row in canonical labels
///
/// Convenience for callers and tests that already hold typed values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPositionRow {
    pub long_seat_name: Option<String>,
    pub long_open_interest: RawValue,
    pub long_open_interest_change: RawValue,
    pub short_seat_name: Option<String>,
    pub short_open_interest: RawValue,
    pub short_open_interest_change: RawValue,
    pub traded_volume: RawValue,
}

impl RawPositionRow {
    pub fn into_record(self) -> RawRecord {
        let name = |n: Option<String>| n.map(RawValue::Text).unwrap_or(RawValue::Null);
        let mut record = RawRecord::new();
        record.insert(columns::LONG_SEAT_NAME.to_string(), name(self.long_seat_name));
        record.insert(columns::LONG_OPEN_INTEREST.to_string(), self.long_open_interest);
        record.insert(
            columns::LONG_OPEN_INTEREST_CHANGE.to_string(),
            self.long_open_interest_change,
        );
        record.insert(columns::SHORT_SEAT_NAME.to_string(), name(self.short_seat_name));
        record.insert(columns::SHORT_OPEN_INTEREST.to_string(), self.short_open_interest);
        record.insert(
            columns::SHORT_OPEN_INTEREST_CHANGE.to_string(),
            self.short_open_interest_change,
        );
        record.insert(columns::TRADED_VOLUME.to_string(), self.traded_volume);
        record
    }
}

impl FromIterator<RawPositionRow> for RawPositionTable {
    fn from_iter<I: IntoIterator<Item = RawPositionRow>>(iter: I) -> Self {
        let rows = iter.into_iter().map(RawPositionRow::into_record).collect();
        Self::new(
            columns::REQUIRED.iter().map(|c| c.to_string()).collect(),
            rows,
        )
    }
}
