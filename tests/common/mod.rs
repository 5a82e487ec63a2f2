//! Common test utilities and fixtures

#![allow(dead_code)]

use futures_position_signals::position::{RawPositionRow, RawPositionTable, RawValue};
use std::collections::BTreeMap;

/// Build a ranking row in canonical labels
pub fn row(
    long_seat: &str,
    long_oi: f64,
    long_chg: f64,
    short_seat: &str,
    short_oi: f64,
    short_chg: f64,
    volume: f64,
) -> RawPositionRow {
    RawPositionRow {
        long_seat_name: Some(long_seat.to_string()),
        long_open_interest: long_oi.into(),
        long_open_interest_change: long_chg.into(),
        short_seat_name: Some(short_seat.to_string()),
        short_open_interest: short_oi.into(),
        short_open_interest_change: short_chg.into(),
        traded_volume: volume.into(),
    }
}

/// Longs adding, shorts cutting, no retail seats present
pub fn bullish_table() -> RawPositionTable {
    vec![
        row("中信期货", 12_000.0, 800.0, "国泰君安", 9_000.0, -300.0, 40_000.0),
        row("永安期货", 8_000.0, 400.0, "银河期货", 7_500.0, -200.0, 25_000.0),
        row("海通期货", 6_000.0, 100.0, "华泰期货", 5_000.0, -100.0, 18_000.0),
    ]
    .into_iter()
    .collect()
}

/// Longs cutting, shorts adding, a retail seat piling into longs
pub fn bearish_table() -> RawPositionTable {
    vec![
        row("东方财富", 5_000.0, 600.0, "中信期货", 11_000.0, 900.0, 30_000.0),
        row("永安期货", 7_000.0, -900.0, "国泰君安", 8_000.0, 300.0, 22_000.0),
        row("南华期货", 4_000.0, -500.0, "银河期货", 6_000.0, 100.0, 15_000.0),
    ]
    .into_iter()
    .collect()
}

/// CZCE-labelled table without a traded-volume column
pub fn table_missing_volume() -> RawPositionTable {
    let mut record = BTreeMap::new();
    record.insert("g_party_n".to_string(), RawValue::from("中信期货"));
    record.insert("open_inten".to_string(), RawValue::from("10,000"));
    record.insert("inten_intert".to_string(), RawValue::from("500"));
    record.insert("t_party_n".to_string(), RawValue::from("国泰君安"));
    record.insert("open_inten.1".to_string(), RawValue::from("9,000"));
    record.insert("inten_intert.1".to_string(), RawValue::from("-200"));
    RawPositionTable::from_rows(vec![record])
}

/// Three-contract trade date with one unusable table
pub fn sample_contract_map() -> BTreeMap<String, RawPositionTable> {
    let mut raw = BTreeMap::new();
    raw.insert("SHFE_rb2410".to_string(), bullish_table());
    raw.insert("DCE_m2409".to_string(), bearish_table());
    raw.insert("CZCE_SR409".to_string(), table_missing_volume());
    raw
}
