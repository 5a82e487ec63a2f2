use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classifier::{PriceBasis, TermStructureClassifier, TermStructurePoint, TermStructureResult};
use crate::common::types::contract_symbol;
use crate::orchestrator::ContractAnalysis;

/// One row of an exchange daily quote sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyQuote {
    /// Contract code, e.g. `cu2501`
    pub symbol: String,
    /// Underlying commodity code, e.g. `CU`
    pub variety: String,
    #[serde(default)]
    pub close: Option<f64>,
}

/// Underlying of a contract id: the symbol with maturity digits stripped
///
/// `"SHFE_rb2410"` and `"rb2410"` give `rb`. Variety-level tables that carry
/// no maturity digits give `None`.
pub fn underlying_of(contract_id: &str) -> Option<String> {
    let symbol = contract_symbol(contract_id);
    let root = symbol.trim_end_matches(|c: char| c.is_ascii_digit());
    if root.is_empty() || root.len() == symbol.len() {
        return None;
    }
    Some(root.to_lowercase())
}

/// Curve key of a contract id: exchange prefix plus underlying
///
/// `"SHFE_rb2410"` gives `SHFE_rb`, so the same root listed on two exchanges
/// stays on two curves. Ids without an exchange prefix key on the root alone.
pub fn curve_key(contract_id: &str) -> Option<String> {
    let underlying = underlying_of(contract_id)?;
    Some(match contract_id.rsplit_once('_') {
        Some((exchange, _)) => format!("{exchange}_{underlying}"),
        None => underlying,
    })
}

/// Position-proxy points (long + short open interest) grouped by curve key
pub fn position_proxy_points(
    results: &BTreeMap<String, ContractAnalysis>,
) -> BTreeMap<String, Vec<TermStructurePoint>> {
    let mut grouped: BTreeMap<String, Vec<TermStructurePoint>> = BTreeMap::new();
    for (contract_id, analysis) in results {
        let Some(key) = curve_key(contract_id) else {
            continue;
        };
        grouped
            .entry(key)
            .or_default()
            .push(TermStructurePoint::new(
                contract_id.clone(),
                analysis.stats.open_interest(),
            ));
    }
    grouped
}

/// Classify every underlying from position ranks alone (lower confidence)
pub fn classify_position_proxies(
    classifier: &TermStructureClassifier,
    results: &BTreeMap<String, ContractAnalysis>,
) -> Vec<TermStructureResult> {
    position_proxy_points(results)
        .into_iter()
        .map(|(underlying, points)| classifier.analyze(underlying, points, PriceBasis::PositionProxy))
        .collect()
}

/// Classify every variety in a daily quote sheet from closing prices
pub fn classify_daily_quotes(
    classifier: &TermStructureClassifier,
    quotes: &[DailyQuote],
) -> Vec<TermStructureResult> {
    let mut grouped: BTreeMap<String, Vec<TermStructurePoint>> = BTreeMap::new();
    for quote in quotes {
        let Some(close) = quote.close else {
            continue;
        };
        grouped
            .entry(quote.variety.to_lowercase())
            .or_default()
            .push(TermStructurePoint::new(quote.symbol.clone(), close));
    }

    grouped
        .into_iter()
        .map(|(variety, points)| classifier.analyze(variety, points, PriceBasis::ClosePrice))
        .collect()
}
