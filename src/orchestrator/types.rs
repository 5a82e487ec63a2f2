use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::types::{Direction, Exchange, Signal};
use crate::position::{AggregateStats, NormalizedPositionTable};

/// Every strategy's verdict for one contract
///
/// Immutable once produced; a serializable snapshot with no references back
/// into the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractAnalysis {
    pub contract_id: String,
    /// Strategy name to signal
    pub per_strategy: BTreeMap<String, Signal>,
    pub raw_table: NormalizedPositionTable,
    pub stats: AggregateStats,
}

impl ContractAnalysis {
    pub fn signal(&self, strategy: &str) -> Option<&Signal> {
        self.per_strategy.get(strategy)
    }
}

/// A contract left out of the result map and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedContract {
    pub contract_id: String,
    /// Error category, e.g. `schema`
    pub kind: String,
    pub reason: String,
}

/// An exchange whose data source produced nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableExchange {
    pub exchange: Exchange,
    pub reason: String,
}

/// Outcome of one orchestration run
///
/// Always returned, possibly with fewer contracts than the input; every
/// omission is listed in `skipped` or `unavailable_exchanges`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub results: BTreeMap<String, ContractAnalysis>,
    pub skipped: Vec<SkippedContract>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_exchanges: Vec<UnavailableExchange>,
}

impl AnalysisRun {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn get(&self, contract_id: &str) -> Option<&ContractAnalysis> {
        self.results.get(contract_id)
    }

    /// Signal of one strategy for one contract
    pub fn signal(&self, contract_id: &str, strategy: &str) -> Option<&Signal> {
        self.get(contract_id).and_then(|a| a.signal(strategy))
    }

    /// `(contract_id, signal)` pairs of one strategy with the given direction
    pub fn signals_with(&self, strategy: &str, direction: Direction) -> Vec<(&str, &Signal)> {
        self.results
            .iter()
            .filter_map(|(id, analysis)| {
                analysis
                    .signal(strategy)
                    .filter(|s| s.direction == direction)
                    .map(|s| (id.as_str(), s))
            })
            .collect()
    }
}
