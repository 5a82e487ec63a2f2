//! Cross-contract digests of an analysis run
//!
//! Read-only views for dashboards and report writers; nothing here feeds
//! back into the strategies.

use serde::{Deserialize, Serialize};

use crate::common::types::Direction;
use crate::orchestrator::AnalysisRun;
use crate::strategy::SPIDER_WEB;

/// Contracts taken from the top of each ranking when intersecting strategies
pub const OPPORTUNITY_TOP_N: usize = 10;
/// Bullish share above which the market outlook is bullish
pub const OUTLOOK_BULLISH_SHARE: f64 = 0.7;
/// Bullish share above which the outlook is cautiously bullish
pub const OUTLOOK_CAUTIOUS_BULLISH_SHARE: f64 = 0.5;
/// Bullish share above which the outlook is cautiously bearish
pub const OUTLOOK_CAUTIOUS_BEARISH_SHARE: f64 = 0.3;

/// One contract's directional signal in a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSignal {
    pub contract_id: String,
    pub strength: f64,
    pub rationale: String,
}

/// Directional signals of one strategy ranked by strength
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: String,
    pub bullish: Vec<RankedSignal>,
    pub bearish: Vec<RankedSignal>,
    pub neutral_count: usize,
    pub error_count: usize,
}

impl StrategySummary {
    pub fn from_run(run: &AnalysisRun, strategy: &str) -> Self {
        let ranked = |direction: Direction| -> Vec<RankedSignal> {
            let mut signals: Vec<RankedSignal> = run
                .signals_with(strategy, direction)
                .into_iter()
                .map(|(contract_id, signal)| RankedSignal {
                    contract_id: contract_id.to_string(),
                    strength: signal.strength,
                    rationale: signal.rationale.clone(),
                })
                .collect();
            // Stable: equal strengths stay in contract order
            signals.sort_by(|a, b| b.strength.total_cmp(&a.strength));
            signals
        };

        Self {
            strategy: strategy.to_string(),
            bullish: ranked(Direction::Bullish),
            bearish: ranked(Direction::Bearish),
            neutral_count: run.signals_with(strategy, Direction::Neutral).len(),
            error_count: run.signals_with(strategy, Direction::Error).len(),
        }
    }

    fn top_bullish(&self, n: usize) -> impl Iterator<Item = &str> {
        self.bullish.iter().take(n).map(|s| s.contract_id.as_str())
    }

    fn top_bearish(&self, n: usize) -> impl Iterator<Item = &str> {
        self.bearish.iter().take(n).map(|s| s.contract_id.as_str())
    }
}

/// Market-wide lean derived from the breadth of bullish signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlookBias {
    Bullish,
    CautiouslyBullish,
    CautiouslyBearish,
    Bearish,
}

/// Share of contracts with a bullish spider-web signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutlook {
    pub bullish_contracts: usize,
    pub total_contracts: usize,
    pub bullish_share: f64,
    pub bias: OutlookBias,
}

impl MarketOutlook {
    pub fn from_run(run: &AnalysisRun) -> Self {
        Self::from_counts(
            run.signals_with(SPIDER_WEB, Direction::Bullish).len(),
            run.len(),
        )
    }

    pub fn from_counts(bullish_contracts: usize, total_contracts: usize) -> Self {
        let bullish_share = if total_contracts > 0 {
            bullish_contracts as f64 / total_contracts as f64
        } else {
            0.0
        };

        let bias = if bullish_share > OUTLOOK_BULLISH_SHARE {
            OutlookBias::Bullish
        } else if bullish_share > OUTLOOK_CAUTIOUS_BULLISH_SHARE {
            OutlookBias::CautiouslyBullish
        } else if bullish_share > OUTLOOK_CAUTIOUS_BEARISH_SHARE {
            OutlookBias::CautiouslyBearish
        } else {
            OutlookBias::Bearish
        };

        Self {
            bullish_contracts,
            total_contracts,
            bullish_share,
            bias,
        }
    }
}

/// Contracts both strategies rank among their strongest signals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOpportunities {
    pub long: Vec<String>,
    pub short: Vec<String>,
}

/// Intersect the top-`top_n` bullish and bearish lists of two strategies
///
/// Output follows the ranking order of `first`.
pub fn trade_opportunities(
    run: &AnalysisRun,
    first: &str,
    second: &str,
    top_n: usize,
) -> TradeOpportunities {
    let a = StrategySummary::from_run(run, first);
    let b = StrategySummary::from_run(run, second);

    let long_b: Vec<&str> = b.top_bullish(top_n).collect();
    let short_b: Vec<&str> = b.top_bearish(top_n).collect();

    TradeOpportunities {
        long: a
            .top_bullish(top_n)
            .filter(|c| long_b.contains(c))
            .map(str::to_string)
            .collect(),
        short: a
            .top_bearish(top_n)
            .filter(|c| short_b.contains(c))
            .map(str::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Signal;
    use crate::orchestrator::ContractAnalysis;
    use crate::position::{AggregateStats, NormalizedPositionTable};
    use crate::strategy::POWER_CHANGE;
    use std::collections::BTreeMap;

    fn run_of(entries: &[(&str, Signal, Signal)]) -> AnalysisRun {
        let mut run = AnalysisRun::default();
        for (contract_id, power, spider) in entries {
            let mut per_strategy = BTreeMap::new();
            per_strategy.insert(POWER_CHANGE.to_string(), power.clone());
            per_strategy.insert(SPIDER_WEB.to_string(), spider.clone());
            run.results.insert(
                contract_id.to_string(),
                ContractAnalysis {
                    contract_id: contract_id.to_string(),
                    per_strategy,
                    raw_table: NormalizedPositionTable::default(),
                    stats: AggregateStats::default(),
                },
            );
        }
        run
    }

    #[test]
    fn test_summary_ranks_by_strength() {
        let run = run_of(&[
            ("a", Signal::bullish(10.0, "a"), Signal::neutral("a")),
            ("b", Signal::bullish(30.0, "b"), Signal::neutral("b")),
            ("c", Signal::error("bad"), Signal::neutral("c")),
            ("d", Signal::bullish(10.0, "d"), Signal::neutral("d")),
        ]);

        let summary = StrategySummary::from_run(&run, POWER_CHANGE);
        let order: Vec<&str> = summary.bullish.iter().map(|s| s.contract_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "d"]);
        assert_eq!(summary.error_count, 1);
        assert!(summary.bearish.is_empty());
    }

    #[test]
    fn test_opportunities_need_both_strategies() {
        let run = run_of(&[
            ("a", Signal::bullish(5.0, ""), Signal::bullish(0.9, "")),
            ("b", Signal::bullish(9.0, ""), Signal::bearish(0.2, "")),
            ("c", Signal::bearish(3.0, ""), Signal::bearish(0.4, "")),
            ("d", Signal::bullish(7.0, ""), Signal::bullish(0.1, "")),
        ]);

        let found = trade_opportunities(&run, POWER_CHANGE, SPIDER_WEB, OPPORTUNITY_TOP_N);
        assert_eq!(found.long, vec!["d".to_string(), "a".to_string()]);
        assert_eq!(found.short, vec!["c".to_string()]);

        // d falls out of the spider-web top one
        let narrow = trade_opportunities(&run, POWER_CHANGE, SPIDER_WEB, 1);
        assert!(narrow.long.is_empty());
    }

    #[test]
    fn test_outlook_from_spider_web_breadth() {
        let run = run_of(&[
            ("a", Signal::neutral(""), Signal::bullish(0.9, "")),
            ("b", Signal::neutral(""), Signal::bullish(0.2, "")),
            ("c", Signal::neutral(""), Signal::bearish(0.4, "")),
        ]);

        let outlook = MarketOutlook::from_run(&run);
        assert_eq!(outlook.bullish_contracts, 2);
        assert_eq!(outlook.total_contracts, 3);
        assert_eq!(outlook.bias, OutlookBias::CautiouslyBullish);
    }

    #[test]
    fn test_outlook_thresholds() {
        assert_eq!(MarketOutlook::from_counts(8, 10).bias, OutlookBias::Bullish);
        assert_eq!(MarketOutlook::from_counts(7, 10).bias, OutlookBias::CautiouslyBullish);
        assert_eq!(MarketOutlook::from_counts(5, 10).bias, OutlookBias::CautiouslyBearish);
        assert_eq!(MarketOutlook::from_counts(3, 10).bias, OutlookBias::Bearish);
        assert_eq!(MarketOutlook::from_counts(0, 0).bullish_share, 0.0);
    }
}
