use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::types::{AnalysisRun, ContractAnalysis, SkippedContract, UnavailableExchange};
use crate::common::errors::{AnalysisError, Result};
use crate::common::types::Signal;
use crate::config::types::EngineSettings;
use crate::position::{NormalizedPositionTable, Normalizer, RawPositionTable};
use crate::source::FetchOutcome;
use crate::strategy::{default_strategies, AnalysisContext, BoxedStrategy};

/// Fans raw per-contract tables out to the normalizer and every strategy
///
/// Single-threaded and stateless between runs. Isolation is per
/// (contract, strategy): a schema failure skips that contract, a strategy
/// failure becomes an `Error` signal for that pair only.
pub struct AnalysisOrchestrator {
    normalizer: Normalizer,
    strategies: Vec<BoxedStrategy>,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new(&EngineSettings::default())
    }
}

impl AnalysisOrchestrator {
    /// Orchestrator with the built-in strategies
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            normalizer: Normalizer::new(settings.top_n_seats),
            strategies: default_strategies(settings),
        }
    }

    /// Orchestrator with no strategies registered
    pub fn empty(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            strategies: Vec::new(),
        }
    }

    /// Register an additional strategy; names must be unique
    pub fn register(&mut self, strategy: BoxedStrategy) -> Result<()> {
        if self.strategies.iter().any(|s| s.name() == strategy.name()) {
            return Err(AnalysisError::Configuration(format!(
                "strategy {} is already registered",
                strategy.name()
            )));
        }
        self.strategies.push(strategy);
        Ok(())
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Analyze every contract of one trade date
    pub fn run_analysis(&self, raw: &BTreeMap<String, RawPositionTable>) -> AnalysisRun {
        self.run_analysis_with_previous(raw, &BTreeMap::new())
    }

    /// Analyze every contract, handing strategies the prior snapshot when present
    pub fn run_analysis_with_previous(
        &self,
        raw: &BTreeMap<String, RawPositionTable>,
        previous: &BTreeMap<String, NormalizedPositionTable>,
    ) -> AnalysisRun {
        info!(
            contracts = raw.len(),
            strategies = self.strategies.len(),
            "starting analysis run"
        );

        let mut run = AnalysisRun::default();
        for (contract_id, table) in raw {
            match self.analyze_contract(contract_id, table, previous.get(contract_id)) {
                Ok(analysis) => {
                    run.results.insert(contract_id.clone(), analysis);
                }
                Err(e) => {
                    warn!(contract = %contract_id, error = %e, "skipping contract");
                    run.skipped.push(SkippedContract {
                        contract_id: contract_id.clone(),
                        kind: e.kind().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            analyzed = run.len(),
            skipped = run.skipped_count(),
            "analysis run complete"
        );
        run
    }

    /// Analyze per-exchange fetch outcomes
    ///
    /// Tables are keyed `"{EXCHANGE}_{symbol}"`. A failed or empty fetch
    /// contributes zero contracts and is listed in `unavailable_exchanges`.
    pub fn run_fetched(&self, outcomes: Vec<FetchOutcome>) -> AnalysisRun {
        let mut raw = BTreeMap::new();
        let mut unavailable = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                Ok(tables) if !tables.is_empty() => {
                    for (symbol, table) in tables {
                        raw.insert(outcome.exchange.contract_id(&symbol), table);
                    }
                }
                Ok(_) => unavailable.push(UnavailableExchange {
                    exchange: outcome.exchange,
                    reason: "no tables returned".to_string(),
                }),
                Err(e) => unavailable.push(UnavailableExchange {
                    exchange: outcome.exchange,
                    reason: e.to_string(),
                }),
            }
        }

        let mut run = self.run_analysis(&raw);
        unavailable.sort_by_key(|u| u.exchange);
        run.unavailable_exchanges = unavailable;
        run
    }

    /// Normalize one contract and run every strategy against it
    ///
    /// Only normalization can fail; strategy failures are folded into
    /// `Error` signals.
    pub fn analyze_contract(
        &self,
        contract_id: &str,
        raw: &RawPositionTable,
        previous: Option<&NormalizedPositionTable>,
    ) -> Result<ContractAnalysis> {
        let table = self.normalizer.normalize(raw)?;
        let ctx = AnalysisContext::new(contract_id, &table).with_previous(previous);

        let per_strategy = self
            .strategies
            .iter()
            .map(|strategy| {
                let signal = strategy.analyze(&ctx).unwrap_or_else(|e| {
                    warn!(
                        contract = %contract_id,
                        strategy = strategy.name(),
                        error = %e,
                        "strategy failed"
                    );
                    Signal::error(format!("data processing error: {e}"))
                });
                debug!(
                    contract = %contract_id,
                    strategy = strategy.name(),
                    direction = %signal.direction,
                    strength = signal.strength,
                    "strategy signal"
                );
                (strategy.name().to_string(), signal)
            })
            .collect();

        let stats = ctx.stats;
        Ok(ContractAnalysis {
            contract_id: contract_id.to_string(),
            per_strategy,
            raw_table: table,
            stats,
        })
    }
}
