use crate::position::{AggregateStats, NormalizedPositionTable};

/// Registered name of the power-change strategy
pub const POWER_CHANGE: &str = "power_change";
/// Registered name of the spider-web (MSD) strategy
pub const SPIDER_WEB: &str = "spider_web";
/// Registered name of the retail-reverse strategy
pub const RETAIL_REVERSE: &str = "retail_reverse";

/// Read-only input handed to every strategy for one contract
///
/// Built by the orchestrator once per contract; strategies never own or
/// mutate it.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub contract_id: &'a str,
    pub table: &'a NormalizedPositionTable,
    pub stats: AggregateStats,
    /// Same contract's table from the prior trade date, when the caller has one
    pub previous: Option<&'a NormalizedPositionTable>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(contract_id: &'a str, table: &'a NormalizedPositionTable) -> Self {
        Self {
            contract_id,
            table,
            stats: table.stats(),
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: Option<&'a NormalizedPositionTable>) -> Self {
        self.previous = previous;
        self
    }
}
