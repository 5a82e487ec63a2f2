use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{info, warn};

use crate::common::errors::{AnalysisError, Result};
use crate::common::traits::PositionSource;
use crate::common::types::Exchange;
use crate::position::ExchangeTables;

/// Result of fetching one exchange
#[derive(Debug)]
pub struct FetchOutcome {
    pub exchange: Exchange,
    pub result: Result<ExchangeTables>,
}

impl FetchOutcome {
    pub fn new(exchange: Exchange, result: Result<ExchangeTables>) -> Self {
        Self { exchange, result }
    }
}

/// Fetch every source through a bounded pool with a per-fetch timeout
///
/// At most `max_workers` fetches run at once. A fetch that exceeds `timeout`
/// is reported as `DataUnavailable`. Outcomes are sorted by exchange so the
/// caller sees a stable order regardless of completion order.
pub async fn fetch_all<S>(
    sources: &[S],
    trade_date: NaiveDate,
    max_workers: usize,
    timeout: Duration,
) -> Vec<FetchOutcome>
where
    S: PositionSource,
{
    let mut outcomes: Vec<FetchOutcome> = stream::iter(sources)
        .map(|source| fetch_one(source, trade_date, timeout))
        .buffer_unordered(max_workers.max(1))
        .collect()
        .await;

    outcomes.sort_by_key(|o| o.exchange);
    outcomes
}

async fn fetch_one<S>(source: &S, trade_date: NaiveDate, timeout: Duration) -> FetchOutcome
where
    S: PositionSource + ?Sized,
{
    let exchange = source.exchange();
    info!(exchange = %exchange, date = %trade_date, "fetching ranking tables");

    let result = match tokio::time::timeout(timeout, source.fetch(trade_date)).await {
        Ok(result) => result,
        Err(_) => Err(AnalysisError::DataUnavailable(format!(
            "{exchange} fetch timed out after {}s",
            timeout.as_secs_f64()
        ))),
    };

    match &result {
        Ok(tables) => info!(exchange = %exchange, contracts = tables.len(), "fetched ranking tables"),
        Err(e) => warn!(exchange = %exchange, error = %e, "ranking tables unavailable"),
    }

    FetchOutcome::new(exchange, result)
}
