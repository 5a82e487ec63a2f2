//! Trait definitions for exchange data sources

use async_trait::async_trait;
use chrono::NaiveDate;

use super::errors::Result;
use super::types::Exchange;
use crate::position::ExchangeTables;

/// Trait for position-ranking data sources (exchange feeds, files, caches)
///
/// A source returns every contract table an exchange published for one trade
/// date, keyed by the exchange's own contract symbol. Sources that have
/// nothing for the date return `AnalysisError::DataUnavailable`; the engine
/// treats that exactly like an empty table set.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Exchange this source serves
    fn exchange(&self) -> Exchange;

    /// Fetch all ranking tables for the given trade date
    ///
    /// # Arguments
    /// * `trade_date` - Exchange trade date
    async fn fetch(&self, trade_date: NaiveDate) -> Result<ExchangeTables>;
}

/// Boxed source for dynamic dispatch
pub type BoxedSource = Box<dyn PositionSource>;

#[async_trait]
impl<T: PositionSource + ?Sized> PositionSource for Box<T> {
    fn exchange(&self) -> Exchange {
        (**self).exchange()
    }

    async fn fetch(&self, trade_date: NaiveDate) -> Result<ExchangeTables> {
        (**self).fetch(trade_date).await
    }
}
