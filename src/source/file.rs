use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::errors::{AnalysisError, Result};
use crate::common::traits::PositionSource;
use crate::common::types::Exchange;
use crate::position::ExchangeTables;

/// Reads ranking tables exported as `{dir}/{EXCHANGE}_{YYYYMMDD}.json`
///
/// Each file is a JSON object mapping contract symbol to a raw table
/// (`{"columns": [...], "rows": [{...}, ...]}`).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    exchange: Exchange,
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(exchange: Exchange, dir: impl AsRef<Path>) -> Self {
        Self {
            exchange,
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// One source per exchange, all reading the same directory
    pub fn all(dir: impl AsRef<Path>) -> Vec<Self> {
        Exchange::ALL
            .iter()
            .map(|exchange| Self::new(*exchange, dir.as_ref()))
            .collect()
    }

    pub fn path_for(&self, trade_date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.json",
            self.exchange.code(),
            trade_date.format("%Y%m%d")
        ))
    }
}

#[async_trait]
impl PositionSource for JsonFileSource {
    fn exchange(&self) -> Exchange {
        self.exchange
    }

    async fn fetch(&self, trade_date: NaiveDate) -> Result<ExchangeTables> {
        let path = self.path_for(trade_date);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AnalysisError::DataUnavailable(format!(
                    "{} has no ranking file for {}",
                    self.exchange, trade_date
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let tables: ExchangeTables = serde_json::from_slice(&bytes)?;
        debug!(
            exchange = %self.exchange,
            path = %path.display(),
            contracts = tables.len(),
            "loaded ranking file"
        );
        Ok(tables)
    }
}
