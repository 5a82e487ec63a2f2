//! Unified types shared by strategies, the orchestrator and data sources

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Directional verdict of a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
    Error,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Bullish => write!(f, "bullish"),
            Direction::Bearish => write!(f, "bearish"),
            Direction::Neutral => write!(f, "neutral"),
            Direction::Error => write!(f, "error"),
        }
    }
}

/// Output of one strategy for one contract
///
/// `strength` is strategy-specific: lots for power-change, an MSD magnitude
/// for spider-web, a position share in `[0, 1]` for retail-reverse. Values
/// are not comparable across strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Direction,
    pub strength: f64,
    pub rationale: String,
    /// Strategy-specific breakdown for dashboards and exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<SignalDetail>,
}

impl Signal {
    pub fn new(direction: Direction, strength: f64, rationale: impl Into<String>) -> Self {
        Self {
            direction,
            strength,
            rationale: rationale.into(),
            detail: None,
        }
    }

    pub fn bullish(strength: f64, rationale: impl Into<String>) -> Self {
        Self::new(Direction::Bullish, strength, rationale)
    }

    pub fn bearish(strength: f64, rationale: impl Into<String>) -> Self {
        Self::new(Direction::Bearish, strength, rationale)
    }

    pub fn neutral(rationale: impl Into<String>) -> Self {
        Self::new(Direction::Neutral, 0.0, rationale)
    }

    /// Recoverable per-contract failure; strength is always zero
    pub fn error(rationale: impl Into<String>) -> Self {
        Self::new(Direction::Error, 0.0, rationale)
    }

    pub fn with_detail(mut self, detail: SignalDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Returns true for Bullish or Bearish
    pub fn is_directional(&self) -> bool {
        matches!(self.direction, Direction::Bullish | Direction::Bearish)
    }
}

/// Strategy-specific breakdown attached to a [`Signal`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalDetail {
    PowerChange {
        total_long_change: f64,
        total_short_change: f64,
    },
    SpiderWeb {
        informed_mean_skew: f64,
        uninformed_mean_skew: f64,
        msd: f64,
        informed_seats: usize,
        uninformed_seats: usize,
        seats: Vec<SeatInformedness>,
    },
    RetailReverse {
        retail_ratio: f64,
        seats: Vec<SeatActivity>,
    },
}

/// Per-seat row of the spider-web breakdown, in descending `stat` order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatInformedness {
    pub seat_name: Option<String>,
    pub informed: bool,
    /// (long + short) / traded volume
    pub stat: f64,
    /// (long - short) / (long + short); `None` when both sides are zero
    pub skew: Option<f64>,
}

/// Per-seat activity of a tracked retail-proxy seat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatActivity {
    pub seat_name: String,
    pub long_position: f64,
    pub long_change: f64,
    pub short_position: f64,
    pub short_change: f64,
}

/// Futures exchanges publishing position-ranking tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Dce,
    Cffex,
    Czce,
    Shfe,
    Gfex,
}

impl Exchange {
    pub const ALL: [Exchange; 5] = [
        Exchange::Dce,
        Exchange::Cffex,
        Exchange::Czce,
        Exchange::Shfe,
        Exchange::Gfex,
    ];

    /// Exchange code used in contract ids and file names
    pub fn code(&self) -> &'static str {
        match self {
            Exchange::Dce => "DCE",
            Exchange::Cffex => "CFFEX",
            Exchange::Czce => "CZCE",
            Exchange::Shfe => "SHFE",
            Exchange::Gfex => "GFEX",
        }
    }

    /// Build the `"{EXCHANGE}_{symbol}"` contract id
    pub fn contract_id(&self, symbol: &str) -> String {
        format!("{}_{}", self.code(), symbol)
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Cache key for callers that memoize fetched tables or results
///
/// The engine itself never caches; this only fixes the key shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub contract_id: String,
    pub trade_date: NaiveDate,
}

impl CacheKey {
    pub fn new(contract_id: impl Into<String>, trade_date: NaiveDate) -> Self {
        Self {
            contract_id: contract_id.into(),
            trade_date,
        }
    }
}

/// Symbol part of a `"{EXCHANGE}_{symbol}"` contract id
pub fn contract_symbol(contract_id: &str) -> &str {
    contract_id
        .rsplit_once('_')
        .map(|(_, symbol)| symbol)
        .unwrap_or(contract_id)
}
