//! Futures Position Signals Library
//!
//! Turns exchange top-20 member position rankings into per-contract
//! directional signals and classifies term structure across maturities.

pub mod common;
pub mod config;
pub mod orchestrator;
pub mod position;
pub mod source;
pub mod strategy;
pub mod summary;
pub mod term_structure;

// Re-export commonly used types
pub use common::errors::{AnalysisError, Result};
pub use common::types::{
    CacheKey, Direction, Exchange, SeatActivity, SeatInformedness, Signal, SignalDetail,
};
pub use config::types::AppConfig;
pub use orchestrator::{AnalysisOrchestrator, AnalysisRun, ContractAnalysis, SkippedContract};
pub use position::{
    normalize, AggregateStats, NormalizedPositionTable, Normalizer, PositionRow, RawPositionTable,
    RawValue,
};
pub use source::{fetch_all, FetchOutcome, JsonFileSource, PositionSource};
pub use summary::{trade_opportunities, MarketOutlook, StrategySummary, TradeOpportunities};
pub use term_structure::{
    PriceBasis, TermStructureClassifier, TermStructurePoint, TermStructureResult,
    TermStructureShape,
};

// Strategy types
pub use strategy::{
    AnalysisContext, BoxedStrategy, PowerChangeStrategy, RetailReverseStrategy,
    SpiderWebStrategy, Strategy,
};
