//! Strategy module for position-ranking signals
//!
//! This module provides the strategy abstraction and the built-in
//! strategies run against every contract.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  NormalizedPositionTable + AggregateStats (+ prior table)   │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  AnalysisContext (read-only, one per contract)              │
//! │       │                                                     │
//! │       ├──▶ PowerChangeStrategy   → Signal                   │
//! │       ├──▶ SpiderWebStrategy     → Signal                   │
//! │       └──▶ RetailReverseStrategy → Signal                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Strategy`]: Trait every strategy implements
//! - [`AnalysisContext`]: Read-only per-contract input
//! - [`default_strategies`]: The registered strategy list built from settings
//!
//! # Example
//!
//! ```ignore
//! use futures_position_signals::strategy::{AnalysisContext, PowerChangeStrategy, Strategy};
//!
//! let table = normalize(&raw)?;
//! let ctx = AnalysisContext::new("SHFE_rb2410", &table);
//! let signal = PowerChangeStrategy.analyze(&ctx)?;
//! println!("{}: {}", signal.direction, signal.rationale);
//! ```

mod power_change;
mod retail_reverse;
mod spider_web;
mod traits;
mod types;

pub use types::{AnalysisContext, POWER_CHANGE, RETAIL_REVERSE, SPIDER_WEB};

pub use traits::{BoxedStrategy, Strategy};

pub use power_change::PowerChangeStrategy;
pub use retail_reverse::RetailReverseStrategy;
pub use spider_web::SpiderWebStrategy;

use crate::config::types::EngineSettings;

/// Built-in strategies configured from engine settings, in report order
pub fn default_strategies(settings: &EngineSettings) -> Vec<BoxedStrategy> {
    vec![
        Box::new(PowerChangeStrategy::new()),
        Box::new(SpiderWebStrategy::new(settings.informed_split_ratio)),
        Box::new(RetailReverseStrategy::new(settings.retail_seats.iter().cloned())),
    ]
}
