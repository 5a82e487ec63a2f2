//! Per-contract fan-out of the normalizer and strategies
//!
//! ```text
//! contract_id → RawPositionTable
//!        │ normalize (SchemaError ⇒ SkippedContract)
//!        ▼
//! NormalizedPositionTable ──▶ each Strategy ──▶ Signal (Err ⇒ Direction::Error)
//!        │
//!        ▼
//! contract_id → ContractAnalysis { per_strategy, raw_table, stats }
//! ```

mod engine;
mod types;

pub use engine::AnalysisOrchestrator;
pub use types::{AnalysisRun, ContractAnalysis, SkippedContract, UnavailableExchange};
