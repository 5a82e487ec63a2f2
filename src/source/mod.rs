//! Exchange data-source collaborators
//!
//! Sources only fetch; they never analyze or cache. Results are keyed by
//! exchange and symbol, so the completion order of the fetch pool does not
//! matter to the engine.

mod file;
mod pool;

pub use crate::common::traits::{BoxedSource, PositionSource};
pub use file::JsonFileSource;
pub use pool::{fetch_all, FetchOutcome};
