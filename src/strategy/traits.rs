use crate::common::errors::Result;
use crate::common::types::Signal;
use crate::strategy::types::AnalysisContext;

/// Core strategy trait
///
/// Strategies turn one contract's ranking table into a directional
/// [`Signal`]. They are stateless: everything they read comes from the
/// [`AnalysisContext`].
///
/// # Implementation Notes
///
/// - `analyze` is pure and deterministic for a given context
/// - Numeric faults are returned as `AnalysisError::Computation`; the
///   orchestrator turns them into `Direction::Error` signals so one failing
///   strategy never aborts a batch
/// - Strength scales differ between strategies and are not comparable
///
/// # Example
///
/// ```ignore
/// struct NetLongStrategy;
///
/// impl Strategy for NetLongStrategy {
///     fn name(&self) -> &str { "net_long" }
///
///     fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Signal> {
///         let net = ctx.stats.total_long - ctx.stats.total_short;
///         Ok(if net > 0.0 {
///             Signal::bullish(net, "top seats net long")
///         } else {
///             Signal::neutral("top seats not net long")
///         })
///     }
/// }
/// ```
pub trait Strategy: Send + Sync {
    /// Unique identifier for this strategy, used as the result map key
    fn name(&self) -> &str;

    /// Evaluate one contract
    ///
    /// # Returns
    /// * `Ok(signal)` - Bullish/Bearish/Neutral verdict with rationale
    /// * `Err(_)` - Recoverable per-contract computation failure
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Signal>;
}

/// Boxed strategy for dynamic dispatch
pub type BoxedStrategy = Box<dyn Strategy>;
