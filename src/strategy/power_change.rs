use crate::common::errors::{AnalysisError, Result};
use crate::common::types::{Signal, SignalDetail};
use crate::position::AggregateStats;
use crate::strategy::traits::Strategy;
use crate::strategy::types::{AnalysisContext, POWER_CHANGE};

/// Long/short power change
///
/// Reads the day's open-interest changes summed over the top seats:
///
/// | long change | short change | verdict                      |
/// |-------------|--------------|------------------------------|
/// | > 0         | < 0          | Bullish, strength = \|long\| |
/// | < 0         | > 0          | Bearish, strength = \|short\||
/// | otherwise   |              | Neutral, strength = 0        |
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerChangeStrategy;

impl PowerChangeStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate aggregate stats, folding numeric faults into an Error signal
    pub fn evaluate(stats: &AggregateStats) -> Signal {
        Self::compute(stats)
            .unwrap_or_else(|e| Signal::error(format!("data processing error: {e}")))
    }

    fn compute(stats: &AggregateStats) -> Result<Signal> {
        let long_chg = stats.total_long_change;
        let short_chg = stats.total_short_change;

        if !long_chg.is_finite() || !short_chg.is_finite() {
            return Err(AnalysisError::Computation(format!(
                "non-numeric position change totals (long {long_chg}, short {short_chg})"
            )));
        }

        let signal = if long_chg > 0.0 && short_chg < 0.0 {
            Signal::bullish(
                long_chg.abs(),
                format!(
                    "longs added {:.0} lots, shorts cut {:.0} lots",
                    long_chg,
                    short_chg.abs()
                ),
            )
        } else if long_chg < 0.0 && short_chg > 0.0 {
            Signal::bearish(
                short_chg.abs(),
                format!(
                    "longs cut {:.0} lots, shorts added {:.0} lots",
                    long_chg.abs(),
                    short_chg
                ),
            )
        } else {
            Signal::neutral(format!(
                "long change {long_chg:.0} lots, short change {short_chg:.0} lots"
            ))
        };

        Ok(signal.with_detail(SignalDetail::PowerChange {
            total_long_change: long_chg,
            total_short_change: short_chg,
        }))
    }
}

impl Strategy for PowerChangeStrategy {
    fn name(&self) -> &str {
        POWER_CHANGE
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Signal> {
        Self::compute(&ctx.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Direction;

    fn stats(long_chg: f64, short_chg: f64) -> AggregateStats {
        AggregateStats {
            total_long_change: long_chg,
            total_short_change: short_chg,
            ..Default::default()
        }
    }

    #[test]
    fn test_longs_building_shorts_unwinding_is_bullish() {
        let signal = PowerChangeStrategy::evaluate(&stats(100.0, -50.0));
        assert_eq!(signal.direction, Direction::Bullish);
        assert_eq!(signal.strength, 100.0);
        assert_eq!(signal.rationale, "longs added 100 lots, shorts cut 50 lots");
    }

    #[test]
    fn test_longs_unwinding_shorts_building_is_bearish() {
        let signal = PowerChangeStrategy::evaluate(&stats(-30.0, 40.0));
        assert_eq!(signal.direction, Direction::Bearish);
        assert_eq!(signal.strength, 40.0);
    }

    #[test]
    fn test_other_sign_combinations_are_neutral() {
        for (long_chg, short_chg) in [(0.0, 0.0), (10.0, 5.0), (-10.0, -5.0), (0.0, -5.0), (7.0, 0.0)] {
            let signal = PowerChangeStrategy::evaluate(&stats(long_chg, short_chg));
            assert_eq!(signal.direction, Direction::Neutral, "{long_chg}/{short_chg}");
            assert_eq!(signal.strength, 0.0);
        }
    }

    #[test]
    fn test_non_finite_totals_yield_error_signal() {
        let signal = PowerChangeStrategy::evaluate(&stats(f64::NAN, 3.0));
        assert_eq!(signal.direction, Direction::Error);
        assert_eq!(signal.strength, 0.0);
        assert!(signal.rationale.contains("non-numeric"));
    }
}
