use crate::common::errors::{AnalysisError, Result};
use crate::common::types::{SeatInformedness, Signal, SignalDetail};
use crate::config::types::DEFAULT_INFORMED_SPLIT_RATIO;
use crate::position::NormalizedPositionTable;
use crate::strategy::traits::Strategy;
use crate::strategy::types::{AnalysisContext, SPIDER_WEB};

/// Spider-web strategy (mean skew difference)
///
/// Seats holding a large position relative to what they traded are treated
/// as informed. The strategy compares the average long/short skew of the
/// informed group against everyone else:
///
/// ```text
/// stat = (long + short) / volume          sort desc, split at floor(ratio * n)
/// skew = (long - short) / (long + short)
/// MSD  = mean(skew | informed) - mean(skew | uninformed)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SpiderWebStrategy {
    split_ratio: f64,
}

impl Default for SpiderWebStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_INFORMED_SPLIT_RATIO)
    }
}

/// A seat with volume and both open interests present
struct ValidSeat<'a> {
    name: Option<&'a str>,
    long: f64,
    short: f64,
    stat: f64,
}

impl ValidSeat<'_> {
    /// `None` when the seat holds nothing on either side
    fn skew(&self) -> Option<f64> {
        let total = self.long + self.short;
        (total != 0.0).then(|| (self.long - self.short) / total)
    }
}

impl SpiderWebStrategy {
    pub fn new(split_ratio: f64) -> Self {
        Self { split_ratio }
    }

    pub fn split_ratio(&self) -> f64 {
        self.split_ratio
    }

    /// Evaluate a table, folding numeric faults into an Error signal
    pub fn evaluate(&self, table: &NormalizedPositionTable) -> Signal {
        self.compute(table)
            .unwrap_or_else(|e| Signal::error(format!("data processing error: {e}")))
    }

    fn compute(&self, table: &NormalizedPositionTable) -> Result<Signal> {
        let mut seats: Vec<ValidSeat<'_>> = table
            .iter()
            .filter_map(|row| {
                let volume = row.traded_volume?;
                let long = row.long_open_interest?;
                let short = row.short_open_interest?;
                if volume == 0.0 {
                    return None;
                }
                let stat = (long + short) / volume;
                stat.is_finite().then(|| ValidSeat {
                    name: row.long_seat_name.as_deref(),
                    long,
                    short,
                    stat,
                })
            })
            .collect();

        if seats.is_empty() {
            return Ok(Signal::neutral("no valid seats"));
        }

        // Stable sort keeps rank order among equal stats
        seats.sort_by(|a, b| b.stat.total_cmp(&a.stat));

        let cutoff = (seats.len() as f64 * self.split_ratio).floor() as usize;
        if cutoff == 0 || cutoff >= seats.len() {
            return Ok(Signal::neutral(format!(
                "{} valid seats cannot be split into informed and uninformed groups",
                seats.len()
            )));
        }
        let (informed, uninformed) = seats.split_at(cutoff);

        let (Some(informed_mean), Some(uninformed_mean)) =
            (mean_skew(informed), mean_skew(uninformed))
        else {
            return Ok(Signal::neutral(
                "skew undefined for a seat group with no open interest",
            ));
        };

        let msd = informed_mean - uninformed_mean;
        if !msd.is_finite() {
            return Err(AnalysisError::Computation(format!(
                "mean skew difference is not finite ({informed_mean} - {uninformed_mean})"
            )));
        }

        let signal = if msd > 0.0 {
            Signal::bullish(msd.abs(), format!("MSD={msd:.4}, informed seats lean long"))
        } else if msd < 0.0 {
            Signal::bearish(msd.abs(), format!("MSD={msd:.4}, informed seats lean short"))
        } else {
            Signal::neutral(format!("MSD={msd:.4}, no informed-seat bias"))
        };

        let detail = seats
            .iter()
            .enumerate()
            .map(|(idx, seat)| SeatInformedness {
                seat_name: seat.name.map(str::to_string),
                informed: idx < cutoff,
                stat: seat.stat,
                skew: seat.skew(),
            })
            .collect();

        Ok(signal.with_detail(SignalDetail::SpiderWeb {
            informed_mean_skew: informed_mean,
            uninformed_mean_skew: uninformed_mean,
            msd,
            informed_seats: informed.len(),
            uninformed_seats: uninformed.len(),
            seats: detail,
        }))
    }
}

/// Mean of the defined skews in a group
fn mean_skew(group: &[ValidSeat<'_>]) -> Option<f64> {
    let skews: Vec<f64> = group.iter().filter_map(ValidSeat::skew).collect();
    if skews.is_empty() {
        return None;
    }
    Some(skews.iter().sum::<f64>() / skews.len() as f64)
}

impl Strategy for SpiderWebStrategy {
    fn name(&self) -> &str {
        SPIDER_WEB
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Signal> {
        self.compute(ctx.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Direction;
    use crate::position::PositionRow;

    fn seat(name: &str, long: f64, short: f64, volume: f64) -> PositionRow {
        PositionRow {
            long_seat_name: Some(name.to_string()),
            long_open_interest: Some(long),
            short_open_interest: Some(short),
            traded_volume: Some(volume),
            ..Default::default()
        }
    }

    #[test]
    fn test_informed_long_bias_is_bullish() {
        // stats: a=10, b=8 (informed, 2 of 5); c, d, e = 1
        let table = NormalizedPositionTable::new(vec![
            seat("a", 90.0, 10.0, 10.0),
            seat("b", 60.0, 20.0, 10.0),
            seat("c", 5.0, 5.0, 10.0),
            seat("d", 2.0, 8.0, 10.0),
            seat("e", 5.0, 5.0, 10.0),
        ]);

        let signal = SpiderWebStrategy::default().evaluate(&table);
        assert_eq!(signal.direction, Direction::Bullish);

        // informed mean = (0.8 + 0.5) / 2 = 0.65; uninformed = (0 - 0.6 + 0) / 3 = -0.2
        assert!((signal.strength - 0.85).abs() < 1e-12);
        assert!(signal.rationale.starts_with("MSD=0.8500"));

        match signal.detail {
            Some(SignalDetail::SpiderWeb {
                informed_seats,
                uninformed_seats,
                ref seats,
                ..
            }) => {
                assert_eq!(informed_seats, 2);
                assert_eq!(uninformed_seats, 3);
                assert_eq!(seats[0].seat_name.as_deref(), Some("a"));
                assert!(seats[1].informed && !seats[2].informed);
            }
            ref other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn test_equal_skews_are_neutral() {
        let table = NormalizedPositionTable::new(vec![
            seat("a", 75.0, 25.0, 10.0),
            seat("b", 75.0, 25.0, 20.0),
            seat("c", 75.0, 25.0, 30.0),
            seat("d", 75.0, 25.0, 40.0),
            seat("e", 75.0, 25.0, 50.0),
        ]);

        let signal = SpiderWebStrategy::default().evaluate(&table);
        assert_eq!(signal.direction, Direction::Neutral);
        assert_eq!(signal.strength, 0.0);
        assert!(signal.rationale.contains("MSD=0.0000"));
    }

    #[test]
    fn test_single_seat_has_empty_informed_group() {
        let table = NormalizedPositionTable::new(vec![seat("a", 10.0, 5.0, 3.0)]);

        let signal = SpiderWebStrategy::default().evaluate(&table);
        assert_eq!(signal.direction, Direction::Neutral);
        assert!(!signal.strength.is_nan());
        assert_eq!(signal.strength, 0.0);
    }

    #[test]
    fn test_rows_missing_inputs_or_zero_volume_are_excluded() {
        let mut missing_volume = seat("x", 10.0, 0.0, 0.0);
        missing_volume.traded_volume = None;
        let table = NormalizedPositionTable::new(vec![missing_volume, seat("y", 10.0, 0.0, 0.0)]);

        let signal = SpiderWebStrategy::default().evaluate(&table);
        assert_eq!(signal.direction, Direction::Neutral);
        assert_eq!(signal.rationale, "no valid seats");
    }

    #[test]
    fn test_group_without_open_interest_is_neutral() {
        let table = NormalizedPositionTable::new(vec![
            seat("a", 50.0, 10.0, 1.0),
            seat("b", 0.0, 0.0, 5.0),
            seat("c", 0.0, 0.0, 5.0),
        ]);

        // informed = [a], uninformed = [b, c] with undefined skews
        let signal = SpiderWebStrategy::default().evaluate(&table);
        assert_eq!(signal.direction, Direction::Neutral);
        assert!(signal.rationale.contains("skew undefined"));
    }

    #[test]
    fn test_split_ratio_is_overridable() {
        let table = NormalizedPositionTable::new(vec![
            seat("a", 90.0, 10.0, 10.0),
            seat("b", 10.0, 90.0, 20.0),
        ]);

        // 0.4 * 2 floors to 0; 0.5 * 2 gives one informed seat
        assert_eq!(
            SpiderWebStrategy::default().evaluate(&table).direction,
            Direction::Neutral
        );
        let signal = SpiderWebStrategy::new(0.5).evaluate(&table);
        assert_eq!(signal.direction, Direction::Bullish);
        assert!((signal.strength - 1.6).abs() < 1e-12);
    }
}
