use crate::common::errors::{AnalysisError, Result};
use crate::common::types::{SeatActivity, Signal, SignalDetail};
use crate::config::types::DEFAULT_RETAIL_SEATS;
use crate::position::NormalizedPositionTable;
use crate::strategy::traits::Strategy;
use crate::strategy::types::{AnalysisContext, RETAIL_REVERSE};

/// Retail-reverse (contrarian) strategy
///
/// Tracks a short list of brokers whose flow is dominated by retail clients
/// and fades it: retail adding longs is bearish, retail adding shorts is
/// bullish. Strength is the tracked seats' share of the exchange-wide open
/// interest on the side they added to, so it lies in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct RetailReverseStrategy {
    tracked: Vec<String>,
}

impl Default for RetailReverseStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_RETAIL_SEATS.iter().map(|s| s.to_string()))
    }
}

impl RetailReverseStrategy {
    pub fn new<I, S>(tracked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seats: Vec<String> = Vec::new();
        for name in tracked {
            let name = name.into().trim().to_string();
            if !name.is_empty() && !seats.contains(&name) {
                seats.push(name);
            }
        }
        Self { tracked: seats }
    }

    pub fn tracked_seats(&self) -> &[String] {
        &self.tracked
    }

    /// Evaluate a table, folding numeric faults into an Error signal
    pub fn evaluate(&self, table: &NormalizedPositionTable) -> Signal {
        self.compute(table)
            .unwrap_or_else(|e| Signal::error(format!("data processing error: {e}")))
    }

    fn compute(&self, table: &NormalizedPositionTable) -> Result<Signal> {
        let mut activity: Vec<SeatActivity> = self
            .tracked
            .iter()
            .map(|name| SeatActivity {
                seat_name: name.clone(),
                long_position: 0.0,
                long_change: 0.0,
                short_position: 0.0,
                short_change: 0.0,
            })
            .collect();

        // A seat can rank on the long side of one row and the short side of
        // another; each side accumulates on its own.
        for row in table {
            if let Some(seat) = find_seat(&mut activity, row.long_seat_name.as_deref()) {
                seat.long_position += row.long_open_interest.unwrap_or_default();
                seat.long_change += row.long_open_interest_change.unwrap_or_default();
            }
            if let Some(seat) = find_seat(&mut activity, row.short_seat_name.as_deref()) {
                seat.short_position += row.short_open_interest.unwrap_or_default();
                seat.short_change += row.short_open_interest_change.unwrap_or_default();
            }
        }

        let long_pos: f64 = activity.iter().map(|s| s.long_position).sum();
        let short_pos: f64 = activity.iter().map(|s| s.short_position).sum();
        let long_chg: f64 = activity.iter().map(|s| s.long_change).sum();
        let short_chg: f64 = activity.iter().map(|s| s.short_change).sum();

        if ![long_pos, short_pos, long_chg, short_chg]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(AnalysisError::Computation(
                "tracked seat totals are not finite".to_string(),
            ));
        }

        let seats: Vec<SeatActivity> = activity
            .into_iter()
            .filter(|s| s.long_change != 0.0 || s.short_change != 0.0)
            .collect();

        if seats.is_empty() {
            return Ok(Signal::neutral("no position changes at tracked retail seats")
                .with_detail(SignalDetail::RetailReverse {
                    retail_ratio: 0.0,
                    seats,
                }));
        }

        let stats = table.stats();
        let (signal, retail_ratio) = if long_chg > 0.0 && short_chg <= 0.0 {
            let ratio = share(long_pos, stats.total_long);
            (
                Signal::bearish(
                    ratio,
                    format!(
                        "retail seats added {long_chg:.0} long lots, {:.2}% of long open interest",
                        ratio * 100.0
                    ),
                ),
                ratio,
            )
        } else if short_chg > 0.0 && long_chg <= 0.0 {
            let ratio = share(short_pos, stats.total_short);
            (
                Signal::bullish(
                    ratio,
                    format!(
                        "retail seats added {short_chg:.0} short lots, {:.2}% of short open interest",
                        ratio * 100.0
                    ),
                ),
                ratio,
            )
        } else {
            (
                Signal::neutral(format!(
                    "retail seat changes are not one-sided (long {long_chg:.0}, short {short_chg:.0})"
                )),
                0.0,
            )
        };

        Ok(signal.with_detail(SignalDetail::RetailReverse {
            retail_ratio,
            seats,
        }))
    }
}

fn find_seat<'a>(
    activity: &'a mut [SeatActivity],
    name: Option<&str>,
) -> Option<&'a mut SeatActivity> {
    let name = name?;
    activity.iter_mut().find(|s| s.seat_name == name)
}

/// Tracked position over the exchange-wide total, 0 when the total is not positive
fn share(tracked: f64, total: f64) -> f64 {
    if total > 0.0 {
        (tracked / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Strategy for RetailReverseStrategy {
    fn name(&self) -> &str {
        RETAIL_REVERSE
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Signal> {
        self.compute(ctx.table)
    }
}
