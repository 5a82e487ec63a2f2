use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::types::TermStructureSettings;

/// Where a point's price indicator came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// Exchange daily closing price
    ClosePrice,
    /// Long + short open interest of the top seats, used when no price feed
    /// is available. Lower confidence.
    PositionProxy,
}

impl PriceBasis {
    /// Classification mode used for this price quality tier
    pub fn mode(&self) -> ClassificationMode {
        match self {
            PriceBasis::ClosePrice => ClassificationMode::Strict,
            PriceBasis::PositionProxy => ClassificationMode::ToleranceBanded,
        }
    }
}

/// How consecutive maturities are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Every step must strictly rise or strictly fall
    Strict,
    /// Every step must move beyond a fixed percentage band
    ToleranceBanded,
}

/// Shape of the maturity curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermStructureShape {
    /// Near strong, far weak: falling across maturities
    Back,
    /// Near weak, far strong: rising across maturities
    Contango,
    /// Neither monotonic direction
    Flat,
    /// Too few usable points to decide
    Unclassifiable,
}

impl std::fmt::Display for TermStructureShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TermStructureShape::Back => write!(f, "back"),
            TermStructureShape::Contango => write!(f, "contango"),
            TermStructureShape::Flat => write!(f, "flat"),
            TermStructureShape::Unclassifiable => write!(f, "unclassifiable"),
        }
    }
}

/// One contract on the maturity curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStructurePoint {
    pub contract_id: String,
    pub price_indicator: f64,
}

impl TermStructurePoint {
    pub fn new(contract_id: impl Into<String>, price_indicator: f64) -> Self {
        Self {
            contract_id: contract_id.into(),
            price_indicator,
        }
    }

    /// Usable for classification: finite and strictly positive
    fn is_usable(&self) -> bool {
        self.price_indicator.is_finite() && self.price_indicator > 0.0
    }
}

/// Classified curve for one underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStructureResult {
    pub underlying: String,
    pub shape: TermStructureShape,
    pub basis: PriceBasis,
    pub mode: ClassificationMode,
    /// Usable points sorted by contract code (maturity order)
    pub ordered_points: Vec<TermStructurePoint>,
    /// Percentage change from each point to the next
    pub step_changes_pct: Vec<f64>,
}

/// Term-structure classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermStructureClassifier {
    strict_min_points: usize,
    proxy_min_points: usize,
    proxy_tolerance_pct: f64,
}

impl Default for TermStructureClassifier {
    fn default() -> Self {
        Self::new(&TermStructureSettings::default())
    }
}

impl TermStructureClassifier {
    pub fn new(settings: &TermStructureSettings) -> Self {
        Self {
            strict_min_points: settings.strict_min_points,
            proxy_min_points: settings.proxy_min_points,
            proxy_tolerance_pct: settings.proxy_tolerance_pct,
        }
    }

    /// Minimum usable points for a price basis
    pub fn min_points(&self, basis: PriceBasis) -> usize {
        match basis {
            PriceBasis::ClosePrice => self.strict_min_points,
            PriceBasis::PositionProxy => self.proxy_min_points,
        }
    }

    /// Classify points already in maturity order
    ///
    /// Unusable points (non-finite or non-positive) are skipped. Fewer usable
    /// points than the basis minimum gives `Unclassifiable`.
    pub fn classify(&self, points: &[TermStructurePoint], basis: PriceBasis) -> TermStructureShape {
        let values: Vec<f64> = points
            .iter()
            .filter(|p| p.is_usable())
            .map(|p| p.price_indicator)
            .collect();

        if values.len() < self.min_points(basis) {
            return TermStructureShape::Unclassifiable;
        }

        let steps: Vec<std::cmp::Ordering> = match basis.mode() {
            ClassificationMode::Strict => values
                .windows(2)
                .map(|w| w[1].total_cmp(&w[0]))
                .collect(),
            ClassificationMode::ToleranceBanded => values
                .windows(2)
                .map(|w| {
                    let pct = pct_change(w[0], w[1]);
                    if pct > self.proxy_tolerance_pct {
                        std::cmp::Ordering::Greater
                    } else if pct < -self.proxy_tolerance_pct {
                        std::cmp::Ordering::Less
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
                .collect(),
        };

        if steps.iter().all(|s| s.is_lt()) {
            TermStructureShape::Back
        } else if steps.iter().all(|s| s.is_gt()) {
            TermStructureShape::Contango
        } else {
            TermStructureShape::Flat
        }
    }

    /// Sort points by contract code, drop unusable ones and classify
    pub fn analyze(
        &self,
        underlying: impl Into<String>,
        mut points: Vec<TermStructurePoint>,
        basis: PriceBasis,
    ) -> TermStructureResult {
        let underlying = underlying.into();
        points.retain(TermStructurePoint::is_usable);
        points.sort_by(|a, b| a.contract_id.cmp(&b.contract_id));

        let shape = self.classify(&points, basis);
        let step_changes_pct = points
            .windows(2)
            .map(|w| pct_change(w[0].price_indicator, w[1].price_indicator))
            .collect();

        debug!(
            underlying = %underlying,
            points = points.len(),
            basis = ?basis,
            shape = %shape,
            "classified term structure"
        );

        TermStructureResult {
            underlying,
            shape,
            basis,
            mode: basis.mode(),
            ordered_points: points,
            step_changes_pct,
        }
    }
}

fn pct_change(from: f64, to: f64) -> f64 {
    (to - from) / from * 100.0
}
