//! Term-structure classification across maturities of one underlying
//!
//! Two price-quality tiers are kept apart:
//!
//! - [`PriceBasis::ClosePrice`]: exchange closes, classified strictly
//! - [`PriceBasis::PositionProxy`]: top-seat open interest standing in for
//!   price, classified against a tolerance band and a higher point minimum
//!
//! Every [`TermStructureResult`] records which tier and mode produced it.

mod classifier;
mod points;

pub use classifier::{
    ClassificationMode, PriceBasis, TermStructureClassifier, TermStructurePoint,
    TermStructureResult, TermStructureShape,
};
pub use points::{
    classify_daily_quotes, classify_position_proxies, curve_key, position_proxy_points,
    underlying_of, DailyQuote,
};
