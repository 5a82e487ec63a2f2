//! Configuration types

use serde::{Deserialize, Serialize};

use crate::common::errors::{AnalysisError, Result};

/// Number of ranked seats exchanges disclose per contract
pub const DEFAULT_TOP_N_SEATS: usize = 20;
/// Share of seats (by row count) placed in the spider-web informed group
pub const DEFAULT_INFORMED_SPLIT_RATIO: f64 = 0.4;
/// Brokers treated as retail-flow proxies by the retail-reverse strategy
pub const DEFAULT_RETAIL_SEATS: [&str; 3] = ["东方财富", "平安期货", "徽商期货"];
/// Minimum points for close-price (strict) term-structure classification
pub const DEFAULT_STRICT_MIN_POINTS: usize = 2;
/// Minimum points for position-proxy (tolerance-banded) classification
pub const DEFAULT_PROXY_MIN_POINTS: usize = 3;
/// Per-step percentage band inside which a proxy move counts as flat
pub const DEFAULT_PROXY_TOLERANCE_PCT: f64 = 1.0;
/// Parallel exchange fetches
pub const DEFAULT_MAX_WORKERS: usize = 3;
/// Per-exchange fetch timeout
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 30;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Normalizer and strategy parameters
    #[serde(default)]
    pub engine: EngineSettings,
    /// Term-structure classifier parameters
    #[serde(default)]
    pub term_structure: TermStructureSettings,
    /// Data-source fetch pool
    #[serde(default)]
    pub fetch: FetchSettings,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.term_structure.validate()?;
        self.fetch.validate()
    }
}

/// Normalizer and strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Rows kept from each ranking table, in exchange rank order
    #[serde(default = "default_top_n_seats")]
    pub top_n_seats: usize,
    /// Informed-group share for the spider-web split, in (0, 1)
    #[serde(default = "default_informed_split_ratio")]
    pub informed_split_ratio: f64,
    /// Seat names tracked by the retail-reverse strategy
    #[serde(default = "default_retail_seats")]
    pub retail_seats: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            top_n_seats: default_top_n_seats(),
            informed_split_ratio: default_informed_split_ratio(),
            retail_seats: default_retail_seats(),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.top_n_seats == 0 {
            return Err(AnalysisError::Configuration(
                "engine.top_n_seats must be positive".to_string(),
            ));
        }
        if !(self.informed_split_ratio > 0.0 && self.informed_split_ratio < 1.0) {
            return Err(AnalysisError::Configuration(format!(
                "engine.informed_split_ratio must be in (0, 1), got {}",
                self.informed_split_ratio
            )));
        }
        Ok(())
    }
}

fn default_top_n_seats() -> usize {
    DEFAULT_TOP_N_SEATS
}

fn default_informed_split_ratio() -> f64 {
    DEFAULT_INFORMED_SPLIT_RATIO
}

fn default_retail_seats() -> Vec<String> {
    DEFAULT_RETAIL_SEATS.iter().map(|s| s.to_string()).collect()
}

/// Term-structure classifier parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStructureSettings {
    #[serde(default = "default_strict_min_points")]
    pub strict_min_points: usize,
    #[serde(default = "default_proxy_min_points")]
    pub proxy_min_points: usize,
    /// Percent; a proxy step inside +/- this band is flat
    #[serde(default = "default_proxy_tolerance_pct")]
    pub proxy_tolerance_pct: f64,
}

impl Default for TermStructureSettings {
    fn default() -> Self {
        Self {
            strict_min_points: default_strict_min_points(),
            proxy_min_points: default_proxy_min_points(),
            proxy_tolerance_pct: default_proxy_tolerance_pct(),
        }
    }
}

impl TermStructureSettings {
    pub fn validate(&self) -> Result<()> {
        if self.strict_min_points < 2 || self.proxy_min_points < 2 {
            return Err(AnalysisError::Configuration(
                "term_structure minimum points must be at least 2".to_string(),
            ));
        }
        if !(self.proxy_tolerance_pct >= 0.0 && self.proxy_tolerance_pct.is_finite()) {
            return Err(AnalysisError::Configuration(format!(
                "term_structure.proxy_tolerance_pct must be a non-negative number, got {}",
                self.proxy_tolerance_pct
            )));
        }
        Ok(())
    }
}

fn default_strict_min_points() -> usize {
    DEFAULT_STRICT_MIN_POINTS
}

fn default_proxy_min_points() -> usize {
    DEFAULT_PROXY_MIN_POINTS
}

fn default_proxy_tolerance_pct() -> f64 {
    DEFAULT_PROXY_TOLERANCE_PCT
}

/// Data-source fetch pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Maximum concurrent exchange fetches
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Per-exchange fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,
    /// Directory holding `{EXCHANGE}_{YYYYMMDD}.json` ranking files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            timeout_seconds: default_fetch_timeout(),
            data_dir: default_data_dir(),
        }
    }
}

impl FetchSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(AnalysisError::Configuration(
                "fetch.max_workers must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECONDS
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.top_n_seats, 20);
        assert_eq!(config.engine.informed_split_ratio, 0.4);
        assert_eq!(config.engine.retail_seats.len(), 3);
    }

    #[test]
    fn test_rejects_out_of_range_split() {
        let engine = EngineSettings {
            informed_split_ratio: 1.0,
            ..EngineSettings::default()
        };
        assert!(matches!(
            engine.validate(),
            Err(AnalysisError::Configuration(_))
        ));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"engine": {"top_n_seats": 10}}"#).unwrap();
        assert_eq!(config.engine.top_n_seats, 10);
        assert_eq!(config.engine.informed_split_ratio, DEFAULT_INFORMED_SPLIT_RATIO);
        assert_eq!(config.term_structure.proxy_min_points, DEFAULT_PROXY_MIN_POINTS);
    }
}
