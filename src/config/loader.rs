//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::Result;

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (`APP_` prefix, `__` between section and key)
/// 2. Configuration file (TOML format)
/// 3. Default values
///
/// The loaded configuration is validated before it is returned.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // e.g. APP_ENGINE__TOP_N_SEATS=10
    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Load the file and `APP_` layers, then the plain deployment variables
///
/// `RETAIL_SEATS` (comma-separated) and `POSITION_DATA_DIR` win over both
/// layers when set.
pub fn load_with_env_overrides(config_path: Option<&str>) -> Result<AppConfig> {
    let mut config = load_config(config_path)?;
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::default();
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(seats) = std::env::var("RETAIL_SEATS") {
        config.engine.retail_seats = seats
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Ok(dir) = std::env::var("POSITION_DATA_DIR") {
        config.fetch.data_dir = dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineSettings;
    use std::io::Write;

    #[test]
    fn test_load_config_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[engine]\ntop_n_seats = 15\nretail_seats = [\"东方财富\"]\n\n[term_structure]\nproxy_tolerance_pct = 2.5"
        )
        .unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.engine.top_n_seats, 15);
        assert_eq!(config.engine.retail_seats, vec!["东方财富".to_string()]);
        assert_eq!(config.term_structure.proxy_tolerance_pct, 2.5);
        assert_eq!(config.fetch.max_workers, 3);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Some("/nonexistent/positions.toml")).unwrap();
        assert_eq!(config.engine, EngineSettings::default());
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine]\ninformed_split_ratio = 0.0").unwrap();

        assert!(load_config(file.path().to_str()).is_err());
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        std::env::set_var("APP_FETCH__TIMEOUT_SECONDS", "45");

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[fetch]\ntimeout_seconds = 10\nmax_workers = 2").unwrap();
        let config = load_config(file.path().to_str()).unwrap();

        std::env::remove_var("APP_FETCH__TIMEOUT_SECONDS");

        assert_eq!(config.fetch.timeout_seconds, 45);
        assert_eq!(config.fetch.max_workers, 2);
    }

    // Only test touching RETAIL_SEATS / POSITION_DATA_DIR
    #[test]
    fn test_deployment_variables_override_config() {
        std::env::set_var("RETAIL_SEATS", " 东方财富, 平安期货 ,,");
        std::env::set_var("POSITION_DATA_DIR", "/srv/rankings");

        let from_env = load_from_env();

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine]\nretail_seats = [\"徽商期货\"]\ntop_n_seats = 10").unwrap();
        let layered = load_with_env_overrides(file.path().to_str());

        std::env::remove_var("RETAIL_SEATS");
        std::env::remove_var("POSITION_DATA_DIR");

        let expected_seats = vec!["东方财富".to_string(), "平安期货".to_string()];

        let from_env = from_env.unwrap();
        assert_eq!(from_env.engine.retail_seats, expected_seats);
        assert_eq!(from_env.fetch.data_dir, "/srv/rankings");

        let layered = layered.unwrap();
        assert_eq!(layered.engine.retail_seats, expected_seats);
        assert_eq!(layered.engine.top_n_seats, 10);
        assert_eq!(layered.fetch.data_dir, "/srv/rankings");
    }
}
