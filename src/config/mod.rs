//! Typed configuration and its loader

pub mod loader;
pub mod types;

pub use loader::{load_config, load_from_env, load_with_env_overrides};
pub use types::{AppConfig, AppSettings, EngineSettings, FetchSettings, TermStructureSettings};
