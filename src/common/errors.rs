//! Error types for the analysis engine

use thiserror::Error;

/// Result type alias using our AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Required columns are structurally absent from a raw table
    #[error("Schema error: missing required columns {missing:?}")]
    Schema { missing: Vec<String> },

    /// Numeric fault inside a strategy or classifier
    #[error("Computation error: {0}")]
    Computation(String),

    /// A data source returned nothing for the requested date
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem errors from file-backed sources
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Short machine-readable category, used in skip reports
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Schema { .. } => "schema",
            AnalysisError::Computation(_) => "computation",
            AnalysisError::DataUnavailable(_) => "data_unavailable",
            AnalysisError::Configuration(_) => "configuration",
            AnalysisError::Io(_) => "io",
            AnalysisError::JsonParse(_) => "json",
        }
    }
}

impl From<config::ConfigError> for AnalysisError {
    fn from(err: config::ConfigError) -> Self {
        AnalysisError::Configuration(err.to_string())
    }
}
