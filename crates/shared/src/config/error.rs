//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading or validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration variable has an invalid value
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    /// Failed to load .env file
    #[error("Failed to load .env file from {path}: {source}")]
    EnvFileLoad {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            var: "NODESMITH_LOG_LEVEL".to_string(),
            value: "loud".to_string(),
        };
        assert!(err.to_string().contains("NODESMITH_LOG_LEVEL"));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_validation_display() {
        let err = ConfigError::Validation("namespace must not be empty".to_string());
        assert!(err.to_string().contains("namespace must not be empty"));
    }
}
