//! Configuration validation

use super::dto::OperatorConfig;
use super::error::{ConfigError, Result};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a log level name
pub fn validate_log_level(level: &str) -> Result<()> {
    if LOG_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            var: "NODESMITH_LOG_LEVEL".to_string(),
            value: level.to_string(),
        })
    }
}

/// Validate a namespace against the RFC 1123 label rules Kubernetes uses
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() || namespace.len() > 63 {
        return Err(ConfigError::Validation(format!(
            "namespace must be 1-63 characters long, got {:?}",
            namespace
        )));
    }

    let valid_chars = namespace
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let valid_edges = !namespace.starts_with('-') && !namespace.ends_with('-');

    if valid_chars && valid_edges {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "namespace {:?} must consist of lower case alphanumeric characters or '-'",
            namespace
        )))
    }
}

/// Validate a complete operator configuration
pub fn validate_operator_config(config: &OperatorConfig) -> Result<()> {
    validate_namespace(&config.namespace)?;
    validate_log_level(&config.log_level)?;

    if let Some(class) = &config.default_storage_class {
        if class.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "NODESMITH_STORAGE_CLASS".to_string(),
                value: class.clone(),
            });
        }
    }

    for (key, image) in &config.image_overrides {
        if image.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: format!("NODESMITH_IMAGE_{}", key.to_ascii_uppercase()),
                value: image.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("debug").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }

    #[test]
    fn test_validate_namespace() {
        assert!(validate_namespace("blockchain-nodes").is_ok());
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("Nodes").is_err());
        assert!(validate_namespace("-nodes").is_err());
        assert!(validate_namespace(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_validate_operator_config_rejects_blank_image() {
        let mut config = OperatorConfig::default();
        config
            .image_overrides
            .insert("geth".to_string(), " ".to_string());

        let err = validate_operator_config(&config).unwrap_err();
        assert!(err.to_string().contains("NODESMITH_IMAGE_GETH"));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_operator_config(&OperatorConfig::default()).is_ok());
    }
}
