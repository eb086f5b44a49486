//! Configuration loader
//!
//! Loads the operator configuration from an optional `.env` file and the
//! process environment.

use std::path::{Path, PathBuf};

use super::dto::{IMAGE_OVERRIDE_PREFIX, OperatorConfig};
use super::error::{ConfigError, Result};
use super::validator::validate_operator_config;

/// Configuration loader
///
/// Values from the `.env` file are loaded into the process environment first,
/// so the file wins over variables that are unset in the shell.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    env_file_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new ConfigLoader
    ///
    /// # Arguments
    ///
    /// * `env_file_path` - Optional path to a `.env` file loaded before the
    ///   environment is read.
    pub fn new(env_file_path: Option<PathBuf>) -> Self {
        Self { env_file_path }
    }

    /// Load and validate the operator configuration
    pub fn load_operator_config(&self) -> Result<OperatorConfig> {
        if let Some(path) = &self.env_file_path {
            self.load_env_file(path)?;
        }

        let config = OperatorConfig::from_env()?;
        validate_operator_config(&config)?;

        Ok(config)
    }

    fn load_env_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ConfigError::EnvFileLoad {
                path: path.to_path_buf(),
                source: dotenv::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )),
            });
        }

        dotenv::from_path(path).map_err(|e| ConfigError::EnvFileLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

// ============================================================================
// Implementation: OperatorConfig::from_env
// ============================================================================

impl OperatorConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Build the configuration from an arbitrary set of variables
    ///
    /// Unset optional variables fall back to [`OperatorConfig::default`].
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match key {
                "NODESMITH_NAMESPACE" => config.namespace = value.to_string(),
                "NODESMITH_LOG_LEVEL" => config.log_level = value.to_ascii_lowercase(),
                "NODESMITH_STORAGE_CLASS" => {
                    config.default_storage_class = Some(value.to_string())
                }
                _ => {
                    if let Some(image_key) = key.strip_prefix(IMAGE_OVERRIDE_PREFIX) {
                        if image_key.is_empty() {
                            return Err(ConfigError::InvalidValue {
                                var: key.to_string(),
                                value: value.to_string(),
                            });
                        }
                        config
                            .image_overrides
                            .insert(image_key.to_ascii_lowercase(), value.to_string());
                    }
                }
            }
        }

        Ok(config)
    }
}
