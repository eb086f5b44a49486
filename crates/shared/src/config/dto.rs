//! Configuration Data Transfer Objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of the environment variables that override client images
pub const IMAGE_OVERRIDE_PREFIX: &str = "NODESMITH_IMAGE_";

/// Operator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// Namespace the operator works in
    pub namespace: String,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Storage class applied to specs that don't name one
    pub default_storage_class: Option<String>,

    /// Client image overrides keyed by lowercase image key (`geth`, `prysm_beacon`)
    pub image_overrides: BTreeMap<String, String>,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            log_level: "info".to_string(),
            default_storage_class: None,
            image_overrides: BTreeMap::new(),
        }
    }
}

impl OperatorConfig {
    /// Image override registered for an image key, if any
    pub fn image_override(&self, key: &str) -> Option<&str> {
        self.image_overrides
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }
}
