//! Operator configuration
//!
//! Configuration is loaded once at startup and handed to the compiler as an
//! immutable DTO.
//!
//! # Environment Variables
//!
//! - `NODESMITH_NAMESPACE`: namespace the operator works in (default: "default")
//! - `NODESMITH_LOG_LEVEL`: trace, debug, info, warn or error (default: "info")
//! - `NODESMITH_STORAGE_CLASS`: storage class used when a spec sets none
//! - `NODESMITH_IMAGE_<KEY>`: client image override, e.g. `NODESMITH_IMAGE_GETH`
//!
//! # Usage
//!
//! ```ignore
//! use nodesmith_shared::config::ConfigLoader;
//!
//! let config = ConfigLoader::new(Some(".env".into())).load_operator_config()?;
//! println!("watching {}", config.namespace);
//! ```

pub mod dto;
pub mod error;
pub mod loader;
pub mod validator;

pub use dto::{IMAGE_OVERRIDE_PREFIX, OperatorConfig};
pub use error::{ConfigError, Result};
pub use loader::ConfigLoader;
pub use validator::{validate_log_level, validate_namespace, validate_operator_config};
