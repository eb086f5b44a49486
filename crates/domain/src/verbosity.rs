//! Client logging verbosity

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logging verbosity shared by every protocol.
///
/// Each client accepts its own subset, listed in the capability matrix.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Off,
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    All,
    Notice,
    Crit,
    Panic,
    None,
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Off => "off",
            Verbosity::Fatal => "fatal",
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
            Verbosity::All => "all",
            Verbosity::Notice => "notice",
            Verbosity::Crit => "crit",
            Verbosity::Panic => "panic",
            Verbosity::None => "none",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
