//! Shared Kernel - field paths, field errors and the error taxonomy
//!
//! Validation never stops at the first problem: every check appends a
//! [`FieldError`] to a [`FieldErrors`] collection, and the collection is turned
//! into a single [`ValidationError`] at the admission boundary. Rendering has
//! its own, much smaller, [`RenderError`].

use crate::clients::{ClientKey, Protocol};
use serde::Serialize;
use std::fmt;

/// Dotted path to a field inside a resource, e.g. `spec.nodes[2].rpcPort`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The `spec` root every resource path starts from
    pub fn spec() -> Self {
        Self::root("spec")
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of a field error, mirrors the Kubernetes `field.ErrorType` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldErrorKind {
    Invalid,
    Required,
    Forbidden,
    Duplicate,
}

impl FieldErrorKind {
    /// Reason string used in `StatusCause.reason`
    pub fn reason(&self) -> &'static str {
        match self {
            FieldErrorKind::Invalid => "FieldValueInvalid",
            FieldErrorKind::Required => "FieldValueRequired",
            FieldErrorKind::Forbidden => "FieldValueForbidden",
            FieldErrorKind::Duplicate => "FieldValueDuplicate",
        }
    }
}

/// A single validation failure tied to a field path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub path: FieldPath,
    pub bad_value: serde_json::Value,
    pub message: String,
}

impl FieldError {
    pub fn invalid(path: FieldPath, value: impl Serialize, message: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::Invalid,
            path,
            bad_value: to_value(value),
            message: message.into(),
        }
    }

    pub fn required(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::Required,
            path,
            bad_value: serde_json::Value::Null,
            message: message.into(),
        }
    }

    pub fn forbidden(path: FieldPath, value: impl Serialize, message: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::Forbidden,
            path,
            bad_value: to_value(value),
            message: message.into(),
        }
    }

    pub fn duplicate(path: FieldPath, value: impl Serialize) -> Self {
        Self {
            kind: FieldErrorKind::Duplicate,
            path,
            bad_value: to_value(value),
            message: String::new(),
        }
    }
}

fn to_value(value: impl Serialize) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

impl FieldError {
    /// The error without its path, as used in `StatusCause.message`
    pub fn detail(&self) -> String {
        match self.kind {
            FieldErrorKind::Invalid => {
                format!("Invalid value: {}: {}", self.bad_value, self.message)
            }
            FieldErrorKind::Required => format!("Required value: {}", self.message),
            FieldErrorKind::Forbidden => format!("Forbidden: {}", self.message),
            FieldErrorKind::Duplicate => format!("Duplicate value: {}", self.bad_value),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.detail())
    }
}

/// Accumulated field errors of one validation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Whether an error exists at `path` whose message contains `fragment`
    pub fn contains(&self, path: &str, fragment: &str) -> bool {
        self.0
            .iter()
            .any(|e| e.path.as_str() == path && e.message.contains(fragment))
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors: self.0 })
        }
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A rejected spec: every field error found in one validation run
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("spec is invalid: {}", join_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors produced while compiling a validated spec into a launch config
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error(
        "no render strategy registered for {protocol} client {variant:?}; register one with StrategyRegistry::register"
    )]
    UnsupportedVariant { protocol: Protocol, variant: &'static str },

    #[error("{strategy} strategy can't render a {found} workload")]
    WorkloadMismatch { strategy: ClientKey, found: ClientKey },

    #[error("failed to render {file}: {message}")]
    ConfigFile { file: &'static str, message: String },

    #[error("{field} is required to render")]
    MissingField { field: &'static str },
}

impl RenderError {
    pub fn unsupported(key: ClientKey) -> Self {
        RenderError::UnsupportedVariant {
            protocol: key.protocol(),
            variant: key.variant(),
        }
    }

    pub fn config_file(file: &'static str, error: impl fmt::Display) -> Self {
        RenderError::ConfigFile {
            file,
            message: error.to_string(),
        }
    }
}
