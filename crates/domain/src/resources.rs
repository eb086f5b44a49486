//! Compute and storage resources shared by every protocol

use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use nodesmith_shared::Quantity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Requested compute and storage for a node, as Kubernetes quantity strings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

/// Per-protocol resource defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDefaults {
    pub cpu: &'static str,
    pub cpu_limit: &'static str,
    pub memory: &'static str,
    pub memory_limit: &'static str,
    pub storage: &'static str,
}

impl ResourceDefaults {
    /// Same defaults with a different storage request
    pub const fn with_storage(self, storage: &'static str) -> Self {
        Self { storage, ..self }
    }
}

impl Resources {
    /// Fills every unset request/limit; storage class only when one is configured
    pub fn apply_defaults(&mut self, defaults: &ResourceDefaults, storage_class: Option<&str>) {
        self.cpu.get_or_insert_with(|| defaults.cpu.to_string());
        self.cpu_limit.get_or_insert_with(|| defaults.cpu_limit.to_string());
        self.memory.get_or_insert_with(|| defaults.memory.to_string());
        self.memory_limit.get_or_insert_with(|| defaults.memory_limit.to_string());
        self.storage.get_or_insert_with(|| defaults.storage.to_string());
        if let Some(class) = storage_class {
            self.storage_class.get_or_insert_with(|| class.to_string());
        }
    }

    /// Limits must cover requests; every quantity must parse
    pub fn validate(&self, path: &FieldPath) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_limit(&mut errors, path, "cpu", &self.cpu, "cpuLimit", &self.cpu_limit);
        check_limit(
            &mut errors,
            path,
            "memory",
            &self.memory,
            "memoryLimit",
            &self.memory_limit,
        );
        parse_field(&mut errors, path, "storage", &self.storage);
        errors
    }

    /// Update rules: storage class is fixed and storage can only grow
    pub fn validate_update(&self, old: &Resources, path: &FieldPath) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.storage_class != old.storage_class {
            errors.push(FieldError::invalid(
                path.child("storageClass"),
                &self.storage_class,
                "field is immutable",
            ));
        }

        if let (Some(new), Some(previous)) = (&self.storage, &old.storage) {
            if let (Ok(new_q), Ok(old_q)) = (Quantity::parse(new), Quantity::parse(previous)) {
                if new_q < old_q {
                    errors.push(FieldError::invalid(
                        path.child("storage"),
                        new,
                        format!("must be greater than or equal to old storage {previous}"),
                    ));
                }
            }
        }

        errors
    }
}

fn parse_field(
    errors: &mut FieldErrors,
    path: &FieldPath,
    name: &str,
    value: &Option<String>,
) -> Option<Quantity> {
    let value = value.as_ref()?;
    match Quantity::parse(value) {
        Ok(quantity) => Some(quantity),
        Err(e) => {
            errors.push(FieldError::invalid(
                path.child(name),
                value,
                format!("must be a valid quantity: {e}"),
            ));
            None
        }
    }
}

fn check_limit(
    errors: &mut FieldErrors,
    path: &FieldPath,
    request_name: &str,
    request: &Option<String>,
    limit_name: &str,
    limit: &Option<String>,
) {
    let request_q = parse_field(errors, path, request_name, request);
    let limit_q = parse_field(errors, path, limit_name, limit);

    if let (Some(request_q), Some(limit_q), Some(request)) = (request_q, limit_q, request) {
        if limit_q < request_q {
            errors.push(FieldError::invalid(
                path.child(limit_name),
                limit,
                format!("must be greater than or equal to {request_name} request {request}"),
            ));
        }
    }
}

/// Validates optional resources on create and, with `old`, on update
pub fn validate_resources(
    resources: Option<&Resources>,
    old: Option<Option<&Resources>>,
) -> FieldErrors {
    let path = FieldPath::spec().child("resources");
    let mut errors = FieldErrors::new();
    let Some(resources) = resources else {
        return errors;
    };
    errors.extend(resources.validate(&path));
    if let Some(Some(old)) = old {
        errors.extend(resources.validate_update(old, &path));
    }
    errors
}

/// Defaults an optional resources block in place
pub fn default_resources(
    resources: &mut Option<Resources>,
    defaults: &ResourceDefaults,
    storage_class: Option<&str>,
) {
    resources
        .get_or_insert_with(Resources::default)
        .apply_defaults(defaults, storage_class);
}
