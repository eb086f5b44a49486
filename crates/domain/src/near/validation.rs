//! NEAR node validation

use super::spec::NodeSpec;
use crate::resources::validate_resources;
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{Validate, check_immutable};

impl Validate for NodeSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        if self.archive {
            if let Some(secret) = &self.validator_secret_name {
                errors.push(FieldError::forbidden(
                    spec.child("validatorSecretName"),
                    secret,
                    "must be none if archive is true",
                ));
            }
        }

        errors.extend(validate_resources(
            self.resources.as_ref(),
            old.map(|old| old.resources.as_ref()),
        ));

        if let Some(old) = old {
            check_immutable(&mut errors, spec.child("network"), &self.network, &old.network);
            check_immutable(&mut errors, spec.child("archive"), &self.archive, &old.archive);
        }

        errors
    }
}
