//! Aptos node validation

use super::spec::NodeSpec;
use crate::resources::validate_resources;
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{Validate, check_immutable};

impl Validate for NodeSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        match (&self.peer_id, &self.node_private_key_secret_name) {
            (Some(_), None) => errors.push(FieldError::required(
                spec.child("nodePrivateKeySecretName"),
                "must be provided if peerId is provided",
            )),
            (None, Some(_)) => errors.push(FieldError::required(
                spec.child("peerId"),
                "must be provided if nodePrivateKeySecretName is provided",
            )),
            _ => {}
        }

        if self.validator && self.node_private_key_secret_name.is_none() {
            errors.push(FieldError::required(
                spec.child("nodePrivateKeySecretName"),
                "must be provided if validator is true",
            ));
        }

        errors.extend(validate_resources(
            self.resources.as_ref(),
            old.map(|old| old.resources.as_ref()),
        ));

        if let Some(old) = old {
            check_immutable(&mut errors, spec.child("network"), &self.network, &old.network);
            check_immutable(&mut errors, spec.child("validator"), &self.validator, &old.validator);
        }

        errors
    }
}
