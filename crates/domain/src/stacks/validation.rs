//! Stacks node validation

use super::spec::NodeSpec;
use crate::resources::validate_resources;
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{Validate, check_immutable};

impl Validate for NodeSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        if self.miner && self.seed_private_key_secret_name.is_none() {
            errors.push(FieldError::required(
                spec.child("seedPrivateKeySecretName"),
                "must be provided if miner is true",
            ));
        }

        if self.mine_microblocks && !self.miner {
            errors.push(FieldError::invalid(
                spec.child("miner"),
                false,
                "must be true if mineMicroblocks is true",
            ));
        }

        errors.extend(validate_resources(
            self.resources.as_ref(),
            old.map(|old| old.resources.as_ref()),
        ));

        if let Some(old) = old {
            check_immutable(&mut errors, spec.child("network"), &self.network, &old.network);
        }

        errors
    }
}
