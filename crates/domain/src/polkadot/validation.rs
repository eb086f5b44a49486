//! Polkadot node validation

use super::spec::{NodeSpec, SyncMode};
use crate::capabilities::check_log_level;
use crate::clients::ClientKey;
use crate::resources::validate_resources;
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{Validate, check_immutable, check_requires};

impl Validate for NodeSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        if self.validator {
            if self.is_pruning() {
                errors.push(FieldError::invalid(
                    spec.child("pruning"),
                    true,
                    "must be false if validator is true",
                ));
            }
            if let Some(mode) = self.sync_mode {
                if mode != SyncMode::Full {
                    errors.push(FieldError::invalid(
                        spec.child("syncMode"),
                        mode,
                        "must be full if validator is true",
                    ));
                }
            }
        }

        check_requires(
            &mut errors,
            spec.child("retainedBlocks"),
            self.retained_blocks.is_some(),
            self.retained_blocks,
            "pruning",
            self.is_pruning(),
        );
        check_requires(
            &mut errors,
            spec.child("retainedStates"),
            self.retained_states.is_some(),
            self.retained_states,
            "pruning",
            self.is_pruning(),
        );

        check_log_level(&mut errors, ClientKey::Polkadot, self.logging, spec.child("logging"));

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
