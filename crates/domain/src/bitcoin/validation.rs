//! Bitcoin node validation

use super::spec::NodeSpec;
use crate::resources::validate_resources;
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{Validate, check_immutable, check_requires, check_unique_names};

impl Validate for NodeSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        check_requires(
            &mut errors,
            spec.child("rpcUsers"),
            !self.rpc_users.is_empty(),
            &self.rpc_users,
            "rpc",
            self.rpc,
        );
        check_requires(
            &mut errors,
            spec.child("rpcWhitelist"),
            !self.rpc_whitelist.is_empty(),
            &self.rpc_whitelist,
            "rpc",
            self.rpc,
        );

        let users = spec.child("rpcUsers");
        if self.rpc_users.len() > 1 {
            errors.push(FieldError::invalid(
                users.clone(),
                self.rpc_users.len(),
                "must contain at most one rpc user",
            ));
        }
        check_unique_names(
            &mut errors,
            &users,
            "username",
            self.rpc_users.iter().map(|u| u.username.as_str()),
        );

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
