//! Filecoin node validation

use super::spec::NodeSpec;
use crate::capabilities::check_log_level;
use crate::clients::ClientKey;
use crate::resources::validate_resources;
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{Validate, check_immutable};

impl Validate for NodeSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        if self.ipfs_peer_endpoint.is_none() {
            for (field, enabled) in [
                ("ipfsOnlineMode", self.ipfs_online_mode),
                ("ipfsForRetrieval", self.ipfs_for_retrieval),
            ] {
                if enabled {
                    errors.push(FieldError::invalid(
                        spec.child(field),
                        enabled,
                        "must be false if ipfsPeerEndpoint is not provided",
                    ));
                }
            }
        }

        check_log_level(&mut errors, ClientKey::Filecoin, self.logging, spec.child("logging"));

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filecoin::spec::FilecoinNetwork;
    use crate::verbosity::Verbosity;

    #[test]
    fn test_ipfs_options_need_peer_endpoint() {
        let spec = NodeSpec {
            ipfs_online_mode: true,
            ipfs_for_retrieval: true,
            logging: Some(Verbosity::Trace),
            ..Default::default()
        };

        let errors = spec.validate(None);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains("spec.ipfsOnlineMode", "ipfsPeerEndpoint"));
        assert!(errors.contains("spec.ipfsForRetrieval", "ipfsPeerEndpoint"));
        assert!(errors.contains("spec.logging", "not supported by lotus client"));
    }

    #[test]
    fn test_network_is_immutable() {
        let old = NodeSpec::default();
        let new = NodeSpec {
            network: FilecoinNetwork::Devnet,
            ipfs_peer_endpoint: Some("/dns4/kubo/tcp/5001".to_string()),
            ipfs_online_mode: true,
            ..Default::default()
        };

        let errors = new.validate(Some(&old));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("spec.network", "field is immutable"));
    }
}
