//! Ethereum 2 validation

use super::spec::{BeaconNodeSpec, ValidatorSpec};
use crate::capabilities::{Feature, capabilities, check_feature, check_log_level, check_network, not_supported};
use crate::clients::{ClientKey, Eth2Client};
use crate::resources::validate_resources;
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{Validate, check_address, check_immutable, check_unique_names};

impl Validate for BeaconNodeSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();
        let key = ClientKey::BeaconNode(self.client);

        check_network(&mut errors, key, &self.network, spec.child("network"));
        check_feature(&mut errors, key, Feature::Rest, self.rest, spec.child("rest"), self.rest);
        check_feature(&mut errors, key, Feature::Rpc, self.rpc, spec.child("rpc"), self.rpc);
        check_feature(&mut errors, key, Feature::Grpc, self.grpc, spec.child("grpc"), self.grpc);
        check_log_level(&mut errors, key, self.logging, spec.child("logging"));

        if self.eth1_endpoints.len() > 1 {
            check_feature(
                &mut errors,
                key,
                Feature::MultipleEth1Endpoints,
                true,
                spec.child("eth1Endpoints"),
                &self.eth1_endpoints,
            );
        }

        if let Some(url) = &self.checkpoint_sync_url {
            check_feature(
                &mut errors,
                key,
                Feature::CheckpointSync,
                true,
                spec.child("checkpointSyncUrl"),
                url,
            );
        }

        errors.extend(validate_resources(
            self.resources.as_ref(),
            old.map(|old| old.resources.as_ref()),
        ));

        if let Some(old) = old {
            check_immutable(&mut errors, spec.child("network"), &self.network, &old.network);
            check_immutable(&mut errors, spec.child("client"), &self.client, &old.client);
        }

        errors
    }
}

impl Validate for ValidatorSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();
        let key = ClientKey::Validator(self.client);

        check_network(&mut errors, key, &self.network, spec.child("network"));

        let endpoints = spec.child("beaconEndpoints");
        match self.beacon_endpoints.len() {
            0 => errors.push(FieldError::required(
                endpoints,
                "must provide at least one beacon node endpoint",
            )),
            1 => {}
            _ => check_feature(
                &mut errors,
                key,
                Feature::MultipleBeaconEndpoints,
                true,
                endpoints,
                &self.beacon_endpoints,
            ),
        }

        let keystores = spec.child("keystores");
        if self.keystores.is_empty() {
            errors.push(FieldError::required(
                keystores.clone(),
                "must provide at least one keystore",
            ));
        }
        check_unique_names(
            &mut errors,
            &keystores,
            "secretName",
            self.keystores.iter().map(|k| k.secret_name.as_str()),
        );
        if self.client == Eth2Client::Nimbus {
            for (i, keystore) in self.keystores.iter().enumerate() {
                if keystore.public_key.is_none() {
                    errors.push(FieldError::required(
                        keystores.index(i).child("publicKey"),
                        "must provide publicKey if client is nimbus",
                    ));
                }
            }
        }

        let wallet = spec.child("walletPasswordSecret");
        let caps = capabilities(key);
        match &self.wallet_password_secret {
            None if caps.is_mandatory(Feature::WalletPassword) => errors.push(FieldError::required(
                wallet,
                format!("must provide walletPasswordSecret for {} client", key.variant()),
            )),
            Some(secret) if !caps.supports(Feature::WalletPassword) => {
                errors.push(not_supported(key, wallet, secret))
            }
            _ => {}
        }

        if let Some(recipient) = &self.fee_recipient {
            check_address(&mut errors, spec.child("feeRecipient"), recipient);
        }

        check_log_level(&mut errors, key, self.logging, spec.child("logging"));

        errors.extend(validate_resources(
            self.resources.as_ref(),
            old.map(|old| old.resources.as_ref()),
        ));

        if let Some(old) = old {
            check_immutable(&mut errors, spec.child("network"), &self.network, &old.network);
            check_immutable(&mut errors, spec.child("client"), &self.client, &old.client);
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethereum2::spec::Keystore;
    use crate::verbosity::Verbosity;

    fn keystore(name: &str) -> Keystore {
        Keystore {
            secret_name: name.to_string(),
            public_key: None,
        }
    }

    fn validator(client: Eth2Client) -> ValidatorSpec {
        ValidatorSpec {
            client,
            network: "goerli".to_string(),
            beacon_endpoints: vec!["http://beacon:5052".to_string()],
            keystores: vec![keystore("validator-1")],
            ..Default::default()
        }
    }

    #[test]
    fn test_prysm_beacon_node_with_rest() {
        let spec = BeaconNodeSpec {
            client: Eth2Client::Prysm,
            rest: true,
            ..Default::default()
        };

        let errors = spec.validate(None);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("spec.rest", "not supported by prysm client"));
        assert!(errors.contains("spec.rpc", "can't be disabled in prysm client"));
    }

    #[test]
    fn test_nimbus_beacon_node_limits() {
        let spec = BeaconNodeSpec {
            client: Eth2Client::Nimbus,
            network: "mainnet".to_string(),
            eth1_endpoints: vec!["http://a:8545".to_string(), "http://b:8545".to_string()],
            checkpoint_sync_url: Some("https://checkpoint".to_string()),
            logging: Some(Verbosity::Crit),
            ..Default::default()
        };

        let errors = spec.validate(None);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains("spec.eth1Endpoints", "not supported by nimbus client"));
        assert!(errors.contains("spec.checkpointSyncUrl", "not supported by nimbus client"));
        assert!(errors.contains("spec.logging", "not supported by nimbus client"));
    }

    #[test]
    fn test_beacon_node_client_is_immutable() {
        let old = BeaconNodeSpec {
            client: Eth2Client::Teku,
            network: "mainnet".to_string(),
            ..Default::default()
        };
        let new = BeaconNodeSpec {
            client: Eth2Client::Lighthouse,
            ..old.clone()
        };

        let errors = new.validate(Some(&old));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("spec.client", "field is immutable"));
    }

    #[test]
    fn test_prysm_validator_needs_wallet_password() {
        let errors = validator(Eth2Client::Prysm).validate(None);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(
            "spec.walletPasswordSecret",
            "must provide walletPasswordSecret for prysm client"
        ));
    }

    #[test]
    fn test_wallet_password_unsupported_elsewhere() {
        let spec = ValidatorSpec {
            wallet_password_secret: Some("wallet".to_string()),
            ..validator(Eth2Client::Teku)
        };
        let errors = spec.validate(None);
        assert!(errors.contains("spec.walletPasswordSecret", "not supported by teku client"));
    }

    #[test]
    fn test_validator_endpoints_and_keystores() {
        let spec = ValidatorSpec {
            beacon_endpoints: vec!["http://a".to_string(), "http://b".to_string()],
            keystores: vec![keystore("k"), keystore("k")],
            fee_recipient: Some("0x1234".to_string()),
            ..validator(Eth2Client::Nimbus)
        };

        let errors = spec.validate(None);
        assert!(errors.contains("spec.beaconEndpoints", "not supported by nimbus client"));
        assert!(errors.iter().any(|e| e.path.as_str() == "spec.keystores[1].secretName"));
        assert!(errors.contains("spec.keystores[0].publicKey", "must provide publicKey"));
        assert!(errors.contains("spec.feeRecipient", "must be a valid address"));
    }

    #[test]
    fn test_validator_without_endpoints_or_keystores() {
        let spec = ValidatorSpec {
            client: Eth2Client::Lighthouse,
            network: "mainnet".to_string(),
            ..Default::default()
        };

        let errors = spec.validate(None);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("spec.beaconEndpoints", "at least one"));
        assert!(errors.contains("spec.keystores", "at least one"));
    }
}
