//! IPFS validation

use super::defaults::REPLICATE_EVERYWHERE;
use super::spec::{ClusterConsensus, ClusterPeerSpec, PeerSpec, Profile};
use crate::capabilities::check_log_level;
use crate::clients::ClientKey;
use crate::resources::validate_resources;
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::validation::{Validate, check_immutable};
use std::collections::HashSet;

fn check_duplicate_profiles(errors: &mut FieldErrors, path: FieldPath, profiles: &[Profile]) {
    let mut seen = HashSet::new();
    for (i, profile) in profiles.iter().enumerate() {
        if !seen.insert(profile) {
            errors.push(FieldError::duplicate(path.index(i), profile));
        }
    }
}

impl Validate for PeerSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        check_log_level(&mut errors, ClientKey::IpfsPeer, self.logging, spec.child("logging"));
        check_duplicate_profiles(&mut errors, spec.child("profiles"), &self.profiles);
        if let Some(profiles) = &self.init_profiles {
            check_duplicate_profiles(&mut errors, spec.child("initProfiles"), profiles);
        }

        errors.extend(validate_resources(
            self.resources.as_ref(),
            old.map(|old| old.resources.as_ref()),
        ));

        if let Some(old) = old {
            check_immutable(
                &mut errors,
                spec.child("initProfiles"),
                &self.init_profiles,
                &old.init_profiles,
            );
        }

        errors
    }
}

impl Validate for ClusterPeerSpec {
    fn validate(&self, old: Option<&Self>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let spec = FieldPath::spec();

        match (&self.id, &self.private_key_secret_name) {
            (Some(_), None) => errors.push(FieldError::required(
                spec.child("privateKeySecretName"),
                "must be provided if id is provided",
            )),
            (None, Some(_)) => errors.push(FieldError::required(
                spec.child("id"),
                "must be provided if privateKeySecretName is provided",
            )),
            _ => {}
        }

        if self.consensus == Some(ClusterConsensus::Raft) {
            if let Some(peers) = &self.trusted_peers {
                errors.push(FieldError::forbidden(
                    spec.child("trustedPeers"),
                    peers,
                    "must be none if consensus is raft",
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.replication_factor_min, self.replication_factor_max) {
            if min != REPLICATE_EVERYWHERE && max != REPLICATE_EVERYWHERE && min > max {
                errors.push(FieldError::invalid(
                    spec.child("replicationFactorMin"),
                    min,
                    format!("must be less than or equal to replicationFactorMax {max}"),
                ));
            }
        }

        check_log_level(
            &mut errors,
            ClientKey::IpfsClusterPeer,
            self.logging,
            spec.child("logging"),
        );

        errors.extend(validate_resources(
            self.resources.as_ref(),
            old.map(|old| old.resources.as_ref()),
        ));

        if let Some(old) = old {
            check_immutable(&mut errors, spec.child("consensus"), &self.consensus, &old.consensus);
            check_immutable(&mut errors, spec.child("id"), &self.id, &old.id);
            check_immutable(
                &mut errors,
                spec.child("privateKeySecretName"),
                &self.private_key_secret_name,
                &old.private_key_secret_name,
            );
            check_immutable(
                &mut errors,
                spec.child("clusterSecretName"),
                &self.cluster_secret_name,
                &old.cluster_secret_name,
            );
        }

        errors
    }
}
