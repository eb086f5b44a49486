//! IPFS defaults

use super::spec::{ClusterConsensus, ClusterPeerSpec, PeerSpec, Profile, Routing};
use crate::clients::ClientKey;
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};
use crate::verbosity::Verbosity;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 5001;
pub const DEFAULT_GATEWAY_PORT: u16 = 8080;
/// Replication factor meaning "every peer"
pub const REPLICATE_EVERYWHERE: i32 = -1;

const PEER_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "1",
    cpu_limit: "1",
    memory: "2Gi",
    memory_limit: "4Gi",
    storage: "10Gi",
};

const CLUSTER_PEER_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "1",
    cpu_limit: "1",
    memory: "1Gi",
    memory_limit: "2Gi",
    storage: "5Gi",
};

impl Defaulter for PeerSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        self.api_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
        self.api_port.get_or_insert(DEFAULT_API_PORT);
        self.gateway_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
        self.gateway_port.get_or_insert(DEFAULT_GATEWAY_PORT);
        self.routing.get_or_insert(Routing::Dht);
        self.init_profiles
            .get_or_insert_with(|| vec![Profile::DefaultDatastore]);
        self.logging.get_or_insert(Verbosity::Info);
        default_resources(&mut self.resources, &PEER_RESOURCES, ctx.storage_class());
        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::IpfsPeer, ""));
    }
}

impl Defaulter for ClusterPeerSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        let consensus = *self.consensus.get_or_insert(ClusterConsensus::Crdt);
        if consensus == ClusterConsensus::Crdt {
            self.trusted_peers.get_or_insert_with(|| vec!["*".to_string()]);
        }
        self.replication_factor_min.get_or_insert(REPLICATE_EVERYWHERE);
        self.replication_factor_max.get_or_insert(REPLICATE_EVERYWHERE);
        self.logging.get_or_insert(Verbosity::Info);
        default_resources(&mut self.resources, &CLUSTER_PEER_RESOURCES, ctx.storage_class());
        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::IpfsClusterPeer, ""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::defaulted;

    #[test]
    fn test_peer_defaults() {
        let spec = defaulted(PeerSpec::default(), &DefaultingContext::default());
        assert_eq!(spec.api_port, Some(5001));
        assert_eq!(spec.gateway_port, Some(8080));
        assert_eq!(spec.routing, Some(Routing::Dht));
        assert_eq!(spec.init_profiles, Some(vec![Profile::DefaultDatastore]));
        assert_eq!(spec.image.as_deref(), Some("ipfs/kubo:v0.22.0"));
    }

    #[test]
    fn test_raft_cluster_gets_no_trusted_peers() {
        let ctx = DefaultingContext::default();
        let crdt = defaulted(ClusterPeerSpec::default(), &ctx);
        let raft = defaulted(
            ClusterPeerSpec {
                consensus: Some(ClusterConsensus::Raft),
                ..Default::default()
            },
            &ctx,
        );

        assert_eq!(crdt.trusted_peers, Some(vec!["*".to_string()]));
        assert_eq!(crdt.replication_factor_min, Some(-1));
        assert!(raft.trusted_peers.is_none());
    }
}
