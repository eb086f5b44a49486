//! NEAR node defaults

use super::spec::{NearNetwork, NodeSpec};
use crate::clients::ClientKey;
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MIN_PEERS: u32 = 5;
pub const DEFAULT_P2P_PORT: u16 = 24567;
pub const DEFAULT_RPC_PORT: u16 = 3030;
pub const DEFAULT_PROMETHEUS_PORT: u16 = 9615;

const RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "4",
    cpu_limit: "8",
    memory: "16Gi",
    memory_limit: "32Gi",
    storage: "250Gi",
};

pub fn default_telemetry_url(network: NearNetwork) -> String {
    format!("https://explorer.{network}.near.org/api/nodes")
}

impl Defaulter for NodeSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        self.min_peers.get_or_insert(DEFAULT_MIN_PEERS);
        self.p2p_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);

        if self.rpc {
            self.rpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rpc_port.get_or_insert(DEFAULT_RPC_PORT);
        }

        self.prometheus_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
        self.prometheus_port.get_or_insert(DEFAULT_PROMETHEUS_PORT);
        self.telemetry_url
            .get_or_insert_with(|| default_telemetry_url(self.network));

        let resources = if self.archive {
            RESOURCES.with_storage("4Ti")
        } else {
            RESOURCES
        };
        default_resources(&mut self.resources, &resources, ctx.storage_class());

        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::Near, self.network.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::defaulted;

    #[test]
    fn test_archive_testnet_defaults() {
        let spec = defaulted(
            NodeSpec {
                network: NearNetwork::Testnet,
                archive: true,
                ..Default::default()
            },
            &DefaultingContext::default(),
        );

        assert_eq!(spec.min_peers, Some(5));
        assert_eq!(spec.p2p_port, Some(24567));
        assert!(spec.rpc_port.is_none());
        assert_eq!(
            spec.telemetry_url.as_deref(),
            Some("https://explorer.testnet.near.org/api/nodes")
        );
        assert_eq!(spec.resources.unwrap().storage.as_deref(), Some("4Ti"));
    }
}
