//! Bitcoin node defaults

use super::spec::{BitcoinNetwork, NodeSpec};
use crate::clients::ClientKey;
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 125;

const RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "2",
    cpu_limit: "4",
    memory: "4Gi",
    memory_limit: "8Gi",
    storage: "600Gi",
};

pub fn default_p2p_port(network: BitcoinNetwork) -> u16 {
    match network {
        BitcoinNetwork::Mainnet => 8333,
        BitcoinNetwork::Testnet => 18333,
    }
}

pub fn default_rpc_port(network: BitcoinNetwork) -> u16 {
    match network {
        BitcoinNetwork::Mainnet => 8332,
        BitcoinNetwork::Testnet => 18332,
    }
}

impl Defaulter for NodeSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        self.p2p_port.get_or_insert(default_p2p_port(self.network));

        if self.rpc {
            self.rpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rpc_port.get_or_insert(default_rpc_port(self.network));
        }

        self.max_connections.get_or_insert(DEFAULT_MAX_CONNECTIONS);

        let resources = match self.network {
            BitcoinNetwork::Mainnet => RESOURCES,
            BitcoinNetwork::Testnet => RESOURCES.with_storage("50Gi"),
        };
        default_resources(&mut self.resources, &resources, ctx.storage_class());

        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::Bitcoin, self.network.as_str()));
    }
}
