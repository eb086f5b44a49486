//! Stacks node defaults

use super::spec::NodeSpec;
use crate::clients::ClientKey;
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_RPC_PORT: u16 = 20443;
pub const DEFAULT_P2P_PORT: u16 = 20444;
pub const DEFAULT_BITCOIN_P2P_PORT: u16 = 8333;
pub const DEFAULT_BITCOIN_RPC_PORT: u16 = 8332;

const RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "4",
    cpu_limit: "8",
    memory: "4Gi",
    memory_limit: "8Gi",
    storage: "100Gi",
};

impl Defaulter for NodeSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        if self.rpc {
            self.rpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rpc_port.get_or_insert(DEFAULT_RPC_PORT);
        }

        self.p2p_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);

        self.bitcoin_node.p2p_port.get_or_insert(DEFAULT_BITCOIN_P2P_PORT);
        self.bitcoin_node.rpc_port.get_or_insert(DEFAULT_BITCOIN_RPC_PORT);

        default_resources(&mut self.resources, &RESOURCES, ctx.storage_class());

        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::Stacks, self.network.as_str()));
    }
}
