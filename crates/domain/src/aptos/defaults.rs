//! Aptos node defaults

use super::spec::NodeSpec;
use crate::clients::ClientKey;
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_VALIDATOR_P2P_PORT: u16 = 6180;
pub const DEFAULT_FULL_NODE_P2P_PORT: u16 = 6182;
pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_METRICS_PORT: u16 = 9101;

const FULL_NODE_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "2",
    cpu_limit: "4",
    memory: "4Gi",
    memory_limit: "8Gi",
    storage: "250Gi",
};

const VALIDATOR_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "4",
    cpu_limit: "8",
    memory: "8Gi",
    memory_limit: "16Gi",
    storage: "250Gi",
};

impl Defaulter for NodeSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        let (p2p_port, resources) = if self.validator {
            (DEFAULT_VALIDATOR_P2P_PORT, &VALIDATOR_RESOURCES)
        } else {
            (DEFAULT_FULL_NODE_P2P_PORT, &FULL_NODE_RESOURCES)
        };

        self.p2p_port.get_or_insert(p2p_port);

        if self.api {
            self.api_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.api_port.get_or_insert(DEFAULT_API_PORT);
        }

        self.metrics_port.get_or_insert(DEFAULT_METRICS_PORT);
        default_resources(&mut self.resources, resources, ctx.storage_class());

        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::Aptos, self.network.as_str()));
    }
}
