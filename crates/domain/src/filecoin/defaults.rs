//! Filecoin node defaults

use super::spec::{FilecoinNetwork, NodeSpec};
use crate::clients::ClientKey;
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};
use crate::verbosity::Verbosity;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 1234;
pub const DEFAULT_API_REQUEST_TIMEOUT: u32 = 30;
pub const DEFAULT_P2P_PORT: u16 = 4444;

const MAINNET_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "8",
    cpu_limit: "16",
    memory: "16Gi",
    memory_limit: "32Gi",
    storage: "200Gi",
};

const TEST_NETWORK_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "4",
    cpu_limit: "8",
    memory: "8Gi",
    memory_limit: "16Gi",
    storage: "100Gi",
};

impl Defaulter for NodeSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        if self.api {
            self.api_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.api_port.get_or_insert(DEFAULT_API_PORT);
            self.api_request_timeout.get_or_insert(DEFAULT_API_REQUEST_TIMEOUT);
        }

        self.p2p_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);
        self.logging.get_or_insert(Verbosity::Info);

        let resources = match self.network {
            FilecoinNetwork::Mainnet => &MAINNET_RESOURCES,
            FilecoinNetwork::Calibration | FilecoinNetwork::Devnet => &TEST_NETWORK_RESOURCES,
        };
        default_resources(&mut self.resources, resources, ctx.storage_class());

        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::Filecoin, self.network.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::defaulted;

    #[test]
    fn test_calibration_defaults() {
        let spec = defaulted(
            NodeSpec {
                network: FilecoinNetwork::Calibration,
                api: true,
                ..Default::default()
            },
            &DefaultingContext::default(),
        );

        assert_eq!(spec.api_port, Some(1234));
        assert_eq!(spec.api_request_timeout, Some(30));
        assert_eq!(spec.p2p_port, Some(4444));
        assert_eq!(
            spec.image.as_deref(),
            Some("filecoin/lotus-all-in-one:v1.23.3-calibnet")
        );
        let resources = spec.resources.unwrap();
        assert_eq!(resources.cpu.as_deref(), Some("4"));
        assert_eq!(resources.storage.as_deref(), Some("100Gi"));
    }
}
