//! Polkadot node defaults

use super::spec::{NodeSpec, SyncMode};
use crate::clients::ClientKey;
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};
use crate::verbosity::Verbosity;

pub const DEFAULT_P2P_PORT: u16 = 30333;
pub const DEFAULT_RPC_PORT: u16 = 9933;
pub const DEFAULT_WS_PORT: u16 = 9944;
pub const DEFAULT_PROMETHEUS_PORT: u16 = 9615;
pub const DEFAULT_TELEMETRY_URL: &str = "wss://telemetry.polkadot.io/submit/ 0";

const RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "4",
    cpu_limit: "8",
    memory: "8Gi",
    memory_limit: "16Gi",
    storage: "80Gi",
};

impl Defaulter for NodeSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        self.sync_mode.get_or_insert(SyncMode::Full);
        self.pruning.get_or_insert(!self.validator);
        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);

        if self.rpc {
            self.rpc_port.get_or_insert(DEFAULT_RPC_PORT);
        }
        if self.ws {
            self.ws_port.get_or_insert(DEFAULT_WS_PORT);
        }
        if self.rpc || self.ws {
            self.cors_domains.get_or_insert_with(|| vec!["all".to_string()]);
        }
        if self.telemetry {
            self.telemetry_url
                .get_or_insert_with(|| DEFAULT_TELEMETRY_URL.to_string());
        }
        if self.prometheus {
            self.prometheus_port.get_or_insert(DEFAULT_PROMETHEUS_PORT);
        }

        self.logging.get_or_insert(Verbosity::Info);

        let resources = if self.is_pruning() {
            RESOURCES
        } else {
            RESOURCES.with_storage("1Ti")
        };
        default_resources(&mut self.resources, &resources, ctx.storage_class());

        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::Polkadot, self.network.as_str()));
    }
}
