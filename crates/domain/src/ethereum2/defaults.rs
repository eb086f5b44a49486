//! Ethereum 2 defaults

use super::spec::{BeaconNodeSpec, ValidatorSpec};
use crate::capabilities::{Feature, capabilities};
use crate::clients::{ClientKey, Eth2Client};
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};
use crate::verbosity::Verbosity;

pub const DEFAULT_P2P_PORT: u16 = 9000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_GRPC_PORT: u16 = 3500;
pub const DEFAULT_GRAFFITI: &str = "Validated by Nodesmith";

const BEACON_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "4",
    cpu_limit: "8",
    memory: "8Gi",
    memory_limit: "16Gi",
    storage: "100Gi",
};

const VALIDATOR_RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "1",
    cpu_limit: "2",
    memory: "1Gi",
    memory_limit: "2Gi",
    storage: "1Gi",
};

pub fn default_rest_port(client: Eth2Client) -> u16 {
    match client {
        Eth2Client::Teku => 5051,
        _ => 5052,
    }
}

pub fn default_rpc_port(client: Eth2Client) -> u16 {
    match client {
        Eth2Client::Nimbus => 9190,
        _ => 4000,
    }
}

impl Defaulter for BeaconNodeSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        let key = ClientKey::BeaconNode(self.client);
        let caps = capabilities(key);

        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);
        self.logging.get_or_insert(Verbosity::Info);

        self.rest |= caps.is_mandatory(Feature::Rest);
        self.rpc |= caps.is_mandatory(Feature::Rpc);
        self.grpc |= caps.is_mandatory(Feature::Grpc);

        if self.rest {
            self.rest_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rest_port.get_or_insert(default_rest_port(self.client));
        }

        if self.rpc {
            self.rpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rpc_port.get_or_insert(default_rpc_port(self.client));
        }

        if self.grpc {
            self.grpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.grpc_port.get_or_insert(DEFAULT_GRPC_PORT);
        }

        if self.rest || self.grpc {
            self.hosts.get_or_insert_with(|| vec!["*".to_string()]);
            self.cors_domains.get_or_insert_with(|| vec!["*".to_string()]);
        }

        let resources = if self.network == "mainnet" {
            BEACON_RESOURCES.with_storage("200Gi")
        } else {
            BEACON_RESOURCES
        };
        default_resources(&mut self.resources, &resources, ctx.storage_class());

        self.image
            .get_or_insert_with(|| ctx.image(key, &self.network));
    }
}

impl Defaulter for ValidatorSpec {
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_defaults(&ctx.admitted_with(old.resources.as_ref()));
    }

    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        self.graffiti.get_or_insert_with(|| DEFAULT_GRAFFITI.to_string());
        self.logging.get_or_insert(Verbosity::Info);
        default_resources(&mut self.resources, &VALIDATOR_RESOURCES, ctx.storage_class());
        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::Validator(self.client), &self.network));
    }
}
