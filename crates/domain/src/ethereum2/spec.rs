//! Ethereum 2 beacon node and validator client spec model

use crate::clients::Eth2Client;
use crate::resources::Resources;
use crate::verbosity::Verbosity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ethereum 2 beacon node
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "ethereum2.nodesmith.io",
    version = "v1alpha1",
    kind = "BeaconNode",
    namespaced,
    shortname = "bn"
)]
#[serde(rename_all = "camelCase")]
pub struct BeaconNodeSpec {
    pub client: Eth2Client,

    /// Public network, e.g. `mainnet`, `goerli`
    #[schemars(length(min = 1))]
    pub network: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Execution layer endpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub eth1_endpoints: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_sync_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default)]
    pub rest: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_port: Option<u16>,

    #[serde(default)]
    pub rpc: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,

    #[serde(default)]
    pub grpc: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_domains: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

/// Validator keystore stored in a secret with `keystore` and `password` keys
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Keystore {
    pub secret_name: String,

    /// Validator public key, needed by clients that index keystores by key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

/// Ethereum 2 validator client
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "ethereum2.nodesmith.io",
    version = "v1alpha1",
    kind = "Validator",
    namespaced,
    shortname = "vc"
)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSpec {
    pub client: Eth2Client,

    #[schemars(length(min = 1))]
    pub network: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub beacon_endpoints: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graffiti: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_recipient: Option<String>,

    #[serde(default)]
    pub keystores: Vec<Keystore>,

    /// Secret holding the wallet password under the `password` key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_password_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}
