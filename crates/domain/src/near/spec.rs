//! NEAR node spec model

use crate::resources::Resources;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "near.nodesmith.io",
    version = "v1alpha1",
    kind = "Node",
    namespaced,
    shortname = "nearnode"
)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default)]
    pub network: NearNetwork,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Keep the full chain history
    #[serde(default)]
    pub archive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_private_key_secret_name: Option<String>,

    /// Secret holding the validator key; turns the node into a validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_peers: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default)]
    pub rpc: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus_port: Option<u16>,

    #[serde(default, rename = "telemetryURL", skip_serializing_if = "Option::is_none")]
    pub telemetry_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bootnodes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NearNetwork {
    #[default]
    Mainnet,
    Testnet,
    Betanet,
}

impl NearNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            NearNetwork::Mainnet => "mainnet",
            NearNetwork::Testnet => "testnet",
            NearNetwork::Betanet => "betanet",
        }
    }
}

impl fmt::Display for NearNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
