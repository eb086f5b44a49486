//! Aptos node spec model

use crate::resources::Resources;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "aptos.nodesmith.io",
    version = "v1alpha1",
    kind = "Node",
    namespaced,
    shortname = "aptosnode"
)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default)]
    pub network: AptosNetwork,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Run a validator instead of a full node
    #[serde(default)]
    pub validator: bool,

    /// Waypoint to bootstrap from; fetched with genesis when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_private_key_secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seed_peers: Vec<SeedPeer>,

    #[serde(default)]
    pub api: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SeedPeer {
    pub id: String,
    pub addresses: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AptosNetwork {
    #[default]
    Devnet,
    Testnet,
    Mainnet,
}

impl AptosNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            AptosNetwork::Devnet => "devnet",
            AptosNetwork::Testnet => "testnet",
            AptosNetwork::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for AptosNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
