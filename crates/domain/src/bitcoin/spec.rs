//! Bitcoin node spec model

use crate::resources::Resources;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "bitcoin.nodesmith.io",
    version = "v1alpha1",
    kind = "Node",
    namespaced,
    shortname = "btcnode"
)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default)]
    pub network: BitcoinNetwork,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default)]
    pub rpc: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,

    /// JSON-RPC users; at most one is supported
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpc_users: Vec<RpcUser>,

    /// JSON-RPC methods the rpc user may call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpc_whitelist: Vec<String>,

    #[serde(default)]
    pub tx_index: bool,

    #[serde(default)]
    pub coin_stats_index: bool,

    #[serde(default)]
    pub wallet: bool,

    #[serde(default)]
    pub blocks_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BitcoinNetwork {
    #[default]
    Mainnet,
    Testnet,
}

impl BitcoinNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            BitcoinNetwork::Mainnet => "mainnet",
            BitcoinNetwork::Testnet => "testnet",
        }
    }
}

impl fmt::Display for BitcoinNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON-RPC user whose password lives in a secret
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RpcUser {
    pub username: String,
    pub password_secret_name: String,
}
