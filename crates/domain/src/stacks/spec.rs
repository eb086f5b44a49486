//! Stacks node spec model

use crate::resources::Resources;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "stacks.nodesmith.io",
    version = "v1alpha1",
    kind = "Node",
    namespaced,
    shortname = "stxnode"
)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default)]
    pub network: StacksNetwork,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub rpc: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    /// Bitcoin node the Stacks chain is anchored to
    pub bitcoin_node: BitcoinNode,

    #[serde(default)]
    pub miner: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_private_key_secret_name: Option<String>,

    #[serde(default)]
    pub mine_microblocks: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinNode {
    /// Host name or IP of the bitcoin node
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,

    pub rpc_username: String,

    pub rpc_password_secret_name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StacksNetwork {
    #[default]
    Mainnet,
    Testnet,
}

impl StacksNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            StacksNetwork::Mainnet => "mainnet",
            StacksNetwork::Testnet => "testnet",
        }
    }

    /// Burnchain mode understood by stacks-node
    pub fn burnchain_mode(&self) -> &'static str {
        match self {
            StacksNetwork::Mainnet => "mainnet",
            StacksNetwork::Testnet => "xenon",
        }
    }
}

impl fmt::Display for StacksNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
