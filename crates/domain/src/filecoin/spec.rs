//! Filecoin node spec model

use crate::resources::Resources;
use crate::verbosity::Verbosity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "filecoin.nodesmith.io",
    version = "v1alpha1",
    kind = "Node",
    namespaced,
    shortname = "filnode"
)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default)]
    pub network: FilecoinNetwork,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub api: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_port: Option<u16>,

    /// API request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_request_timeout: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    /// Multiaddress of an IPFS peer API used for client storage deals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_peer_endpoint: Option<String>,

    #[serde(default)]
    pub ipfs_online_mode: bool,

    #[serde(default)]
    pub ipfs_for_retrieval: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilecoinNetwork {
    #[default]
    Mainnet,
    Calibration,
    Devnet,
}

impl FilecoinNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilecoinNetwork::Mainnet => "mainnet",
            FilecoinNetwork::Calibration => "calibration",
            FilecoinNetwork::Devnet => "devnet",
        }
    }
}

impl fmt::Display for FilecoinNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
