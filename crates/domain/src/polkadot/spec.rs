//! Polkadot node spec model

use crate::resources::Resources;
use crate::verbosity::Verbosity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "polkadot.nodesmith.io",
    version = "v1alpha1",
    kind = "Node",
    namespaced,
    shortname = "dotnode"
)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default)]
    pub network: PolkadotNetwork,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<SyncMode>,

    /// Prune old state; `false` keeps an archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pruning: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retained_blocks: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retained_states: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_private_key_secret_name: Option<String>,

    #[serde(default)]
    pub validator: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default)]
    pub rpc: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,

    #[serde(default)]
    pub ws: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_domains: Option<Vec<String>>,

    #[serde(default)]
    pub telemetry: bool,

    #[serde(default, rename = "telemetryURL", skip_serializing_if = "Option::is_none")]
    pub telemetry_url: Option<String>,

    #[serde(default)]
    pub prometheus: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

impl NodeSpec {
    pub fn is_pruning(&self) -> bool {
        self.pruning.unwrap_or(false)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PolkadotNetwork {
    #[default]
    Polkadot,
    Kusama,
    Westend,
    Rococo,
}

impl PolkadotNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolkadotNetwork::Polkadot => "polkadot",
            PolkadotNetwork::Kusama => "kusama",
            PolkadotNetwork::Westend => "westend",
            PolkadotNetwork::Rococo => "rococo",
        }
    }
}

impl fmt::Display for PolkadotNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    #[default]
    Full,
    Fast,
    Warp,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Full => "full",
            SyncMode::Fast => "fast",
            SyncMode::Warp => "warp",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
